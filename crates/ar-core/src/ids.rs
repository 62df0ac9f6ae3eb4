//! Strongly typed, zero-cost identifier wrappers.
//!
//! Ids are dense positions assigned by the graph builder, not the keys found
//! in the network asset (those are kept separately as `u64` node keys).  The
//! inner integer is `pub` so the CSR arrays can be indexed directly, but
//! callers should prefer `.index()`.

use std::fmt;

/// Declare a `u32` id newtype with the `INVALID` sentinel and index helpers.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, serde::Serialize, serde::Deserialize)]
        $vis struct $name(pub u32);

        impl $name {
            /// Marks "no id", e.g. the predecessor arc of the search origin.
            pub const INVALID: $name = $name(u32::MAX);

            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                u32::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Dense index of a road-network node (intersection).
    pub struct NodeId;
}

typed_id! {
    /// Dense index of a directed road-network arc, in CSR order.
    pub struct EdgeId;
}
