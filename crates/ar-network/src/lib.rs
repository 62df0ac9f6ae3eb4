//! `ar-network` — the immutable road graph and everything needed to build it.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`network`]    | `RoadGraph` (CSR + cached coordinates), `RoadGraphBuilder`|
//! | [`projection`] | `Projector` trait, `TransverseMercator`, `Geographic`     |
//! | [`spatial`]    | `NodeIndex`, R-tree nearest-node snapping                 |
//! | [`loader`]     | `load_graph_dir`, `load_graph_readers` (CSV asset)        |
//! | [`error`]      | `LoadError`, `ProjectionError`, `LoadResult<T>`           |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `ar-core` value types.  |

pub mod error;
pub mod loader;
pub mod network;
pub mod projection;
pub mod spatial;


pub use error::{LoadError, LoadResult, ProjectionError};
pub use loader::{load_graph_dir, load_graph_readers};
pub use network::{EdgeAttrs, RoadGraph, RoadGraphBuilder};
pub use projection::{Geographic, Projector, TransverseMercator};
pub use spatial::NodeIndex;
