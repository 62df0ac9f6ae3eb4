//! Load-time error types.
//!
//! Everything here is fatal: a graph that fails to load is never handed out
//! in part.  Per-request outcomes (off-network points, unreachable
//! destinations) are not errors at this layer; see `ar-routing`.

use thiserror::Error;

use ar_core::ProjectedPoint;

/// A native coordinate that cannot be mapped to WGS-84.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    #[error("non-finite coordinate {0}")]
    NonFinite(ProjectedPoint),

    #[error("coordinate {0} projects outside the valid latitude/longitude range")]
    OutOfRange(ProjectedPoint),
}

/// Errors produced while loading or building a [`RoadGraph`](crate::RoadGraph).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("projection error: {0}")]
    Projection(#[from] ProjectionError),

    #[error("duplicate node key {0}")]
    DuplicateNode(u64),

    #[error("edge {row} references unknown node key {key}")]
    UnknownNodeKey { row: usize, key: u64 },

    #[error("edge references node index {0} but the graph has {1} nodes")]
    UnknownNode(u32, usize),

    #[error("edge {row}: invalid {field}: {reason}")]
    InvalidAttribute {
        row: usize,
        field: &'static str,
        reason: String,
    },

    #[error("network has no nodes")]
    Empty,

    #[error("network too large: {0} exceeds the u32 id space")]
    TooLarge(&'static str),
}

pub type LoadResult<T> = Result<T, LoadError>;
