//! Per-request failure outcomes.
//!
//! These are ordinary results of a routing request, not faults: one request
//! failing never affects another, and the graph is untouched.  They
//! implement `Error` so a front-end can bubble them up with `?`.

use thiserror::Error;

use ar_core::{GeoPoint, NodeId};

#[derive(Debug, Clone, PartialEq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum RequestFailure {
    #[error("origin {0} is too far from the road network")]
    OriginOffNetwork(GeoPoint),

    #[error("destination {0} is too far from the road network")]
    DestinationOffNetwork(GeoPoint),

    #[error("no route exists from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },
}
