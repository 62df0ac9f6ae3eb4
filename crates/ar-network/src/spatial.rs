//! Nearest-node snapping.
//!
//! An R-tree (via `rstar`) over the cached `[lat, lon]` coordinate of every
//! node.  It is bulk-loaded once by [`RoadGraphBuilder::build`] from the same
//! coordinate array the graph keeps, and is never modified afterwards.
//!
//! [`RoadGraphBuilder::build`]: crate::RoadGraphBuilder::build

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use ar_core::{GeoPoint, NodeId};

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// A node's geographic coordinate paired with its id.  The entry is the
/// coordinate → node lookup; no separate map is needed.
#[derive(Clone, Debug)]
struct NodeEntry {
    point: [f64; 2], // [lat, lon]
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in degree space.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let d_lat = self.point[0] - point[0];
        let d_lon = self.point[1] - point[1];
        d_lat * d_lat + d_lon * d_lon
    }
}

// ── NodeIndex ─────────────────────────────────────────────────────────────────

/// Read-only point index answering "which node is closest to here?".
pub struct NodeIndex {
    tree: RTree<NodeEntry>,
}

impl NodeIndex {
    /// Bulk-load from node coordinates indexed by `NodeId`.
    ///
    /// O(N log N); faster than N single inserts and gives a better-balanced
    /// tree.
    pub fn build(coords: &[GeoPoint]) -> Self {
        let entries: Vec<NodeEntry> = coords
            .iter()
            .enumerate()
            .map(|(i, g)| NodeEntry { point: g.to_array(), id: NodeId(i as u32) })
            .collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Nearest node to `point` and its degree-space distance.
    ///
    /// `None` when the index is empty or `point` is not a valid WGS-84
    /// coordinate (NaN, infinite, or out of range).
    pub fn nearest_with_distance(&self, point: GeoPoint) -> Option<(NodeId, f64)> {
        if !point.is_valid() {
            return None;
        }
        let query = point.to_array();
        self.tree
            .nearest_neighbor(&query)
            .map(|e| (e.id, e.distance_2(&query).sqrt()))
    }

    /// Nearest node to `point`, or `None` if it is farther than
    /// `max_distance` (degree units), the index is empty, or `point` is
    /// invalid.
    ///
    /// A candidate at exactly `max_distance` matches, so a tolerance of `0.0`
    /// still resolves a query that hits a node coordinate exactly.
    pub fn nearest(&self, point: GeoPoint, max_distance: f64) -> Option<NodeId> {
        match self.nearest_with_distance(point) {
            Some((id, dist)) if dist <= max_distance => Some(id),
            _ => None,
        }
    }
}
