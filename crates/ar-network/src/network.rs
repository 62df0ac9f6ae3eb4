//! Road graph representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing arcs.
//! Given a `NodeId n`, its outgoing arcs are the `EdgeId`s
//!
//! ```text
//! node_out_start[n] .. node_out_start[n+1]
//! ```
//!
//! All arc arrays are sorted by source node and indexed by `EdgeId`.  A
//! two-way road is two arcs.  Parallel arcs between the same node pair are
//! kept side by side in the same CSR row; nothing is merged, so the solver
//! sees every one of them.
//!
//! # Coordinates
//!
//! Each node keeps its native projected coordinate and the WGS-84 coordinate
//! derived from it by the builder's projector.  The spatial index is built
//! from that same cached array in the same `build` call.

use std::collections::HashMap;

use tracing::{info, warn};

use ar_core::{EdgeId, GeoPoint, NodeId, ProjectedPoint};

use crate::projection::Projector;
use crate::spatial::NodeIndex;
use crate::{LoadError, LoadResult};

// ── Edge attributes ───────────────────────────────────────────────────────────

/// Per-segment attributes as supplied to the builder.
///
/// Missing numeric values are represented as `0.0` from the start
/// (`Default`), which makes a segment with unknown length or exposure free
/// under that weight.  This is the only place that decision is made.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgeAttrs {
    /// Physical length in metres.
    pub length: f64,
    /// Cumulative pollutant exposure along the segment.
    pub exposure: f64,
    /// Polyline of the road curve in native coordinates, from the `from`
    /// node towards the `to` node.  `None` means a straight segment.
    pub geometry: Option<Vec<ProjectedPoint>>,
}

impl EdgeAttrs {
    pub fn new(length: f64, exposure: f64) -> Self {
        Self { length, exposure, geometry: None }
    }

    /// Attributes with optional numbers, defaulting absent ones to zero.
    pub fn from_optional(length: Option<f64>, exposure: Option<f64>) -> Self {
        Self::new(length.unwrap_or(0.0), exposure.unwrap_or(0.0))
    }

    pub fn with_geometry(mut self, geometry: Vec<ProjectedPoint>) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// The same segment traversed the other way.
    fn reversed(&self) -> Self {
        Self {
            length: self.length,
            exposure: self.exposure,
            geometry: self.geometry.as_ref().map(|g| g.iter().rev().copied().collect()),
        }
    }
}

// ── RoadGraph ─────────────────────────────────────────────────────────────────

/// Immutable directed road graph in CSR format, with cached geographic
/// coordinates and a nearest-node index.
///
/// Numeric arrays are `pub` for direct indexed access on hot paths.  Do not
/// construct directly; use [`RoadGraphBuilder`] or the loader.  The type is
/// `Send + Sync` and is meant to be shared behind an `Arc`.
pub struct RoadGraph {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Asset key of each node.  Indexed by `NodeId`.
    pub node_key: Vec<u64>,

    /// Native projected coordinate of each node.
    pub node_xy: Vec<ProjectedPoint>,

    /// WGS-84 coordinate of each node, projected once at build time.
    pub node_geo: Vec<GeoPoint>,

    // ── CSR arc adjacency ─────────────────────────────────────────────────
    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Arc data (indexed by EdgeId) ──────────────────────────────────────
    /// Source node of each arc.  Needed to walk predecessor arcs back to the
    /// search origin.
    pub edge_from: Vec<NodeId>,

    pub edge_to: Vec<NodeId>,

    /// Arc length in metres.
    pub edge_length: Vec<f64>,

    /// Arc exposure cost.
    pub edge_exposure: Vec<f64>,

    /// Projected polyline per arc, `None` for straight arcs.
    edge_geometry: Vec<Option<Box<[GeoPoint]>>>,

    key_to_node: HashMap<u64, NodeId>,

    spatial_idx: NodeIndex,
}

impl RoadGraph {
    /// A graph with no nodes.  Every snap against it fails.
    pub fn empty() -> Self {
        Self {
            node_key:       Vec::new(),
            node_xy:        Vec::new(),
            node_geo:       Vec::new(),
            node_out_start: vec![0],
            edge_from:      Vec::new(),
            edge_to:        Vec::new(),
            edge_length:    Vec::new(),
            edge_exposure:  Vec::new(),
            edge_geometry:  Vec::new(),
            key_to_node:    HashMap::new(),
            spatial_idx:    NodeIndex::build(&[]),
        }
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_geo.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_geo.is_empty()
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    // ── Nodes ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn node_geo(&self, node: NodeId) -> GeoPoint {
        self.node_geo[node.index()]
    }

    #[inline]
    pub fn node_projected(&self, node: NodeId) -> ProjectedPoint {
        self.node_xy[node.index()]
    }

    #[inline]
    pub fn node_key(&self, node: NodeId) -> u64 {
        self.node_key[node.index()]
    }

    /// Resolve an asset node key.
    pub fn node_by_key(&self, key: u64) -> Option<NodeId> {
        self.key_to_node.get(&key).copied()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Outgoing arcs of `node`, a contiguous id range.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// Every arc from `from` to `to`, parallels included.
    pub fn edges_between(&self, from: NodeId, to: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.out_edges(from).filter(move |e| self.edge_to[e.index()] == to)
    }

    // ── Arcs ──────────────────────────────────────────────────────────────

    #[inline]
    pub fn edge_endpoints(&self, edge: EdgeId) -> (NodeId, NodeId) {
        (self.edge_from[edge.index()], self.edge_to[edge.index()])
    }

    /// Stored road-curve geometry of `edge`, if the asset had one.
    pub fn edge_geometry(&self, edge: EdgeId) -> Option<&[GeoPoint]> {
        self.edge_geometry[edge.index()].as_deref()
    }

    /// Polyline to draw for `edge`: the stored geometry, or the straight
    /// segment between its endpoint coordinates.
    pub fn edge_polyline(&self, edge: EdgeId) -> Vec<GeoPoint> {
        match self.edge_geometry(edge) {
            Some(g) => g.to_vec(),
            None => {
                let (from, to) = self.edge_endpoints(edge);
                vec![self.node_geo(from), self.node_geo(to)]
            }
        }
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Nearest node to `point` within `max_distance` degree units.
    pub fn nearest_node(&self, point: GeoPoint, max_distance: f64) -> Option<NodeId> {
        self.spatial_idx.nearest(point, max_distance)
    }

    pub fn spatial_index(&self) -> &NodeIndex {
        &self.spatial_idx
    }
}

/// Summary only; the arrays are far too large to print.
impl std::fmt::Debug for RoadGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoadGraph")
            .field("nodes", &self.node_count())
            .field("arcs", &self.edge_count())
            .field("indexed", &self.spatial_idx.len())
            .finish()
    }
}

// ── RoadGraphBuilder ──────────────────────────────────────────────────────────

/// Construct a [`RoadGraph`] incrementally, then call [`build`](Self::build).
///
/// Nodes and arcs may be added in any order.  `build()` projects every
/// coordinate, validates arc endpoints, sorts arcs into CSR order, and
/// bulk-loads the spatial index.  It either returns a complete graph or an
/// error; there is no partial result.
///
/// # Example
///
/// ```
/// use ar_core::ProjectedPoint;
/// use ar_network::{EdgeAttrs, Geographic, RoadGraphBuilder};
///
/// let mut b = RoadGraphBuilder::new();
/// let a = b.add_node(1, ProjectedPoint::new(121.50, 25.04));
/// let c = b.add_node(2, ProjectedPoint::new(121.51, 25.04));
/// b.add_road(a, c, EdgeAttrs::new(1_010.0, 42.0));
/// let graph = b.build(&Geographic).unwrap();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 2); // bidirectional
/// ```
pub struct RoadGraphBuilder {
    keys:      Vec<u64>,
    nodes:     Vec<ProjectedPoint>,
    key_index: HashMap<u64, NodeId>,
    duplicate: Option<u64>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from:  NodeId,
    to:    NodeId,
    attrs: EdgeAttrs,
}

impl RoadGraphBuilder {
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            keys:      Vec::with_capacity(nodes),
            nodes:     Vec::with_capacity(nodes),
            key_index: HashMap::with_capacity(nodes),
            duplicate: None,
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a node with asset key `key` at native coordinate `pos`, returning
    /// its `NodeId` (sequential from 0).
    ///
    /// A repeated key is recorded and reported by `build()` as
    /// [`LoadError::DuplicateNode`].
    pub fn add_node(&mut self, key: u64, pos: ProjectedPoint) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        if self.key_index.insert(key, id).is_some() && self.duplicate.is_none() {
            self.duplicate = Some(key);
        }
        self.keys.push(key);
        self.nodes.push(pos);
        id
    }

    /// Add a **directed** arc from `from` to `to`.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, attrs: EdgeAttrs) {
        self.raw_edges.push(RawEdge { from, to, attrs });
    }

    /// Add arcs in **both directions** for a two-way road segment.  The
    /// reverse arc gets the geometry reversed.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, attrs: EdgeAttrs) {
        let back = attrs.reversed();
        self.add_directed_edge(a, b, attrs);
        self.add_directed_edge(b, a, back);
    }

    /// `NodeId` previously assigned to `key`.
    pub fn node_by_key(&self, key: u64) -> Option<NodeId> {
        self.key_index.get(&key).copied()
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`RoadGraph`].
    ///
    /// Time complexity: O(E log E) for the arc sort + O(N log N) for the
    /// R-tree bulk load.
    pub fn build<P: Projector + ?Sized>(self, projector: &P) -> LoadResult<RoadGraph> {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        // ── Structural validation ─────────────────────────────────────────
        if let Some(key) = self.duplicate {
            return Err(LoadError::DuplicateNode(key));
        }
        if u32::try_from(node_count).map_or(true, |n| n == u32::MAX) {
            return Err(LoadError::TooLarge("node count"));
        }
        if u32::try_from(edge_count).map_or(true, |n| n == u32::MAX) {
            return Err(LoadError::TooLarge("edge count"));
        }
        for e in &self.raw_edges {
            for end in [e.from, e.to] {
                if end.index() >= node_count {
                    return Err(LoadError::UnknownNode(end.0, node_count));
                }
            }
        }

        let negative = self
            .raw_edges
            .iter()
            .filter(|e| e.attrs.length < 0.0 || e.attrs.exposure < 0.0)
            .count();
        if negative > 0 {
            warn!(
                arcs = negative,
                "negative length or exposure present; shortest paths over these arcs are not guaranteed optimal"
            );
        }

        // ── Projection (exactly once per coordinate) ──────────────────────
        let node_geo: Vec<GeoPoint> = self
            .nodes
            .iter()
            .map(|&p| projector.project(p))
            .collect::<Result<_, _>>()?;

        // Stable sort keeps parallel arcs in insertion order.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let mut edge_from     = Vec::with_capacity(edge_count);
        let mut edge_to       = Vec::with_capacity(edge_count);
        let mut edge_length   = Vec::with_capacity(edge_count);
        let mut edge_exposure = Vec::with_capacity(edge_count);
        let mut edge_geometry = Vec::with_capacity(edge_count);
        let mut node_out_start = vec![0u32; node_count + 1];

        for e in raw {
            node_out_start[e.from.index() + 1] += 1;
            edge_from.push(e.from);
            edge_to.push(e.to);
            edge_length.push(e.attrs.length);
            edge_exposure.push(e.attrs.exposure);
            let geometry = match e.attrs.geometry {
                Some(points) => Some(
                    points
                        .into_iter()
                        .map(|p| projector.project(p))
                        .collect::<Result<Box<[GeoPoint]>, _>>()?,
                ),
                None => None,
            };
            edge_geometry.push(geometry);
        }

        // Prefix sum → CSR row pointer.
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        let spatial_idx = NodeIndex::build(&node_geo);

        info!(nodes = node_count, arcs = edge_count, "road graph built");

        Ok(RoadGraph {
            node_key: self.keys,
            node_xy: self.nodes,
            node_geo,
            node_out_start,
            edge_from,
            edge_to,
            edge_length,
            edge_exposure,
            edge_geometry,
            key_to_node: self.key_index,
            spatial_idx,
        })
    }
}

impl Default for RoadGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
