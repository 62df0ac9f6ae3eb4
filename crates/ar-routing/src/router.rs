//! Routing trait and default Dijkstra implementation.
//!
//! # Weights
//!
//! One algorithm serves both route kinds; [`Weight`] only selects which arc
//! attribute is the cost.  Attributes missing from the asset were stored as
//! `0.0` by the loader, so such arcs are free under that weight.
//!
//! # Parallel arcs
//!
//! Every arc out of a node is relaxed on its own, so when several arcs join
//! the same pair of nodes the cheapest one under the active weight wins.
//! The winning arc is recorded per hop in [`Route::edges`]; statistics are
//! computed from exactly those arcs.
//!
//! # Negative weights
//!
//! Costs are assumed non-negative.  Each node is settled once, which keeps
//! the search finite on bad data, but the result is then not guaranteed to
//! be optimal.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use ar_core::{EdgeId, NodeId};
use ar_network::RoadGraph;

// ── Weight ────────────────────────────────────────────────────────────────────

/// Which arc attribute the solver minimises.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Weight {
    /// Physical length: the shortest route.
    Length,
    /// Cumulative pollutant exposure: the cleanest route.
    Exposure,
}

impl Weight {
    pub const ALL: [Weight; 2] = [Weight::Length, Weight::Exposure];

    /// Cost of traversing `edge` under this weight.
    #[inline]
    pub fn cost(self, graph: &RoadGraph, edge: EdgeId) -> f64 {
        match self {
            Weight::Length   => graph.edge_length[edge.index()],
            Weight::Exposure => graph.edge_exposure[edge.index()],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Weight::Length   => "length",
            Weight::Exposure => "exposure",
        }
    }
}

impl std::fmt::Display for Weight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Route {
    /// Nodes visited in order, origin first, destination last.
    pub nodes: Vec<NodeId>,
    /// The arc chosen for each hop; `edges[i]` joins `nodes[i]` to
    /// `nodes[i + 1]`.
    pub edges: Vec<EdgeId>,
    /// The weight this route minimises.
    pub weight: Weight,
    /// Total cost under `weight`.
    pub cost: f64,
}

impl Route {
    /// `true` if origin and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn origin(&self) -> NodeId {
        self.nodes[0]
    }

    pub fn destination(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// Implementations must be `Send + Sync`: the engine may run the two solves
/// of a comparison on different threads against the same graph.
pub trait Router: Send + Sync {
    /// Minimum-cost route from `from` to `to` under `weight`.
    ///
    /// Returns `None` if `to` is unreachable from `from` or either id is not
    /// in the graph.  `from == to` is a trivial route, not `None`.
    fn route(&self, graph: &RoadGraph, from: NodeId, to: NodeId, weight: Weight) -> Option<Route>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Binary-heap Dijkstra over the CSR arcs.
///
/// Heap ties are broken on `NodeId`, so repeated queries on the same graph
/// return the same route.
#[derive(Copy, Clone, Debug, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(&self, graph: &RoadGraph, from: NodeId, to: NodeId, weight: Weight) -> Option<Route> {
        dijkstra(graph, from, to, weight)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// `f64` with a total order, for the heap key.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Cost(f64);

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

fn dijkstra(graph: &RoadGraph, from: NodeId, to: NodeId, weight: Weight) -> Option<Route> {
    if !graph.contains(from) || !graph.contains(to) {
        return None;
    }
    if from == to {
        return Some(Route { nodes: vec![from], edges: vec![], weight, cost: 0.0 });
    }

    let n = graph.node_count();
    // dist[v] = best known cost to reach v.
    let mut dist      = vec![f64::INFINITY; n];
    // prev_edge[v] = arc that reached v; INVALID for the origin and unreached nodes.
    let mut prev_edge = vec![EdgeId::INVALID; n];
    let mut settled   = vec![false; n];

    dist[from.index()] = 0.0;

    let mut heap: BinaryHeap<Reverse<(Cost, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((Cost(0.0), from)));

    while let Some(Reverse((Cost(cost), node))) = heap.pop() {
        if settled[node.index()] {
            continue; // stale entry
        }
        settled[node.index()] = true;

        if node == to {
            return Some(reconstruct(graph, &prev_edge, from, to, weight, cost));
        }

        for edge in graph.out_edges(node) {
            let neighbor = graph.edge_to[edge.index()];
            if settled[neighbor.index()] {
                continue;
            }
            let new_cost = cost + weight.cost(graph, edge);
            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(Reverse((Cost(new_cost), neighbor)));
            }
        }
    }

    None
}

fn reconstruct(
    graph: &RoadGraph,
    prev_edge: &[EdgeId],
    from: NodeId,
    to: NodeId,
    weight: Weight,
    cost: f64,
) -> Route {
    let mut edges = Vec::new();
    let mut cur = to;
    while cur != from {
        let e = prev_edge[cur.index()];
        edges.push(e);
        cur = graph.edge_from[e.index()];
    }
    edges.reverse();

    let mut nodes = Vec::with_capacity(edges.len() + 1);
    nodes.push(from);
    nodes.extend(edges.iter().map(|e| graph.edge_to[e.index()]));

    Route { nodes, edges, weight, cost }
}
