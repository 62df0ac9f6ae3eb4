//! Request-level engine: snap two points, solve under both weights, and
//! compare.
//!
//! The engine holds the graph behind an `Arc` and never mutates it, so one
//! engine (or many clones sharing the same graph) can serve requests from
//! any number of threads without locking.  Replacing the network means
//! building a new graph and a new engine; in-flight requests keep the
//! snapshot they started with.
//!
//! # Example
//!
//! ```rust,ignore
//! let graph = Arc::new(load_graph_dir(dir, &TransverseMercator::twd97_tm2())?);
//! let engine = RouteEngine::new(graph, RoutingConfig::default());
//! let cmp = engine.compare(origin, destination, TravelMode::Bicycle)?;
//! println!("{:?}% less exposure per minute", cmp.improvement_pct);
//! ```

use std::sync::Arc;

use tracing::debug;

use ar_core::{GeoPoint, NodeId, RoutingConfig, TravelMode};
use ar_network::RoadGraph;

use crate::router::{DijkstraRouter, Route, Router, Weight};
use crate::stats::{improvement_pct, summarize, RouteTotals, TravelStats};
use crate::RequestFailure;

// ── Reports ───────────────────────────────────────────────────────────────────

/// One solved route with everything a caller needs to draw and describe it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RouteReport {
    pub mode: TravelMode,
    pub route: Route,
    /// Coordinate of the node the origin snapped to.
    pub origin: GeoPoint,
    /// Coordinate of the node the destination snapped to.
    pub destination: GeoPoint,
    pub totals: RouteTotals,
    pub stats: TravelStats,
    /// One polyline per arc, in route order: the stored road geometry, or
    /// the straight segment between the arc's endpoints.
    pub geometry: Vec<Vec<GeoPoint>>,
}

impl RouteReport {
    pub fn weight(&self) -> Weight {
        self.route.weight
    }
}

/// Shortest and cleanest routes for the same request.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RouteComparison {
    /// Minimises length.
    pub shortest: RouteReport,
    /// Minimises exposure.
    pub cleanest: RouteReport,
    /// How much lower the cleanest route's exposure rate is than the
    /// shortest route's, in percent.  `None` when the shortest route has a
    /// zero exposure rate.
    pub improvement_pct: Option<f64>,
}

// ── RouteEngine ───────────────────────────────────────────────────────────────

/// Stateless request handler over a shared immutable graph.
///
/// # Type parameter
///
/// `R` is the routing algorithm, [`DijkstraRouter`] by default.
#[derive(Clone)]
pub struct RouteEngine<R: Router = DijkstraRouter> {
    graph:  Arc<RoadGraph>,
    config: RoutingConfig,
    router: R,
}

impl RouteEngine<DijkstraRouter> {
    pub fn new(graph: Arc<RoadGraph>, config: RoutingConfig) -> Self {
        Self::with_router(graph, config, DijkstraRouter)
    }
}

impl<R: Router> RouteEngine<R> {
    pub fn with_router(graph: Arc<RoadGraph>, config: RoutingConfig, router: R) -> Self {
        Self { graph, config, router }
    }

    pub fn graph(&self) -> &Arc<RoadGraph> {
        &self.graph
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// Nearest node within the configured snap tolerance.
    pub fn snap(&self, point: GeoPoint) -> Option<NodeId> {
        self.graph.nearest_node(point, self.config.snap_tolerance_deg)
    }

    /// Route between two geographic points under one weight.
    pub fn route(
        &self,
        origin:      GeoPoint,
        destination: GeoPoint,
        weight:      Weight,
        mode:        TravelMode,
    ) -> Result<RouteReport, RequestFailure> {
        let (from, to) = self.snap_endpoints(origin, destination)?;
        self.solve(from, to, weight, mode)
    }

    /// Shortest and cleanest routes between two geographic points.
    ///
    /// Both endpoints are snapped once and shared by the two solves.  With
    /// the `parallel` feature the solves run concurrently.
    pub fn compare(
        &self,
        origin:      GeoPoint,
        destination: GeoPoint,
        mode:        TravelMode,
    ) -> Result<RouteComparison, RequestFailure> {
        let (from, to) = self.snap_endpoints(origin, destination)?;

        #[cfg(feature = "parallel")]
        let (shortest, cleanest) = rayon::join(
            || self.solve(from, to, Weight::Length, mode),
            || self.solve(from, to, Weight::Exposure, mode),
        );
        #[cfg(not(feature = "parallel"))]
        let (shortest, cleanest) = (
            self.solve(from, to, Weight::Length, mode),
            self.solve(from, to, Weight::Exposure, mode),
        );

        let (shortest, cleanest) = (shortest?, cleanest?);
        let improvement_pct =
            improvement_pct(shortest.stats.exposure_rate, cleanest.stats.exposure_rate);

        Ok(RouteComparison { shortest, cleanest, improvement_pct })
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn snap_endpoints(
        &self,
        origin:      GeoPoint,
        destination: GeoPoint,
    ) -> Result<(NodeId, NodeId), RequestFailure> {
        let from = self.snap(origin).ok_or_else(|| {
            debug!(%origin, "origin off network");
            RequestFailure::OriginOffNetwork(origin)
        })?;
        let to = self.snap(destination).ok_or_else(|| {
            debug!(%destination, "destination off network");
            RequestFailure::DestinationOffNetwork(destination)
        })?;
        debug!(
            %from, %to,
            origin_offset_m = origin.distance_m(self.graph.node_geo(from)),
            destination_offset_m = destination.distance_m(self.graph.node_geo(to)),
            "endpoints snapped"
        );
        Ok((from, to))
    }

    fn solve(
        &self,
        from:   NodeId,
        to:     NodeId,
        weight: Weight,
        mode:   TravelMode,
    ) -> Result<RouteReport, RequestFailure> {
        let graph = self.graph.as_ref();
        let Some(route) = self.router.route(graph, from, to, weight) else {
            debug!(%from, %to, %weight, "no path");
            return Err(RequestFailure::NoPath { from, to });
        };

        let totals = summarize(graph, &route);
        let stats = TravelStats::from_totals(totals, self.config.speed_kmh(mode));
        let geometry = route.edges.iter().map(|&e| graph.edge_polyline(e)).collect();
        debug!(
            %from, %to, %weight,
            hops = route.edges.len(),
            length_m = totals.length,
            exposure = totals.exposure,
            "route solved"
        );

        Ok(RouteReport {
            mode,
            origin: graph.node_geo(from),
            destination: graph.node_geo(to),
            route,
            totals,
            stats,
            geometry,
        })
    }
}
