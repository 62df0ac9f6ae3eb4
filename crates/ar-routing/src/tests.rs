//! Unit tests for ar-routing.
//!
//! Networks are hand-built with the identity projection (`x = lon`,
//! `y = lat`), so no asset files are needed.

#[cfg(test)]
mod helpers {
    use ar_core::{NodeId, ProjectedPoint};
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    use ar_network::{EdgeAttrs, Geographic, RoadGraph, RoadGraphBuilder};

    /// Three nodes A, B, C with two-way roads
    ///
    ///   A–B  length 100, exposure 50
    ///   B–C  length 100, exposure 5
    ///   A–C  length 150, exposure 200
    pub fn triangle() -> (RoadGraph, [NodeId; 3]) {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(1, ProjectedPoint::new(121.500, 25.000));
        let bb = b.add_node(2, ProjectedPoint::new(121.501, 25.001));
        let c = b.add_node(3, ProjectedPoint::new(121.502, 25.000));
        b.add_road(a, bb, EdgeAttrs::new(100.0, 50.0));
        b.add_road(bb, c, EdgeAttrs::new(100.0, 5.0));
        b.add_road(a, c, EdgeAttrs::new(150.0, 200.0));
        (b.build(&Geographic).unwrap(), [a, bb, c])
    }

    /// Random sparse graph with `n` nodes, `m` one-way arcs (parallels and
    /// self-loops allowed), integer-valued weights so sums are exact.
    pub fn random_graph(seed: u64, n: usize, m: usize) -> RoadGraph {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut b = RoadGraphBuilder::new();
        let ids: Vec<NodeId> = (0..n)
            .map(|i| {
                b.add_node(i as u64, ProjectedPoint::new(121.0 + rng.gen_range(0.0..1.0), 25.0 + rng.gen_range(0.0..1.0)))
            })
            .collect();
        for _ in 0..m {
            let from = ids[rng.gen_range(0..n)];
            let to = ids[rng.gen_range(0..n)];
            let length = rng.gen_range(1..=50) as f64;
            let exposure = rng.gen_range(0..20) as f64; // zero is allowed: a free arc
            b.add_directed_edge(from, to, EdgeAttrs::new(length, exposure));
        }
        b.build(&Geographic).unwrap()
    }

    /// Minimum cost over every simple path, by exhaustive DFS.
    pub fn brute_force_cost(
        graph: &RoadGraph,
        from: NodeId,
        to: NodeId,
        weight: crate::Weight,
    ) -> Option<f64> {
        fn dfs(
            graph: &RoadGraph,
            node: NodeId,
            to: NodeId,
            weight: crate::Weight,
            cost: f64,
            visited: &mut Vec<bool>,
            best: &mut Option<f64>,
        ) {
            if node == to {
                *best = Some(best.map_or(cost, |b| b.min(cost)));
                return;
            }
            visited[node.index()] = true;
            for e in graph.out_edges(node) {
                let next = graph.edge_to[e.index()];
                if !visited[next.index()] {
                    dfs(graph, next, to, weight, cost + weight.cost(graph, e), visited, best);
                }
            }
            visited[node.index()] = false;
        }

        let mut best = None;
        let mut visited = vec![false; graph.node_count()];
        dfs(graph, from, to, weight, 0.0, &mut visited, &mut best);
        best
    }
}

// ── Dijkstra routing ──────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use ar_core::{NodeId, ProjectedPoint};
    use ar_network::{EdgeAttrs, Geographic, RoadGraphBuilder};

    use super::helpers::{brute_force_cost, random_graph, triangle};
    use crate::{summarize, DijkstraRouter, Router, Weight};

    #[test]
    fn trivial_same_node() {
        let (graph, [a, ..]) = triangle();
        let r = DijkstraRouter.route(&graph, a, a, Weight::Length).unwrap();
        assert!(r.is_trivial());
        assert_eq!(r.nodes, vec![a]);
        assert_eq!(r.cost, 0.0);
    }

    #[test]
    fn exposure_route_takes_the_detour() {
        let (graph, [a, b, c]) = triangle();
        let r = DijkstraRouter.route(&graph, a, c, Weight::Exposure).unwrap();
        assert_eq!(r.nodes, vec![a, b, c]);
        assert_eq!(r.cost, 55.0);
        assert_eq!(summarize(&graph, &r).exposure, 55.0);
        assert_eq!(summarize(&graph, &r).length, 200.0);
    }

    #[test]
    fn length_route_takes_the_direct_road() {
        let (graph, [a, _, c]) = triangle();
        let r = DijkstraRouter.route(&graph, a, c, Weight::Length).unwrap();
        assert_eq!(r.nodes, vec![a, c]);
        assert_eq!(r.cost, 150.0);
        let totals = summarize(&graph, &r);
        assert_eq!(totals.length, 150.0);
        assert_eq!(totals.exposure, 200.0);
    }

    #[test]
    fn route_arcs_chain_from_origin_to_destination() {
        let (graph, [a, _, c]) = triangle();
        let r = DijkstraRouter.route(&graph, a, c, Weight::Exposure).unwrap();
        assert_eq!(r.origin(), a);
        assert_eq!(r.destination(), c);
        assert_eq!(r.nodes.len(), r.edges.len() + 1);
        for (i, &e) in r.edges.iter().enumerate() {
            assert_eq!(graph.edge_endpoints(e), (r.nodes[i], r.nodes[i + 1]));
        }
    }

    #[test]
    fn no_route_between_components() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(1, ProjectedPoint::new(121.0, 25.0));
        let c = b.add_node(2, ProjectedPoint::new(121.1, 25.0));
        let d = b.add_node(3, ProjectedPoint::new(121.2, 25.0));
        b.add_road(c, d, EdgeAttrs::new(10.0, 1.0));
        let graph = b.build(&Geographic).unwrap();
        assert!(DijkstraRouter.route(&graph, a, d, Weight::Length).is_none());
        assert!(DijkstraRouter.route(&graph, a, d, Weight::Exposure).is_none());
    }

    #[test]
    fn one_way_blocks_return() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(1, ProjectedPoint::new(121.0, 25.0));
        let c = b.add_node(2, ProjectedPoint::new(121.1, 25.0));
        b.add_directed_edge(a, c, EdgeAttrs::new(100.0, 1.0));
        let graph = b.build(&Geographic).unwrap();
        assert!(DijkstraRouter.route(&graph, a, c, Weight::Length).is_some());
        assert!(DijkstraRouter.route(&graph, c, a, Weight::Length).is_none());
    }

    #[test]
    fn unknown_node_is_no_route() {
        let (graph, [a, ..]) = triangle();
        assert!(DijkstraRouter.route(&graph, a, NodeId(99), Weight::Length).is_none());
        assert!(DijkstraRouter.route(&graph, NodeId::INVALID, a, Weight::Length).is_none());
    }

    #[test]
    fn cheapest_parallel_arc_wins_per_weight() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(1, ProjectedPoint::new(121.0, 25.0));
        let c = b.add_node(2, ProjectedPoint::new(121.1, 25.0));
        b.add_road(a, c, EdgeAttrs::new(100.0, 80.0)); // short, dirty
        b.add_road(a, c, EdgeAttrs::new(130.0, 20.0)); // long, clean
        let graph = b.build(&Geographic).unwrap();

        let short = DijkstraRouter.route(&graph, a, c, Weight::Length).unwrap();
        let clean = DijkstraRouter.route(&graph, a, c, Weight::Exposure).unwrap();
        assert_eq!(short.edges.len(), 1);
        assert_eq!(clean.edges.len(), 1);
        assert_ne!(short.edges[0], clean.edges[0]);

        // Only the chosen arc is counted, never both parallels.
        let t = summarize(&graph, &short);
        assert_eq!((t.length, t.exposure), (100.0, 80.0));
        let t = summarize(&graph, &clean);
        assert_eq!((t.length, t.exposure), (130.0, 20.0));
    }

    #[test]
    fn missing_attribute_is_free() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(1, ProjectedPoint::new(121.0, 25.0));
        let m = b.add_node(2, ProjectedPoint::new(121.1, 25.1));
        let c = b.add_node(3, ProjectedPoint::new(121.2, 25.0));
        b.add_road(a, c, EdgeAttrs::from_optional(Some(100.0), Some(10.0)));
        b.add_road(a, m, EdgeAttrs::from_optional(Some(500.0), None));
        b.add_road(m, c, EdgeAttrs::from_optional(Some(500.0), None));
        let graph = b.build(&Geographic).unwrap();

        let r = DijkstraRouter.route(&graph, a, c, Weight::Exposure).unwrap();
        assert_eq!(r.nodes, vec![a, m, c]);
        assert_eq!(r.cost, 0.0);
    }

    #[test]
    fn optimal_against_brute_force() {
        for seed in 0..20u64 {
            let graph = random_graph(seed, 9, 24);
            for from in 0..graph.node_count() as u32 {
                for to in 0..graph.node_count() as u32 {
                    let (from, to) = (NodeId(from), NodeId(to));
                    for weight in Weight::ALL {
                        let found = DijkstraRouter.route(&graph, from, to, weight);
                        let expected = brute_force_cost(&graph, from, to, weight);
                        match (found, expected) {
                            (Some(r), Some(best)) => {
                                assert_eq!(r.cost, best, "seed {seed} {from}->{to} {weight}");
                                let direct: f64 = r.edges.iter().map(|&e| weight.cost(&graph, e)).sum();
                                assert_eq!(direct, r.cost);
                            }
                            (None, None) => {}
                            (found, expected) => panic!(
                                "seed {seed} {from}->{to} {weight}: reachability mismatch \
                                 (dijkstra {:?}, brute force {expected:?})",
                                found.map(|r| r.cost)
                            ),
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn deterministic_repeat() {
        let graph = random_graph(42, 30, 120);
        for to in 1..30u32 {
            let a = DijkstraRouter.route(&graph, NodeId(0), NodeId(to), Weight::Length);
            let b = DijkstraRouter.route(&graph, NodeId(0), NodeId(to), Weight::Length);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn negative_weights_terminate() {
        let mut b = RoadGraphBuilder::new();
        let a = b.add_node(1, ProjectedPoint::new(121.0, 25.0));
        let m = b.add_node(2, ProjectedPoint::new(121.1, 25.0));
        let c = b.add_node(3, ProjectedPoint::new(121.2, 25.0));
        // A two-way negative arc is a negative cycle.
        b.add_road(a, m, EdgeAttrs::new(-10.0, 1.0));
        b.add_road(m, c, EdgeAttrs::new(5.0, 1.0));
        let graph = b.build(&Geographic).unwrap();
        let r = DijkstraRouter.route(&graph, a, c, Weight::Length).unwrap();
        assert_eq!(r.destination(), c);
    }
}

// ── Statistics ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod stats {
    use super::helpers::{random_graph, triangle};
    use crate::{
        improvement_pct, summarize, travel_time_min, DijkstraRouter, RouteTotals, Router,
        TravelStats, Weight,
    };
    use ar_core::NodeId;

    #[test]
    fn five_km_at_fifty_is_six_minutes() {
        assert_eq!(travel_time_min(5_000.0, 50.0), 6.0);
        let s = TravelStats::from_totals(RouteTotals { length: 5_000.0, exposure: 30.0 }, 50.0);
        assert_eq!(s.time_min, 6.0);
        assert_eq!(s.exposure_rate, 5.0);
        assert_eq!(s.length_km(), 5.0);
    }

    #[test]
    fn zero_length_has_zero_rate() {
        let s = TravelStats::from_totals(RouteTotals { length: 0.0, exposure: 12.0 }, 45.0);
        assert_eq!(s.time_min, 0.0);
        assert_eq!(s.exposure_rate, 0.0);
    }

    #[test]
    fn non_positive_speed_is_zero_time() {
        assert_eq!(travel_time_min(1_000.0, 0.0), 0.0);
        assert_eq!(travel_time_min(1_000.0, -5.0), 0.0);
    }

    #[test]
    fn improvement() {
        assert_eq!(improvement_pct(10.0, 4.0), Some(60.0));
        assert_eq!(improvement_pct(0.0, 4.0), None);
        assert_eq!(improvement_pct(0.0, 0.0), None);
        assert_eq!(improvement_pct(4.0, 5.0), Some(-25.0));
    }

    #[test]
    fn trivial_route_sums_to_zero() {
        let (graph, [a, ..]) = triangle();
        let r = DijkstraRouter.route(&graph, a, a, Weight::Exposure).unwrap();
        assert_eq!(summarize(&graph, &r), RouteTotals::default());
    }

    #[test]
    fn totals_equal_direct_sum_and_are_idempotent() {
        let graph = random_graph(7, 25, 90);
        for to in 1..25u32 {
            for weight in Weight::ALL {
                let Some(r) = DijkstraRouter.route(&graph, NodeId(0), NodeId(to), weight) else {
                    continue;
                };
                let first = summarize(&graph, &r);
                let second = summarize(&graph, &r);
                assert_eq!(first, second);

                let length: f64 = r.edges.iter().map(|e| graph.edge_length[e.index()]).sum();
                let exposure: f64 = r.edges.iter().map(|e| graph.edge_exposure[e.index()]).sum();
                assert_eq!(first.length, length);
                assert_eq!(first.exposure, exposure);
            }
        }
    }
}

// ── Engine ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod engine {
    use std::sync::Arc;

    use ar_core::{GeoPoint, ProjectedPoint, RoutingConfig, TravelMode};
    use ar_network::{EdgeAttrs, Geographic, RoadGraph, RoadGraphBuilder};

    use crate::{RequestFailure, RouteEngine, Weight};

    /// A 3×3 lattice around (25.00, 121.50), spacing 0.005°.  The central
    /// row is a short but polluted arterial; the outer rows are clean.
    fn lattice() -> Arc<RoadGraph> {
        let mut b = RoadGraphBuilder::new();
        let mut ids = [[ar_core::NodeId::INVALID; 3]; 3];
        for (r, row) in ids.iter_mut().enumerate() {
            for (c, id) in row.iter_mut().enumerate() {
                let key = (r * 3 + c) as u64;
                *id = b.add_node(key, ProjectedPoint::new(121.50 + 0.005 * c as f64, 25.00 + 0.005 * r as f64));
            }
        }
        for r in 0..3 {
            let exposure = if r == 1 { 100.0 } else { 10.0 };
            for c in 0..2 {
                b.add_road(ids[r][c], ids[r][c + 1], EdgeAttrs::new(500.0, exposure));
            }
        }
        for r in 0..2 {
            for c in 0..3 {
                b.add_road(ids[r][c], ids[r + 1][c], EdgeAttrs::new(550.0, 1.0));
            }
        }
        // An island far from everything else but within snapping range of
        // its own point.
        let island = b.add_node(99, ProjectedPoint::new(121.60, 25.10));
        let island2 = b.add_node(100, ProjectedPoint::new(121.601, 25.10));
        b.add_road(island, island2, EdgeAttrs::new(100.0, 1.0));
        Arc::new(b.build(&Geographic).unwrap())
    }

    fn engine() -> RouteEngine {
        RouteEngine::new(lattice(), RoutingConfig::default())
    }

    const WEST: GeoPoint = GeoPoint { lat: 25.0051, lon: 121.4999 };
    const EAST: GeoPoint = GeoPoint { lat: 25.0049, lon: 121.5101 };

    #[test]
    fn compare_shortest_and_cleanest() {
        let cmp = engine().compare(WEST, EAST, TravelMode::Bicycle).unwrap();

        assert_eq!(cmp.shortest.weight(), Weight::Length);
        assert_eq!(cmp.cleanest.weight(), Weight::Exposure);

        // Straight along the arterial: 2 × 500 m, exposure 200.
        assert_eq!(cmp.shortest.totals.length, 1_000.0);
        assert_eq!(cmp.shortest.totals.exposure, 200.0);
        // Detour through a clean row: 550 + 1000 + 550, exposure 1 + 20 + 1.
        assert_eq!(cmp.cleanest.totals.length, 2_100.0);
        assert_eq!(cmp.cleanest.totals.exposure, 22.0);

        let rate_a = cmp.shortest.stats.exposure_rate;
        let rate_b = cmp.cleanest.stats.exposure_rate;
        let expected = (rate_a - rate_b) * 100.0 / rate_a;
        assert_eq!(cmp.improvement_pct, Some(expected));
        assert!(expected > 0.0);
    }

    #[test]
    fn snapped_endpoints_and_geometry() {
        let e = engine();
        let report = e.route(WEST, EAST, Weight::Length, TravelMode::Walking).unwrap();
        let graph = e.graph();
        // Keys are row * 3 + col: the middle row's west and east ends.
        assert_eq!(report.origin, graph.node_geo(graph.node_by_key(3).unwrap()));
        assert_eq!(report.destination, graph.node_geo(graph.node_by_key(5).unwrap()));
        assert_eq!(report.geometry.len(), report.route.edges.len());
        assert_eq!(report.geometry[0][0], report.origin);
        assert_eq!(report.geometry.last().unwrap()[1], report.destination);
    }

    #[test]
    fn mode_changes_time_not_route() {
        let e = engine();
        let walk = e.route(WEST, EAST, Weight::Length, TravelMode::Walking).unwrap();
        let ride = e.route(WEST, EAST, Weight::Length, TravelMode::Motorcycle).unwrap();
        assert_eq!(walk.route, ride.route);
        assert_eq!(walk.stats.time_min, 12.0); // 1 km at 5 km/h
        assert!((ride.stats.time_min - 1.0 / 45.0 * 60.0).abs() < 1e-12);
    }

    #[test]
    fn configured_speed_is_used() {
        let cfg = RoutingConfig::default().with_speed(TravelMode::Bicycle, 12.0);
        let e = RouteEngine::new(lattice(), cfg);
        let r = e.route(WEST, EAST, Weight::Length, TravelMode::Bicycle).unwrap();
        assert_eq!(r.stats.speed_kmh, 12.0);
        assert_eq!(r.stats.time_min, 5.0);
    }

    #[test]
    fn off_network_endpoints() {
        let e = engine();
        let far = GeoPoint::new(24.55, 121.50); // ~50 km south
        assert_eq!(
            e.compare(far, EAST, TravelMode::Walking).unwrap_err(),
            RequestFailure::OriginOffNetwork(far)
        );
        assert_eq!(
            e.compare(WEST, far, TravelMode::Walking).unwrap_err(),
            RequestFailure::DestinationOffNetwork(far)
        );
    }

    #[test]
    fn nan_endpoints_are_off_network() {
        let e = engine();
        let bad = GeoPoint::new(f64::NAN, 121.50);
        assert!(matches!(
            e.compare(bad, EAST, TravelMode::Walking),
            Err(RequestFailure::OriginOffNetwork(_))
        ));
        assert!(matches!(
            e.route(WEST, bad, Weight::Exposure, TravelMode::Walking),
            Err(RequestFailure::DestinationOffNetwork(_))
        ));
        // The engine keeps serving after a bad request.
        assert!(e.compare(WEST, EAST, TravelMode::Walking).is_ok());
    }

    #[test]
    fn different_components_have_no_path() {
        let e = engine();
        let island = GeoPoint::new(25.10, 121.60);
        let err = e.compare(WEST, island, TravelMode::Walking).unwrap_err();
        assert!(matches!(err, RequestFailure::NoPath { .. }));
    }

    #[test]
    fn same_point_is_a_trivial_route() {
        let cmp = engine().compare(WEST, WEST, TravelMode::Walking).unwrap();
        assert!(cmp.shortest.route.is_trivial());
        assert_eq!(cmp.shortest.stats.exposure_rate, 0.0);
        assert_eq!(cmp.improvement_pct, None);
        assert!(cmp.cleanest.geometry.is_empty());
    }

    #[test]
    fn concurrent_requests_share_one_graph() {
        let e = engine();
        let expected = e.compare(WEST, EAST, TravelMode::Motorcycle).unwrap();
        std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| e.compare(WEST, EAST, TravelMode::Motorcycle).unwrap()))
                .collect();
            for h in handles {
                assert_eq!(h.join().unwrap(), expected);
            }
        });
        assert_eq!(Arc::strong_count(e.graph()), 1);
    }
}
