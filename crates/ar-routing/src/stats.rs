//! Route statistics.
//!
//! Units: lengths in metres, speeds in km/h, times in minutes, exposure
//! rates in exposure units per minute.

use ar_network::RoadGraph;

use crate::router::Route;

/// Sums over the arcs of a route.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RouteTotals {
    /// Metres.
    pub length: f64,
    pub exposure: f64,
}

/// Sum length and exposure over the arcs the solver chose.
///
/// Only the recorded arc of each hop counts; parallel arcs between the same
/// nodes are ignored even if they exist.
pub fn summarize(graph: &RoadGraph, route: &Route) -> RouteTotals {
    route.edges.iter().fold(RouteTotals::default(), |acc, e| RouteTotals {
        length: acc.length + graph.edge_length[e.index()],
        exposure: acc.exposure + graph.edge_exposure[e.index()],
    })
}

/// Minutes to cover `length_m` metres at `speed_kmh`.
///
/// Zero when the speed is not positive; such a speed never passes config
/// validation, so this only guards direct callers.
pub fn travel_time_min(length_m: f64, speed_kmh: f64) -> f64 {
    if speed_kmh <= 0.0 {
        return 0.0;
    }
    length_m * 60.0 / (speed_kmh * 1_000.0)
}

/// Route totals turned into travel figures for one speed.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TravelStats {
    pub length_m: f64,
    pub exposure: f64,
    pub speed_kmh: f64,
    pub time_min: f64,
    /// Exposure per minute of travel; `0.0` for a zero-time route.
    pub exposure_rate: f64,
}

impl TravelStats {
    pub fn from_totals(totals: RouteTotals, speed_kmh: f64) -> Self {
        let time_min = travel_time_min(totals.length, speed_kmh);
        let exposure_rate = if time_min > 0.0 { totals.exposure / time_min } else { 0.0 };
        Self {
            length_m: totals.length,
            exposure: totals.exposure,
            speed_kmh,
            time_min,
            exposure_rate,
        }
    }

    pub fn length_km(&self) -> f64 {
        self.length_m / 1_000.0
    }
}

/// Percentage by which `rate_b` improves on `rate_a`.
///
/// `None` unless `rate_a > 0`.  Negative when `rate_b` is worse.
pub fn improvement_pct(rate_a: f64, rate_b: f64) -> Option<f64> {
    (rate_a > 0.0).then(|| (rate_a - rate_b) * 100.0 / rate_a)
}
