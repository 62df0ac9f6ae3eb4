//! Synthetic road grid over central Taipei, in TWD97 / TM2 coordinates.
//!
//! Used when no network asset is given on the command line.  The grid is
//! `ROWS × COLS` intersections at `SPACING_M` metres.  Every third row is an
//! arterial with heavy traffic (high exposure); the other streets are quiet.
//! Each arterial block also has a parallel side lane that is longer but
//! cleaner, so the two route kinds visibly diverge.

use ar_core::{NodeId, ProjectedPoint};
use ar_network::{EdgeAttrs, LoadResult, RoadGraph, RoadGraphBuilder, TransverseMercator};

pub const ROWS: usize = 12;
pub const COLS: usize = 12;

/// South-west corner, near Taipei Main Station.
const ORIGIN_X: f64 = 301_500.0;
const ORIGIN_Y: f64 = 2_769_000.0;
const SPACING_M: f64 = 250.0;

/// Exposure per metre on quiet streets and on arterials.
const QUIET_RATE: f64 = 0.02;
const ARTERIAL_RATE: f64 = 0.15;

pub fn build_network() -> LoadResult<RoadGraph> {
    let mut b = RoadGraphBuilder::with_capacity(ROWS * COLS, 4 * ROWS * COLS);
    let mut nodes = vec![NodeId::INVALID; ROWS * COLS];

    for row in 0..ROWS {
        for col in 0..COLS {
            let pos = ProjectedPoint::new(
                ORIGIN_X + col as f64 * SPACING_M,
                ORIGIN_Y + row as f64 * SPACING_M,
            );
            nodes[row * COLS + col] = b.add_node((row * COLS + col) as u64, pos);
        }
    }

    // East-west streets.
    for row in 0..ROWS {
        let arterial = row % 3 == 1;
        for col in 0..COLS - 1 {
            let (a, c) = (nodes[row * COLS + col], nodes[row * COLS + col + 1]);
            let rate = if arterial { ARTERIAL_RATE } else { QUIET_RATE };
            b.add_road(a, c, EdgeAttrs::new(SPACING_M, SPACING_M * rate));

            if arterial {
                // Side lane bowing 40 m north of the arterial.
                let len = SPACING_M * 1.1;
                let x0 = ORIGIN_X + col as f64 * SPACING_M;
                let y = ORIGIN_Y + row as f64 * SPACING_M;
                let lane = vec![
                    ProjectedPoint::new(x0, y),
                    ProjectedPoint::new(x0 + SPACING_M * 0.5, y + 40.0),
                    ProjectedPoint::new(x0 + SPACING_M, y),
                ];
                b.add_road(a, c, EdgeAttrs::new(len, len * QUIET_RATE).with_geometry(lane));
            }
        }
    }

    // North-south streets.
    for row in 0..ROWS - 1 {
        for col in 0..COLS {
            let (a, c) = (nodes[row * COLS + col], nodes[(row + 1) * COLS + col]);
            b.add_road(a, c, EdgeAttrs::new(SPACING_M, SPACING_M * QUIET_RATE));
        }
    }

    b.build(&TransverseMercator::twd97_tm2())
}
