//! CSV network asset loader.
//!
//! # Asset format
//!
//! A directory holding two files.
//!
//! `nodes.csv`, one row per intersection, native coordinates:
//!
//! ```csv
//! node_id,x,y
//! 1001,302512.4,2770103.9
//! 1002,302640.0,2770180.2
//! ```
//!
//! `edges.csv`, one row per road segment:
//!
//! ```csv
//! from,to,length,exposure,oneway,geometry
//! 1001,1002,148.7,31.2,,"[[302512.4,2770103.9],[302580.0,2770150.0],[302640.0,2770180.2]]"
//! 1002,1001,148.7,,yes,
//! ```
//!
//! | Column     | Meaning                                                    |
//! |------------|------------------------------------------------------------|
//! | `length`   | metres; empty → `0`                                        |
//! | `exposure` | pollutant cost; empty → `0`                                |
//! | `oneway`   | `yes`/`true`/`1` for a single arc; empty/`no` → both ways  |
//! | `geometry` | empty, or a JSON array of `[x, y]` native points           |
//!
//! Only `from` and `to` are required columns.  Several rows with the same
//! `from`/`to` pair are separate parallel segments.
//!
//! Geometry points are in the same native CRS as `nodes.csv` and go through
//! the same projector; they are never read as lon/lat.  A lon/lat geometry
//! column loaded with [`TransverseMercator`](crate::TransverseMercator) is
//! taken as metres from the false origin and lands near the equator, far
//! from its segment, without a load error.  Such an asset must be loaded
//! with [`Geographic`](crate::Geographic) throughout.
//!
//! Any failure aborts the whole load; a partially read network is never
//! returned.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use ar_core::ProjectedPoint;

use crate::network::{EdgeAttrs, RoadGraph, RoadGraphBuilder};
use crate::projection::Projector;
use crate::{LoadError, LoadResult};

pub const NODES_FILE: &str = "nodes.csv";
pub const EDGES_FILE: &str = "edges.csv";

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    node_id: u64,
    x:       f64,
    y:       f64,
}

#[derive(Deserialize)]
struct EdgeRecord {
    from:     u64,
    to:       u64,
    #[serde(default)]
    length:   Option<f64>,
    #[serde(default)]
    exposure: Option<f64>,
    #[serde(default)]
    oneway:   Option<String>,
    #[serde(default)]
    geometry: Option<String>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load the network asset in `dir` (`nodes.csv` + `edges.csv`).
///
/// # Errors
///
/// [`LoadError::Io`] if either file is missing or unreadable; any other
/// [`LoadError`] variant for malformed or inconsistent content.
pub fn load_graph_dir<P: Projector + ?Sized>(dir: &Path, projector: &P) -> LoadResult<RoadGraph> {
    info!(path = %dir.display(), "loading road network");
    let nodes = File::open(dir.join(NODES_FILE))?;
    let edges = File::open(dir.join(EDGES_FILE))?;
    load_graph_readers(nodes, edges, projector)
}

/// Like [`load_graph_dir`] but accepts any `Read` sources.
///
/// Useful for testing (pass a `std::io::Cursor`) or for assets embedded in
/// another container.
pub fn load_graph_readers<N: Read, E: Read, P: Projector + ?Sized>(
    nodes: N,
    edges: E,
    projector: &P,
) -> LoadResult<RoadGraph> {
    let mut builder = RoadGraphBuilder::new();

    // ── Nodes ─────────────────────────────────────────────────────────────
    let mut node_reader = csv::Reader::from_reader(nodes);
    for result in node_reader.deserialize::<NodeRecord>() {
        let row = result?;
        builder.add_node(row.node_id, ProjectedPoint::new(row.x, row.y));
    }
    if builder.node_count() == 0 {
        return Err(LoadError::Empty);
    }

    // ── Edges ─────────────────────────────────────────────────────────────
    let mut edge_reader = csv::Reader::from_reader(edges);
    let mut segments = 0usize;
    for (i, result) in edge_reader.deserialize::<EdgeRecord>().enumerate() {
        let row_no = i + 1;
        let row = result?;

        let from = builder
            .node_by_key(row.from)
            .ok_or(LoadError::UnknownNodeKey { row: row_no, key: row.from })?;
        let to = builder
            .node_by_key(row.to)
            .ok_or(LoadError::UnknownNodeKey { row: row_no, key: row.to })?;

        let mut attrs = EdgeAttrs::from_optional(
            finite(row.length, row_no, "length")?,
            finite(row.exposure, row_no, "exposure")?,
        );
        if let Some(geometry) = parse_geometry(row.geometry.as_deref(), row_no)? {
            attrs = attrs.with_geometry(geometry);
        }

        if parse_oneway(row.oneway.as_deref(), row_no)? {
            builder.add_directed_edge(from, to, attrs);
        } else {
            builder.add_road(from, to, attrs);
        }
        segments += 1;
    }

    debug!(nodes = builder.node_count(), segments, "network asset parsed");
    builder.build(projector)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn finite(value: Option<f64>, row: usize, field: &'static str) -> LoadResult<Option<f64>> {
    match value {
        Some(v) if !v.is_finite() => Err(LoadError::InvalidAttribute {
            row,
            field,
            reason: format!("{v} is not a finite number"),
        }),
        other => Ok(other),
    }
}

fn parse_oneway(value: Option<&str>, row: usize) -> LoadResult<bool> {
    match value.map(str::trim).unwrap_or("") {
        "" | "no" | "false" | "0" => Ok(false),
        "yes" | "true" | "1" => Ok(true),
        other => Err(LoadError::InvalidAttribute {
            row,
            field: "oneway",
            reason: format!("expected yes/no, got {other:?}"),
        }),
    }
}

fn parse_geometry(value: Option<&str>, row: usize) -> LoadResult<Option<Vec<ProjectedPoint>>> {
    let text = match value.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(t) => t,
    };
    let invalid = |reason: String| LoadError::InvalidAttribute { row, field: "geometry", reason };

    let pairs: Vec<[f64; 2]> = serde_json::from_str(text).map_err(|e| invalid(e.to_string()))?;
    if pairs.len() < 2 {
        return Err(invalid(format!("a polyline needs at least 2 points, got {}", pairs.len())));
    }
    Ok(Some(pairs.into_iter().map(|[x, y]| ProjectedPoint::new(x, y)).collect()))
}
