//! `airroute-compare` — shortest vs. cleanest route between two points.
//!
//! Loads a network asset (or builds a synthetic Taipei grid), snaps the two
//! points, and prints both routes with their distance, travel time, and
//! exposure rate.
//!
//! Run with:
//!   cargo run -p compare --release -- --mode bicycle
//!   cargo run -p compare --release -- --network data/taipei \
//!       --from 25.0478,121.5170 --to 25.0330,121.5654 --json

mod network;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use ar_core::{GeoPoint, RoutingConfig, TravelMode};
use ar_network::{load_graph_dir, Geographic, RoadGraph, TransverseMercator};
use ar_routing::{RouteComparison, RouteEngine, RouteReport};

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Crs {
    /// TWD97 / TM2 zone 121 (EPSG:3826).
    Twd97,
    /// Coordinates already in lon/lat.
    Wgs84,
}

#[derive(Parser, Debug)]
#[command(name = "airroute-compare", about = "Compare the shortest and the least-polluted route", version)]
struct Args {
    /// Directory holding nodes.csv and edges.csv.  Omit to use the
    /// built-in synthetic grid.
    #[arg(long)]
    network: Option<PathBuf>,

    /// Native CRS of the network asset.
    #[arg(long, value_enum, default_value = "twd97")]
    crs: Crs,

    /// JSON routing configuration (speeds, snap tolerance).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Origin as LAT,LON.
    #[arg(long, value_parser = parse_point)]
    from: Option<GeoPoint>,

    /// Destination as LAT,LON.
    #[arg(long, value_parser = parse_point)]
    to: Option<GeoPoint>,

    /// Travel mode used for time and exposure-rate figures.
    #[arg(long, default_value = "motorcycle", value_parser = parse_mode)]
    mode: TravelMode,

    /// Print the full comparison as JSON instead of a summary.
    #[arg(long)]
    json: bool,
}

fn parse_point(s: &str) -> Result<GeoPoint, String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got {s:?}"))?;
    let lat: f64 = lat.trim().parse().map_err(|e| format!("bad latitude: {e}"))?;
    let lon: f64 = lon.trim().parse().map_err(|e| format!("bad longitude: {e}"))?;
    let p = GeoPoint::new(lat, lon);
    if !p.is_valid() {
        return Err(format!("{p} is not a valid WGS-84 coordinate"));
    }
    Ok(p)
}

fn parse_mode(s: &str) -> Result<TravelMode, String> {
    s.parse().map_err(|e: ar_core::CoreError| e.to_string())
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => RoutingConfig::from_json_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => RoutingConfig::default(),
    };

    let t0 = Instant::now();
    let graph = Arc::new(load_network(&args)?);
    info!(
        nodes = graph.node_count(),
        arcs = graph.edge_count(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "network ready"
    );

    let (from, to) = endpoints(&args, &graph)?;
    let engine = RouteEngine::new(Arc::clone(&graph), config);
    let cmp = engine.compare(from, to, args.mode)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&cmp)?);
    } else {
        print_summary(&cmp);
    }
    Ok(())
}

fn load_network(args: &Args) -> Result<RoadGraph> {
    let graph = match (&args.network, args.crs) {
        (None, _) => network::build_network()?,
        (Some(dir), Crs::Twd97) => load_graph_dir(dir, &TransverseMercator::twd97_tm2())?,
        (Some(dir), Crs::Wgs84) => load_graph_dir(dir, &Geographic)?,
    };
    Ok(graph)
}

/// Command-line endpoints, or the two ends of the first arterial on the
/// synthetic grid.
fn endpoints(args: &Args, graph: &RoadGraph) -> Result<(GeoPoint, GeoPoint)> {
    match (args.from, args.to) {
        (Some(from), Some(to)) => Ok((from, to)),
        (None, None) if args.network.is_none() => {
            let west = network::COLS as u64;
            let east = (2 * network::COLS - 1) as u64;
            let geo = |key| {
                graph
                    .node_by_key(key)
                    .map(|n| graph.node_geo(n))
                    .context("synthetic grid is missing a corner node")
            };
            Ok((geo(west)?, geo(east)?))
        }
        _ => bail!("both --from and --to are required with --network"),
    }
}

// ── Output ────────────────────────────────────────────────────────────────────

fn print_summary(cmp: &RouteComparison) {
    let row = |label: &str, r: &RouteReport| {
        println!(
            "  {label:<9} {:>7.2} km  {:>6.1} min  exposure {:>9.2}  rate {:>7.3}/min  ({} hops)",
            r.stats.length_km(),
            r.stats.time_min,
            r.stats.exposure,
            r.stats.exposure_rate,
            r.route.edges.len(),
        );
    };

    println!(
        "{} → {}  by {} ({} km/h)",
        cmp.shortest.origin, cmp.shortest.destination, cmp.shortest.mode, cmp.shortest.stats.speed_kmh
    );
    row("shortest", &cmp.shortest);
    row("cleanest", &cmp.cleanest);
    match cmp.improvement_pct {
        Some(pct) => println!("  exposure rate {pct:.1}% lower on the cleanest route"),
        None => println!("  exposure rate improvement not defined (shortest route has zero exposure rate)"),
    }
}
