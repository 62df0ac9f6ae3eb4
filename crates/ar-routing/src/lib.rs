//! `ar-routing` — shortest paths under a length or exposure weight, route
//! statistics, and the request-level comparison engine.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`router`] | `Weight`, `Route`, `Router` trait, `DijkstraRouter`          |
//! | [`stats`]  | `summarize`, `RouteTotals`, `TravelStats`, `improvement_pct` |
//! | [`engine`] | `RouteEngine`, `RouteReport`, `RouteComparison`              |
//! | [`error`]  | `RequestFailure`                                             |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | Runs the two solves of a comparison with `rayon::join`.   |
//! | `serde`    | Derives `Serialize` on reports and their parts.           |

pub mod engine;
pub mod error;
pub mod router;
pub mod stats;

#[cfg(test)]
mod tests;

pub use engine::{RouteComparison, RouteEngine, RouteReport};
pub use error::RequestFailure;
pub use router::{DijkstraRouter, Route, Router, Weight};
pub use stats::{improvement_pct, summarize, travel_time_min, RouteTotals, TravelStats};
