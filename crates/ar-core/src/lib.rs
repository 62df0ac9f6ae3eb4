//! `ar-core` — foundational types for the `airroute` routing engine.
//!
//! This crate is a dependency of every other `ar-*` crate.  It has no `ar-*`
//! dependencies and only small external ones (`thiserror`, `serde`,
//! `serde_json`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `NodeId`, `EdgeId`                                    |
//! | [`geo`]         | `GeoPoint` (WGS-84), `ProjectedPoint` (native CRS)    |
//! | [`transport`]   | `TravelMode` enum                                     |
//! | [`config`]      | `RoutingConfig` (speed table, snap tolerance)         |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! Ids and coordinates always derive `Serialize`/`Deserialize`; `serde` is a
//! hard dependency for the configuration loader anyway.

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod transport;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::RoutingConfig;
pub use error::{CoreError, CoreResult};
pub use geo::{GeoPoint, ProjectedPoint};
pub use ids::{EdgeId, NodeId};
pub use transport::TravelMode;
