//! Engine configuration.
//!
//! # JSON format
//!
//! ```json
//! {
//!   "speeds_kmh": { "motorcycle": 45, "bicycle": 18, "walking": 5 },
//!   "snap_tolerance_deg": 0.01
//! }
//! ```
//!
//! Both keys are optional.  Modes missing from `speeds_kmh` fall back to
//! [`TravelMode::default_speed_kmh`]; an unknown mode name is a parse error.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult, TravelMode};

/// Default snapping tolerance in degree units (roughly 1 km at city latitudes).
pub const DEFAULT_SNAP_TOLERANCE_DEG: f64 = 0.01;

/// Speed table and node-snapping tolerance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoutingConfig {
    /// Travel speed per mode, km/h.
    pub speeds_kmh: BTreeMap<TravelMode, f64>,

    /// Maximum degree-space distance between a query point and the node it
    /// snaps to.  Farther points are reported as off-network.
    pub snap_tolerance_deg: f64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            speeds_kmh: TravelMode::ALL
                .into_iter()
                .map(|m| (m, m.default_speed_kmh()))
                .collect(),
            snap_tolerance_deg: DEFAULT_SNAP_TOLERANCE_DEG,
        }
    }
}

impl RoutingConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        let config: RoutingConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_json_file(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Speed for `mode` in km/h.
    pub fn speed_kmh(&self, mode: TravelMode) -> f64 {
        self.speeds_kmh
            .get(&mode)
            .copied()
            .unwrap_or_else(|| mode.default_speed_kmh())
    }

    /// Override the speed for one mode.
    pub fn with_speed(mut self, mode: TravelMode, kmh: f64) -> Self {
        self.speeds_kmh.insert(mode, kmh);
        self
    }

    pub fn with_snap_tolerance(mut self, deg: f64) -> Self {
        self.snap_tolerance_deg = deg;
        self
    }

    /// Reject non-positive or non-finite speeds and negative tolerances.
    pub fn validate(&self) -> CoreResult<()> {
        for (mode, &kmh) in &self.speeds_kmh {
            if !kmh.is_finite() || kmh <= 0.0 {
                return Err(CoreError::Config(format!(
                    "speed for {mode} must be a positive number of km/h, got {kmh}"
                )));
            }
        }
        if !self.snap_tolerance_deg.is_finite() || self.snap_tolerance_deg < 0.0 {
            return Err(CoreError::Config(format!(
                "snap_tolerance_deg must be a non-negative number, got {}",
                self.snap_tolerance_deg
            )));
        }
        Ok(())
    }
}
