//! Travel mode enum.
//!
//! The mode never changes which route is found; it only selects the speed
//! used to turn a route length into a travel time (see
//! [`RoutingConfig::speed_kmh`](crate::RoutingConfig::speed_kmh)).

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// How the traveller moves along the route.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    /// Scooter / motorcycle (the common urban case).
    #[default]
    Motorcycle,
    /// Bicycle.
    Bicycle,
    /// On foot.
    Walking,
}

impl TravelMode {
    pub const ALL: [TravelMode; 3] =
        [TravelMode::Motorcycle, TravelMode::Bicycle, TravelMode::Walking];

    /// Lowercase label, matching the configuration file keys.
    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Motorcycle => "motorcycle",
            TravelMode::Bicycle    => "bicycle",
            TravelMode::Walking    => "walking",
        }
    }

    /// Built-in speed in km/h, used when the configuration omits the mode.
    pub fn default_speed_kmh(self) -> f64 {
        match self {
            TravelMode::Motorcycle => 45.0,
            TravelMode::Bicycle    => 18.0,
            TravelMode::Walking    => 5.0,
        }
    }
}

impl std::fmt::Display for TravelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TravelMode::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                CoreError::Config(format!(
                    "unknown travel mode {s:?}: expected motorcycle, bicycle, or walking"
                ))
            })
    }
}
