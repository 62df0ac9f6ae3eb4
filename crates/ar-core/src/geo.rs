//! Coordinate types.
//!
//! Two coordinate spaces exist in the engine:
//!
//! - [`ProjectedPoint`]: the network asset's native projected CRS
//!   (easting/northing in metres for TWD97 / TM2).
//! - [`GeoPoint`]: WGS-84 latitude/longitude, derived from the projected
//!   point exactly once when the graph is built.
//!
//! Both use `f64`: the projection series loses noticeable precision in `f32`
//! at northing values in the millions of metres.

/// A WGS-84 geographic coordinate in decimal degrees.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Euclidean distance in degree space.
    ///
    /// This is the metric used for node snapping.  It ignores the shrinking
    /// of longitude degrees away from the equator, which is acceptable for
    /// picking the nearest intersection within a city.
    #[inline]
    pub fn planar_distance(self, other: GeoPoint) -> f64 {
        self.planar_distance_2(other).sqrt()
    }

    /// Squared [`planar_distance`](Self::planar_distance).
    #[inline]
    pub fn planar_distance_2(self, other: GeoPoint) -> f64 {
        let d_lat = self.lat - other.lat;
        let d_lon = self.lon - other.lon;
        d_lat * d_lat + d_lon * d_lon
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        const R: f64 = 6_371_000.0; // mean Earth radius, metres

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        2.0 * R * a.sqrt().atan2((1.0 - a).sqrt())
    }

    /// `true` if both components are finite and within the WGS-84 ranges.
    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// `[lat, lon]`, the key layout of the spatial index.
    #[inline]
    pub fn to_array(self) -> [f64; 2] {
        [self.lat, self.lon]
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// A point in the network's native projected CRS.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProjectedPoint {
    /// Easting.
    pub x: f64,
    /// Northing.
    pub y: f64,
}

impl ProjectedPoint {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::fmt::Display for ProjectedPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}
