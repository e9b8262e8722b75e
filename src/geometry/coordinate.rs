//! WGS84 geographic coordinates

use serde::{Deserialize, Serialize};

/// Longitude/latitude pair in decimal degrees (WGS84)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeospatialCoordinate {
    /// Longitude in degrees, positive east
    pub longitude: f64,
    /// Latitude in degrees, positive north
    pub latitude: f64,
}

impl GeospatialCoordinate {
    /// Create a coordinate; note longitude comes first
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Return as `(longitude, latitude)`
    pub fn to_tuple(self) -> (f64, f64) {
        (self.longitude, self.latitude)
    }

    /// Euclidean distance in degree space
    ///
    /// Only meaningful for ranking nearby points within a single site.
    pub fn planar_distance(&self, other: &GeospatialCoordinate) -> f64 {
        (self.latitude - other.latitude).hypot(self.longitude - other.longitude)
    }
}

impl From<(f64, f64)> for GeospatialCoordinate {
    fn from((longitude, latitude): (f64, f64)) -> Self {
        Self::new(longitude, latitude)
    }
}
