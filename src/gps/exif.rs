//! EXIF GPS value interpretation
//!
//! Drone cameras store position as degree/minute/second rationals plus a
//! hemisphere reference letter. Reading the tags from the file is left to the
//! image loading layer; this module turns the raw values into decimal degrees.

use serde::{Deserialize, Serialize};

use crate::error::{InspectionError, Result};
use crate::geometry::GeospatialCoordinate;

/// Position recorded by the drone for a raw thermal image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsFix {
    /// Decimal degrees, negative south
    pub latitude: f64,
    /// Decimal degrees, negative west
    pub longitude: f64,
    /// Altitude in metres, when recorded
    pub altitude: Option<f64>,
}

impl GpsFix {
    /// Build from EXIF DMS triples and reference letters
    ///
    /// # Arguments
    ///
    /// * `latitude` / `longitude` - `(degrees, minutes, seconds)`
    /// * `latitude_ref` - `'N'` or `'S'`
    /// * `longitude_ref` - `'E'` or `'W'`
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for unknown reference letters or values
    /// outside the valid latitude/longitude range.
    pub fn from_dms(
        latitude: (f64, f64, f64),
        latitude_ref: char,
        longitude: (f64, f64, f64),
        longitude_ref: char,
    ) -> Result<Self> {
        let lat = dms_to_decimal(latitude, latitude_ref, 'N', 'S')?;
        let lon = dms_to_decimal(longitude, longitude_ref, 'E', 'W')?;

        if !(-90.0..=90.0).contains(&lat) {
            return Err(InspectionError::invalid_parameter("gps.latitude", lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(InspectionError::invalid_parameter("gps.longitude", lon));
        }

        Ok(Self {
            latitude: lat,
            longitude: lon,
            altitude: None,
        })
    }

    /// Attach the recorded altitude
    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = Some(altitude);
        self
    }

    /// Position as a WGS84 coordinate
    pub fn coordinate(&self) -> GeospatialCoordinate {
        GeospatialCoordinate::new(self.longitude, self.latitude)
    }
}

/// Convert an EXIF rational to float
pub fn rational_to_f64(numerator: u32, denominator: u32) -> Option<f64> {
    if denominator == 0 {
        None
    } else {
        Some(f64::from(numerator) / f64::from(denominator))
    }
}

fn dms_to_decimal(
    (degrees, minutes, seconds): (f64, f64, f64),
    reference: char,
    positive: char,
    negative: char,
) -> Result<f64> {
    let magnitude = degrees + minutes / 60.0 + seconds / 3600.0;
    match reference.to_ascii_uppercase() {
        r if r == positive => Ok(magnitude),
        r if r == negative => Ok(-magnitude),
        other => Err(InspectionError::invalid_parameter("gps.ref", other)),
    }
}
