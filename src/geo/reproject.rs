//! Source-CRS to WGS84 reprojection backed by `proj4rs` (pure Rust)

use std::fmt;

use proj4rs::proj::Proj;
use proj4rs::transform::transform;

use super::crs::Crs;
use crate::error::{InspectionError, Result};

/// Reusable transformer between two coordinate reference systems
///
/// Both projections are instantiated once; [`Reprojector::transform`] only
/// does the per-point math. Input and output are in the natural units of each
/// CRS (degrees for geographic systems, metres for projected ones).
pub struct Reprojector {
    source_proj: Proj,
    target_proj: Proj,
    source: Crs,
    target: Crs,
}

impl fmt::Debug for Reprojector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reprojector")
            .field("source", &self.source)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl Reprojector {
    /// Build a transformer from `source` to `target`
    ///
    /// # Errors
    ///
    /// Returns `ProjectionError` if either definition is rejected by `proj4rs`.
    pub fn new(source: Crs, target: Crs) -> Result<Self> {
        let source_proj = Proj::from_proj_string(source.proj_string()).map_err(|e| {
            InspectionError::projection(format!("invalid source projection {source}: {e:?}"))
        })?;
        let target_proj = Proj::from_proj_string(target.proj_string()).map_err(|e| {
            InspectionError::projection(format!("invalid target projection {target}: {e:?}"))
        })?;

        Ok(Self {
            source_proj,
            target_proj,
            source,
            target,
        })
    }

    /// Build a transformer from `source` to WGS84 longitude/latitude
    pub fn to_wgs84(source: Crs) -> Result<Self> {
        Self::new(source, Crs::wgs84())
    }

    /// CRS of the input coordinates
    pub fn source(&self) -> &Crs {
        &self.source
    }

    /// CRS of the output coordinates
    pub fn target(&self) -> &Crs {
        &self.target
    }

    /// Transform a single `(x, y)` pair
    ///
    /// # Errors
    ///
    /// Returns `ProjectionError` if the point is outside the projection domain.
    #[inline]
    pub fn transform(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        // proj4rs works in radians for geographic systems
        let (in_x, in_y) = if self.source.is_geographic() {
            (x.to_radians(), y.to_radians())
        } else {
            (x, y)
        };

        let mut point = (in_x, in_y, 0.0);
        transform(&self.source_proj, &self.target_proj, &mut point).map_err(|e| {
            InspectionError::projection(format!(
                "transform of ({x}, {y}) from {} to {} failed: {e:?}",
                self.source, self.target
            ))
        })?;

        let (out_x, out_y) = if self.target.is_geographic() {
            (point.0.to_degrees(), point.1.to_degrees())
        } else {
            (point.0, point.1)
        };

        if !out_x.is_finite() || !out_y.is_finite() {
            return Err(InspectionError::projection(format!(
                "transform of ({x}, {y}) produced a non-finite result"
            )));
        }

        Ok((out_x, out_y))
    }
}
