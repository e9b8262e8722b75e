//! Orthophoto pixel to WGS84 longitude/latitude conversion
//!
//! The converter applies the raster's affine transform (pixel to source CRS)
//! and, when the source CRS is not WGS84, a reprojection built once at
//! construction. After construction it holds only read-only state.

use log::{debug, info, warn};

use super::crs::Crs;
use super::reproject::Reprojector;
use crate::error::Result;
use crate::geometry::{AffineTransform, GeospatialCoordinate};

/// Converts orthophoto pixel coordinates to WGS84
#[derive(Debug)]
pub struct PixelToLatLonConverter {
    affine: AffineTransform,
    source_crs: Crs,
    reprojector: Option<Reprojector>,
}

impl PixelToLatLonConverter {
    /// Build a converter from a raw CRS descriptor, degrading to WGS84
    ///
    /// An absent descriptor means the raster is already WGS84. A descriptor
    /// that cannot be parsed, or whose projection cannot be instantiated, is
    /// logged and treated as WGS84 as well.
    pub fn new(affine: AffineTransform, source_crs: Option<&str>) -> Self {
        let Some(descriptor) = source_crs else {
            info!("No orthophoto CRS supplied, assuming EPSG:4326");
            return Self::wgs84(affine);
        };

        match Crs::parse(descriptor).and_then(|crs| Self::with_crs(affine, crs)) {
            Ok(converter) => converter,
            Err(e) => {
                warn!("Could not use orthophoto CRS '{descriptor}', defaulting to EPSG:4326: {e}");
                Self::wgs84(affine)
            }
        }
    }

    /// Build a converter for a parsed CRS
    ///
    /// # Errors
    ///
    /// Returns `ProjectionError` if the reprojection to WGS84 cannot be built.
    pub fn with_crs(affine: AffineTransform, source_crs: Crs) -> Result<Self> {
        if source_crs.is_wgs84() {
            debug!("Orthophoto CRS {source_crs} is WGS84, no reprojection");
            return Ok(Self {
                affine,
                source_crs,
                reprojector: None,
            });
        }

        let reprojector = Reprojector::to_wgs84(source_crs.clone())?;
        debug!("Reprojecting orthophoto coordinates from {source_crs} to EPSG:4326");
        Ok(Self {
            affine,
            source_crs,
            reprojector: Some(reprojector),
        })
    }

    /// Converter for a raster already in WGS84
    pub fn wgs84(affine: AffineTransform) -> Self {
        Self {
            affine,
            source_crs: Crs::wgs84(),
            reprojector: None,
        }
    }

    /// Pixel to source-CRS transform
    pub fn affine(&self) -> &AffineTransform {
        &self.affine
    }

    /// CRS actually in use, WGS84 after a fallback
    pub fn source_crs(&self) -> &Crs {
        &self.source_crs
    }

    /// Whether conversions go through a reprojection step
    pub fn reprojects(&self) -> bool {
        self.reprojector.is_some()
    }

    /// Convert a pixel `(column, row)` to WGS84 longitude/latitude
    ///
    /// # Errors
    ///
    /// Returns `ProjectionError` if reprojection of this point fails.
    pub fn pixel_to_lonlat(&self, pixel: (f64, f64)) -> Result<GeospatialCoordinate> {
        let (x, y) = self.affine.apply(pixel);
        let (lon, lat) = match &self.reprojector {
            Some(reprojector) => reprojector.transform(x, y)?,
            None => (x, y),
        };
        Ok(GeospatialCoordinate::new(lon, lat))
    }
}
