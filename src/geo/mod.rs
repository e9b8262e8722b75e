//! Geocoding of orthophoto pixels
//!
//! This module parses the raster's coordinate reference system and converts
//! pixel positions into WGS84 longitude/latitude.

pub mod converter;
pub mod crs;
pub mod reproject;

pub use converter::PixelToLatLonConverter;
pub use crs::Crs;
pub use reproject::Reprojector;
