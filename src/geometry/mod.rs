//! Geometric value types
//!
//! Pixel-space rectangles, WGS84 coordinates and the affine transform that
//! links orthophoto pixels to a projected coordinate system.

pub mod affine;
pub mod bbox;
pub mod coordinate;

pub use affine::AffineTransform;
pub use bbox::BoundingBox;
pub use coordinate::GeospatialCoordinate;
