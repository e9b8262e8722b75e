//! Six-coefficient affine transform from pixel to projected coordinates
//!
//! Coefficient naming follows the rasterio `Affine` convention:
//!
//! ```text
//! x' = a * col + b * row + c
//! y' = d * col + e * row + f
//! ```
//!
//! GDAL geotransforms store the same values in a different order
//! (`[c, a, b, f, d, e]`); use [`AffineTransform::from_gdal`] for those.

use serde::{Deserialize, Serialize};

/// Pixel (column, row) to source-CRS (x, y) mapping
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    /// x scale (pixel width)
    pub a: f64,
    /// x shear (row term)
    pub b: f64,
    /// x of the upper-left corner
    pub c: f64,
    /// y shear (column term)
    pub d: f64,
    /// y scale (pixel height, negative for north-up rasters)
    pub e: f64,
    /// y of the upper-left corner
    pub f: f64,
}

impl AffineTransform {
    /// Create from the six coefficients in `x' = a*col + b*row + c`, `y' = d*col + e*row + f` order
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Build from `[a, b, c, d, e, f]`
    pub fn from_array(coefficients: [f64; 6]) -> Self {
        let [a, b, c, d, e, f] = coefficients;
        Self::new(a, b, c, d, e, f)
    }

    /// Build from a GDAL geotransform `[c, a, b, f, d, e]`
    pub fn from_gdal(geotransform: [f64; 6]) -> Self {
        let [c, a, b, f, d, e] = geotransform;
        Self::new(a, b, c, d, e, f)
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0)
    }

    /// Coefficients as `[a, b, c, d, e, f]`
    pub fn to_array(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    /// Apply the transform to a pixel `(x, y)`
    #[inline]
    pub fn apply(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (
            self.a * x + self.b * y + self.c,
            self.d * x + self.e * y + self.f,
        )
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.e - self.b * self.d
    }

    /// Whether the linear part is non-degenerate
    pub fn is_invertible(&self) -> bool {
        let det = self.determinant();
        det.is_finite() && det.abs() > f64::EPSILON
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}
