//! Pixel-space bounding boxes
//!
//! A `BoundingBox` is an axis-aligned rectangle in orthophoto pixel
//! coordinates carrying the label assigned by the detection stage.
//! Geometry is validated once at construction and is immutable afterwards.

use serde::{Deserialize, Serialize};

use crate::error::{InspectionError, Result};

/// Axis-aligned integer rectangle in orthophoto pixel coordinates
///
/// Invariants: `left >= 0`, `top >= 0`, `width > 0`, `height > 0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBoundingBox")]
pub struct BoundingBox {
    label: String,
    left: u32,
    top: u32,
    width: u32,
    height: u32,
}

/// Unvalidated wire representation
#[derive(Deserialize)]
struct RawBoundingBox {
    label: String,
    left: i64,
    top: i64,
    width: i64,
    height: i64,
}

impl TryFrom<RawBoundingBox> for BoundingBox {
    type Error = InspectionError;

    fn try_from(raw: RawBoundingBox) -> Result<Self> {
        BoundingBox::new(raw.left, raw.top, raw.width, raw.height, raw.label)
    }
}

impl BoundingBox {
    /// Create a validated bounding box
    ///
    /// # Errors
    ///
    /// Returns `InvalidBoundingBox` if `left` or `top` is negative, if `width`
    /// or `height` is not positive, or if a value does not fit in `u32`.
    pub fn new(
        left: i64,
        top: i64,
        width: i64,
        height: i64,
        label: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            left: checked_dimension("left", left, 0)?,
            top: checked_dimension("top", top, 0)?,
            width: checked_dimension("width", width, 1)?,
            height: checked_dimension("height", height, 1)?,
            label: label.into(),
        })
    }

    /// Detection label (`solarpanels`, `hotspots`, ...)
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Left edge in pixels
    pub fn left(&self) -> u32 {
        self.left
    }

    /// Top edge in pixels
    pub fn top(&self) -> u32 {
        self.top
    }

    /// Width in pixels, always positive
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels, always positive
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Right edge (`left + width`)
    pub fn right(&self) -> u64 {
        u64::from(self.left) + u64::from(self.width)
    }

    /// Bottom edge (`top + height`)
    pub fn bottom(&self) -> u64 {
        u64::from(self.top) + u64::from(self.height)
    }

    /// Area in square pixels
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Center point `(x, y)`; may fall on a half pixel
    pub fn center(&self) -> (f64, f64) {
        (
            f64::from(self.left) + f64::from(self.width) / 2.0,
            f64::from(self.top) + f64::from(self.height) / 2.0,
        )
    }

    /// Whether a pixel-space point lies inside the box (edges inclusive)
    pub fn contains_point(&self, (x, y): (f64, f64)) -> bool {
        x >= f64::from(self.left)
            && x <= self.right() as f64
            && y >= f64::from(self.top)
            && y <= self.bottom() as f64
    }

    /// Whether the box lies entirely inside an image of the given size
    pub fn is_within(&self, image_width: u32, image_height: u32) -> bool {
        self.right() <= u64::from(image_width) && self.bottom() <= u64::from(image_height)
    }

    /// Euclidean distance between the centers of two boxes
    pub fn center_distance(&self, other: &BoundingBox) -> f64 {
        let (ax, ay) = self.center();
        let (bx, by) = other.center();
        (ax - bx).hypot(ay - by)
    }
}

fn checked_dimension(field: &str, value: i64, minimum: i64) -> Result<u32> {
    if value < minimum {
        return Err(InspectionError::invalid_bbox(field, value));
    }
    u32::try_from(value).map_err(|_| InspectionError::invalid_bbox(field, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_properties() {
        let bbox = BoundingBox::new(10, 20, 30, 40, "hotspots").unwrap();
        assert_eq!(bbox.right(), 40);
        assert_eq!(bbox.bottom(), 60);
        assert_eq!(bbox.area(), 1200);
        assert_eq!(bbox.center(), (25.0, 40.0));
        assert_eq!(bbox.label(), "hotspots");
    }

    #[test]
    fn test_half_pixel_center() {
        let bbox = BoundingBox::new(0, 0, 5, 7, "hotspots").unwrap();
        assert_eq!(bbox.center(), (2.5, 3.5));
    }

    #[test]
    fn test_rejects_malformed_geometry() {
        assert!(matches!(
            BoundingBox::new(-1, 0, 10, 10, "solarpanels"),
            Err(InspectionError::InvalidBoundingBox { ref field, value: -1 }) if field == "left"
        ));
        assert!(BoundingBox::new(0, -5, 10, 10, "solarpanels").is_err());
        assert!(BoundingBox::new(0, 0, 0, 10, "solarpanels").is_err());
        assert!(BoundingBox::new(0, 0, 10, -2, "solarpanels").is_err());
        assert!(BoundingBox::new(0, 0, i64::from(u32::MAX) + 1, 10, "solarpanels").is_err());
    }

    #[test]
    fn test_zero_origin_is_valid() {
        assert!(BoundingBox::new(0, 0, 1, 1, "solarpanels").is_ok());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: BoundingBox = serde_json::from_str(
            r#"{"label": "hotspots", "left": 498, "top": 10641, "width": 7, "height": 19}"#,
        )
        .unwrap();
        assert_eq!(ok.top(), 10641);

        let bad = serde_json::from_str::<BoundingBox>(
            r#"{"label": "hotspots", "left": 1, "top": 1, "width": 0, "height": 19}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_contains_and_within() {
        let bbox = BoundingBox::new(10, 10, 10, 10, "solarpanels").unwrap();
        assert!(bbox.contains_point((15.0, 15.0)));
        assert!(bbox.contains_point((20.0, 20.0)));
        assert!(!bbox.contains_point((21.0, 15.0)));
        assert!(bbox.is_within(20, 20));
        assert!(!bbox.is_within(19, 20));
    }

    #[test]
    fn test_center_distance() {
        let a = BoundingBox::new(0, 0, 10, 10, "solarpanels").unwrap();
        let b = BoundingBox::new(30, 40, 10, 10, "solarpanels").unwrap();
        assert_eq!(a.center_distance(&b), 50.0);
    }
}
