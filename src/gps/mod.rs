//! GPS handling for raw thermal images
//!
//! This module interprets EXIF GPS values and matches raw drone images to
//! defective panels by proximity.

pub mod exif;
pub mod matcher;

pub use exif::{rational_to_f64, GpsFix};
pub use matcher::{GeotaggedImage, GpsImageIndex, ImageMatch};
