//! Matching raw thermal images to defective panels by GPS proximity
//!
//! Every panel with defects carries its geocoded center on its defects. The
//! raw image whose GPS fix is closest to that center is the best close-up of
//! the panel for the report.

use log::{debug, info, warn};

use super::exif::GpsFix;
use crate::geometry::GeospatialCoordinate;
use crate::model::{DefectType, GridPosition, PanelGrid};
use crate::report::artifact_file_name;

/// A raw image with a GPS fix
#[derive(Debug, Clone, PartialEq)]
pub struct GeotaggedImage {
    /// File name of the raw image
    pub name: String,
    /// Position recorded in its EXIF tags
    pub fix: GpsFix,
}

/// Raw image chosen for one defect type on one panel
#[derive(Debug, Clone, PartialEq)]
pub struct ImageMatch {
    /// Defective panel
    pub position: GridPosition,
    /// Defect type the image is filed under
    pub defect_type: DefectType,
    /// Source raw image file name
    pub image_name: String,
    /// Name for the copied image, `"{label}_({panel_id}).jpg"`
    pub output_name: String,
    /// Degree-space distance between panel center and image fix
    pub distance: f64,
}

/// In-memory index of geotagged raw images
#[derive(Debug, Clone, Default)]
pub struct GpsImageIndex {
    images: Vec<GeotaggedImage>,
}

impl GpsImageIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a raw image with its GPS fix
    pub fn insert(&mut self, name: impl Into<String>, fix: GpsFix) {
        let name = name.into();
        debug!(
            "Indexed {}: GPS ({}, {})",
            name, fix.latitude, fix.longitude
        );
        self.images.push(GeotaggedImage { name, fix });
    }

    /// Number of indexed images
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Indexed images in insertion order
    pub fn images(&self) -> &[GeotaggedImage] {
        &self.images
    }

    /// Image with the smallest degree-space distance to `target`
    ///
    /// The first inserted image wins ties.
    pub fn closest(&self, target: &GeospatialCoordinate) -> Option<(&GeotaggedImage, f64)> {
        let mut best: Option<(&GeotaggedImage, f64)> = None;
        for image in &self.images {
            let distance = image.fix.coordinate().planar_distance(target);
            if !distance.is_finite() {
                continue;
            }
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((image, distance));
            }
        }
        best
    }

    /// Pick a raw image for every (panel, defect type) with defects
    ///
    /// # Arguments
    ///
    /// * `grid` - Mapped panel grid; only panels with defects are matched
    ///
    /// # Returns
    ///
    /// One `ImageMatch` per defect type present on each panel, row-major.
    /// All types on a panel share the image closest to its geocoded center.
    pub fn match_panels(&self, grid: &PanelGrid) -> Vec<ImageMatch> {
        if self.images.is_empty() {
            warn!("No raw images with GPS data indexed, skipping image matching");
            return Vec::new();
        }

        let mut matches = Vec::new();
        for panel in grid.panels_with_defects() {
            let Some(centroid) = panel.geospatial_centroid() else {
                continue;
            };
            let Some((image, distance)) = self.closest(&centroid) else {
                continue;
            };

            for kind in DefectType::ALL {
                if panel.defects_of(kind).is_empty() {
                    continue;
                }
                matches.push(ImageMatch {
                    position: panel.position(),
                    defect_type: kind,
                    image_name: image.name.clone(),
                    output_name: artifact_file_name(kind, panel.position(), ""),
                    distance,
                });
            }
        }

        info!("Matched {} raw images to defects", matches.len());
        matches
    }
}
