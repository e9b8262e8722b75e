//! # Solar Defect Mapper
//!
//! A Rust crate for turning thermographic defect detections on a solar-farm
//! orthophoto into a geocoded, per-panel defect inventory.
//!
//! This library provides:
//! - Reconstruction of the panel grid (rows top to bottom, columns west to east)
//! - Assignment of hotspots, faulty diodes and offline panels to their nearest panel
//! - Conversion of orthophoto pixels to WGS84 through the raster's affine transform and CRS
//! - Metrics export, crop planning and GPS matching of raw thermal images
//!
//! ## Example
//!
//! ```rust,no_run
//! use solar_defect_mapper::{map_inspection, InspectionConfig};
//! use std::path::Path;
//!
//! let config = InspectionConfig::from_json_file(Path::new("inspection.json"))?;
//! let outcome = map_inspection(&config)?;
//! println!(
//!     "{} panels, {} with defects",
//!     outcome.metrics.total_panels, outcome.metrics.panels_with_defects
//! );
//! # Ok::<(), solar_defect_mapper::InspectionError>(())
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod geo;
pub mod geometry;
pub mod gps;
pub mod labels;
pub mod mapping;
pub mod model;
pub mod report;

use log::info;

pub use config::InspectionConfig;
pub use error::{InspectionError, Result};
pub use geo::{Crs, PixelToLatLonConverter};
pub use geometry::{AffineTransform, BoundingBox, GeospatialCoordinate};
pub use labels::DefectLabels;
pub use mapping::DefectMapper;
pub use model::{Defect, DefectType, GridPosition, Panel, PanelGrid};
pub use report::DefectMetrics;

/// Result of a mapping run
#[derive(Debug, Clone)]
pub struct InspectionOutcome {
    /// Panels with their assigned defects
    pub grid: PanelGrid,
    /// Summary counts over `grid`
    pub metrics: DefectMetrics,
}

/// Map the defects of one inspection onto its panel grid
///
/// Loads the labels file named by `config`, builds the geocoder for the
/// orthophoto and runs the mapper.
///
/// # Errors
///
/// Returns `InspectionError` if:
/// - The configuration has out-of-range parameters
/// - The labels file cannot be read or contains invalid boxes
///
/// An unsupported orthophoto CRS is not an error; coordinates fall back to
/// WGS84 and a warning is logged.
pub fn map_inspection(config: &InspectionConfig) -> Result<InspectionOutcome> {
    config.validate()?;

    let labels = DefectLabels::from_json_file(&config.labels_path)?;
    let outcome = map_labels(config, &labels);

    info!(
        "Inspection mapped: {} panels, {} with defects, {} defects",
        outcome.metrics.total_panels,
        outcome.metrics.panels_with_defects,
        outcome.metrics.total_defects
    );
    Ok(outcome)
}

/// Map already-loaded labels using the orthophoto and mapping sections of `config`
pub fn map_labels(config: &InspectionConfig, labels: &DefectLabels) -> InspectionOutcome {
    let converter = PixelToLatLonConverter::new(
        config.orthophoto.affine(),
        config.orthophoto.crs.as_deref(),
    );
    let mapper = DefectMapper::with_config(
        config.orthophoto.width,
        config.orthophoto.height,
        converter,
        config.mapping.clone(),
    );

    let grid = mapper.map_defects_to_panels(&labels.panels(), &labels.defects());
    let metrics = DefectMetrics::from_grid(&grid);
    InspectionOutcome { grid, metrics }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_labels_in_memory() {
        let labels = DefectLabels::new(vec![
            BoundingBox::new(0, 0, 100, 100, constants::labels::SOLAR_PANELS).unwrap(),
            BoundingBox::new(10, 10, 5, 5, constants::labels::HOTSPOTS).unwrap(),
        ]);
        let outcome = map_labels(&InspectionConfig::default(), &labels);
        assert_eq!(outcome.metrics.total_panels, 1);
        assert_eq!(outcome.metrics.hotspots_count, 1);
        assert_eq!(outcome.grid.get(1, 1).unwrap().hotspots().len(), 1);
    }

    #[test]
    fn test_map_inspection_rejects_invalid_config() {
        let mut config = InspectionConfig::default();
        config.mapping.row_tolerance_factor = -1.0;
        assert!(matches!(
            map_inspection(&config),
            Err(InspectionError::InvalidParameter { .. })
        ));
    }
}
