//! Configuration structures for an inspection mapping run.
//!
//! This module defines all tunable parameters, organized into groups for
//! the orthophoto georeference, grid reconstruction, crops and export.
//!
//! # Configuration Loading
//!
//! Configuration can be loaded from JSON files or constructed programmatically:
//!
//! ```no_run
//! use solar_defect_mapper::InspectionConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = InspectionConfig::from_json_file(Path::new("inspection.json"))?;
//!
//! // Or use defaults
//! let config = InspectionConfig::default();
//! # Ok::<(), solar_defect_mapper::InspectionError>(())
//! ```
//!
//! # Configuration Sections
//!
//! - [`OrthophotoConfig`]: raster size, affine transform and CRS
//! - [`MappingConfig`]: row grouping tolerance
//! - [`CropConfig`]: detail crop window sizing
//! - [`ExportConfig`]: metrics export options

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{crop, mapping};
use crate::error::{InspectionError, Result};
use crate::geometry::AffineTransform;

/// Complete configuration for a mapping run.
///
/// Can be serialized to/from JSON for reproducible runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionConfig {
    /// Defect labels JSON produced by the detection stage
    pub labels_path: PathBuf,

    /// Output directory for exported artifacts
    pub output_path: PathBuf,

    /// Orthophoto georeference
    pub orthophoto: OrthophotoConfig,

    /// Grid reconstruction parameters
    #[serde(default)]
    pub mapping: MappingConfig,

    /// Detail crop parameters
    #[serde(default)]
    pub crop: CropConfig,

    /// Metrics export parameters
    #[serde(default)]
    pub export: ExportConfig,
}

/// Orthophoto raster metadata.
///
/// `transform` is `[a, b, c, d, e, f]` with `x = a*col + b*row + c` and
/// `y = d*col + e*row + f`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrthophotoConfig {
    /// Raster width in pixels
    pub width: u32,

    /// Raster height in pixels
    pub height: u32,

    /// Pixel to source-CRS affine coefficients
    pub transform: [f64; 6],

    /// Source CRS identifier (`EPSG:32722`, PROJ string, ...); absent means WGS84
    #[serde(default)]
    pub crs: Option<String>,
}

/// Grid reconstruction parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingConfig {
    /// Row tolerance as a fraction of the row's first panel height
    pub row_tolerance_factor: f64,
}

/// Detail crop parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropConfig {
    /// Average panel width in pixels
    pub default_panel_width_px: u32,

    /// Crop side length in panel widths
    pub crop_panel_size: u32,

    /// Downscale applied to each crop (0.0-1.0]
    pub scale_factor: f64,
}

/// Metrics export parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Include the per-panel breakdown in metrics JSON
    pub include_details: bool,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            row_tolerance_factor: mapping::ROW_TOLERANCE_FACTOR,
        }
    }
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            default_panel_width_px: crop::DEFAULT_PANEL_WIDTH_PX,
            crop_panel_size: crop::CROP_PANEL_SIZE,
            scale_factor: crop::CROP_DOWNSCALE_FACTOR,
        }
    }
}

impl CropConfig {
    /// Crop side length in pixels
    pub fn crop_size_px(&self) -> u32 {
        self.default_panel_width_px.saturating_mul(self.crop_panel_size)
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            include_details: true,
        }
    }
}

impl Default for OrthophotoConfig {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            transform: AffineTransform::identity().to_array(),
            crs: None,
        }
    }
}

impl OrthophotoConfig {
    pub fn affine(&self) -> AffineTransform {
        AffineTransform::from_array(self.transform)
    }
}

impl Default for InspectionConfig {
    fn default() -> Self {
        Self {
            labels_path: PathBuf::from("defect_labels.json"),
            output_path: PathBuf::from("output"),
            orthophoto: OrthophotoConfig::default(),
            mapping: MappingConfig::default(),
            crop: CropConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl InspectionConfig {
    /// Check parameter ranges
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.orthophoto.width == 0 {
            return Err(InspectionError::invalid_parameter("orthophoto.width", 0));
        }
        if self.orthophoto.height == 0 {
            return Err(InspectionError::invalid_parameter("orthophoto.height", 0));
        }
        if self.orthophoto.transform.iter().any(|v| !v.is_finite()) {
            return Err(InspectionError::invalid_parameter(
                "orthophoto.transform",
                format!("{:?}", self.orthophoto.transform),
            ));
        }
        let factor = self.mapping.row_tolerance_factor;
        if !(factor.is_finite() && factor > 0.0) {
            return Err(InspectionError::invalid_parameter(
                "mapping.row_tolerance_factor",
                factor,
            ));
        }
        if self.crop.crop_size_px() == 0 {
            return Err(InspectionError::invalid_parameter(
                "crop.crop_size_px",
                self.crop.crop_size_px(),
            ));
        }
        let scale = self.crop.scale_factor;
        if !(scale > 0.0 && scale <= 1.0) {
            return Err(InspectionError::invalid_parameter("crop.scale_factor", scale));
        }
        Ok(())
    }

    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            InspectionError::config(format!("cannot read {}", path.display()), e)
        })?;
        serde_json::from_str(&content).map_err(|e| {
            InspectionError::config(format!("cannot parse {}", path.display()), e)
        })
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| InspectionError::config("cannot serialize configuration", e))?;
        std::fs::write(path, json).map_err(|e| {
            InspectionError::config(format!("cannot write {}", path.display()), e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = InspectionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.mapping.row_tolerance_factor, 0.5);
        assert_eq!(config.crop.crop_size_px(), 635);
        assert!(config.export.include_details);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = InspectionConfig::default();
        config.mapping.row_tolerance_factor = 0.0;
        assert!(matches!(
            config.validate(),
            Err(InspectionError::InvalidParameter { ref parameter, .. })
                if parameter == "mapping.row_tolerance_factor"
        ));

        let mut config = InspectionConfig::default();
        config.orthophoto.width = 0;
        assert!(config.validate().is_err());

        let mut config = InspectionConfig::default();
        config.crop.scale_factor = 1.5;
        assert!(config.validate().is_err());

        let mut config = InspectionConfig::default();
        config.orthophoto.transform[2] = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_optional_sections_default() {
        let json = r#"{
            "labels_path": "labels.json",
            "output_path": "out",
            "orthophoto": {
                "width": 4000,
                "height": 3000,
                "transform": [0.1, 0.0, 500000.0, 0.0, -0.1, 7200000.0],
                "crs": "EPSG:32722"
            }
        }"#;
        let config: InspectionConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.mapping, MappingConfig::default());
        assert_eq!(config.crop, CropConfig::default());
        assert_eq!(config.orthophoto.crs.as_deref(), Some("EPSG:32722"));
        assert_eq!(config.orthophoto.affine().c, 500000.0);
    }

    #[test]
    fn test_json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inspection.json");

        let mut config = InspectionConfig::default();
        config.orthophoto.crs = Some("EPSG:31982".to_string());
        config.export.include_details = false;
        config.to_json_file(&path).unwrap();

        let loaded = InspectionConfig::from_json_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = InspectionConfig::from_json_file(Path::new("/nonexistent/inspection.json"));
        assert!(matches!(result, Err(InspectionError::ConfigError { .. })));
    }
}
