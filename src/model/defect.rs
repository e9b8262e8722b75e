//! Defect types and assigned defect records

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::labels;
use crate::geometry::{BoundingBox, GeospatialCoordinate};

/// Kind of thermal anomaly reported by the detection stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DefectType {
    /// Localized high-temperature region
    #[serde(rename = "hotspots")]
    Hotspot,
    /// Burnt bypass diode
    #[serde(rename = "faultydiodes")]
    FaultyDiode,
    /// Panel or string colder than expected
    #[serde(rename = "offlinepanels")]
    OfflinePanel,
}

impl DefectType {
    /// All defect types in report order
    pub const ALL: [DefectType; 3] = [
        DefectType::Hotspot,
        DefectType::FaultyDiode,
        DefectType::OfflinePanel,
    ];

    /// Map a detection label to a defect type
    ///
    /// Returns `None` for panel labels and anything unrecognized.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            labels::HOTSPOTS => Some(DefectType::Hotspot),
            labels::FAULTY_DIODES => Some(DefectType::FaultyDiode),
            labels::OFFLINE_PANELS => Some(DefectType::OfflinePanel),
            _ => None,
        }
    }

    /// Detection label for this type
    pub fn label(self) -> &'static str {
        match self {
            DefectType::Hotspot => labels::HOTSPOTS,
            DefectType::FaultyDiode => labels::FAULTY_DIODES,
            DefectType::OfflinePanel => labels::OFFLINE_PANELS,
        }
    }

    /// Human-readable name for reports
    pub fn display_name(self) -> &'static str {
        match self {
            DefectType::Hotspot => "Hotspot",
            DefectType::FaultyDiode => "Faulty bypass diode",
            DefectType::OfflinePanel => "Offline panel",
        }
    }
}

impl fmt::Display for DefectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A defect assigned to a panel
///
/// `panel_centroid_geospatial` is the geocoded center of the owning panel at
/// assignment time, not the defect's own location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Defect {
    /// Defect box in orthophoto pixels
    bbox: BoundingBox,
    /// Center of `bbox`
    defect_center_px: (f64, f64),
    /// Geocoded center of the owning panel
    panel_centroid_geospatial: GeospatialCoordinate,
    /// Kind of anomaly
    defect_type: DefectType,
}

impl Defect {
    pub(crate) fn new(
        bbox: BoundingBox,
        defect_type: DefectType,
        panel_centroid_geospatial: GeospatialCoordinate,
    ) -> Self {
        Self {
            defect_center_px: bbox.center(),
            bbox,
            panel_centroid_geospatial,
            defect_type,
        }
    }

    /// Defect box in orthophoto pixels
    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    /// Pixel center of the defect box
    pub fn defect_center_px(&self) -> (f64, f64) {
        self.defect_center_px
    }

    /// WGS84 center of the panel this defect was assigned to
    pub fn panel_centroid_geospatial(&self) -> GeospatialCoordinate {
        self.panel_centroid_geospatial
    }

    /// Kind of anomaly
    pub fn defect_type(&self) -> DefectType {
        self.defect_type
    }
}
