//! Defect labels produced by the detection stage
//!
//! The labels file wraps a flat list of boxes in the masking stage's
//! envelope:
//!
//! ```json
//! [
//!   {
//!     "boundingBox": {
//!       "boundingBoxes": [
//!         {"label": "hotspots", "left": 498, "top": 10641, "width": 7, "height": 19}
//!       ]
//!     }
//!   }
//! ]
//! ```
//!
//! Only the first envelope is read. Box geometry is validated while parsing.

use std::path::Path;

use log::info;
use serde::Deserialize;

use crate::constants::labels;
use crate::error::{InspectionError, Result};
use crate::geometry::BoundingBox;
use crate::model::DefectType;

#[derive(Deserialize)]
struct LabelsEnvelope {
    #[serde(rename = "boundingBox", default)]
    bounding_box: Option<BoxList>,
}

#[derive(Deserialize)]
struct BoxList {
    #[serde(rename = "boundingBoxes", default)]
    bounding_boxes: Vec<BoundingBox>,
}

/// All boxes from a labels file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefectLabels {
    bounding_boxes: Vec<BoundingBox>,
}

impl DefectLabels {
    /// Wrap already-validated boxes
    pub fn new(bounding_boxes: Vec<BoundingBox>) -> Self {
        Self { bounding_boxes }
    }

    /// Parse labels from a JSON string
    ///
    /// # Errors
    ///
    /// Returns `LabelsError` for malformed JSON or invalid box geometry.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let envelopes: Vec<LabelsEnvelope> = serde_json::from_str(json)
            .map_err(|e| InspectionError::labels("invalid defect labels JSON", e))?;

        let bounding_boxes = envelopes
            .into_iter()
            .next()
            .and_then(|envelope| envelope.bounding_box)
            .map(|list| list.bounding_boxes)
            .unwrap_or_default();

        Ok(Self { bounding_boxes })
    }

    /// Load labels from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `LabelsError` if the file cannot be read or parsed.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        info!("Loading defect labels from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| {
            InspectionError::labels(format!("cannot read {}", path.display()), e)
        })?;
        let labels = Self::from_json_str(&content)?;
        info!(
            "Loaded {} bounding boxes ({} defects, {} panels)",
            labels.bounding_boxes.len(),
            labels.defects().len(),
            labels.panels().len()
        );
        Ok(labels)
    }

    /// Every box in file order
    pub fn bounding_boxes(&self) -> &[BoundingBox] {
        &self.bounding_boxes
    }

    /// Solar panel boxes
    pub fn panels(&self) -> Vec<BoundingBox> {
        self.filter(|b| b.label() == labels::SOLAR_PANELS)
    }

    /// Every box that is not a solar panel
    pub fn defects(&self) -> Vec<BoundingBox> {
        self.filter(|b| b.label() != labels::SOLAR_PANELS)
    }

    /// Boxes of one defect type
    pub fn by_type(&self, defect_type: DefectType) -> Vec<BoundingBox> {
        self.filter(|b| b.label() == defect_type.label())
    }

    fn filter(&self, predicate: impl Fn(&BoundingBox) -> bool) -> Vec<BoundingBox> {
        self.bounding_boxes
            .iter()
            .filter(|&b| predicate(b))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {
            "boundingBox": {
                "boundingBoxes": [
                    {"label": "solarpanels", "left": 0, "top": 0, "width": 100, "height": 100},
                    {"label": "solarpanels", "left": 150, "top": 0, "width": 100, "height": 100},
                    {"label": "hotspots", "left": 10, "top": 10, "width": 5, "height": 5},
                    {"label": "faultydiodes", "left": 160, "top": 20, "width": 7, "height": 19},
                    {"label": "hotspots", "left": 200, "top": 40, "width": 3, "height": 3}
                ]
            }
        }
    ]"#;

    #[test]
    fn test_split_panels_and_defects() {
        let labels = DefectLabels::from_json_str(SAMPLE).unwrap();
        assert_eq!(labels.bounding_boxes().len(), 5);
        assert_eq!(labels.panels().len(), 2);
        assert_eq!(labels.defects().len(), 3);
        assert_eq!(labels.by_type(DefectType::Hotspot).len(), 2);
        assert_eq!(labels.by_type(DefectType::OfflinePanel).len(), 0);
    }

    #[test]
    fn test_empty_envelopes() {
        assert!(DefectLabels::from_json_str("[]").unwrap().bounding_boxes().is_empty());
        assert!(DefectLabels::from_json_str("[{}]").unwrap().bounding_boxes().is_empty());
        assert!(DefectLabels::from_json_str(r#"[{"boundingBox": {}}]"#)
            .unwrap()
            .bounding_boxes()
            .is_empty());
    }

    #[test]
    fn test_invalid_geometry_is_rejected() {
        let json = r#"[{"boundingBox": {"boundingBoxes": [
            {"label": "hotspots", "left": -3, "top": 0, "width": 5, "height": 5}
        ]}}]"#;
        assert!(matches!(
            DefectLabels::from_json_str(json),
            Err(InspectionError::LabelsError { .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(DefectLabels::from_json_str("{not json").is_err());
        assert!(DefectLabels::from_json_str(r#"{"boundingBox": {}}"#).is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("defect_labels.json");
        std::fs::write(&path, SAMPLE).unwrap();
        let labels = DefectLabels::from_json_file(&path).unwrap();
        assert_eq!(labels.panels().len(), 2);

        assert!(DefectLabels::from_json_file(&dir.path().join("missing.json")).is_err());
    }
}
