//! Solar panels and their grid positions

use std::fmt;

use serde::{Deserialize, Serialize};

use super::defect::{Defect, DefectType};
use crate::geometry::{BoundingBox, GeospatialCoordinate};

/// 1-indexed `(column, row)` position in the reconstructed panel grid
///
/// Ordering is row-major: by `row`, then by `column`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPosition {
    // field order drives the derived row-major ordering
    /// Row index, 1 = topmost row
    pub row: u32,
    /// Column index, 1 = westmost panel of the row
    pub column: u32,
}

impl GridPosition {
    /// Create from `(column, row)`, the order used in panel ids
    pub fn new(column: u32, row: u32) -> Self {
        Self { row, column }
    }

    /// As a `(column, row)` tuple
    pub fn to_tuple(self) -> (u32, u32) {
        (self.column, self.row)
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.column, self.row)
    }
}

/// A detected solar panel with the defects assigned to it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    /// Grid key of this panel
    position: GridPosition,
    /// Panel box in orthophoto pixels
    bbox: BoundingBox,
    /// Hotspots, in assignment order
    hotspots: Vec<Defect>,
    /// Faulty bypass diodes, in assignment order
    faulty_diodes: Vec<Defect>,
    /// Offline panel detections, in assignment order
    offline_panels: Vec<Defect>,
}

impl Panel {
    pub(crate) fn new(position: GridPosition, bbox: BoundingBox) -> Self {
        debug_assert!(position.column >= 1 && position.row >= 1);
        Self {
            position,
            bbox,
            hotspots: Vec::new(),
            faulty_diodes: Vec::new(),
            offline_panels: Vec::new(),
        }
    }

    /// Grid key of this panel
    pub fn position(&self) -> GridPosition {
        self.position
    }

    /// 1-indexed column
    pub fn column(&self) -> u32 {
        self.position.column
    }

    /// 1-indexed row
    pub fn row(&self) -> u32 {
        self.position.row
    }

    /// Identifier used in reports and artifact names, `"{column}-{row}"`
    pub fn panel_id(&self) -> String {
        self.position.to_string()
    }

    /// Panel box in orthophoto pixels
    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    /// Hotspots assigned to this panel
    pub fn hotspots(&self) -> &[Defect] {
        &self.hotspots
    }

    /// Faulty diodes assigned to this panel
    pub fn faulty_diodes(&self) -> &[Defect] {
        &self.faulty_diodes
    }

    /// Offline panel detections assigned to this panel
    pub fn offline_panels(&self) -> &[Defect] {
        &self.offline_panels
    }

    /// Defects of one type
    pub fn defects_of(&self, defect_type: DefectType) -> &[Defect] {
        match defect_type {
            DefectType::Hotspot => &self.hotspots,
            DefectType::FaultyDiode => &self.faulty_diodes,
            DefectType::OfflinePanel => &self.offline_panels,
        }
    }

    /// Hotspots, then faulty diodes, then offline panels
    pub fn all_defects(&self) -> impl Iterator<Item = &Defect> {
        self.hotspots
            .iter()
            .chain(&self.faulty_diodes)
            .chain(&self.offline_panels)
    }

    /// Whether any defect was assigned
    pub fn has_defects(&self) -> bool {
        !(self.hotspots.is_empty() && self.faulty_diodes.is_empty() && self.offline_panels.is_empty())
    }

    /// Total defects across the three types
    pub fn defect_count(&self) -> usize {
        self.hotspots.len() + self.faulty_diodes.len() + self.offline_panels.len()
    }

    /// Geocoded panel center as recorded on its first defect
    pub fn geospatial_centroid(&self) -> Option<GeospatialCoordinate> {
        self.all_defects()
            .next()
            .map(Defect::panel_centroid_geospatial)
    }

    pub(crate) fn push_defect(&mut self, defect: Defect) {
        match defect.defect_type() {
            DefectType::Hotspot => self.hotspots.push(defect),
            DefectType::FaultyDiode => self.faulty_diodes.push(defect),
            DefectType::OfflinePanel => self.offline_panels.push(defect),
        }
    }
}
