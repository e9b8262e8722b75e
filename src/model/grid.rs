//! Reconstructed panel grid

use std::collections::btree_map::{self, BTreeMap};

use serde::{Serialize, Serializer};

use super::panel::{GridPosition, Panel};

/// Panels keyed by grid position, iterated row-major
///
/// Serializes as a row-major sequence of panels; each panel carries its own
/// `position`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelGrid {
    panels: BTreeMap<GridPosition, Panel>,
}

impl PanelGrid {
    /// Create an empty grid
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a panel at its own position, returning any panel it replaced
    pub(crate) fn insert(&mut self, panel: Panel) -> Option<Panel> {
        self.panels.insert(panel.position(), panel)
    }

    pub(crate) fn get_mut(&mut self, position: GridPosition) -> Option<&mut Panel> {
        self.panels.get_mut(&position)
    }

    /// Panel at `(column, row)`, both 1-indexed
    pub fn get(&self, column: u32, row: u32) -> Option<&Panel> {
        self.panels.get(&GridPosition::new(column, row))
    }

    /// Panel at `position`
    pub fn get_position(&self, position: GridPosition) -> Option<&Panel> {
        self.panels.get(&position)
    }

    /// `(position, panel)` pairs, row by row, west to east
    pub fn iter(&self) -> btree_map::Iter<'_, GridPosition, Panel> {
        self.panels.iter()
    }

    /// Panels in row-major order
    pub fn panels(&self) -> impl Iterator<Item = &Panel> {
        self.panels.values()
    }

    /// Occupied positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = GridPosition> + '_ {
        self.panels.keys().copied()
    }

    /// Number of panels
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Number of reconstructed rows (0 for an empty grid)
    pub fn row_count(&self) -> u32 {
        self.panels.keys().map(|p| p.row).max().unwrap_or(0)
    }

    /// Column count of the widest row
    pub fn max_columns(&self) -> u32 {
        self.panels.keys().map(|p| p.column).max().unwrap_or(0)
    }

    /// Panels with at least one defect, row-major
    pub fn panels_with_defects(&self) -> impl Iterator<Item = &Panel> {
        self.panels().filter(|p| p.has_defects())
    }

    /// Total defects across all panels
    pub fn defect_count(&self) -> usize {
        self.panels().map(Panel::defect_count).sum()
    }
}

impl Serialize for PanelGrid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.panels.values())
    }
}

impl<'a> IntoIterator for &'a PanelGrid {
    type Item = (&'a GridPosition, &'a Panel);
    type IntoIter = btree_map::Iter<'a, GridPosition, Panel>;

    fn into_iter(self) -> Self::IntoIter {
        self.panels.iter()
    }
}
