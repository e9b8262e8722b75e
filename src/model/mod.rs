//! Panel and defect aggregate model
//!
//! Panels own their assigned defects; the grid owns the panels. Defect lists
//! are appended to only while the mapper builds the grid.

pub mod defect;
pub mod grid;
pub mod panel;

pub use defect::{Defect, DefectType};
pub use grid::PanelGrid;
pub use panel::{GridPosition, Panel};
