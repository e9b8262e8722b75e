//! Panel grid reconstruction and defect assignment
//!
//! Phase A groups panel boxes into rows and numbers them into a grid;
//! phase B assigns each defect to the nearest panel and geocodes it.

pub mod mapper;
pub mod rows;

pub use mapper::{nearest_panel, DefectMapper};
pub use rows::group_into_rows;
