//! Report-side outputs derived from the panel grid
//!
//! This module computes defect metrics, exports them as JSON and CSV, and
//! plans the detail crops the rendering layer produces.

pub mod crop;
pub mod metrics;

pub use crop::{artifact_file_name, crop_requests, CropRequest, CropWindow};
pub use metrics::{
    export_metrics_csv, export_metrics_json, export_timestamp, metrics_document, DefectMetrics,
};
