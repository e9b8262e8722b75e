//! Defect metrics and their JSON/CSV export
//!
//! Summaries are computed from a finished [`PanelGrid`]. Per-panel output is
//! always row-major, matching the grid's iteration order.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::{DateTime, Timelike, Utc};
use log::info;
use serde::Serialize;
use serde_json::json;

use crate::error::{InspectionError, Result};
use crate::model::{DefectType, PanelGrid};

/// Aggregate counts for one inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DefectMetrics {
    /// Panels in the grid
    pub total_panels: usize,
    /// Panels with at least one defect
    pub panels_with_defects: usize,
    /// Sum of the three per-type counts
    pub total_defects: usize,
    /// Assigned hotspots
    pub hotspots_count: usize,
    /// Assigned faulty diodes
    pub faulty_diodes_count: usize,
    /// Assigned offline panel detections
    pub offline_panels_count: usize,
}

impl DefectMetrics {
    /// Count panels and defects in a mapped grid
    pub fn from_grid(grid: &PanelGrid) -> Self {
        let count = |kind: DefectType| -> usize {
            grid.panels().map(|p| p.defects_of(kind).len()).sum()
        };

        let hotspots_count = count(DefectType::Hotspot);
        let faulty_diodes_count = count(DefectType::FaultyDiode);
        let offline_panels_count = count(DefectType::OfflinePanel);

        Self {
            total_panels: grid.len(),
            panels_with_defects: grid.panels_with_defects().count(),
            total_defects: hotspots_count + faulty_diodes_count + offline_panels_count,
            hotspots_count,
            faulty_diodes_count,
            offline_panels_count,
        }
    }

    /// Percentage of panels with at least one defect
    pub fn defect_rate(&self) -> f64 {
        if self.total_panels == 0 {
            return 0.0;
        }
        self.panels_with_defects as f64 / self.total_panels as f64 * 100.0
    }

    /// Summary object as written to metrics JSON
    pub fn summary_json(&self) -> serde_json::Value {
        json!({
            "total_panels": self.total_panels,
            "panels_with_defects": self.panels_with_defects,
            "total_defects": self.total_defects,
            "defect_rate_percent": (self.defect_rate() * 100.0).round() / 100.0,
            "hotspots": self.hotspots_count,
            "faulty_diodes": self.faulty_diodes_count,
            "offline_panels": self.offline_panels_count,
        })
    }
}

/// Naive UTC ISO-8601 timestamp, `YYYY-MM-DDTHH:MM:SS[.ffffff]`
///
/// No offset suffix; fractional seconds appear only when the microsecond
/// part is non-zero.
pub fn export_timestamp(now: DateTime<Utc>) -> String {
    let naive = now.naive_utc();
    if naive.nanosecond() / 1_000 == 0 {
        naive.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        naive.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

/// Build the metrics JSON document
pub fn metrics_document(grid: &PanelGrid, include_details: bool) -> serde_json::Value {
    let metrics = DefectMetrics::from_grid(grid);
    let mut document = json!({
        "export_date": export_timestamp(Utc::now()),
        "summary": metrics.summary_json(),
    });

    if include_details {
        let panels: Vec<serde_json::Value> = grid
            .panels_with_defects()
            .map(|panel| {
                json!({
                    "panel_id": panel.panel_id(),
                    "column": panel.column(),
                    "row": panel.row(),
                    "defect_count": panel.defect_count(),
                    "hotspots": panel.hotspots().len(),
                    "faulty_diodes": panel.faulty_diodes().len(),
                    "offline_panels": panel.offline_panels().len(),
                })
            })
            .collect();
        document["panels_with_defects"] = serde_json::Value::Array(panels);
    }

    document
}

/// Write metrics JSON to `output_path`
pub fn export_metrics_json(grid: &PanelGrid, output_path: &Path, include_details: bool) -> Result<()> {
    info!("Exporting metrics to JSON: {}", output_path.display());

    let file = File::create(output_path).map_err(|e| {
        InspectionError::export(format!("cannot create {}", output_path.display()), e)
    })?;
    serde_json::to_writer_pretty(BufWriter::new(file), &metrics_document(grid, include_details))
        .map_err(|e| {
            InspectionError::export(format!("cannot write {}", output_path.display()), e)
        })
}

const CSV_HEADER: [&str; 10] = [
    "panel_id",
    "column",
    "row",
    "has_defects",
    "total_defects",
    "hotspots",
    "faulty_diodes",
    "offline_panels",
    "longitude",
    "latitude",
];

/// Write one CSV row per panel to `output_path`
///
/// Longitude/latitude are the geocoded panel center recorded on the panel's
/// first defect and are left blank for panels without defects.
pub fn export_metrics_csv(grid: &PanelGrid, output_path: &Path) -> Result<()> {
    info!("Exporting metrics to CSV: {}", output_path.display());

    let csv_error = |e: csv::Error| {
        InspectionError::export(format!("cannot write {}", output_path.display()), e)
    };

    let mut wtr = csv::Writer::from_path(output_path).map_err(csv_error)?;
    wtr.write_record(CSV_HEADER).map_err(csv_error)?;

    for panel in grid.panels() {
        let (lon, lat) = match panel.geospatial_centroid() {
            Some(c) => (c.longitude.to_string(), c.latitude.to_string()),
            None => (String::new(), String::new()),
        };
        wtr.write_record([
            panel.panel_id(),
            panel.column().to_string(),
            panel.row().to_string(),
            panel.has_defects().to_string(),
            panel.defect_count().to_string(),
            panel.hotspots().len().to_string(),
            panel.faulty_diodes().len().to_string(),
            panel.offline_panels().len().to_string(),
            lon,
            lat,
        ])
        .map_err(csv_error)?;
    }

    wtr.flush().map_err(|e| {
        InspectionError::export(format!("cannot flush {}", output_path.display()), e)
    })
}
