//! Integration tests for the complete mapping workflow
//!
//! These tests validate the end-to-end pipeline including:
//! - Labels loading and panel/defect separation
//! - Panel grid reconstruction
//! - Nearest-panel assignment and geocoding
//! - Metrics export
//! - Degraded behaviour for empty grids and unusable CRS descriptors

use std::collections::HashSet;

use approx::assert_abs_diff_eq;
use solar_defect_mapper::constants::labels;
use solar_defect_mapper::report::{export_metrics_csv, export_metrics_json};
use solar_defect_mapper::{
    map_inspection, AffineTransform, BoundingBox, DefectMapper, GridPosition, InspectionConfig,
    InspectionError, PanelGrid, PixelToLatLonConverter,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn panel(left: i64, top: i64, width: i64, height: i64) -> BoundingBox {
    BoundingBox::new(left, top, width, height, labels::SOLAR_PANELS).unwrap()
}

fn defect(left: i64, top: i64, label: &str) -> BoundingBox {
    BoundingBox::new(left, top, 5, 5, label).unwrap()
}

fn wgs84_mapper() -> DefectMapper {
    let transform = AffineTransform::new(0.0001, 0.0, -47.0, 0.0, -0.0001, -15.0);
    DefectMapper::new(2000, 2000, PixelToLatLonConverter::new(transform, Some("EPSG:4326")))
}

/// Deterministic jittered panel field: `rows` x `cols` panels with noisy tops
fn jittered_field(rows: i64, cols: i64) -> Vec<BoundingBox> {
    let mut boxes = Vec::new();
    for r in 0..rows {
        for c in 0..cols {
            let jitter = (r * 7 + c * 13) % 11 - 5;
            boxes.push(panel(c * 120 + 5, r * 150 + 10 + jitter, 100, 100));
        }
    }
    // Detection order is arbitrary
    boxes.reverse();
    boxes.rotate_left(3);
    boxes
}

fn brute_force_nearest(grid: &PanelGrid, point: (f64, f64)) -> (f64, Vec<GridPosition>) {
    let distances: Vec<(GridPosition, f64)> = grid
        .iter()
        .map(|(pos, p)| {
            let (cx, cy) = p.bbox().center();
            (*pos, (point.0 - cx).hypot(point.1 - cy))
        })
        .collect();
    let min = distances
        .iter()
        .map(|(_, d)| *d)
        .fold(f64::INFINITY, f64::min);
    let winners = distances
        .into_iter()
        .filter(|(_, d)| *d == min)
        .map(|(pos, _)| pos)
        .collect();
    (min, winners)
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_single_panel_single_hotspot() {
    init_logging();
    let grid = wgs84_mapper().map_defects_to_panels(
        &[panel(0, 0, 100, 100)],
        &[defect(10, 10, labels::HOTSPOTS)],
    );

    assert_eq!(grid.len(), 1);
    let only = grid.get(1, 1).expect("panel at (1,1)");
    assert_eq!(only.hotspots().len(), 1);
    assert_eq!(only.defect_count(), 1);
}

#[test]
fn test_two_panels_same_row() {
    let grid = wgs84_mapper()
        .map_defects_to_panels(&[panel(150, 0, 100, 100), panel(0, 0, 100, 100)], &[]);

    assert_eq!(grid.row_count(), 1);
    assert_eq!(grid.get(1, 1).unwrap().bbox().left(), 0);
    assert_eq!(grid.get(2, 1).unwrap().bbox().left(), 150);
}

#[test]
fn test_two_panels_separate_rows() {
    let grid = wgs84_mapper()
        .map_defects_to_panels(&[panel(0, 200, 100, 100), panel(0, 0, 100, 100)], &[]);

    let keys: Vec<(u32, u32)> = grid.positions().map(GridPosition::to_tuple).collect();
    assert_eq!(keys, vec![(1, 1), (1, 2)]);
    assert_eq!(grid.get(1, 2).unwrap().bbox().top(), 200);
}

#[test]
fn test_no_panels_drops_defects() {
    init_logging();
    let grid = wgs84_mapper().map_defects_to_panels(&[], &[defect(10, 10, labels::HOTSPOTS)]);
    assert!(grid.is_empty());
    assert_eq!(grid.defect_count(), 0);
}

#[test]
fn test_equidistant_defect_is_deterministic() {
    let panels = [panel(0, 0, 100, 100), panel(200, 0, 100, 100)];
    // Defect center (150, 50) is 100 px from both panel centers
    let defects = [BoundingBox::new(148, 48, 4, 4, labels::HOTSPOTS).unwrap()];

    let first = wgs84_mapper().map_defects_to_panels(&panels, &defects);
    for _ in 0..10 {
        let again = wgs84_mapper().map_defects_to_panels(&panels, &defects);
        assert_eq!(again, first);
    }
    assert_eq!(first.get(1, 1).unwrap().hotspots().len(), 1);
    assert!(first.get(2, 1).unwrap().hotspots().is_empty());
}

// ============================================================================
// Grid properties
// ============================================================================

#[test]
fn test_grid_keys_are_positive_and_unique() {
    let boxes = jittered_field(4, 6);
    let grid = wgs84_mapper().map_defects_to_panels(&boxes, &[]);

    assert_eq!(grid.len(), boxes.len());
    let mut seen = HashSet::new();
    for (pos, panel) in &grid {
        assert!(pos.column >= 1 && pos.row >= 1);
        assert!(seen.insert(*pos));
        assert_eq!(panel.position(), *pos);
    }
    assert_eq!(grid.row_count(), 4);
    assert_eq!(grid.max_columns(), 6);
}

#[test]
fn test_columns_increase_with_left() {
    let grid = wgs84_mapper().map_defects_to_panels(&jittered_field(3, 5), &[]);

    for row in 1..=grid.row_count() {
        let lefts: Vec<u32> = (1..=5)
            .map(|col| grid.get(col, row).unwrap().bbox().left())
            .collect();
        assert!(lefts.windows(2).all(|w| w[0] < w[1]), "row {row}: {lefts:?}");
    }
}

#[test]
fn test_assignment_matches_brute_force() {
    let mapper = wgs84_mapper();
    let panels = jittered_field(3, 4);
    let grid = mapper.build_grid(&panels);

    let mut defects = Vec::new();
    for i in 0..40i64 {
        let x = (i * 37) % 480;
        let y = (i * 53) % 450;
        defects.push(defect(x, y, labels::HOTSPOTS));
    }

    let mut assigned = grid.clone();
    for d in &defects {
        let position = mapper.assign_defect(&mut assigned, d).expect("assigned");
        let (min, winners) = brute_force_nearest(&grid, d.center());
        assert!(winners.contains(&position));
        assert_eq!(winners.iter().min(), Some(&position), "tie must go to lowest (row, column)");

        let (cx, cy) = assigned.get_position(position).unwrap().bbox().center();
        let (dx, dy) = d.center();
        assert_abs_diff_eq!((dx - cx).hypot(dy - cy), min);
    }
    assert_eq!(assigned.defect_count(), defects.len());
}

#[test]
fn test_geocode_is_panel_center() {
    let transform = AffineTransform::new(0.1, 0.0, 500000.0, 0.0, -0.1, 7200000.0);
    let converter = PixelToLatLonConverter::new(transform, Some("EPSG:32722"));
    let mapper = DefectMapper::new(2000, 2000, converter);

    let grid = mapper.map_defects_to_panels(
        &[panel(0, 0, 100, 100), panel(150, 0, 100, 100)],
        &[
            defect(180, 80, labels::FAULTY_DIODES),
            defect(5, 5, labels::OFFLINE_PANELS),
        ],
    );

    for (_, panel) in &grid {
        let expected = mapper
            .converter()
            .pixel_to_lonlat(panel.bbox().center())
            .unwrap();
        for d in panel.all_defects() {
            assert_eq!(d.panel_centroid_geospatial(), expected);
            assert_ne!(
                d.panel_centroid_geospatial(),
                mapper.converter().pixel_to_lonlat(d.defect_center_px()).unwrap()
            );
        }
    }
    let lon = grid.get(2, 1).unwrap().geospatial_centroid().unwrap().longitude;
    assert!(lon < -50.9 && lon > -51.1);
}

// ============================================================================
// Converter
// ============================================================================

#[test]
fn test_wgs84_converter_is_affine_only() {
    let transform = AffineTransform::new(0.0001, 0.0, -47.0, 0.0, -0.0001, -15.0);
    let converter = PixelToLatLonConverter::new(transform, Some("EPSG:4326"));

    for pixel in [(0.0, 0.0), (100.0, 200.0), (1234.5, 987.25), (-3.0, 7.5)] {
        let coord = converter.pixel_to_lonlat(pixel).unwrap();
        assert_eq!(coord.to_tuple(), transform.apply(pixel));
    }
}

#[test]
fn test_unusable_crs_degrades_to_wgs84() {
    init_logging();
    let transform = AffineTransform::new(0.0001, 0.0, -47.0, 0.0, -0.0001, -15.0);
    let converter = PixelToLatLonConverter::new(transform, Some("EPSG:99999"));
    assert!(!converter.reprojects());
    assert_eq!(
        converter.pixel_to_lonlat((10.0, 10.0)).unwrap().to_tuple(),
        transform.apply((10.0, 10.0))
    );
}

// ============================================================================
// End-to-end
// ============================================================================

const LABELS_JSON: &str = r#"[
    {
        "boundingBox": {
            "boundingBoxes": [
                {"label": "solarpanels", "left": 150, "top": 4, "width": 100, "height": 100},
                {"label": "solarpanels", "left": 0, "top": 0, "width": 100, "height": 100},
                {"label": "solarpanels", "left": 0, "top": 200, "width": 100, "height": 100},
                {"label": "hotspots", "left": 10, "top": 10, "width": 5, "height": 5},
                {"label": "faultydiodes", "left": 160, "top": 50, "width": 7, "height": 19},
                {"label": "offlinepanels", "left": 20, "top": 230, "width": 40, "height": 40},
                {"label": "hotspots", "left": 40, "top": 250, "width": 3, "height": 3}
            ]
        }
    }
]"#;

#[test]
fn test_map_inspection_end_to_end() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let labels_path = dir.path().join("defect_labels.json");
    std::fs::write(&labels_path, LABELS_JSON).unwrap();

    let mut config = InspectionConfig::default();
    config.labels_path = labels_path;
    config.output_path = dir.path().to_path_buf();
    config.orthophoto.width = 400;
    config.orthophoto.height = 400;
    config.orthophoto.transform = [0.1, 0.0, 500000.0, 0.0, -0.1, 7200000.0];
    config.orthophoto.crs = Some("EPSG:32722".to_string());

    let outcome = map_inspection(&config).unwrap();
    assert_eq!(outcome.metrics.total_panels, 3);
    assert_eq!(outcome.metrics.panels_with_defects, 3);
    assert_eq!(outcome.metrics.total_defects, 4);
    assert_eq!(outcome.grid.get(1, 2).unwrap().defect_count(), 2);
    assert_eq!(outcome.grid.get(2, 1).unwrap().faulty_diodes().len(), 1);

    let json_path = dir.path().join("metrics.json");
    let csv_path = dir.path().join("metrics.csv");
    export_metrics_json(&outcome.grid, &json_path, config.export.include_details).unwrap();
    export_metrics_csv(&outcome.grid, &csv_path).unwrap();

    let doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(doc["summary"]["total_defects"], 4);
    assert_eq!(doc["panels_with_defects"].as_array().unwrap().len(), 3);

    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(csv.lines().count(), 4);
    assert!(csv.starts_with("panel_id,column,row,"));
}

#[test]
fn test_map_inspection_missing_labels() {
    let mut config = InspectionConfig::default();
    config.labels_path = "/nonexistent/defect_labels.json".into();

    let err = map_inspection(&config).unwrap_err();
    assert!(matches!(err, InspectionError::LabelsError { .. }));
    assert!(!err.is_recoverable());
}
