//! Defect to panel assignment and geocoding
//!
//! Builds the panel grid from unordered panel boxes, then assigns every
//! defect to the panel whose center is nearest to the defect center and
//! records the geocoded panel center on the defect.
//!
//! Equidistant panels are resolved in favour of the lowest `(row, column)`.

use log::{debug, info, warn};

use super::rows::group_into_rows;
use crate::config::MappingConfig;
use crate::geo::PixelToLatLonConverter;
use crate::geometry::BoundingBox;
use crate::model::{Defect, DefectType, GridPosition, Panel, PanelGrid};

/// Maps defect detections onto a reconstructed panel grid
#[derive(Debug)]
pub struct DefectMapper {
    /// Orthophoto width in pixels
    image_width: u32,
    /// Orthophoto height in pixels
    image_height: u32,
    /// Geocoder for panel centers
    converter: PixelToLatLonConverter,
    /// Row grouping parameters
    config: MappingConfig,
}

impl DefectMapper {
    /// Create a mapper with default grouping parameters
    ///
    /// # Arguments
    ///
    /// * `image_width`, `image_height` - Orthophoto size in pixels
    /// * `converter` - Pixel to WGS84 converter for the same orthophoto
    pub fn new(image_width: u32, image_height: u32, converter: PixelToLatLonConverter) -> Self {
        Self::with_config(image_width, image_height, converter, MappingConfig::default())
    }

    /// Create a mapper with custom grouping parameters
    pub fn with_config(
        image_width: u32,
        image_height: u32,
        converter: PixelToLatLonConverter,
        config: MappingConfig,
    ) -> Self {
        Self {
            image_width,
            image_height,
            converter,
            config,
        }
    }

    /// Orthophoto `(width, height)` in pixels
    pub fn image_size(&self) -> (u32, u32) {
        (self.image_width, self.image_height)
    }

    /// Geocoder used for panel centers
    pub fn converter(&self) -> &PixelToLatLonConverter {
        &self.converter
    }

    /// Row grouping parameters
    pub fn config(&self) -> &MappingConfig {
        &self.config
    }

    /// Build the panel grid and assign every defect to its nearest panel
    ///
    /// # Arguments
    ///
    /// * `panel_boxes` - Boxes labelled as solar panels, in any order
    /// * `defect_boxes` - Hotspot, faulty diode and offline panel boxes
    ///
    /// # Returns
    ///
    /// `PanelGrid` holding every panel, with each assigned defect appended to
    /// its panel in input order
    ///
    /// Defects are dropped (with a warning) when the grid is empty or when
    /// their panel center cannot be geocoded. Labels other than the three
    /// defect labels are ignored.
    pub fn map_defects_to_panels(
        &self,
        panel_boxes: &[BoundingBox],
        defect_boxes: &[BoundingBox],
    ) -> PanelGrid {
        info!(
            "Mapping {} defects to {} panels",
            defect_boxes.len(),
            panel_boxes.len()
        );

        // Step 1: Row grouping and grid keys
        let mut grid = self.build_grid(panel_boxes);

        if grid.is_empty() {
            if !defect_boxes.is_empty() {
                warn!(
                    "No panels detected, dropping {} defects",
                    defect_boxes.len()
                );
            }
            return grid;
        }

        // Step 2: Nearest-panel assignment
        let assigned = defect_boxes
            .iter()
            .filter(|bbox| self.assign_defect(&mut grid, bbox).is_some())
            .count();

        info!(
            "Assigned {} of {} defects to panels",
            assigned,
            defect_boxes.len()
        );
        grid
    }

    /// Reconstruct the `(column, row)` grid from panel boxes
    pub fn build_grid(&self, panel_boxes: &[BoundingBox]) -> PanelGrid {
        for bbox in panel_boxes {
            self.note_out_of_extent(bbox);
        }

        let rows = group_into_rows(panel_boxes, self.config.row_tolerance_factor);
        let mut grid = PanelGrid::new();

        for (row_idx, row) in rows.into_iter().enumerate() {
            for (col_idx, bbox) in row.into_iter().enumerate() {
                let position = GridPosition::new(col_idx as u32 + 1, row_idx as u32 + 1);
                grid.insert(Panel::new(position, bbox));
            }
        }

        if !grid.is_empty() {
            info!(
                "Created panel grid: {} rows, max {} columns",
                grid.row_count(),
                grid.max_columns()
            );
        }
        grid
    }

    /// Assign one defect box to its nearest panel in `grid`
    ///
    /// # Returns
    ///
    /// Position of the panel the defect was appended to, or `None` when the
    /// label is not a defect label, the grid is empty or geocoding failed
    pub fn assign_defect(&self, grid: &mut PanelGrid, bbox: &BoundingBox) -> Option<GridPosition> {
        let Some(defect_type) = DefectType::from_label(bbox.label()) else {
            debug!("Ignoring box with non-defect label '{}'", bbox.label());
            return None;
        };
        self.note_out_of_extent(bbox);

        let center = bbox.center();
        let Some(position) = nearest_panel(grid, center) else {
            warn!(
                "No panel found for {} at ({:.1}, {:.1}), skipping",
                defect_type, center.0, center.1
            );
            return None;
        };

        let panel = grid.get_mut(position)?;
        let centroid = match self.converter.pixel_to_lonlat(panel.bbox().center()) {
            Ok(coordinate) => coordinate,
            Err(e) => {
                warn!(
                    "Could not geocode panel {} for {}, skipping: {}",
                    position, defect_type, e
                );
                return None;
            }
        };

        panel.push_defect(Defect::new(bbox.clone(), defect_type, centroid));
        Some(position)
    }

    fn note_out_of_extent(&self, bbox: &BoundingBox) {
        if !bbox.is_within(self.image_width, self.image_height) {
            debug!(
                "Box '{}' at ({}, {}) extends past the {}x{} orthophoto",
                bbox.label(),
                bbox.left(),
                bbox.top(),
                self.image_width,
                self.image_height
            );
        }
    }
}

/// Position of the panel whose center is nearest to `point`
///
/// Panels are scanned row-major and only a strictly smaller distance replaces
/// the current best, so ties go to the lowest `(row, column)`. Non-finite
/// distances never match.
pub fn nearest_panel(grid: &PanelGrid, point: (f64, f64)) -> Option<GridPosition> {
    let mut best: Option<(GridPosition, f64)> = None;

    for (position, panel) in grid {
        let (cx, cy) = panel.bbox().center();
        let distance = (point.0 - cx).hypot(point.1 - cy);
        if !distance.is_finite() {
            continue;
        }
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((*position, distance));
        }
    }

    best.map(|(position, _)| position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::labels;
    use crate::geometry::AffineTransform;

    fn panel(left: i64, top: i64) -> BoundingBox {
        BoundingBox::new(left, top, 100, 100, labels::SOLAR_PANELS).unwrap()
    }

    fn defect(left: i64, top: i64, label: &str) -> BoundingBox {
        BoundingBox::new(left, top, 4, 4, label).unwrap()
    }

    fn mapper() -> DefectMapper {
        let transform = AffineTransform::new(0.001, 0.0, -51.0, 0.0, -0.001, -20.0);
        DefectMapper::new(1000, 1000, PixelToLatLonConverter::new(transform, None))
    }

    #[test]
    fn test_build_grid_keys() {
        let grid = mapper().build_grid(&[panel(150, 0), panel(0, 0), panel(0, 200)]);
        assert_eq!(grid.len(), 3);
        assert_eq!(grid.get(1, 1).unwrap().bbox().left(), 0);
        assert_eq!(grid.get(2, 1).unwrap().bbox().left(), 150);
        assert_eq!(grid.get(1, 2).unwrap().bbox().top(), 200);
    }

    #[test]
    fn test_defect_goes_to_nearest_panel() {
        let m = mapper();
        let grid = m.map_defects_to_panels(
            &[panel(0, 0), panel(150, 0)],
            &[defect(160, 40, labels::HOTSPOTS), defect(10, 10, labels::FAULTY_DIODES)],
        );
        assert_eq!(grid.get(2, 1).unwrap().hotspots().len(), 1);
        assert_eq!(grid.get(1, 1).unwrap().faulty_diodes().len(), 1);
        assert_eq!(grid.defect_count(), 2);
    }

    #[test]
    fn test_geocodes_panel_center_not_defect() {
        let m = mapper();
        let grid = m.map_defects_to_panels(&[panel(0, 0)], &[defect(90, 90, labels::OFFLINE_PANELS)]);
        let placed = &grid.get(1, 1).unwrap().offline_panels()[0];

        let expected = m.converter().pixel_to_lonlat((50.0, 50.0)).unwrap();
        assert_eq!(placed.panel_centroid_geospatial(), expected);
        assert_eq!(placed.defect_center_px(), (92.0, 92.0));
    }

    #[test]
    fn test_unknown_labels_ignored() {
        let m = mapper();
        let grid = m.map_defects_to_panels(
            &[panel(0, 0)],
            &[defect(10, 10, labels::SOLAR_PANELS), defect(10, 10, "birds")],
        );
        assert_eq!(grid.defect_count(), 0);
    }

    #[test]
    fn test_empty_grid_drops_defects() {
        let grid = mapper().map_defects_to_panels(&[], &[defect(10, 10, labels::HOTSPOTS)]);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_geocode_failure_skips_defect_only() {
        // SIRGAS 2000 geographic source with a metric-looking affine: the
        // west panel lands on (-50, -10), the east panel far outside the
        // valid degree range.
        let transform = AffineTransform::new(500.0, 0.0, -25050.0, 7200.0, 0.0, -360010.0);
        let converter = PixelToLatLonConverter::new(transform, Some("EPSG:4674"));
        assert!(converter.reprojects());
        assert!(converter.pixel_to_lonlat((50.0, 50.0)).is_ok());
        assert!(converter.pixel_to_lonlat((1050.0, 50.0)).is_err());

        let m = DefectMapper::new(2000, 1000, converter);
        let grid = m.map_defects_to_panels(
            &[panel(0, 0), panel(1000, 0)],
            &[
                defect(10, 10, labels::HOTSPOTS),
                defect(1010, 10, labels::HOTSPOTS),
                defect(60, 60, labels::FAULTY_DIODES),
            ],
        );

        assert_eq!(grid.len(), 2);
        assert_eq!(grid.get(2, 1).unwrap().defect_count(), 0);
        assert!(grid.get(2, 1).unwrap().geospatial_centroid().is_none());
        let west = grid.get(1, 1).unwrap();
        assert_eq!(west.hotspots().len(), 1);
        assert_eq!(west.faulty_diodes().len(), 1);
        assert_eq!(grid.defect_count(), 2);
    }

    #[test]
    fn test_tie_goes_to_lowest_row_then_column() {
        let m = mapper();
        // Panels centred at (50,50), (250,50), (50,250), (250,250); the point
        // (150,150) is equidistant from all four.
        let grid = m.build_grid(&[panel(200, 200), panel(0, 200), panel(200, 0), panel(0, 0)]);
        assert_eq!(nearest_panel(&grid, (150.0, 150.0)), Some(GridPosition::new(1, 1)));
        // Equidistant from (2,1) and (2,2) only
        assert_eq!(nearest_panel(&grid, (250.0, 150.0)), Some(GridPosition::new(2, 1)));
    }

    #[test]
    fn test_nearest_panel_ignores_non_finite() {
        let grid = mapper().build_grid(&[panel(0, 0)]);
        assert_eq!(nearest_panel(&grid, (f64::NAN, 0.0)), None);
        assert_eq!(nearest_panel(&PanelGrid::new(), (0.0, 0.0)), None);
    }

    #[test]
    fn test_custom_tolerance() {
        let converter = PixelToLatLonConverter::new(AffineTransform::identity(), None);
        let strict = DefectMapper::with_config(
            1000,
            1000,
            converter,
            MappingConfig {
                row_tolerance_factor: 0.1,
            },
        );
        let grid = strict.build_grid(&[panel(0, 0), panel(150, 20)]);
        assert_eq!(grid.row_count(), 2);
        assert_eq!(strict.config().row_tolerance_factor, 0.1);
        assert_eq!(strict.image_size(), (1000, 1000));
    }
}
