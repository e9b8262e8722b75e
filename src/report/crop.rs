//! Detail crop windows and artifact naming
//!
//! Each panel with defects gets one crop per defect type present, centred on
//! the panel and clamped to the orthophoto. Only the geometry and file names
//! are produced here; pixel extraction happens in the rendering layer.

use crate::config::CropConfig;
use crate::geometry::BoundingBox;
use crate::model::{DefectType, GridPosition, PanelGrid};

/// Pixel window `[x1, x2) x [y1, y2)` inside the orthophoto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropWindow {
    /// Left edge (inclusive)
    pub x1: u32,
    /// Top edge (inclusive)
    pub y1: u32,
    /// Right edge (exclusive)
    pub x2: u32,
    /// Bottom edge (exclusive)
    pub y2: u32,
}

impl CropWindow {
    /// Square window of `config.crop_size_px()` centred on the panel
    ///
    /// # Arguments
    ///
    /// * `panel_bbox` - Panel box in orthophoto pixels
    /// * `config` - Crop size parameters
    /// * `image_width`, `image_height` - Orthophoto size used for clamping
    ///
    /// # Returns
    ///
    /// Window clamped to the orthophoto; it is smaller than the nominal size
    /// near the image edges
    pub fn around_panel(
        panel_bbox: &BoundingBox,
        config: &CropConfig,
        image_width: u32,
        image_height: u32,
    ) -> Self {
        let half = f64::from(config.crop_size_px() / 2);
        let (cx, cy) = panel_bbox.center();

        let clamp = |v: f64, max: u32| -> u32 { v.trunc().clamp(0.0, f64::from(max)) as u32 };

        Self {
            x1: clamp(cx - half, image_width),
            y1: clamp(cy - half, image_height),
            x2: clamp(cx + half, image_width),
            y2: clamp(cy + half, image_height),
        }
    }

    /// Window width in pixels
    pub fn width(&self) -> u32 {
        self.x2.saturating_sub(self.x1)
    }

    /// Window height in pixels
    pub fn height(&self) -> u32 {
        self.y2.saturating_sub(self.y1)
    }

    /// Whether the window covers no pixels
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Size after applying the crop downscale factor
    pub fn scaled_size(&self, scale_factor: f64) -> (u32, u32) {
        let scale = |v: u32| (f64::from(v) * scale_factor).round().max(1.0) as u32;
        (scale(self.width()), scale(self.height()))
    }
}

/// A crop to render for one defect type on one panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropRequest {
    /// Panel the crop is centred on
    pub position: GridPosition,
    /// Defect type the crop illustrates
    pub defect_type: DefectType,
    /// Pixel window in the orthophoto
    pub window: CropWindow,
    /// Output file name, `"{label}_({panel_id})_cropped.jpg"`
    pub file_name: String,
}

/// `"{label}_({panel_id}){suffix}.jpg"`
pub fn artifact_file_name(defect_type: DefectType, position: GridPosition, suffix: &str) -> String {
    format!("{}_({}){}.jpg", defect_type.label(), position, suffix)
}

/// Crop requests for every panel with defects, row-major, in report order
pub fn crop_requests(
    grid: &PanelGrid,
    config: &CropConfig,
    image_width: u32,
    image_height: u32,
) -> Vec<CropRequest> {
    grid.panels_with_defects()
        .flat_map(|panel| {
            let window = CropWindow::around_panel(panel.bbox(), config, image_width, image_height);
            DefectType::ALL
                .into_iter()
                .filter(move |&kind| !panel.defects_of(kind).is_empty())
                .map(move |kind| CropRequest {
                    position: panel.position(),
                    defect_type: kind,
                    window,
                    file_name: artifact_file_name(kind, panel.position(), "_cropped"),
                })
        })
        .collect()
}
