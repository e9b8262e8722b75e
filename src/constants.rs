//! Label vocabulary, coordinate reference codes and processing defaults
//!
//! This module contains compile-time constants shared by the mapper,
//! the geocoder and the artifact helpers.

/// Label strings emitted by the detection stage
pub mod labels {
    /// Solar panel detections (grid geometry, not defects)
    pub const SOLAR_PANELS: &str = "solarpanels";

    /// Localized high-temperature regions on a panel
    pub const HOTSPOTS: &str = "hotspots";

    /// Burnt bypass diodes (hot lines across a cell string)
    pub const FAULTY_DIODES: &str = "faultydiodes";

    /// Panels or strings colder than expected
    pub const OFFLINE_PANELS: &str = "offlinepanels";
}

/// EPSG codes for the coordinate reference systems the geocoder understands
pub mod epsg {
    /// WGS84 geographic (longitude/latitude in degrees)
    pub const WGS84: u32 = 4326;

    /// SIRGAS 2000 geographic
    pub const SIRGAS_2000: u32 = 4674;

    /// Web Mercator (spherical)
    pub const WEB_MERCATOR: u32 = 3857;

    /// WGS84 / UTM northern zones are `UTM_NORTH_BASE + zone`
    pub const UTM_NORTH_BASE: u32 = 32600;

    /// WGS84 / UTM southern zones are `UTM_SOUTH_BASE + zone`
    pub const UTM_SOUTH_BASE: u32 = 32700;

    /// SIRGAS 2000 / UTM southern zones 18S..=25S are `31960 + zone`
    pub const SIRGAS_UTM_SOUTH_BASE: u32 = 31960;

    /// First and last SIRGAS 2000 UTM south zone with an EPSG code in this range
    pub const SIRGAS_UTM_SOUTH_ZONES: (u32, u32) = (18, 25);

    /// Number of UTM zones
    pub const UTM_ZONE_COUNT: u32 = 60;
}

/// Panel grid reconstruction parameters
pub mod mapping {
    /// Row tolerance as a fraction of the row reference panel height
    pub const ROW_TOLERANCE_FACTOR: f64 = 0.5;
}

/// Detail crop defaults
pub mod crop {
    /// Average panel width in orthophoto pixels
    pub const DEFAULT_PANEL_WIDTH_PX: u32 = 127;

    /// Number of panel widths spanned by a detail crop
    pub const CROP_PANEL_SIZE: u32 = 5;

    /// Downscale applied to detail crops
    pub const CROP_DOWNSCALE_FACTOR: f64 = 0.5;
}
