//! Coordinate reference system descriptors
//!
//! Orthophotos produced by photogrammetry tools are usually stored in a
//! projected CRS (UTM), while drone EXIF GPS tags are WGS84. A [`Crs`] is the
//! parsed, validated form of whatever CRS identifier the raster reported,
//! resolved to a PROJ.4 definition string that `proj4rs` can instantiate.

use std::fmt;

use crate::constants::epsg;
use crate::error::{InspectionError, Result};

const WGS84_PROJ: &str = "+proj=longlat +datum=WGS84 +no_defs";
const SIRGAS_2000_PROJ: &str = "+proj=longlat +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +no_defs";
const WEB_MERCATOR_PROJ: &str =
    "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m +no_defs";

/// A parsed coordinate reference system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crs {
    epsg: Option<u32>,
    proj_string: String,
    geographic: bool,
}

impl Crs {
    /// WGS84 geographic (EPSG:4326)
    pub fn wgs84() -> Self {
        Self {
            epsg: Some(epsg::WGS84),
            proj_string: WGS84_PROJ.to_string(),
            geographic: true,
        }
    }

    /// Parse a CRS identifier
    ///
    /// Accepted forms:
    /// - `EPSG:32722`, `epsg:4326`, `urn:ogc:def:crs:EPSG::4326`
    /// - a bare EPSG number (`"32722"`)
    /// - `WGS84`, `OGC:CRS84`
    /// - a PROJ.4 definition (`"+proj=utm +zone=22 +south +datum=WGS84"`)
    /// - WKT1 or WKT2 carrying a top-level `AUTHORITY["EPSG","<code>"]` or
    ///   `ID["EPSG",<code>]`
    ///
    /// # Errors
    ///
    /// Returns `CrsParseError` for empty input, unsupported EPSG codes, WKT
    /// without a top-level EPSG authority and anything else that is not one
    /// of the forms above.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(InspectionError::crs_parse(input, "empty CRS descriptor"));
        }

        if trimmed.starts_with('+') {
            return Self::from_proj_string(trimmed);
        }
        if trimmed.contains('[') {
            return Self::from_wkt(trimmed);
        }

        let upper = trimmed.to_ascii_uppercase();
        if upper == "WGS84" || upper == "WGS 84" || upper == "OGC:CRS84" {
            return Ok(Self::wgs84());
        }

        let code = if let Some(rest) = upper.strip_prefix("EPSG:") {
            rest
        } else if upper.starts_with("URN:OGC:DEF:CRS:EPSG:") {
            upper.rsplit(':').next().unwrap_or_default()
        } else {
            upper.as_str()
        };

        let code: u32 = code
            .trim()
            .parse()
            .map_err(|_| InspectionError::crs_parse(input, "unrecognized CRS descriptor"))?;
        Self::from_epsg(code)
    }

    /// Resolve a supported EPSG code
    ///
    /// # Errors
    ///
    /// Returns `CrsParseError` if the code has no known definition.
    pub fn from_epsg(code: u32) -> Result<Self> {
        let proj_string = epsg_proj_string(code).ok_or_else(|| {
            InspectionError::crs_parse(format!("EPSG:{code}"), "unsupported EPSG code")
        })?;
        Ok(Self {
            epsg: Some(code),
            geographic: is_geographic_definition(&proj_string),
            proj_string,
        })
    }

    fn from_wkt(wkt: &str) -> Result<Self> {
        let code = top_level_epsg(wkt).ok_or_else(|| {
            InspectionError::crs_parse(wkt, "WKT has no top-level EPSG authority")
        })?;
        Self::from_epsg(code).map_err(|_| {
            InspectionError::crs_parse(wkt, format!("unsupported EPSG code {code} in WKT"))
        })
    }

    fn from_proj_string(definition: &str) -> Result<Self> {
        if !definition.contains("+proj=") {
            return Err(InspectionError::crs_parse(
                definition,
                "PROJ definition has no +proj parameter",
            ));
        }
        let normalized = definition.split_whitespace().collect::<Vec<_>>().join(" ");
        Ok(Self {
            epsg: None,
            geographic: is_geographic_definition(&normalized),
            proj_string: normalized,
        })
    }

    /// EPSG code, `None` for raw PROJ definitions
    pub fn epsg(&self) -> Option<u32> {
        self.epsg
    }

    /// PROJ.4 definition handed to `proj4rs`
    pub fn proj_string(&self) -> &str {
        &self.proj_string
    }

    /// Whether coordinates are angular (degrees) rather than metric
    pub fn is_geographic(&self) -> bool {
        self.geographic
    }

    /// Whether this CRS is WGS84 geographic, so no reprojection is needed
    pub fn is_wgs84(&self) -> bool {
        match self.epsg {
            Some(code) => code == epsg::WGS84,
            None => {
                self.geographic
                    && self.proj_string.contains("+datum=WGS84")
                    && !self.proj_string.contains("+towgs84")
                    && !self.proj_string.contains("+pm=")
            }
        }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.epsg {
            Some(code) => write!(f, "EPSG:{code}"),
            None => f.write_str(&self.proj_string),
        }
    }
}

/// EPSG code from the `AUTHORITY` (WKT1) or `ID` (WKT2) node that belongs to
/// the outermost CRS node
///
/// Nested nodes (datum, ellipsoid, unit, base CRS) carry their own
/// authorities and are skipped.
fn top_level_epsg(wkt: &str) -> Option<u32> {
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut keyword = String::new();

    for (i, ch) in wkt.char_indices() {
        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }
        if in_quotes {
            continue;
        }
        match ch {
            '[' | '(' => {
                let is_authority = keyword.eq_ignore_ascii_case("AUTHORITY")
                    || keyword.eq_ignore_ascii_case("ID");
                if depth == 1 && is_authority {
                    if let Some(code) = parse_authority(&wkt[i + 1..]) {
                        return Some(code);
                    }
                }
                depth += 1;
                keyword.clear();
            }
            ']' | ')' => {
                depth = depth.saturating_sub(1);
                keyword.clear();
            }
            ',' => keyword.clear(),
            c if c.is_ascii_alphanumeric() || c == '_' => keyword.push(c),
            _ => {}
        }
    }
    None
}

/// Parse `"EPSG","32722"]` or `"EPSG",32722]` (the node body after `[`)
fn parse_authority(body: &str) -> Option<u32> {
    let end = body.find(|c| matches!(c, ']' | ')' | '['))?;
    let mut parts = body[..end].split(',').map(|p| p.trim().trim_matches('"'));
    let authority = parts.next()?;
    if !authority.eq_ignore_ascii_case("EPSG") {
        return None;
    }
    parts.next()?.trim().trim_matches('"').parse().ok()
}

fn is_geographic_definition(definition: &str) -> bool {
    definition.contains("+proj=longlat") || definition.contains("+proj=latlong")
}

fn epsg_proj_string(code: u32) -> Option<String> {
    match code {
        epsg::WGS84 => Some(WGS84_PROJ.to_string()),
        epsg::SIRGAS_2000 => Some(SIRGAS_2000_PROJ.to_string()),
        epsg::WEB_MERCATOR => Some(WEB_MERCATOR_PROJ.to_string()),
        c if (epsg::UTM_NORTH_BASE + 1..=epsg::UTM_NORTH_BASE + epsg::UTM_ZONE_COUNT)
            .contains(&c) =>
        {
            let zone = c - epsg::UTM_NORTH_BASE;
            Some(format!("+proj=utm +zone={zone} +datum=WGS84 +units=m +no_defs"))
        }
        c if (epsg::UTM_SOUTH_BASE + 1..=epsg::UTM_SOUTH_BASE + epsg::UTM_ZONE_COUNT)
            .contains(&c) =>
        {
            let zone = c - epsg::UTM_SOUTH_BASE;
            Some(format!(
                "+proj=utm +zone={zone} +south +datum=WGS84 +units=m +no_defs"
            ))
        }
        c if (epsg::SIRGAS_UTM_SOUTH_BASE + epsg::SIRGAS_UTM_SOUTH_ZONES.0
            ..=epsg::SIRGAS_UTM_SOUTH_BASE + epsg::SIRGAS_UTM_SOUTH_ZONES.1)
            .contains(&c) =>
        {
            let zone = c - epsg::SIRGAS_UTM_SOUTH_BASE;
            Some(format!(
                "+proj=utm +zone={zone} +south +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs"
            ))
        }
        _ => None,
    }
}
