//! Postcode → grid reference pipeline
//!
//! Runs the resolver, feeds the returned easting/northing into the converter
//! and assembles the record handed to the presentation layer. A conversion
//! failure never fails the lookup: the record keeps the raw easting/northing
//! and carries placeholders for the derived values.

use crate::converter::{self, ConversionError, CALCULATION_ERROR};
use crate::postcode::LookupResult;
use crate::resolver::{LookupError, PostcodeLookup};
use serde::Serialize;
use tracing::warn;

/// Zoom level used for map links
pub const MAP_ZOOM: u8 = 15;

/// Combined lookup and conversion result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupRecord {
    pub postcode: Option<String>,
    pub eastings: Option<f64>,
    pub northings: Option<f64>,
    /// Formatted grid reference, or [`CALCULATION_ERROR`]
    pub ngr_formatted: String,
    /// WGS84 latitude converted from the grid position
    pub geo_lat: Option<f64>,
    /// WGS84 longitude converted from the grid position
    pub geo_lon: Option<f64>,
    /// Service-supplied latitude, used for map centering only
    pub latitude: Option<f64>,
    /// Service-supplied longitude, used for map centering only
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversion_error: Option<String>,
}

impl LookupRecord {
    /// Derive the grid reference and WGS84 position from `result`'s own
    /// easting/northing.
    pub fn from_result(result: LookupResult, digits: u8) -> Self {
        let converted = match (result.eastings, result.northings) {
            (Some(e), Some(n)) => converter::convert_with_digits(e, n, digits),
            _ => Err(ConversionError::MissingCoordinates),
        };

        let (ngr_formatted, geo_lat, geo_lon, conversion_error) = match converted {
            Ok(c) => (c.ngr_formatted, Some(c.geo.lat), Some(c.geo.lon), None),
            Err(e) => {
                warn!(
                    "Grid conversion failed for {:?}/{:?}: {}",
                    result.eastings, result.northings, e
                );
                (CALCULATION_ERROR.to_string(), None, None, Some(e.to_string()))
            }
        };

        Self {
            postcode: result.postcode,
            eastings: result.eastings,
            northings: result.northings,
            ngr_formatted,
            geo_lat,
            geo_lon,
            latitude: result.latitude,
            longitude: result.longitude,
            country: result.country,
            region: result.region,
            admin_district: result.admin_district,
            conversion_error,
        }
    }

    /// True when the grid reference and derived position were computed
    pub fn is_converted(&self) -> bool {
        self.conversion_error.is_none()
    }

    pub fn easting_display(&self) -> String {
        display_metres(self.eastings)
    }

    pub fn northing_display(&self) -> String {
        display_metres(self.northings)
    }

    /// Converted latitude to 6 places, or the placeholder
    pub fn geo_lat_display(&self) -> String {
        display_degrees(self.geo_lat)
    }

    /// Converted longitude to 6 places, or the placeholder
    pub fn geo_lon_display(&self) -> String {
        display_degrees(self.geo_lon)
    }

    /// OpenStreetMap link with a marker at the service-supplied position
    pub fn map_url(&self) -> Option<String> {
        let (lat, lon) = (self.latitude?, self.longitude?);
        Some(format!(
            "https://www.openstreetmap.org/?mlat={lat:.6}&mlon={lon:.6}#map={MAP_ZOOM}/{lat:.6}/{lon:.6}"
        ))
    }
}

fn display_metres(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| v.to_string())
}

fn display_degrees(value: Option<f64>) -> String {
    value.map_or_else(|| CALCULATION_ERROR.to_string(), |v| format!("{v:.6}"))
}

/// Resolve `query` and convert the result.
///
/// # Errors
///
/// Only resolver failures; conversion problems are folded into the record.
pub fn lookup<L: PostcodeLookup + ?Sized>(
    resolver: &L,
    query: &str,
    digits: u8,
) -> Result<LookupRecord, LookupError> {
    let result = resolver.resolve(query)?;
    Ok(LookupRecord::from_result(result, digits))
}
