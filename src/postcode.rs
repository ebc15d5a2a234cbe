//! Postcode queries and the lookup service's payload types

use serde::{Deserialize, Serialize};
use std::fmt;

/// A user-entered postcode after normalization.
///
/// All whitespace is removed (the service accepts the compact form) and the
/// letters are upper-cased. No other validation is performed; malformed
/// postcodes are left for the service to reject.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostcodeQuery(String);

impl PostcodeQuery {
    /// Normalize raw input. Returns `None` when nothing but whitespace
    /// was entered.
    pub fn parse(raw: &str) -> Option<Self> {
        let compact: String = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_uppercase())
            .collect();

        if compact.is_empty() {
            None
        } else {
            Some(Self(compact))
        }
    }

    /// Whitespace-free form sent to the service
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostcodeQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A postcode record as returned by the lookup service.
///
/// Coordinates are optional because the service returns `null` for
/// postcodes it has no location for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LookupResult {
    #[serde(default)]
    pub postcode: Option<String>,
    #[serde(default)]
    pub eastings: Option<f64>,
    #[serde(default)]
    pub northings: Option<f64>,
    /// Service-supplied WGS84 latitude (map centering only)
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Service-supplied WGS84 longitude (map centering only)
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub admin_district: Option<String>,
}

/// Response envelope: `{"status": 200, "result": {...}}` on success,
/// `{"status": 404, "error": "..."}` otherwise.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    pub status: u16,
    #[serde(default)]
    pub result: Option<LookupResult>,
    #[serde(default)]
    pub error: Option<String>,
}
