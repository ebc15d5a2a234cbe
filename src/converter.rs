//! Grid reference converter
//!
//! Pure function from an easting/northing pair to the formatted National
//! Grid Reference and the WGS84 position derived through the OSGB36 datum
//! transform. Invalid input is reported as a [`ConversionError`], never a
//! panic, so callers can degrade to a placeholder.

use crate::geodesy::{Datum, GridRefError, LatLon, OsGridRef, DEFAULT_DIGITS};
use thiserror::Error;

/// Placeholder shown instead of values that could not be computed
pub const CALCULATION_ERROR: &str = "Calculation Error";

/// Decimal places kept on converted latitude/longitude (~0.11 m)
pub const COORDINATE_PLACES: i32 = 6;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    /// The lookup record carried no easting/northing
    #[error("easting/northing missing from lookup result")]
    MissingCoordinates,

    #[error(transparent)]
    Grid(#[from] GridRefError),
}

/// Result of converting one easting/northing pair
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub grid_ref: OsGridRef,
    /// e.g. `"TQ 29090 79645"`
    pub ngr_formatted: String,
    /// WGS84, rounded to [`COORDINATE_PLACES`]
    pub geo: LatLon,
}

/// Convert with the default 10-digit grid reference.
pub fn convert(easting: f64, northing: f64) -> Result<Conversion, ConversionError> {
    convert_with_digits(easting, northing, DEFAULT_DIGITS)
}

/// Convert, formatting the grid reference with `digits` digits.
pub fn convert_with_digits(
    easting: f64,
    northing: f64,
    digits: u8,
) -> Result<Conversion, ConversionError> {
    let grid_ref = OsGridRef::new(easting, northing)?;
    let ngr_formatted = grid_ref.format(digits)?;
    let geo = grid_ref
        .to_lat_lon(Datum::Wgs84)?
        .rounded(COORDINATE_PLACES);

    Ok(Conversion {
        grid_ref,
        ngr_formatted,
        geo,
    })
}
