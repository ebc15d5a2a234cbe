//! Ordnance Survey National Grid and datum conversion
//!
//! Converts between OSGB36 National Grid references and geodetic
//! latitude/longitude on OSGB36 or WGS84.
//!
//! # Pipeline
//!
//! ```text
//! easting/northing --inverse TM--> OSGB36 lat/lon --cartesian--> Helmert --> WGS84 lat/lon
//! ```
//!
//! # Example
//!
//! ```
//! use ngr_finder::geodesy::{Datum, OsGridRef};
//!
//! let grid = OsGridRef::new(651_409.903, 313_177.270).unwrap();
//! assert_eq!(grid.to_string(), "TG 51409 13177");
//!
//! let wgs84 = grid.to_lat_lon(Datum::Wgs84).unwrap();
//! assert!((wgs84.lat - 52.657978).abs() < 1e-5);
//! ```

pub mod cartesian;
pub mod datum;
pub mod latlon;
pub mod osgridref;

pub use cartesian::Cartesian;
pub use datum::{Datum, Ellipsoid, HelmertTransform};
pub use latlon::LatLon;
pub use osgridref::{GridRefError, OsGridRef, DEFAULT_DIGITS};
