//! NGR Finder Library
//!
//! Looks up UK postcodes and converts their Ordnance Survey easting/northing
//! into a National Grid Reference and WGS84 latitude/longitude.
//!
//! ```no_run
//! use ngr_finder::{lookup, PostcodesIoResolver, TcpProbe};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let resolver = PostcodesIoResolver::new(
//!     "https://api.postcodes.io",
//!     Duration::from_secs(10),
//!     Arc::new(TcpProbe::default()),
//! )?;
//! let record = lookup(&resolver, "SW1A 1AA", 10)?;
//! println!("{}", record.ngr_formatted);
//! # Ok::<(), ngr_finder::NgrError>(())
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod connectivity;
pub mod converter;
pub mod error;
pub mod geodesy;
pub mod input;
pub mod keybindings;
pub mod lookup;
pub mod lookup_state;
pub mod postcode;
pub mod resolver;
pub mod theme;
pub mod ui;

// Re-export main types for convenience
pub use config::AppConfig;
pub use connectivity::{ConnectivityProbe, NetworkState, StaticProbe, TcpProbe};
pub use converter::{convert, convert_with_digits, Conversion, ConversionError, CALCULATION_ERROR};
pub use error::NgrError;
pub use geodesy::{Datum, GridRefError, LatLon, OsGridRef};
pub use lookup::{lookup, LookupRecord};
pub use lookup_state::{LookupSession, LookupState, LookupTransitionError, Submission};
pub use postcode::{LookupResult, PostcodeQuery};
pub use resolver::{CachedLookup, LookupError, PostcodeLookup, PostcodesIoResolver};
