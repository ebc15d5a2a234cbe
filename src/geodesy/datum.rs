//! Reference ellipsoids, datums and Helmert transform parameters
//!
//! All values are the published Ordnance Survey figures ("A guide to
//! coordinate systems in Great Britain", annexes A and C). They are fixed
//! domain constants and must not be adjusted.

use std::fmt;

/// A reference ellipsoid described by its semi-major axis, semi-minor axis
/// and flattening (all three are kept because the published figures for
/// each are used directly by different formulae).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis in metres
    pub a: f64,
    /// Semi-minor axis in metres
    pub b: f64,
    /// Flattening
    pub f: f64,
}

impl Ellipsoid {
    /// Airy 1830, used by OSGB36 and the National Grid projection
    pub const AIRY_1830: Self = Self {
        a: 6_377_563.396,
        b: 6_356_256.909,
        f: 1.0 / 299.324_964_6,
    };

    /// WGS84, used by GPS and the postcode lookup service
    pub const WGS84: Self = Self {
        a: 6_378_137.0,
        b: 6_356_752.314_245,
        f: 1.0 / 298.257_223_563,
    };

    /// First eccentricity squared, derived from the flattening.
    #[inline]
    pub fn eccentricity_sq(&self) -> f64 {
        2.0 * self.f - self.f * self.f
    }
}

/// Seven-parameter Helmert transform.
///
/// Translations are in metres, scale in parts per million and rotations
/// in arc-seconds, matching the way the parameters are published.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HelmertTransform {
    pub tx: f64,
    pub ty: f64,
    pub tz: f64,
    pub s_ppm: f64,
    pub rx_sec: f64,
    pub ry_sec: f64,
    pub rz_sec: f64,
}

impl HelmertTransform {
    /// The identity transform (used for WGS84 itself)
    pub const IDENTITY: Self = Self {
        tx: 0.0,
        ty: 0.0,
        tz: 0.0,
        s_ppm: 0.0,
        rx_sec: 0.0,
        ry_sec: 0.0,
        rz_sec: 0.0,
    };

    /// WGS84 → OSGB36
    pub const WGS84_TO_OSGB36: Self = Self {
        tx: -446.448,
        ty: 125.157,
        tz: -542.060,
        s_ppm: 20.4894,
        rx_sec: -0.1502,
        ry_sec: -0.2470,
        rz_sec: -0.8421,
    };

    /// Approximate inverse, obtained by negating every parameter.
    ///
    /// This is how the published OSGB36 → WGS84 transform is defined; the
    /// small-angle approximation is accurate to a few millimetres.
    pub const fn inverse(&self) -> Self {
        Self {
            tx: -self.tx,
            ty: -self.ty,
            tz: -self.tz,
            s_ppm: -self.s_ppm,
            rx_sec: -self.rx_sec,
            ry_sec: -self.ry_sec,
            rz_sec: -self.rz_sec,
        }
    }
}

/// Geodetic datums supported by the converter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Datum {
    /// Ordnance Survey Great Britain 1936 (Airy 1830 ellipsoid)
    Osgb36,
    /// World Geodetic System 1984
    Wgs84,
}

impl Datum {
    /// Ellipsoid the datum is defined on
    pub const fn ellipsoid(self) -> Ellipsoid {
        match self {
            Self::Osgb36 => Ellipsoid::AIRY_1830,
            Self::Wgs84 => Ellipsoid::WGS84,
        }
    }

    /// Transform taking WGS84 Cartesian coordinates into this datum
    pub const fn from_wgs84(self) -> HelmertTransform {
        match self {
            Self::Osgb36 => HelmertTransform::WGS84_TO_OSGB36,
            Self::Wgs84 => HelmertTransform::IDENTITY,
        }
    }

    /// Transform taking Cartesian coordinates on `self` onto `to`.
    ///
    /// Returns `None` when the datums are the same.
    pub fn transform_to(self, to: Datum) -> Option<HelmertTransform> {
        match (self, to) {
            (a, b) if a == b => None,
            (Self::Wgs84, target) => Some(target.from_wgs84()),
            (source, Self::Wgs84) => Some(source.from_wgs84().inverse()),
            // Only two datums exist, every other pair is covered above
            _ => None,
        }
    }
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Osgb36 => write!(f, "OSGB36"),
            Self::Wgs84 => write!(f, "WGS84"),
        }
    }
}

/// National Grid Transverse Mercator projection constants
pub mod national_grid {
    /// Scale factor on the central meridian
    pub const SCALE_FACTOR: f64 = 0.999_601_271_7;
    /// Latitude of true origin, degrees
    pub const TRUE_ORIGIN_LAT: f64 = 49.0;
    /// Longitude of true origin, degrees
    pub const TRUE_ORIGIN_LON: f64 = -2.0;
    /// Easting of true origin, metres
    pub const FALSE_EASTING: f64 = 400_000.0;
    /// Northing of true origin, metres
    pub const FALSE_NORTHING: f64 = -100_000.0;
    /// Largest valid easting, metres
    pub const MAX_EASTING: f64 = 700_000.0;
    /// Largest valid northing, metres
    pub const MAX_NORTHING: f64 = 1_300_000.0;
}
