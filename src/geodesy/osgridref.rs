//! Ordnance Survey National Grid references
//!
//! An [`OsGridRef`] is an easting/northing pair in metres on the OSGB36
//! Transverse Mercator projection. It formats as a two-letter 100 km square
//! identifier followed by the easting and northing within that square, and
//! converts back to geodetic latitude/longitude on OSGB36 or WGS84.
//!
//! # Letter scheme
//!
//! ```text
//! first letter  : 500 km square (H J / N O / S T cover Great Britain)
//! second letter : 100 km square within it, 5x5 grid A..Z without I
//! ```

use super::datum::{national_grid, Datum, Ellipsoid};
use super::latlon::LatLon;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default number of digits in a formatted reference (5 + 5, 1 metre)
pub const DEFAULT_DIGITS: u8 = 10;

/// Stop iterating the inverse projection once the arc residual is below
/// this many metres (0.01 mm)
const ARC_TOLERANCE_M: f64 = 0.000_01;

/// Bound on inverse-projection iterations; convergence takes a handful
const MAX_ITERATIONS: usize = 100;

/// Errors from constructing, parsing or formatting grid references
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridRefError {
    #[error("invalid easting '{0}' (must be between 0 and 700000 metres)")]
    InvalidEasting(f64),

    #[error("invalid northing '{0}' (must be between 0 and 1300000 metres)")]
    InvalidNorthing(f64),

    #[error("invalid grid reference '{0}'")]
    InvalidFormat(String),

    #[error("invalid precision '{0}' (must be an even number of digits from 0 to 10)")]
    InvalidPrecision(u8),

    #[error("position ({lat:.6}, {lon:.6}) lies outside the National Grid")]
    OutsideGrid { lat: f64, lon: f64 },

    #[error("inverse projection did not converge for ({easting}, {northing})")]
    NoConvergence { easting: f64, northing: f64 },
}

/// A validated National Grid easting/northing pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OsGridRef {
    easting: f64,
    northing: f64,
}

impl OsGridRef {
    /// Create a grid reference.
    ///
    /// # Errors
    ///
    /// Either coordinate is non-finite or outside the grid
    /// (0..=700000 east, 0..=1300000 north).
    pub fn new(easting: f64, northing: f64) -> Result<Self, GridRefError> {
        if !easting.is_finite() || !(0.0..=national_grid::MAX_EASTING).contains(&easting) {
            return Err(GridRefError::InvalidEasting(easting));
        }
        if !northing.is_finite() || !(0.0..=national_grid::MAX_NORTHING).contains(&northing) {
            return Err(GridRefError::InvalidNorthing(northing));
        }
        Ok(Self { easting, northing })
    }

    #[inline]
    pub fn easting(&self) -> f64 {
        self.easting
    }

    #[inline]
    pub fn northing(&self) -> f64 {
        self.northing
    }

    /// Two-letter identifier of the 100 km square containing this point
    pub fn square_letters(&self) -> String {
        let e100km = (self.easting / 100_000.0).floor() as i32;
        let n100km = (self.northing / 100_000.0).floor() as i32;

        let mut l1 = (19 - n100km) - (19 - n100km) % 5 + (e100km + 10) / 5;
        let mut l2 = (19 - n100km) * 5 % 25 + e100km % 5;

        // 'I' is not used
        if l1 > 7 {
            l1 += 1;
        }
        if l2 > 7 {
            l2 += 1;
        }

        [l1, l2]
            .iter()
            .map(|l| char::from(b'A' + *l as u8))
            .collect()
    }

    /// Format with the given number of digits.
    ///
    /// `digits` must be even and at most 10. Zero produces the fully numeric
    /// `"easting,northing"` form in metres, kept to the millimetre with
    /// trailing zeros dropped and each integer part padded to at least six
    /// digits (`"530047,180339"`, `"651409.903,1140000"`). Otherwise the
    /// result is `"<letters> <easting> <northing>"` with each part truncated
    /// (not rounded) to `digits / 2` digits.
    pub fn format(&self, digits: u8) -> Result<String, GridRefError> {
        if digits > 10 || digits % 2 != 0 {
            return Err(GridRefError::InvalidPrecision(digits));
        }

        if digits == 0 {
            return Ok(format!(
                "{},{}",
                numeric_metres(self.easting),
                numeric_metres(self.northing)
            ));
        }

        let half = u32::from(digits / 2);
        let divisor = 10f64.powi(5 - half as i32);
        let e = ((self.easting % 100_000.0) / divisor).floor() as u64;
        let n = ((self.northing % 100_000.0) / divisor).floor() as u64;
        let width = half as usize;

        Ok(format!(
            "{} {:0width$} {:0width$}",
            self.square_letters(),
            e,
            n,
            width = width
        ))
    }

    /// Parse a grid reference.
    ///
    /// Accepts letter references with 2 to 10 digits, with or without
    /// separating whitespace and in any case (`"TQ 30047 80339"`,
    /// `"tq3004780339"`, `"SU 1 2"`), as well as numeric
    /// `"easting,northing"` references. Short references are expanded to
    /// metres by padding with zeros.
    pub fn parse(input: &str) -> Result<Self, GridRefError> {
        let trimmed = input.trim();
        let invalid = || GridRefError::InvalidFormat(trimmed.to_string());

        if let Some((e, n)) = trimmed.split_once(',') {
            let (e, n) = (e.trim(), n.trim());
            if !is_decimal_metres(e) || !is_decimal_metres(n) {
                return Err(invalid());
            }
            let easting: f64 = e.parse().map_err(|_| invalid())?;
            let northing: f64 = n.parse().map_err(|_| invalid())?;
            return Self::new(easting, northing);
        }

        let upper = trimmed.to_ascii_uppercase();
        let mut chars = upper.chars();
        let (Some(c1), Some(c2)) = (chars.next(), chars.next()) else {
            return Err(invalid());
        };
        if !matches!(c1, 'H' | 'J' | 'N' | 'O' | 'S' | 'T') || !c2.is_ascii_uppercase() || c2 == 'I'
        {
            return Err(invalid());
        }

        let rest: Vec<&str> = upper[2..].split_whitespace().collect();
        if !rest.iter().all(|part| part.bytes().all(|b| b.is_ascii_digit())) {
            return Err(invalid());
        }
        let (e_digits, n_digits) = match rest.as_slice() {
            [both] => both.split_at(both.len() / 2),
            [e, n] => (*e, *n),
            _ => return Err(invalid()),
        };
        if e_digits.is_empty()
            || e_digits.len() != n_digits.len()
            || e_digits.len() > 5
        {
            return Err(invalid());
        }

        let mut l1 = i32::from(c1 as u8 - b'A');
        let mut l2 = i32::from(c2 as u8 - b'A');
        if l1 > 7 {
            l1 -= 1;
        }
        if l2 > 7 {
            l2 -= 1;
        }

        let e100km = ((l1 - 2) % 5) * 5 + l2 % 5;
        let n100km = (19 - (l1 / 5) * 5) - l2 / 5;

        let e_metres: u32 = format!("{e_digits:0<5}").parse().map_err(|_| invalid())?;
        let n_metres: u32 = format!("{n_digits:0<5}").parse().map_err(|_| invalid())?;

        Self::new(
            f64::from(e100km) * 100_000.0 + f64::from(e_metres),
            f64::from(n100km) * 100_000.0 + f64::from(n_metres),
        )
    }

    /// Convert to latitude/longitude on `datum`.
    ///
    /// Inverts the OSGB36 Transverse Mercator projection, then, for datums
    /// other than OSGB36, applies the Helmert transform.
    pub fn to_lat_lon(&self, datum: Datum) -> Result<LatLon, GridRefError> {
        let Ellipsoid { a, b, .. } = Ellipsoid::AIRY_1830;
        let f0 = national_grid::SCALE_FACTOR;
        let phi0 = national_grid::TRUE_ORIGIN_LAT.to_radians();
        let lambda0 = national_grid::TRUE_ORIGIN_LON.to_radians();
        let e0 = national_grid::FALSE_EASTING;
        let n0 = national_grid::FALSE_NORTHING;
        let e2 = 1.0 - (b * b) / (a * a);

        let (easting, northing) = (self.easting, self.northing);

        let mut phi = phi0;
        let mut m = 0.0;
        let mut converged = false;
        for _ in 0..MAX_ITERATIONS {
            phi += (northing - n0 - m) / (a * f0);
            m = meridional_arc(phi);
            if (northing - n0 - m).abs() < ARC_TOLERANCE_M {
                converged = true;
                break;
            }
        }
        if !converged {
            return Err(GridRefError::NoConvergence { easting, northing });
        }

        let (sin_phi, cos_phi) = phi.sin_cos();
        let nu = a * f0 / (1.0 - e2 * sin_phi * sin_phi).sqrt();
        let rho = a * f0 * (1.0 - e2) / (1.0 - e2 * sin_phi * sin_phi).powf(1.5);
        let eta2 = nu / rho - 1.0;

        let tan_phi = phi.tan();
        let tan2 = tan_phi * tan_phi;
        let tan4 = tan2 * tan2;
        let tan6 = tan4 * tan2;
        let sec_phi = 1.0 / cos_phi;
        let nu3 = nu * nu * nu;
        let nu5 = nu3 * nu * nu;
        let nu7 = nu5 * nu * nu;

        let vii = tan_phi / (2.0 * rho * nu);
        let viii = tan_phi / (24.0 * rho * nu3) * (5.0 + 3.0 * tan2 + eta2 - 9.0 * tan2 * eta2);
        let ix = tan_phi / (720.0 * rho * nu5) * (61.0 + 90.0 * tan2 + 45.0 * tan4);
        let x = sec_phi / nu;
        let xi = sec_phi / (6.0 * nu3) * (nu / rho + 2.0 * tan2);
        let xii = sec_phi / (120.0 * nu5) * (5.0 + 28.0 * tan2 + 24.0 * tan4);
        let xiia = sec_phi / (5040.0 * nu7) * (61.0 + 662.0 * tan2 + 1320.0 * tan4 + 720.0 * tan6);

        let de = easting - e0;
        let de2 = de * de;
        let de3 = de2 * de;
        let de4 = de2 * de2;
        let de5 = de3 * de2;
        let de6 = de4 * de2;
        let de7 = de5 * de2;

        let lat = phi - vii * de2 + viii * de4 - ix * de6;
        let lon = lambda0 + x * de - xi * de3 + xii * de5 - xiia * de7;

        let osgb = LatLon::new(lat.to_degrees(), lon.to_degrees(), Datum::Osgb36);
        Ok(osgb.convert_datum(datum))
    }
}

/// Meridional arc from the true origin latitude to `phi` (radians),
/// scaled onto the National Grid.
pub(crate) fn meridional_arc(phi: f64) -> f64 {
    let Ellipsoid { a, b, .. } = Ellipsoid::AIRY_1830;
    let f0 = national_grid::SCALE_FACTOR;
    let phi0 = national_grid::TRUE_ORIGIN_LAT.to_radians();

    let n = (a - b) / (a + b);
    let n2 = n * n;
    let n3 = n2 * n;

    let dphi = phi - phi0;
    let sphi = phi + phi0;

    let ma = (1.0 + n + (5.0 / 4.0) * n2 + (5.0 / 4.0) * n3) * dphi;
    let mb = (3.0 * n + 3.0 * n * n + (21.0 / 8.0) * n3) * dphi.sin() * sphi.cos();
    let mc = ((15.0 / 8.0) * n2 + (15.0 / 8.0) * n3) * (2.0 * dphi).sin() * (2.0 * sphi).cos();
    let md = (35.0 / 24.0) * n3 * (3.0 * dphi).sin() * (3.0 * sphi).cos();

    b * f0 * (ma - mb + mc - md)
}

/// Non-negative metres to the millimetre, integer part at least six digits
fn numeric_metres(metres: f64) -> String {
    let millimetres = (metres * 1000.0).round() as u64;
    let (whole, frac) = (millimetres / 1000, millimetres % 1000);
    if frac == 0 {
        format!("{whole:06}")
    } else {
        let frac = format!("{frac:03}");
        format!("{whole:06}.{}", frac.trim_end_matches('0'))
    }
}

/// `123456` or `123456.789`
fn is_decimal_metres(s: &str) -> bool {
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    match s.split_once('.') {
        Some((whole, frac)) => all_digits(whole) && all_digits(frac),
        None => all_digits(s),
    }
}

impl fmt::Display for OsGridRef {
    /// Ten-digit (1 metre) reference
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.format(DEFAULT_DIGITS) {
            Ok(s) => f.write_str(&s),
            Err(_) => Err(fmt::Error),
        }
    }
}

impl FromStr for OsGridRef {
    type Err = GridRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(OsGridRef::new(-1.0, 0.0).is_err());
        assert!(OsGridRef::new(0.0, -1.0).is_err());
        assert!(OsGridRef::new(700_001.0, 0.0).is_err());
        assert!(OsGridRef::new(0.0, 1_300_001.0).is_err());
        assert!(matches!(
            OsGridRef::new(f64::NAN, 0.0),
            Err(GridRefError::InvalidEasting(_))
        ));
        assert!(matches!(
            OsGridRef::new(0.0, f64::INFINITY),
            Err(GridRefError::InvalidNorthing(_))
        ));
    }

    #[test]
    fn test_new_accepts_grid_bounds() {
        assert!(OsGridRef::new(0.0, 0.0).is_ok());
        assert!(OsGridRef::new(700_000.0, 1_300_000.0).is_ok());
    }

    #[test]
    fn test_format_small_values_in_sv() {
        let g = OsGridRef::new(533.0, 180.0).unwrap();
        assert_eq!(g.to_string(), "SV 00533 00180");
    }

    #[test]
    fn test_format_known_squares() {
        let cases = [
            (529_090.0, 179_645.0, "TQ 29090 79645"),
            (651_409.0, 313_177.0, "TG 51409 13177"),
            (325_903.0, 673_931.0, "NT 25903 73931"),
            (216_666.0, 771_288.0, "NN 16666 71288"),
            (440_000.0, 1_140_000.0, "HU 40000 40000"),
        ];
        for (e, n, expected) in cases {
            let g = OsGridRef::new(e, n).unwrap();
            assert_eq!(g.to_string(), expected);
        }
    }

    #[test]
    fn test_format_precisions() {
        let g = OsGridRef::new(530_047.0, 180_339.0).unwrap();
        assert_eq!(g.format(10).unwrap(), "TQ 30047 80339");
        assert_eq!(g.format(8).unwrap(), "TQ 3004 8033");
        assert_eq!(g.format(6).unwrap(), "TQ 300 803");
        assert_eq!(g.format(2).unwrap(), "TQ 3 8");
        assert_eq!(g.format(0).unwrap(), "530047,180339");
        assert_eq!(g.format(3), Err(GridRefError::InvalidPrecision(3)));
        assert_eq!(g.format(12), Err(GridRefError::InvalidPrecision(12)));
    }

    #[test]
    fn test_numeric_format_keeps_millimetres() {
        let g = OsGridRef::new(651_409.903, 313_177.27).unwrap();
        assert_eq!(g.format(0).unwrap(), "651409.903,313177.27");
        assert_eq!(OsGridRef::parse("651409.903,313177.27").unwrap(), g);

        let shetland = OsGridRef::new(440_000.0, 1_140_000.0).unwrap();
        assert_eq!(shetland.format(0).unwrap(), "440000,1140000");

        let origin = OsGridRef::new(1.5, 0.0).unwrap();
        assert_eq!(origin.format(0).unwrap(), "000001.5,000000");
    }

    #[test]
    fn test_parse_rejects_malformed_numeric() {
        for bad in ["1.2.3,4", ".5,100", "100,5.", "1e5,100", "-1,100"] {
            assert!(OsGridRef::parse(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_format_truncates_fractional_metres() {
        let g = OsGridRef::new(651_409.903, 313_177.270).unwrap();
        assert_eq!(g.to_string(), "TG 51409 13177");
    }

    #[test]
    fn test_parse_variants() {
        let expected = OsGridRef::new(530_047.0, 180_339.0).unwrap();
        assert_eq!(OsGridRef::parse("TQ 30047 80339").unwrap(), expected);
        assert_eq!(OsGridRef::parse("tq3004780339").unwrap(), expected);
        assert_eq!(OsGridRef::parse("  TQ 30047   80339 ").unwrap(), expected);
        assert_eq!(OsGridRef::parse("530047,180339").unwrap(), expected);
        assert_eq!(OsGridRef::parse("530047, 180339").unwrap(), expected);
    }

    #[test]
    fn test_parse_short_reference_pads_to_metres() {
        let g = OsGridRef::parse("SU 1 2").unwrap();
        assert_eq!(g.easting(), 410_000.0);
        assert_eq!(g.northing(), 120_000.0);

        let g: OsGridRef = "TQ 300 803".parse().unwrap();
        assert_eq!(g.easting(), 530_000.0);
        assert_eq!(g.northing(), 180_300.0);
    }

    #[test]
    fn test_parse_northern_squares() {
        let g = OsGridRef::parse("HU 40000 40000").unwrap();
        assert_eq!(g.easting(), 440_000.0);
        assert_eq!(g.northing(), 1_140_000.0);

        // Squares east of 500 km use J and O as first letter
        let g = OsGridRef::new(550_000.0, 1_250_000.0).unwrap();
        let s = g.to_string();
        assert!(s.starts_with('J'), "{s}");
        assert_eq!(OsGridRef::parse(&s).unwrap(), g);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in [
            "",
            "T",
            "XX 123 456",
            "TI 123 456",
            "TQ 123 45",
            "TQ 123456 123456",
            "TQ ABC DEF",
            "TQ 1 2 3",
            "TQ",
            ",123",
            "12a,34",
        ] {
            assert!(OsGridRef::parse(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_inverse_projection_worked_example() {
        // Ordnance Survey worked example: TG 51409 13177 on OSGB36
        let g = OsGridRef::new(651_409.903, 313_177.270).unwrap();
        let p = g.to_lat_lon(Datum::Osgb36).unwrap();
        let lat = 52.0 + 39.0 / 60.0 + 27.2531 / 3600.0;
        let lon = 1.0 + 43.0 / 60.0 + 4.5177 / 3600.0;
        assert!((p.lat - lat).abs() < 1e-7, "lat {}", p.lat);
        assert!((p.lon - lon).abs() < 1e-7, "lon {}", p.lon);
    }

    #[test]
    fn test_to_wgs84_worked_example() {
        // 52°39′28.72″N, 001°42′57.79″E
        let g = OsGridRef::new(651_409.903, 313_177.270).unwrap();
        let p = g.to_lat_lon(Datum::Wgs84).unwrap();
        let lat = 52.0 + 39.0 / 60.0 + 28.72 / 3600.0;
        let lon = 1.0 + 42.0 / 60.0 + 57.79 / 3600.0;
        assert!((p.lat - lat).abs() < 1e-5, "lat {}", p.lat);
        assert!((p.lon - lon).abs() < 1e-5, "lon {}", p.lon);
        assert_eq!(p.datum, Datum::Wgs84);
    }

    #[test]
    fn test_grid_lat_lon_round_trip() {
        let g = OsGridRef::new(529_090.0, 179_645.0).unwrap();
        let back = g.to_lat_lon(Datum::Wgs84).unwrap().to_os_grid().unwrap();
        assert!((back.easting() - g.easting()).abs() < 0.1);
        assert!((back.northing() - g.northing()).abs() < 0.1);
    }

    #[test]
    fn test_meridional_arc_zero_at_origin() {
        let m = meridional_arc(national_grid::TRUE_ORIGIN_LAT.to_radians());
        assert!(m.abs() < 1e-9);
    }
}
