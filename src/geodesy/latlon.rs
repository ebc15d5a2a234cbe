//! Geodetic latitude/longitude on a datum, and the forward National Grid
//! projection

use super::cartesian::Cartesian;
use super::datum::{national_grid, Datum, Ellipsoid};
use super::osgridref::{meridional_arc, GridRefError, OsGridRef};
use std::fmt;

/// Latitude/longitude in decimal degrees with ellipsoidal height in metres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
    pub height: f64,
    pub datum: Datum,
}

impl LatLon {
    /// Create a point at zero ellipsoidal height
    pub fn new(lat: f64, lon: f64, datum: Datum) -> Self {
        Self::with_height(lat, lon, 0.0, datum)
    }

    pub fn with_height(lat: f64, lon: f64, height: f64, datum: Datum) -> Self {
        Self {
            lat,
            lon,
            height,
            datum,
        }
    }

    /// Geocentric Cartesian coordinates on the same datum
    pub fn to_cartesian(&self) -> Cartesian {
        let ellipsoid = self.datum.ellipsoid();
        let (sin_phi, cos_phi) = self.lat.to_radians().sin_cos();
        let (sin_lambda, cos_lambda) = self.lon.to_radians().sin_cos();
        let e2 = ellipsoid.eccentricity_sq();
        let nu = ellipsoid.a / (1.0 - e2 * sin_phi * sin_phi).sqrt();

        Cartesian::new(
            (nu + self.height) * cos_phi * cos_lambda,
            (nu + self.height) * cos_phi * sin_lambda,
            (nu * (1.0 - e2) + self.height) * sin_phi,
            self.datum,
        )
    }

    /// Re-express this point on another datum via a Helmert transform
    pub fn convert_datum(&self, to: Datum) -> Self {
        if self.datum == to {
            return *self;
        }
        self.to_cartesian().convert_datum(to).to_lat_lon()
    }

    /// Round latitude and longitude to `places` decimal places
    pub fn rounded(&self, places: i32) -> Self {
        let factor = 10f64.powi(places);
        Self {
            lat: (self.lat * factor).round() / factor,
            lon: (self.lon * factor).round() / factor,
            ..*self
        }
    }

    /// Project onto the National Grid.
    ///
    /// Points not already on OSGB36 are converted first. Easting and northing
    /// are rounded to millimetres and must land inside the grid.
    pub fn to_os_grid(&self) -> Result<OsGridRef, GridRefError> {
        if !self.lat.is_finite() || !self.lon.is_finite() {
            return Err(GridRefError::OutsideGrid {
                lat: self.lat,
                lon: self.lon,
            });
        }

        let point = self.convert_datum(Datum::Osgb36);
        let phi = point.lat.to_radians();
        let lambda = point.lon.to_radians();

        let Ellipsoid { a, b, .. } = Ellipsoid::AIRY_1830;
        let f0 = national_grid::SCALE_FACTOR;
        let lambda0 = national_grid::TRUE_ORIGIN_LON.to_radians();
        let e2 = 1.0 - (b * b) / (a * a);

        let (sin_phi, cos_phi) = phi.sin_cos();
        let nu = a * f0 / (1.0 - e2 * sin_phi * sin_phi).sqrt();
        let rho = a * f0 * (1.0 - e2) / (1.0 - e2 * sin_phi * sin_phi).powf(1.5);
        let eta2 = nu / rho - 1.0;

        let m = meridional_arc(phi);

        let cos3 = cos_phi.powi(3);
        let cos5 = cos3 * cos_phi * cos_phi;
        let tan2 = phi.tan().powi(2);
        let tan4 = tan2 * tan2;

        let i = m + national_grid::FALSE_NORTHING;
        let ii = (nu / 2.0) * sin_phi * cos_phi;
        let iii = (nu / 24.0) * sin_phi * cos3 * (5.0 - tan2 + 9.0 * eta2);
        let iiia = (nu / 720.0) * sin_phi * cos5 * (61.0 - 58.0 * tan2 + tan4);
        let iv = nu * cos_phi;
        let v = (nu / 6.0) * cos3 * (nu / rho - tan2);
        let vi = (nu / 120.0)
            * cos5
            * (5.0 - 18.0 * tan2 + tan4 + 14.0 * eta2 - 58.0 * tan2 * eta2);

        let dl = lambda - lambda0;
        let (dl2, dl3) = (dl * dl, dl * dl * dl);
        let (dl4, dl5, dl6) = (dl3 * dl, dl3 * dl2, dl3 * dl3);

        let northing = i + ii * dl2 + iii * dl4 + iiia * dl6;
        let easting = national_grid::FALSE_EASTING + iv * dl + v * dl3 + vi * dl5;

        let northing = (northing * 1000.0).round() / 1000.0;
        let easting = (easting * 1000.0).round() / 1000.0;

        OsGridRef::new(easting, northing).map_err(|_| GridRefError::OutsideGrid {
            lat: self.lat,
            lon: self.lon,
        })
    }
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6} ({})", self.lat, self.lon, self.datum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Ordnance Survey worked example (guide annex C)
    const OS_LAT: f64 = 52.0 + 39.0 / 60.0 + 27.2531 / 3600.0;
    const OS_LON: f64 = 1.0 + 43.0 / 60.0 + 4.5177 / 3600.0;

    #[test]
    fn test_forward_projection_worked_example() {
        let p = LatLon::new(OS_LAT, OS_LON, Datum::Osgb36);
        let grid = p.to_os_grid().expect("inside grid");
        assert!((grid.easting() - 651_409.903).abs() < 0.01);
        assert!((grid.northing() - 313_177.270).abs() < 0.01);
    }

    #[test]
    fn test_rounding_to_six_places() {
        let p = LatLon::new(51.501_009_4, -0.141_587_7, Datum::Wgs84).rounded(6);
        assert_eq!(p.lat, 51.501_009);
        assert_eq!(p.lon, -0.141_588);
    }

    #[test]
    fn test_convert_datum_same_datum_is_identity() {
        let p = LatLon::new(52.0, -1.0, Datum::Wgs84);
        assert_eq!(p.convert_datum(Datum::Wgs84), p);
    }

    #[test]
    fn test_datum_shift_is_around_a_hundred_metres() {
        let p = LatLon::new(52.0, -1.0, Datum::Wgs84);
        let osgb = p.convert_datum(Datum::Osgb36);
        let dlat_m = (p.lat - osgb.lat).abs() * 111_000.0;
        let dlon_m = (p.lon - osgb.lon).abs() * 111_000.0 * 52f64.to_radians().cos();
        assert!(dlat_m > 10.0 && dlat_m < 200.0, "lat shift {dlat_m}");
        assert!(dlon_m > 10.0 && dlon_m < 200.0, "lon shift {dlon_m}");
    }

    #[test]
    fn test_non_finite_position_is_outside_grid() {
        let p = LatLon::new(f64::NAN, 0.0, Datum::Wgs84);
        assert!(matches!(
            p.to_os_grid(),
            Err(GridRefError::OutsideGrid { .. })
        ));
    }

    #[test]
    fn test_far_away_position_is_outside_grid() {
        // New York
        let p = LatLon::new(40.7128, -74.0060, Datum::Wgs84);
        assert!(p.to_os_grid().is_err());
    }
}
