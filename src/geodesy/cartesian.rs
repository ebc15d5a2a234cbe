//! Earth-centred, earth-fixed Cartesian coordinates

use super::datum::{Datum, HelmertTransform};
use super::latlon::LatLon;

/// Geocentric Cartesian position in metres, tied to a datum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cartesian {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub datum: Datum,
}

impl Cartesian {
    pub fn new(x: f64, y: f64, z: f64, datum: Datum) -> Self {
        Self { x, y, z, datum }
    }

    /// Apply a Helmert transform, relabelling the result with `datum`.
    pub fn apply_transform(&self, t: &HelmertTransform, datum: Datum) -> Self {
        let s = t.s_ppm / 1e6 + 1.0;
        let rx = (t.rx_sec / 3600.0).to_radians();
        let ry = (t.ry_sec / 3600.0).to_radians();
        let rz = (t.rz_sec / 3600.0).to_radians();

        let (x1, y1, z1) = (self.x, self.y, self.z);
        Self {
            x: t.tx + x1 * s - y1 * rz + z1 * ry,
            y: t.ty + x1 * rz + y1 * s - z1 * rx,
            z: t.tz - x1 * ry + y1 * rx + z1 * s,
            datum,
        }
    }

    /// Convert to another datum. Same-datum conversion is a no-op.
    pub fn convert_datum(&self, to: Datum) -> Self {
        match self.datum.transform_to(to) {
            Some(t) => self.apply_transform(&t, to),
            None => *self,
        }
    }

    /// Geodetic latitude/longitude/height on this position's datum.
    ///
    /// Uses Bowring's method, which is accurate to well below a millimetre
    /// for points near the Earth's surface.
    pub fn to_lat_lon(&self) -> LatLon {
        let ellipsoid = self.datum.ellipsoid();
        let (a, b) = (ellipsoid.a, ellipsoid.b);
        let e2 = ellipsoid.eccentricity_sq();
        let eps2 = e2 / (1.0 - e2);

        let p = (self.x * self.x + self.y * self.y).sqrt();
        let r = (p * p + self.z * self.z).sqrt();

        let tan_beta = (b * self.z) / (a * p) * (1.0 + eps2 * b / r);
        let sin_beta = tan_beta / (1.0 + tan_beta * tan_beta).sqrt();
        let cos_beta = sin_beta / tan_beta;

        // cos_beta is NaN on the polar axis
        let phi = if cos_beta.is_nan() {
            0.0
        } else {
            (self.z + eps2 * b * sin_beta.powi(3)).atan2(p - e2 * a * cos_beta.powi(3))
        };
        let lambda = self.y.atan2(self.x);

        let (sin_phi, cos_phi) = phi.sin_cos();
        let nu = a / (1.0 - e2 * sin_phi * sin_phi).sqrt();
        let height = p * cos_phi + self.z * sin_phi - (a * a / nu);

        LatLon::with_height(phi.to_degrees(), lambda.to_degrees(), height, self.datum)
    }
}
