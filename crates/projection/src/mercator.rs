//! Spherical Mercator as written by Lowrance/Humminbird units.
//!
//! Fish finders store positions as integer meters on a sphere whose radius is
//! the WGS84 polar radius (6356752.3142 m), not the equatorial radius used by
//! Web Mercator. Both axes share the same origin: raw `0` is the intersection
//! of the equator and the prime meridian.
//!
//! Reference: <http://www.oziexplorer3.com/eng/eagle.html>

use std::f64::consts::PI;

/// Sphere radius used by the vendor projection (WGS84 semi-minor axis, meters).
pub const EARTH_RADIUS: f64 = 6356752.3142;

const RAD_TO_DEG: f64 = 180.0 / PI;

/// Convert a raw easting to longitude in degrees.
pub fn to_longitude(raw: i32) -> f64 {
    VendorMercator::default().longitude(raw as f64)
}

/// Convert a raw northing to latitude in degrees.
pub fn to_latitude(raw: i32) -> f64 {
    VendorMercator::default().latitude(raw as f64)
}

/// Convert a longitude in degrees to the nearest raw easting.
pub fn from_longitude(lon_deg: f64) -> i32 {
    VendorMercator::default().easting(lon_deg).round() as i32
}

/// Convert a latitude in degrees to the nearest raw northing.
pub fn from_latitude(lat_deg: f64) -> i32 {
    VendorMercator::default().northing(lat_deg).round() as i32
}

/// Vendor Mercator projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VendorMercator {
    /// Sphere radius in meters
    pub earth_radius: f64,
}

impl Default for VendorMercator {
    fn default() -> Self {
        Self {
            earth_radius: EARTH_RADIUS,
        }
    }
}

impl VendorMercator {
    pub fn new(earth_radius: f64) -> Self {
        Self { earth_radius }
    }

    /// Longitude (degrees) of a projected easting (meters).
    pub fn longitude(&self, easting: f64) -> f64 {
        easting / self.earth_radius * RAD_TO_DEG
    }

    /// Latitude (degrees) of a projected northing (meters).
    ///
    /// Inverse Gudermannian: `2·atan(exp(y/R)) − π/2`.
    pub fn latitude(&self, northing: f64) -> f64 {
        let t = (northing / self.earth_radius).exp();
        (2.0 * t.atan() - PI / 2.0) * RAD_TO_DEG
    }

    /// Projected easting (meters) of a longitude in degrees.
    pub fn easting(&self, lon_deg: f64) -> f64 {
        lon_deg / RAD_TO_DEG * self.earth_radius
    }

    /// Projected northing (meters) of a latitude in degrees.
    pub fn northing(&self, lat_deg: f64) -> f64 {
        let lat = lat_deg / RAD_TO_DEG;
        (PI / 4.0 + lat / 2.0).tan().ln() * self.earth_radius
    }

    /// Convert a raw (easting, northing) pair to (lat, lon) in degrees.
    pub fn to_geo(&self, easting: f64, northing: f64) -> (f64, f64) {
        (self.latitude(northing), self.longitude(easting))
    }

    /// Convert (lat, lon) in degrees to a raw (easting, northing) pair.
    pub fn from_geo(&self, lat_deg: f64, lon_deg: f64) -> (f64, f64) {
        (self.easting(lon_deg), self.northing(lat_deg))
    }
}
