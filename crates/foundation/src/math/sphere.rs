//! Unit-sphere geography.
//!
//! Latitude is the elevation angle and longitude the azimuth, both carried in
//! degrees at the API surface and converted to radians internally.

use serde::{Deserialize, Serialize};

use super::Vec3;

/// IUGG mean Earth radius (kilometers).
pub const EARTH_MEAN_RADIUS_KM: f64 = 6_371.008_8;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A labelled geographic point.
///
/// Construction clamps latitude into `[-90, 90]` and wraps longitude into
/// `(-180, 180]`; the point is immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "GeoPointRepr")]
pub struct GeoPoint {
    lat: f64,
    lng: f64,
    label: String,
}

#[derive(Deserialize)]
struct GeoPointRepr {
    lat: f64,
    lng: f64,
    #[serde(default)]
    label: String,
}

impl From<GeoPointRepr> for GeoPoint {
    fn from(repr: GeoPointRepr) -> Self {
        GeoPoint::new(repr.lat, repr.lng, repr.label)
    }
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64, label: impl Into<String>) -> Self {
        Self {
            lat: lat.clamp(-90.0, 90.0),
            lng: wrap_longitude(lng),
            label: label.into(),
        }
    }

    pub fn unlabeled(lat: f64, lng: f64) -> Self {
        Self::new(lat, lng, "")
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn lat_lng(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

/// Wrap a longitude in degrees into `(-180, 180]`.
pub fn wrap_longitude(lng: f64) -> f64 {
    let wrapped = (lng + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid lands in [0, 360), so the open end of the range needs folding.
    if wrapped <= -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

pub fn to_cartesian_unit(p: LatLng) -> Vec3 {
    let lat = p.lat.to_radians();
    let lng = p.lng.to_radians();
    let cos_lat = lat.cos();
    Vec3::new(cos_lat * lng.cos(), cos_lat * lng.sin(), lat.sin())
}

/// Inverse of [`to_cartesian_unit`]. The vector need not be unit length.
///
/// Returns `None` for the zero vector, which has no direction.
pub fn to_lat_lng(v: Vec3) -> Option<LatLng> {
    if v == Vec3::ZERO || !v.length().is_finite() {
        return None;
    }
    let lat = v.z.atan2(v.x.hypot(v.y)).to_degrees();
    let lng = wrap_longitude(v.y.atan2(v.x).to_degrees());
    Some(LatLng::new(lat, lng))
}

/// Great-circle angle between two points (radians, `[0, PI]`).
pub fn angular_distance(a: LatLng, b: LatLng) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let half_dlat = (lat_b - lat_a) * 0.5;
    let half_dlng = (b.lng - a.lng).to_radians() * 0.5;

    let h = half_dlat.sin().powi(2) + lat_a.cos() * lat_b.cos() * half_dlng.sin().powi(2);
    // Rounding can push h a hair above 1; asin is undefined there.
    2.0 * h.sqrt().min(1.0).asin()
}

/// Surface distance on a sphere of [`EARTH_MEAN_RADIUS_KM`].
pub fn surface_distance_km(a: LatLng, b: LatLng) -> f64 {
    angular_distance(a, b) * EARTH_MEAN_RADIUS_KM
}

pub fn antipode(p: LatLng) -> LatLng {
    LatLng::new(-p.lat, wrap_longitude(p.lng + 180.0))
}
