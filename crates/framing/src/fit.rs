use std::f64::consts::FRAC_PI_2;

use foundation::math::{GeoPoint, LatLng, Vec3, angular_distance, to_cartesian_unit, to_lat_lng};
use serde::{Deserialize, Serialize};

use crate::config::FramingConfig;

/// Where the camera looks and how far out it sits to keep every point visible.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct FramingResult {
    pub center: LatLng,
    pub wide_altitude: f64,
}

/// Normalized sum of the points' unit vectors.
///
/// Returns `None` when the sum cancels out to (nearly) nothing, e.g. for two
/// antipodal points, since the direction is then undefined.
pub fn spherical_centroid(points: &[GeoPoint], degenerate_epsilon: f64) -> Option<LatLng> {
    let sum: Vec3 = points.iter().map(|p| to_cartesian_unit(p.lat_lng())).sum();
    let unit = sum.try_normalize(degenerate_epsilon)?;
    to_lat_lng(unit)
}

/// Largest angular distance (radians) from `center` to any of `points`.
pub fn angular_spread(center: LatLng, points: &[GeoPoint]) -> f64 {
    points
        .iter()
        .map(|p| angular_distance(center, p.lat_lng()))
        .fold(0.0, f64::max)
}

/// Keep `altitude` between the close and far limits.
///
/// Unlike `f64::clamp` this tolerates a config whose limits are swapped or NaN
/// (possible when fields are set in code without `validate`): the bounds are
/// ordered first and NaN bounds are ignored.
fn within_limits(altitude: f64, config: &FramingConfig) -> f64 {
    let lo = config.close_altitude.min(config.far_altitude);
    let hi = config.close_altitude.max(config.far_altitude);
    altitude.max(lo).min(hi)
}

/// Frame `points`: centroid on the sphere plus an altitude proportional to how
/// far the points spread from it.
///
/// The result does not depend on point order.
pub fn compute_framing(points: &[GeoPoint], config: &FramingConfig) -> FramingResult {
    match points {
        [] => FramingResult {
            center: config.default_center,
            wide_altitude: config.far_altitude,
        },
        [only] => FramingResult {
            center: only.lat_lng(),
            wide_altitude: within_limits(config.close_altitude + config.single_point_margin, config),
        },
        _ => {
            let center = spherical_centroid(points, config.degenerate_epsilon).unwrap_or_else(|| {
                tracing::debug!(
                    count = points.len(),
                    "point vectors cancel out, framing around default center"
                );
                config.default_center
            });

            let spread = angular_spread(center, points);
            let ratio = (spread / FRAC_PI_2).clamp(0.0, 1.0);
            let weight = (config.spread_floor + config.spread_weight * ratio).clamp(0.0, 1.0);
            // close + (far - close) * weight, written so both ends are exact.
            let wide_altitude = within_limits(
                config.close_altitude * (1.0 - weight) + config.far_altitude * weight,
                config,
            );

            FramingResult {
                center,
                wide_altitude,
            }
        }
    }
}
