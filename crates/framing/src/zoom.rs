use crate::config::FramingConfig;

/// Altitude of the close framing for a given wide altitude.
pub fn compute_close_altitude(wide_altitude: f64, config: &FramingConfig) -> f64 {
    (wide_altitude - config.close_altitude_delta).max(config.close_altitude)
}

/// Interpolate from `wide_altitude` (progress 0) to `close_altitude` (progress 1).
///
/// Progress outside `[0, 1]` is clamped and NaN counts as 0. Both endpoints are
/// returned exactly and the result never moves against the direction of travel.
pub fn altitude_at(wide_altitude: f64, close_altitude: f64, progress: f64) -> f64 {
    let t = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };
    if t >= 1.0 {
        return close_altitude;
    }

    let lo = close_altitude.min(wide_altitude);
    let hi = close_altitude.max(wide_altitude);
    (wide_altitude - (wide_altitude - close_altitude) * t).max(lo).min(hi)
}

/// Whether moving the camera from `last_applied` to `next` is worth a write.
pub fn exceeds_epsilon(last_applied: Option<f64>, next: f64, epsilon: f64) -> bool {
    match last_applied {
        Some(last) => (next - last).abs() >= epsilon,
        None => true,
    }
}
