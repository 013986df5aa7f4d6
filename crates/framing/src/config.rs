use std::path::Path;

use foundation::math::{GeoPoint, LatLng};
use serde::{Deserialize, Serialize};

/// Most zoomed-out camera altitude (globe radii above the surface).
pub const FAR_ALTITUDE: f64 = 2.6;
/// Most zoomed-in camera altitude.
pub const CLOSE_ALTITUDE: f64 = 0.9;
/// Extra altitude above [`CLOSE_ALTITUDE`] when framing a single point.
pub const SINGLE_POINT_MARGIN: f64 = 0.4;
/// How far the close framing sits below the wide one.
pub const CLOSE_ALTITUDE_DELTA: f64 = 1.1;
/// Share of the altitude range used even for tightly clustered points.
pub const SPREAD_FLOOR: f64 = 0.35;
/// Share of the altitude range scaled in by angular spread.
pub const SPREAD_WEIGHT: f64 = 0.65;
/// Altitude changes smaller than this are not written to the camera.
pub const UPDATE_EPSILON: f64 = 0.0005;
/// Centroid vectors at or below this length are treated as cancelled out.
pub const DEGENERATE_EPSILON: f64 = 1e-9;
/// Center used when there is nothing to frame or the centroid is undefined.
pub const DEFAULT_CENTER: LatLng = LatLng::new(20.0, 0.0);
/// Animation length when the base framing changes after first paint.
pub const REFRAME_TRANSITION_MS: u32 = 1000;

/// Tunables for framing and zoom.
///
/// `Default` uses the module constants; a JSON document may override any
/// subset of fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FramingConfig {
    pub far_altitude: f64,
    pub close_altitude: f64,
    pub single_point_margin: f64,
    pub close_altitude_delta: f64,
    pub spread_floor: f64,
    pub spread_weight: f64,
    pub update_epsilon: f64,
    pub degenerate_epsilon: f64,
    pub default_center: LatLng,
    pub reframe_transition_ms: u32,
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            far_altitude: FAR_ALTITUDE,
            close_altitude: CLOSE_ALTITUDE,
            single_point_margin: SINGLE_POINT_MARGIN,
            close_altitude_delta: CLOSE_ALTITUDE_DELTA,
            spread_floor: SPREAD_FLOOR,
            spread_weight: SPREAD_WEIGHT,
            update_epsilon: UPDATE_EPSILON,
            degenerate_epsilon: DEGENERATE_EPSILON,
            default_center: DEFAULT_CENTER,
            reframe_transition_ms: REFRAME_TRANSITION_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "framing config unreadable: {msg}"),
            ConfigError::Parse(msg) => write!(f, "framing config malformed: {msg}"),
            ConfigError::Invalid(msg) => write!(f, "framing config invalid: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl FramingConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    /// Reject values that would break the altitude invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("far_altitude", self.far_altitude),
            ("close_altitude", self.close_altitude),
            ("single_point_margin", self.single_point_margin),
            ("close_altitude_delta", self.close_altitude_delta),
            ("spread_floor", self.spread_floor),
            ("spread_weight", self.spread_weight),
            ("update_epsilon", self.update_epsilon),
            ("degenerate_epsilon", self.degenerate_epsilon),
            ("default_center.lat", self.default_center.lat),
            ("default_center.lng", self.default_center.lng),
        ];
        for (name, v) in finite {
            if !v.is_finite() {
                return Err(ConfigError::Invalid(format!("{name} must be finite, got {v}")));
            }
        }

        if self.close_altitude < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "close_altitude must be non-negative, got {}",
                self.close_altitude
            )));
        }
        if self.close_altitude > self.far_altitude {
            return Err(ConfigError::Invalid(format!(
                "close_altitude {} exceeds far_altitude {}",
                self.close_altitude, self.far_altitude
            )));
        }

        let non_negative = [
            ("single_point_margin", self.single_point_margin),
            ("close_altitude_delta", self.close_altitude_delta),
            ("update_epsilon", self.update_epsilon),
            ("degenerate_epsilon", self.degenerate_epsilon),
        ];
        for (name, v) in non_negative {
            if v < 0.0 {
                return Err(ConfigError::Invalid(format!("{name} must be non-negative, got {v}")));
            }
        }

        let unit = [("spread_floor", self.spread_floor), ("spread_weight", self.spread_weight)];
        for (name, v) in unit {
            if !(0.0..=1.0).contains(&v) {
                return Err(ConfigError::Invalid(format!("{name} must lie in [0, 1], got {v}")));
            }
        }

        if !(-90.0..=90.0).contains(&self.default_center.lat) {
            return Err(ConfigError::Invalid(format!(
                "default_center.lat must lie in [-90, 90], got {}",
                self.default_center.lat
            )));
        }
        if self.default_center.lng <= -180.0 || self.default_center.lng > 180.0 {
            return Err(ConfigError::Invalid(format!(
                "default_center.lng must lie in (-180, 180], got {}",
                self.default_center.lng
            )));
        }

        Ok(())
    }
}

/// The two points the site frames out of the box.
pub fn default_points() -> Vec<GeoPoint> {
    vec![
        GeoPoint::new(45.815, 15.9819, "Zagreb"),
        GeoPoint::new(37.7749, -122.4194, "San Francisco"),
    ]
}
