//! Helpers behind the `framer` command-line tool.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use foundation::math::{GeoPoint, angular_distance, surface_distance_km};
use framing::{
    ApplyOutcome, CameraRig, FramingConfig, FramingResult, RecordingSink, angular_spread,
    compute_close_altitude, compute_framing, default_points,
};
use runtime::Frame;
use serde::Serialize;

/// Environment variable naming a config file used when `--config` is absent.
pub const CONFIG_ENV: &str = "FRAMER_CONFIG";

/// Parse `lat,lng[,label]` (degrees). The label may itself contain commas.
pub fn parse_point(s: &str) -> Result<GeoPoint, String> {
    let mut parts = s.splitn(3, ',');
    let lat = parse_coord(parts.next(), "latitude", s)?;
    let lng = parse_coord(parts.next(), "longitude", s)?;
    let label = parts.next().map(str::trim).unwrap_or("");

    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("latitude {lat} out of range [-90, 90] in {s:?}"));
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err(format!("longitude {lng} out of range [-180, 180] in {s:?}"));
    }
    Ok(GeoPoint::new(lat, lng, label))
}

fn parse_coord(part: Option<&str>, what: &str, input: &str) -> Result<f64, String> {
    let raw = part
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| format!("missing {what} in {input:?} (expected lat,lng[,label])"))?;
    let v: f64 = raw
        .parse()
        .map_err(|e| format!("bad {what} {raw:?} in {input:?}: {e}"))?;
    if !v.is_finite() {
        return Err(format!("{what} must be finite in {input:?}"));
    }
    Ok(v)
}

/// Read a JSON array of `{ "lat": .., "lng": .., "label": .. }` objects.
pub fn load_points_file(path: &Path) -> Result<Vec<GeoPoint>, String> {
    let bytes = fs::read(path).map_err(|e| format!("read {path:?}: {e}"))?;
    serde_json::from_slice(&bytes).map_err(|e| format!("parse {path:?}: {e}"))
}

/// Points from a file followed by those on the command line, falling back to
/// the site's default pair when neither is given.
pub fn collect_points(args: &[String], file: Option<&Path>) -> Result<Vec<GeoPoint>, String> {
    let mut points = Vec::new();
    if let Some(path) = file {
        points.extend(load_points_file(path)?);
    }
    for arg in args {
        points.push(parse_point(arg)?);
    }
    if points.is_empty() && file.is_none() {
        points = default_points();
    }
    Ok(points)
}

/// `--config` wins over `$FRAMER_CONFIG`; with neither, built-in defaults.
pub fn resolve_config(explicit: Option<&Path>) -> Result<FramingConfig, String> {
    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => env::var_os(CONFIG_ENV).map(PathBuf::from),
    };
    match path {
        Some(p) => {
            tracing::info!(path = %p.display(), "loading framing config");
            FramingConfig::from_path(&p).map_err(|e| e.to_string())
        }
        None => Ok(FramingConfig::default()),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitReport {
    pub points: usize,
    pub framing: FramingResult,
    pub close_altitude: f64,
    pub spread_rad: f64,
}

pub fn fit(points: &[GeoPoint], config: &FramingConfig) -> FitReport {
    let framing = compute_framing(points, config);
    FitReport {
        points: points.len(),
        framing,
        close_altitude: compute_close_altitude(framing.wide_altitude, config),
        spread_rad: angular_spread(framing.center, points),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleOutcome {
    Applied,
    Suppressed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepSample {
    pub frame: u64,
    pub progress: f64,
    pub altitude: f64,
    pub outcome: SampleOutcome,
}

/// Scroll from 0 to 1 in `steps` frames through a [`CameraRig`], reporting what
/// reached the camera on each frame.
pub fn sweep(points: Vec<GeoPoint>, config: FramingConfig, steps: u32) -> Vec<SweepSample> {
    let steps = steps.max(1);
    let mut rig = CameraRig::new(config, points);
    let mut sink = RecordingSink::new();
    rig.on_ready(&mut sink);

    let mut frame = Frame::first(0.0);
    let mut samples = Vec::with_capacity(steps as usize + 1);
    for i in 0..=steps {
        let progress = f64::from(i) / f64::from(steps);
        rig.submit_progress(progress);
        let outcome = match rig.on_frame(frame, &mut sink) {
            ApplyOutcome::Applied(_) => Some(SampleOutcome::Applied),
            ApplyOutcome::Suppressed => Some(SampleOutcome::Suppressed),
            ApplyOutcome::Idle | ApplyOutcome::NotReady => None,
        };
        if let Some(outcome) = outcome {
            samples.push(SweepSample {
                frame: frame.index,
                progress,
                altitude: rig.target_altitude(),
                outcome,
            });
        }
        frame = frame.next(frame.time_s + 1.0 / 60.0);
    }
    tracing::debug!(writes = sink.writes.len(), "sweep finished");
    samples
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceReport {
    pub radians: f64,
    pub degrees: f64,
    pub km: f64,
}

pub fn distance(a: &GeoPoint, b: &GeoPoint) -> DistanceReport {
    let radians = angular_distance(a.lat_lng(), b.lat_lng());
    DistanceReport {
        radians,
        degrees: radians.to_degrees(),
        km: surface_distance_km(a.lat_lng(), b.lat_lng()),
    }
}
