//! Caller-side camera rig.
//!
//! The rig owns everything that changes over the widget's lifetime: the point
//! set and its cached framing, the pending scroll progress, and the
//! last-applied altitude used to skip redundant camera writes. Values are
//! handed to the renderer through [`CameraSink`]; the rig never touches a
//! renderer directly.

use foundation::math::GeoPoint;
use runtime::{Coalescer, Frame};
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, FramingConfig};
use crate::fit::{FramingResult, compute_framing};
use crate::zoom::{altitude_at, compute_close_altitude, exceeds_epsilon};

/// Point of view handed to the renderer.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraTarget {
    pub lat: f64,
    pub lng: f64,
    pub altitude: f64,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    Instant,
    Animated { duration_ms: u32 },
}

/// Receiver of camera writes, implemented by the rendering engine.
pub trait CameraSink {
    fn apply(&mut self, target: CameraTarget, transition: Transition);
}

impl<F> CameraSink for F
where
    F: FnMut(CameraTarget, Transition),
{
    fn apply(&mut self, target: CameraTarget, transition: Transition) {
        self(target, transition)
    }
}

/// Sink that records every write, for headless use and tests.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordingSink {
    pub writes: Vec<(CameraTarget, Transition)>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CameraSink for RecordingSink {
    fn apply(&mut self, target: CameraTarget, transition: Transition) {
        self.writes.push((target, transition));
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub enum RigState {
    /// No base framing has reached the camera for the current point set.
    #[default]
    Uninitialized,
    /// The wide framing was applied and no progress update has moved it since.
    Framed { wide: f64 },
    /// The last write came from a progress update.
    Interpolated { altitude: f64 },
}

/// What a rig call did to the camera.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ApplyOutcome {
    Applied(CameraTarget),
    /// The new altitude was within the update epsilon of the last write.
    Suppressed,
    /// Nothing was pending.
    Idle,
    /// The renderer has not signalled readiness yet.
    NotReady,
}

#[derive(Debug)]
pub struct CameraRig {
    config: FramingConfig,
    points: Vec<GeoPoint>,
    framing: FramingResult,
    close_altitude: f64,
    state: RigState,
    last_applied_altitude: Option<f64>,
    pending_progress: Coalescer<f64>,
    progress: f64,
    ready: bool,
    has_painted: bool,
}

impl CameraRig {
    pub fn new(config: FramingConfig, points: Vec<GeoPoint>) -> Self {
        let framing = compute_framing(&points, &config);
        let close_altitude = compute_close_altitude(framing.wide_altitude, &config);
        Self {
            config,
            points,
            framing,
            close_altitude,
            state: RigState::Uninitialized,
            last_applied_altitude: None,
            pending_progress: Coalescer::new(),
            progress: 0.0,
            ready: false,
            has_painted: false,
        }
    }

    pub fn config(&self) -> &FramingConfig {
        &self.config
    }

    pub fn framing(&self) -> FramingResult {
        self.framing
    }

    pub fn close_altitude(&self) -> f64 {
        self.close_altitude
    }

    pub fn state(&self) -> RigState {
        self.state
    }

    pub fn last_applied_altitude(&self) -> Option<f64> {
        self.last_applied_altitude
    }

    /// Altitude the camera should have at the latest known progress.
    pub fn target_altitude(&self) -> f64 {
        altitude_at(self.framing.wide_altitude, self.close_altitude, self.progress)
    }

    /// The renderer is ready to accept camera writes; apply the base framing.
    pub fn on_ready(&mut self, sink: &mut impl CameraSink) -> ApplyOutcome {
        self.ready = true;
        self.apply_base_framing(sink)
    }

    /// Replace the point set.
    ///
    /// An identical set keeps the cached framing and returns
    /// [`ApplyOutcome::Idle`]. Otherwise the framing is recomputed, the
    /// last-applied memo is cleared and the new base framing is applied as soon
    /// as the renderer is ready.
    pub fn set_points(&mut self, points: Vec<GeoPoint>, sink: &mut impl CameraSink) -> ApplyOutcome {
        if points == self.points {
            return ApplyOutcome::Idle;
        }

        self.points = points;
        self.reframe();
        self.apply_base_framing(sink)
    }

    /// Swap the tunables; the framing is recomputed from the cached points.
    ///
    /// An invalid config is rejected and the rig keeps its current one.
    pub fn set_config(
        &mut self,
        config: FramingConfig,
        sink: &mut impl CameraSink,
    ) -> Result<ApplyOutcome, ConfigError> {
        if config == self.config {
            return Ok(ApplyOutcome::Idle);
        }
        config.validate()?;

        self.config = config;
        self.reframe();
        Ok(self.apply_base_framing(sink))
    }

    /// Record a new progress value; only the newest one per frame is used.
    pub fn submit_progress(&mut self, progress: f64) {
        self.pending_progress.submit(progress);
    }

    /// Apply the newest pending progress, if any, for this frame.
    pub fn on_frame(&mut self, frame: Frame, sink: &mut impl CameraSink) -> ApplyOutcome {
        if !self.ready {
            return ApplyOutcome::NotReady;
        }
        let Some(progress) = self.pending_progress.take_for_frame(frame) else {
            return ApplyOutcome::Idle;
        };

        self.progress = progress;
        let altitude = self.target_altitude();
        if !exceeds_epsilon(self.last_applied_altitude, altitude, self.config.update_epsilon) {
            tracing::trace!(
                frame = frame.index,
                time_s = frame.time_s,
                altitude,
                "camera write suppressed"
            );
            return ApplyOutcome::Suppressed;
        }
        tracing::trace!(
            frame = frame.index,
            time_s = frame.time_s,
            altitude,
            superseded = self.pending_progress.superseded_count(),
            "camera write"
        );

        let target = CameraTarget {
            lat: self.framing.center.lat,
            lng: self.framing.center.lng,
            altitude,
        };
        sink.apply(target, Transition::Instant);
        self.last_applied_altitude = Some(altitude);
        self.state = RigState::Interpolated { altitude };
        ApplyOutcome::Applied(target)
    }

    fn reframe(&mut self) {
        let framing = compute_framing(&self.points, &self.config);
        tracing::debug!(
            points = self.points.len(),
            lat = framing.center.lat,
            lng = framing.center.lng,
            wide = framing.wide_altitude,
            "camera reframed"
        );
        if framing != self.framing {
            self.last_applied_altitude = None;
        }
        self.framing = framing;
        self.close_altitude = compute_close_altitude(framing.wide_altitude, &self.config);
        self.state = RigState::Uninitialized;
    }

    fn apply_base_framing(&mut self, sink: &mut impl CameraSink) -> ApplyOutcome {
        if !self.ready {
            return ApplyOutcome::NotReady;
        }

        let wide = self.framing.wide_altitude;
        let target = CameraTarget {
            lat: self.framing.center.lat,
            lng: self.framing.center.lng,
            altitude: wide,
        };
        let transition = if self.has_painted {
            Transition::Animated {
                duration_ms: self.config.reframe_transition_ms,
            }
        } else {
            Transition::Instant
        };
        sink.apply(target, transition);

        self.has_painted = true;
        self.last_applied_altitude = None;
        self.state = RigState::Framed { wide };

        // Re-issue the current scroll position so the next frame zooms back in
        // to where the user was.
        if self.progress > 0.0 && !self.pending_progress.has_pending() {
            self.pending_progress.submit(self.progress);
        }
        ApplyOutcome::Applied(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_points;
    use pretty_assertions::assert_eq;

    fn ready_rig() -> (CameraRig, RecordingSink) {
        let mut rig = CameraRig::new(FramingConfig::default(), default_points());
        let mut sink = RecordingSink::new();
        rig.on_ready(&mut sink);
        (rig, sink)
    }

    #[test]
    fn starts_uninitialized_and_waits_for_renderer() {
        let mut rig = CameraRig::new(FramingConfig::default(), default_points());
        let mut sink = RecordingSink::new();
        assert_eq!(rig.state(), RigState::Uninitialized);

        rig.submit_progress(0.5);
        assert_eq!(rig.on_frame(Frame::first(0.0), &mut sink), ApplyOutcome::NotReady);
        assert!(sink.writes.is_empty());
    }

    #[test]
    fn ready_applies_wide_framing_instantly() {
        let (rig, sink) = ready_rig();
        let framing = rig.framing();
        assert_eq!(
            sink.writes,
            vec![(
                CameraTarget {
                    lat: framing.center.lat,
                    lng: framing.center.lng,
                    altitude: framing.wide_altitude,
                },
                Transition::Instant,
            )]
        );
        assert_eq!(
            rig.state(),
            RigState::Framed {
                wide: framing.wide_altitude
            }
        );
        assert_eq!(rig.last_applied_altitude(), None);
    }

    #[test]
    fn progress_interpolates_and_updates_memo() {
        let (mut rig, mut sink) = ready_rig();
        rig.submit_progress(1.0);
        let outcome = rig.on_frame(Frame::first(0.0), &mut sink);

        let close = rig.close_altitude();
        assert!(matches!(outcome, ApplyOutcome::Applied(t) if t.altitude == close));
        assert_eq!(rig.state(), RigState::Interpolated { altitude: close });
        assert_eq!(rig.last_applied_altitude(), Some(close));
        assert_eq!(sink.writes.last().map(|w| w.1), Some(Transition::Instant));
    }

    #[test]
    fn rapid_updates_collapse_to_latest_per_frame() {
        let (mut rig, mut sink) = ready_rig();
        for i in 0..=10 {
            rig.submit_progress(i as f64 / 10.0);
        }
        let f0 = Frame::first(0.0);
        rig.on_frame(f0, &mut sink);
        assert_eq!(rig.on_frame(f0, &mut sink), ApplyOutcome::Idle);

        // One base write plus one interpolated write.
        assert_eq!(sink.writes.len(), 2);
        assert_eq!(rig.last_applied_altitude(), Some(rig.close_altitude()));
    }

    #[test]
    fn tiny_changes_are_suppressed() {
        let (mut rig, mut sink) = ready_rig();
        let f0 = Frame::first(0.0);
        rig.submit_progress(0.5);
        assert!(matches!(rig.on_frame(f0, &mut sink), ApplyOutcome::Applied(_)));

        // 1e-5 of progress moves the altitude far less than the epsilon.
        rig.submit_progress(0.50001);
        let f1 = f0.next(0.016);
        assert_eq!(rig.on_frame(f1, &mut sink), ApplyOutcome::Suppressed);
        assert_eq!(sink.writes.len(), 2);

        rig.submit_progress(0.6);
        assert!(matches!(rig.on_frame(f1.next(0.032), &mut sink), ApplyOutcome::Applied(_)));
    }

    #[test]
    fn same_points_keep_cached_framing() {
        let (mut rig, mut sink) = ready_rig();
        rig.submit_progress(0.3);
        rig.on_frame(Frame::first(0.0), &mut sink);
        let memo = rig.last_applied_altitude();

        assert_eq!(rig.set_points(default_points(), &mut sink), ApplyOutcome::Idle);
        assert_eq!(rig.last_applied_altitude(), memo);
        assert_eq!(sink.writes.len(), 2);
    }

    #[test]
    fn new_points_reframe_and_clear_memo() {
        let (mut rig, mut sink) = ready_rig();
        let f0 = Frame::first(0.0);
        rig.submit_progress(0.4);
        rig.on_frame(f0, &mut sink);
        assert!(rig.last_applied_altitude().is_some());

        let outcome = rig.set_points(vec![GeoPoint::new(10.0, 20.0, "solo")], &mut sink);
        let framing = rig.framing();
        assert_eq!(framing.center.lat, 10.0);
        assert_eq!(framing.center.lng, 20.0);
        assert!(matches!(
            outcome,
            ApplyOutcome::Applied(t) if t.altitude == framing.wide_altitude
        ));
        assert_eq!(
            sink.writes.last().map(|w| w.1),
            Some(Transition::Animated {
                duration_ms: rig.config().reframe_transition_ms
            })
        );
        assert_eq!(rig.last_applied_altitude(), None);
        assert_eq!(
            rig.state(),
            RigState::Framed {
                wide: framing.wide_altitude
            }
        );

        // The previous scroll position is replayed on the next frame.
        let outcome = rig.on_frame(f0.next(0.016), &mut sink);
        let expected = altitude_at(framing.wide_altitude, rig.close_altitude(), 0.4);
        assert!(matches!(outcome, ApplyOutcome::Applied(t) if t.altitude == expected));
    }

    #[test]
    fn points_changed_before_ready_apply_on_ready() {
        let mut rig = CameraRig::new(FramingConfig::default(), Vec::new());
        let mut sink = RecordingSink::new();
        let solo = vec![GeoPoint::new(-10.0, 40.0, "")];
        assert_eq!(rig.set_points(solo, &mut sink), ApplyOutcome::NotReady);

        rig.on_ready(&mut sink);
        let (target, transition) = sink.writes[0];
        assert_eq!(transition, Transition::Instant);
        assert_eq!((target.lat, target.lng), (-10.0, 40.0));
    }

    #[test]
    fn config_change_reframes() {
        let (mut rig, mut sink) = ready_rig();
        let config = FramingConfig {
            far_altitude: 4.0,
            ..FramingConfig::default()
        };
        rig.submit_progress(0.7);
        rig.on_frame(Frame::first(0.0), &mut sink);
        assert!(rig.last_applied_altitude().is_some());

        let outcome = rig.set_config(config, &mut sink).unwrap();
        let framing = rig.framing();
        assert!(matches!(
            outcome,
            ApplyOutcome::Applied(t) if t.altitude == framing.wide_altitude
        ));
        assert!(framing.wide_altitude <= 4.0);
        assert!(rig.close_altitude() <= framing.wide_altitude);
        assert_eq!(rig.last_applied_altitude(), None);
        assert_eq!(
            rig.state(),
            RigState::Framed {
                wide: framing.wide_altitude
            }
        );
    }

    #[test]
    fn swapped_limits_are_rejected_by_set_config() {
        let (mut rig, mut sink) = ready_rig();
        let before = rig.framing();
        let config = FramingConfig {
            close_altitude: 3.0,
            far_altitude: 1.0,
            ..FramingConfig::default()
        };

        let err = rig.set_config(config, &mut sink).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "{err}");
        assert_eq!(rig.config(), &FramingConfig::default());
        assert_eq!(rig.framing(), before);
        assert_eq!(sink.writes.len(), 1);
    }

    #[test]
    fn rig_built_with_swapped_limits_still_frames() {
        let config = FramingConfig {
            close_altitude: 3.0,
            far_altitude: 1.0,
            ..FramingConfig::default()
        };
        let mut rig = CameraRig::new(config, default_points());
        let mut sink = RecordingSink::new();
        rig.on_ready(&mut sink);
        rig.submit_progress(1.0);
        assert!(matches!(rig.on_frame(Frame::first(0.0), &mut sink), ApplyOutcome::Applied(_)));
        assert!((1.0..=3.0).contains(&rig.framing().wide_altitude));
    }

    #[test]
    fn closure_sink_receives_writes() {
        let mut rig = CameraRig::new(FramingConfig::default(), default_points());
        let mut seen = Vec::new();
        let mut sink = |target: CameraTarget, _t: Transition| seen.push(target.altitude);
        rig.on_ready(&mut sink);
        assert_eq!(seen.len(), 1);
    }
}
