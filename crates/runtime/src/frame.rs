/// Render-frame metadata as reported by the host's animation callback.
///
/// Frames are identified by a monotonically increasing index; the timestamp is
/// whatever clock the host hands us and shows up in camera trace events.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Host timestamp at the start of the frame (seconds).
    pub time_s: f64,
}

impl Frame {
    pub fn first(time_s: f64) -> Self {
        Self { index: 0, time_s }
    }

    /// The following frame. Timestamps that run backwards are held at the
    /// previous value.
    pub fn next(self, time_s: f64) -> Self {
        Self {
            index: self.index.wrapping_add(1),
            time_s: time_s.max(self.time_s),
        }
    }
}
