//! Latest-wins request slot.
//!
//! High-frequency producers (scroll handlers, pointer moves) call
//! [`Coalescer::submit`] as often as they like; a consumer drains at most one
//! value per frame with [`Coalescer::take_for_frame`]. Anything submitted
//! between two drains except the newest value is discarded.

use crate::frame::Frame;

#[derive(Debug)]
pub struct Coalescer<T> {
    pending: Option<T>,
    last_taken_frame: Option<u64>,
    superseded: u64,
}

impl<T> Default for Coalescer<T> {
    fn default() -> Self {
        Self {
            pending: None,
            last_taken_frame: None,
            superseded: 0,
        }
    }
}

impl<T> Coalescer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `value`, replacing any pending one.
    ///
    /// Returns `true` if an older pending value was discarded.
    pub fn submit(&mut self, value: T) -> bool {
        let replaced = self.pending.replace(value).is_some();
        if replaced {
            self.superseded = self.superseded.wrapping_add(1);
            tracing::trace!(superseded = self.superseded, "coalesced pending request");
        }
        replaced
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending value, once per frame index.
    ///
    /// A second call within the same frame returns `None` and leaves any value
    /// submitted in the meantime for the next frame.
    pub fn take_for_frame(&mut self, frame: Frame) -> Option<T> {
        if self.last_taken_frame == Some(frame.index) {
            return None;
        }
        let value = self.pending.take()?;
        self.last_taken_frame = Some(frame.index);
        Some(value)
    }

    /// Number of submitted values that were replaced before being taken.
    pub fn superseded_count(&self) -> u64 {
        self.superseded
    }
}
