use crate::shared::constants::{EVENT_WINDOW_SECONDS, TIMELINE_EPSILON};

/// Allows at most one event per window of video-timeline time.
///
/// The first qualifying frame in a window wins; the watermark only moves
/// when the caller [`record`](EventThrottler::record)s an emitted event.
#[derive(Clone, Debug)]
pub struct EventThrottler {
    window_seconds: f64,
    last_emitted: Option<f64>,
}

impl EventThrottler {
    pub fn new(window_seconds: f64) -> Self {
        Self {
            window_seconds,
            last_emitted: None,
        }
    }

    pub fn should_emit(&self, time_seconds: f64) -> bool {
        match self.last_emitted {
            None => true,
            Some(last) => time_seconds - last + TIMELINE_EPSILON >= self.window_seconds,
        }
    }

    pub fn record(&mut self, time_seconds: f64) {
        self.last_emitted = Some(time_seconds);
    }

    pub fn last_emitted(&self) -> Option<f64> {
        self.last_emitted
    }

    pub fn reset(&mut self) {
        self.last_emitted = None;
    }
}

impl Default for EventThrottler {
    fn default() -> Self {
        Self::new(EVENT_WINDOW_SECONDS)
    }
}
