/// Converts frame counts into a percentage stream for a progress sink.
///
/// Values are clamped to `[0, 100]` and never decrease, so a container
/// that underestimates its frame count stalls at 100 instead of
/// overshooting. With an unknown count nothing is reported until
/// [`finish`](Self::finish).
pub struct ProgressTracker {
    total_frames: usize,
    last: Option<f64>,
    sink: Option<Box<dyn FnMut(f64) + Send>>,
}

impl ProgressTracker {
    pub fn new(total_frames: usize, sink: Option<Box<dyn FnMut(f64) + Send>>) -> Self {
        Self {
            total_frames,
            last: None,
            sink,
        }
    }

    /// Reports progress after `frames_read` frames.
    pub fn advance(&mut self, frames_read: usize) {
        if self.total_frames == 0 {
            return;
        }
        let percent = (100.0 * frames_read as f64 / self.total_frames as f64).clamp(0.0, 100.0);
        self.report(percent);
    }

    /// Reports the final 100.0 of a completed scan.
    pub fn finish(&mut self) {
        self.report(100.0);
    }

    pub fn last(&self) -> Option<f64> {
        self.last
    }

    /// Returns the sink so it can be reused for the next scan.
    pub fn into_sink(self) -> Option<Box<dyn FnMut(f64) + Send>> {
        self.sink
    }

    fn report(&mut self, percent: f64) {
        if self.last.is_some_and(|last| percent <= last) {
            return;
        }
        self.last = Some(percent);
        if let Some(sink) = self.sink.as_mut() {
            sink(percent);
        }
    }
}
