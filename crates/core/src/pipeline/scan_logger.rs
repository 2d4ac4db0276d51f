use std::collections::BTreeMap;
use std::time::Instant;

use crate::events::domain::change_event::ChangeEvent;

/// Observer for what a scan is doing, separate from the progress sink.
///
/// The progress sink feeds a UI; this trait feeds logs and the
/// end-of-scan summary.
pub trait ScanLogger: Send {
    /// Frame-level progress: frames read so far and the container's
    /// frame count (0 when unknown).
    fn progress(&mut self, frames_read: usize, total_frames: usize);

    /// Time spent in a named stage for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Changed-pixel count of one comparison and whether it crossed the
    /// threshold. Default: no-op.
    fn detection(&mut self, _frame_number: usize, _changed_pixels: usize, _changed: bool) {}

    fn event(&mut self, event: &ChangeEvent);

    fn info(&mut self, message: &str);

    fn warn(&mut self, message: &str) {
        self.info(message);
    }

    /// Emits an end-of-scan summary. Default: no-op.
    fn summary(&self) {}
}

/// Discards everything. Used by tests and callers with their own output.
pub struct NullScanLogger;

impl ScanLogger for NullScanLogger {
    fn progress(&mut self, _frames_read: usize, _total_frames: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn event(&mut self, _event: &ChangeEvent) {}
    fn info(&mut self, _message: &str) {}
}

/// Logs through the `log` facade and accumulates per-stage timings.
///
/// Progress lines are emitted every `every_frames` frames.
pub struct StdoutScanLogger {
    every_frames: usize,
    timings: BTreeMap<String, Vec<f64>>,
    started: Instant,
    frames_read: usize,
    changed_frames: usize,
    peak_changed_pixels: usize,
    events: usize,
}

impl StdoutScanLogger {
    pub fn new(every_frames: usize) -> Self {
        Self {
            every_frames: every_frames.max(1),
            timings: BTreeMap::new(),
            started: Instant::now(),
            frames_read: 0,
            changed_frames: 0,
            peak_changed_pixels: 0,
            events: 0,
        }
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    pub fn events_logged(&self) -> usize {
        self.events
    }

    /// Frames over the threshold, including throttled ones.
    pub fn changed_frames(&self) -> usize {
        self.changed_frames
    }

    pub fn peak_changed_pixels(&self) -> usize {
        self.peak_changed_pixels
    }

    /// `None` until at least one frame has been read.
    pub fn summary_string(&self) -> Option<String> {
        if self.frames_read == 0 {
            return None;
        }
        let elapsed = self.started.elapsed().as_secs_f64();
        let mut lines = vec![
            format!(
                "Scan summary ({} frames, {} events, {:.1}s):",
                self.frames_read, self.events, elapsed
            ),
            format!(
                "  Changed frames: {} (peak {} px)",
                self.changed_frames, self.peak_changed_pixels
            ),
        ];
        for (stage, durations) in &self.timings {
            let total: f64 = durations.iter().sum();
            let avg = total / durations.len().max(1) as f64;
            lines.push(format!("  {stage:10}: avg {avg:6.2}ms  total {total:8.0}ms"));
        }
        if elapsed > 0.0 {
            lines.push(format!(
                "  Throughput: {:.1} fps",
                self.frames_read as f64 / elapsed
            ));
        }
        Some(lines.join("\n"))
    }
}

impl Default for StdoutScanLogger {
    fn default() -> Self {
        Self::new(100)
    }
}

impl ScanLogger for StdoutScanLogger {
    fn progress(&mut self, frames_read: usize, total_frames: usize) {
        self.frames_read = frames_read;
        if frames_read % self.every_frames != 0 {
            return;
        }
        if total_frames > 0 {
            log::info!("Scanned {frames_read}/{total_frames} frames");
        } else {
            log::info!("Scanned {frames_read} frames");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn detection(&mut self, frame_number: usize, changed_pixels: usize, changed: bool) {
        self.peak_changed_pixels = self.peak_changed_pixels.max(changed_pixels);
        if changed {
            self.changed_frames += 1;
            log::debug!("Frame {frame_number}: {changed_pixels} pixels changed");
        }
    }

    fn event(&mut self, event: &ChangeEvent) {
        self.events += 1;
        log::info!(
            "Change at frame {} ({:.2}s) -> {}",
            event.frame_number,
            event.time_seconds,
            event.screenshot_path.display()
        );
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn warn(&mut self, message: &str) {
        log::warn!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}
