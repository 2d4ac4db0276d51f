use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::detection::domain::change_detector::{ChangeDetector, DetectorConfig};
use crate::events::domain::change_event::ChangeEvent;
use crate::events::domain::event_throttler::EventThrottler;
use crate::events::domain::screenshot_writer::ScreenshotWriter;
use crate::events::domain::wall_clock::WallClock;
use crate::shared::error::ScanError;
use crate::shared::region::Region;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_reader::VideoReader;

use super::progress_tracker::ProgressTracker;
use super::scan_logger::ScanLogger;

/// Lifecycle of a [`ScanVideoUseCase`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScannerState {
    Idle,
    Running,
    Completed,
    Cancelled,
    Failed,
}

/// How a scan that got past validation ended.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScanStatus {
    Completed,
    Cancelled,
    /// The stream broke at `frame_number` (1-based); events before it are kept.
    Failed { frame_number: usize, reason: String },
}

/// Result of one scan: events in frame order plus how the scan ended.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub events: Vec<ChangeEvent>,
    pub frames_processed: usize,
    pub status: ScanStatus,
    /// Changed frames whose screenshot could not be written.
    pub screenshot_failures: usize,
}

/// Drives one pass over a video: decode, detect, throttle, capture.
///
/// The scan is strictly sequential since every frame is compared with
/// the one decoded right before it. Validation problems are returned as
/// errors before any frame is read; anything that goes wrong afterwards
/// ends the loop and is reported through [`ScanStatus`] together with
/// the events collected so far. The reader is closed on every path out
/// of [`execute`](Self::execute) once it has been opened.
///
/// The cancel flag is checked before each frame read. It is cleared when
/// a run ends, so a cancel only ever stops the run it arrived during (or
/// the next one, if set before it starts).
pub struct ScanVideoUseCase {
    reader: Box<dyn VideoReader>,
    detector: Box<dyn ChangeDetector>,
    screenshots: Box<dyn ScreenshotWriter>,
    clock: Box<dyn WallClock>,
    logger: Box<dyn ScanLogger>,
    throttler: EventThrottler,
    on_progress: Option<Box<dyn FnMut(f64) + Send>>,
    cancelled: Arc<AtomicBool>,
    state: ScannerState,
}

impl ScanVideoUseCase {
    pub fn new(
        reader: Box<dyn VideoReader>,
        detector: Box<dyn ChangeDetector>,
        screenshots: Box<dyn ScreenshotWriter>,
        clock: Box<dyn WallClock>,
        logger: Box<dyn ScanLogger>,
        on_progress: Option<Box<dyn FnMut(f64) + Send>>,
        cancelled: Option<Arc<AtomicBool>>,
    ) -> Self {
        Self {
            reader,
            detector,
            screenshots,
            clock,
            logger,
            throttler: EventThrottler::default(),
            on_progress,
            cancelled: cancelled.unwrap_or_else(|| Arc::new(AtomicBool::new(false))),
            state: ScannerState::Idle,
        }
    }

    pub fn state(&self) -> ScannerState {
        self.state
    }

    pub fn execute(
        &mut self,
        path: &Path,
        region: Option<Region>,
        config: &DetectorConfig,
    ) -> Result<ScanReport, ScanError> {
        if !path.exists() {
            return Err(ScanError::NotFound(path.to_path_buf()));
        }
        config.validate()?;

        let metadata = self.reader.open(path).map_err(|e| ScanError::OpenFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let result = self.scan(path, &metadata, region, config);
        self.reader.close();

        let report = result?;
        self.logger.summary();
        Ok(report)
    }

    fn scan(
        &mut self,
        path: &Path,
        metadata: &VideoMetadata,
        region: Option<Region>,
        config: &DetectorConfig,
    ) -> Result<ScanReport, ScanError> {
        if !metadata.has_timeline() {
            return Err(ScanError::NoTimeline(path.to_path_buf()));
        }
        if let Some(region) = &region {
            region.ensure_within(metadata.width, metadata.height)?;
        }

        let duration = match metadata.duration_seconds() {
            Some(seconds) if metadata.total_frames > 0 => format!("{seconds:.2}s"),
            _ => "unknown length".to_string(),
        };
        self.logger.info(&format!(
            "Scanning {} ({}x{}, {:.2} fps, {} frames, {duration}), region {}, threshold {}, sensitivity {}, min scene {}",
            path.display(),
            metadata.width,
            metadata.height,
            metadata.fps,
            metadata.total_frames,
            region.map_or_else(|| "full frame".to_string(), |r| r.to_string()),
            config.change_threshold,
            config.sensitivity,
            config.min_scene_len,
        ));

        self.state = ScannerState::Running;
        self.detector.configure(region, config.clone());
        self.throttler.reset();
        let mut progress = ProgressTracker::new(metadata.total_frames, self.on_progress.take());

        let mut events = Vec::new();
        let mut frames_read = 0usize;
        let mut screenshot_failures = 0usize;
        let mut status = ScanStatus::Completed;

        let mut frames = self.reader.frames();
        loop {
            if self.cancelled.load(Ordering::Relaxed) {
                status = ScanStatus::Cancelled;
                break;
            }

            let t0 = Instant::now();
            let frame = match frames.next() {
                None => break,
                Some(Ok(frame)) => frame,
                Some(Err(e)) => {
                    status = ScanStatus::Failed {
                        frame_number: frames_read + 1,
                        reason: e.to_string(),
                    };
                    break;
                }
            };
            self.logger.timing("decode", elapsed_ms(t0));

            frames_read += 1;
            // Timeline checked above.
            let time_seconds = metadata.time_at(frames_read).unwrap_or_default();

            let t1 = Instant::now();
            let changed = match self.detector.detect(&frame) {
                Ok(changed) => changed,
                Err(e) => {
                    let reason = match e {
                        ScanError::Stream { reason, .. } => reason,
                        other => other.to_string(),
                    };
                    status = ScanStatus::Failed {
                        frame_number: frames_read,
                        reason,
                    };
                    break;
                }
            };
            self.logger.timing("detect", elapsed_ms(t1));
            if let Some(pixels) = self.detector.last_changed_pixels() {
                self.logger.detection(frames_read, pixels, changed);
            }

            if changed && self.throttler.should_emit(time_seconds) {
                let t2 = Instant::now();
                let timestamp = self.clock.timestamp_label();
                match self.screenshots.save(&frame, &timestamp) {
                    Ok(screenshot_path) => {
                        self.throttler.record(time_seconds);
                        let event = ChangeEvent {
                            timestamp,
                            frame_number: frames_read,
                            time_seconds,
                            screenshot_path,
                        };
                        self.logger.event(&event);
                        events.push(event);
                    }
                    Err(e) => {
                        screenshot_failures += 1;
                        self.logger
                            .warn(&format!("Dropping change at frame {frames_read}: {e}"));
                    }
                }
                self.logger.timing("save", elapsed_ms(t2));
            }

            progress.advance(frames_read);
            self.logger.progress(frames_read, metadata.total_frames);
        }
        drop(frames);
        self.cancelled.store(false, Ordering::Relaxed);

        self.state = match &status {
            ScanStatus::Completed => {
                progress.finish();
                self.logger.info(&format!(
                    "Scan completed: {} events in {frames_read} frames",
                    events.len()
                ));
                ScannerState::Completed
            }
            ScanStatus::Cancelled => {
                self.logger.info(&format!(
                    "Scan cancelled after {frames_read} frames with {} events",
                    events.len()
                ));
                ScannerState::Cancelled
            }
            ScanStatus::Failed {
                frame_number,
                reason,
            } => {
                self.logger
                    .warn(&format!("Scan stopped at frame {frame_number}: {reason}"));
                ScannerState::Failed
            }
        };
        self.on_progress = progress.into_sink();

        Ok(ScanReport {
            events,
            frames_processed: frames_read,
            status,
            screenshot_failures,
        })
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
