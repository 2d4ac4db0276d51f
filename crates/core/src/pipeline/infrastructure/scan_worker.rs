use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, Sender};

use crate::detection::domain::change_detector::{ChangeDetector, DetectorConfig};
use crate::detection::infrastructure::pixel_diff_detector::PixelDiffDetector;
use crate::events::domain::screenshot_writer::ScreenshotWriter;
use crate::events::domain::wall_clock::WallClock;
use crate::events::infrastructure::file_screenshot_writer::FileScreenshotWriter;
use crate::events::infrastructure::system_clock::SystemClock;
use crate::pipeline::scan_logger::{ScanLogger, StdoutScanLogger};
use crate::pipeline::scan_session::{ScanGate, ScanToken};
use crate::pipeline::scan_video_use_case::{ScanReport, ScanVideoUseCase};
use crate::shared::error::ScanError;
use crate::shared::region::Region;
use crate::video::domain::video_reader::VideoReader;
use crate::video::infrastructure::ffmpeg_reader::FfmpegReader;
use crate::video::infrastructure::image_file_writer::ImageFileWriter;

/// Messages sent from the scan thread to the caller.
#[derive(Debug)]
pub enum ScanMessage {
    /// Percentage in `[0, 100]`, non-decreasing within one scan.
    Progress(f64),
    Finished(ScanReport),
    Error(ScanError),
}

/// Everything a background scan needs.
pub struct ScanJob {
    pub input_path: PathBuf,
    pub region: Option<Region>,
    pub config: DetectorConfig,
    reader: Box<dyn VideoReader>,
    detector: Box<dyn ChangeDetector>,
    screenshots: Box<dyn ScreenshotWriter>,
    clock: Box<dyn WallClock>,
    logger: Box<dyn ScanLogger>,
}

impl ScanJob {
    /// Job with the production adapters: ffmpeg decoding, PNG screenshots
    /// in `output_dir`, local wall clock and log-backed reporting.
    pub fn new(
        input_path: impl Into<PathBuf>,
        region: Option<Region>,
        config: DetectorConfig,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            input_path: input_path.into(),
            region,
            detector: Box::new(PixelDiffDetector::new(region, config.clone())),
            config,
            reader: Box::new(FfmpegReader::new()),
            screenshots: Box::new(FileScreenshotWriter::new(
                output_dir,
                Box::new(ImageFileWriter::new()),
            )),
            clock: Box::new(SystemClock::new()),
            logger: Box::new(StdoutScanLogger::default()),
        }
    }

    pub fn with_reader(mut self, reader: Box<dyn VideoReader>) -> Self {
        self.reader = reader;
        self
    }

    pub fn with_clock(mut self, clock: Box<dyn WallClock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_logger(mut self, logger: Box<dyn ScanLogger>) -> Self {
        self.logger = logger;
        self
    }
}

/// Starts a scan on its own thread.
///
/// Fails with [`ScanError::Busy`] while another scan holds `gate`.
/// Otherwise returns the message channel and the cancel flag; the thread
/// releases the gate before sending its final message.
pub fn spawn(
    gate: &ScanGate,
    job: ScanJob,
) -> Result<(Receiver<ScanMessage>, Arc<AtomicBool>), ScanError> {
    let token = gate.try_start()?;
    let (tx, rx) = crossbeam_channel::unbounded::<ScanMessage>();
    let cancelled = Arc::new(AtomicBool::new(false));
    let cancelled_clone = cancelled.clone();

    thread::spawn(move || run_scan(token, &tx, cancelled_clone, job));

    Ok((rx, cancelled))
}

fn run_scan(token: ScanToken, tx: &Sender<ScanMessage>, cancelled: Arc<AtomicBool>, job: ScanJob) {
    let tx_progress = tx.clone();
    let progress: Box<dyn FnMut(f64) + Send> = Box::new(move |percent| {
        let _ = tx_progress.send(ScanMessage::Progress(percent));
    });

    let mut use_case = ScanVideoUseCase::new(
        job.reader,
        job.detector,
        job.screenshots,
        job.clock,
        job.logger,
        Some(progress),
        Some(cancelled.clone()),
    );
    let result = use_case.execute(&job.input_path, job.region, &job.config);
    drop(use_case);
    drop(token);

    let message = match result {
        Ok(report) => ScanMessage::Finished(report),
        Err(e) => {
            log::error!("Scan of {} failed: {e}", job.input_path.display());
            ScanMessage::Error(e)
        }
    };
    if tx.send(message).is_err() && !cancelled.load(Ordering::Relaxed) {
        log::warn!("Scan result dropped: receiver went away");
    }
}
