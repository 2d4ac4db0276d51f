mod settings;

use std::fs;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use clap::Parser;
use crossbeam_channel::Receiver;

use regionwatch_core::detection::domain::change_detector::DetectorConfig;
use regionwatch_core::pipeline::infrastructure::scan_worker::{self, ScanJob, ScanMessage};
use regionwatch_core::pipeline::scan_session::ScanGate;
use regionwatch_core::pipeline::scan_video_use_case::{ScanReport, ScanStatus};
use regionwatch_core::pipeline::select_region_use_case::{first_frame, SelectRegionUseCase};
use regionwatch_core::selection::infrastructure::fixed_display_probe::FixedDisplayProbe;
use regionwatch_core::selection::infrastructure::line_selection_input::LineSelectionInput;
use regionwatch_core::selection::infrastructure::png_preview_surface::PngPreviewSurface;
use regionwatch_core::shared::constants::VIDEO_EXTENSIONS;
use regionwatch_core::shared::error::ScanError;
use regionwatch_core::shared::region::Region;
use regionwatch_core::video::infrastructure::ffmpeg_reader::FfmpegReader;
use regionwatch_core::video::infrastructure::image_file_writer::ImageFileWriter;

use settings::Settings;

/// Watches a region of a video and captures a screenshot whenever it changes.
#[derive(Parser)]
#[command(name = "regionwatch")]
struct Cli {
    /// Input video file.
    input: PathBuf,

    /// Region of interest as x,y,width,height in source pixels.
    #[arg(long, conflicts_with = "select")]
    region: Option<Region>,

    /// Pick the region on the first frame. Commands are read from stdin:
    /// press/drag/release X Y, rect X1 Y1 X2 Y2, confirm, reset, cancel.
    #[arg(long)]
    select: bool,

    /// Changed pixels needed to count a frame as changed.
    #[arg(long)]
    threshold: Option<usize>,

    /// Sensitivity (0-100). Reported only; does not affect detection.
    #[arg(long)]
    sensitivity: Option<f64>,

    /// Minimum scene length in frames. Reported only; does not affect detection.
    #[arg(long)]
    min_scene_len: Option<usize>,

    /// Directory for screenshots.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Write the scan report as JSON to this file.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Display resolution for region selection, e.g. 2560x1440.
    #[arg(long, value_parser = parse_resolution)]
    display: Option<(u32, u32)>,

    /// Image file the selection preview is rendered to.
    #[arg(long, default_value = "selection_preview.png")]
    preview: PathBuf,

    /// Store the effective threshold, sensitivity, scene length, output
    /// directory and display as defaults for later runs.
    #[arg(long)]
    save_defaults: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = merge_settings(&cli, Settings::load());
    let config = DetectorConfig {
        sensitivity: settings.sensitivity,
        change_threshold: settings.change_threshold,
        min_scene_len: settings.min_scene_len,
    };
    validate(&cli, &config)?;

    if cli.save_defaults {
        let path = settings.save()?;
        log::info!("Defaults saved to {}", path.display());
    }

    let region = if cli.select {
        match select_region(&cli.input, &cli.preview, settings.display)? {
            Some(region) => region,
            None => return Err(ScanError::MissingRegion.into()),
        }
    } else {
        cli.region.ok_or(ScanError::MissingRegion)?
    };

    let report = scan(&cli.input, region, config, &settings.output_dir)?;
    finish(report, cli.report.as_deref())
}

/// Prints and exports the report, then turns a non-completed status into
/// an error. Cancelled and failed scans still export what they found.
fn finish(
    report: ScanReport,
    report_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = report_path {
        fs::write(path, serde_json::to_string_pretty(&report)?)?;
        log::info!("Report written to {}", path.display());
    }
    print_events(&report);

    match report.status {
        ScanStatus::Completed => Ok(()),
        ScanStatus::Cancelled => Err(format!(
            "Scan cancelled after {} frames; {} events kept",
            report.frames_processed,
            report.events.len()
        )
        .into()),
        ScanStatus::Failed {
            frame_number,
            reason,
        } => Err(format!(
            "Scan stopped at frame {frame_number} ({reason}); {} events kept",
            report.events.len()
        )
        .into()),
    }
}

fn merge_settings(cli: &Cli, mut settings: Settings) -> Settings {
    if let Some(threshold) = cli.threshold {
        settings.change_threshold = threshold;
    }
    if let Some(sensitivity) = cli.sensitivity {
        settings.sensitivity = sensitivity;
    }
    if let Some(min_scene_len) = cli.min_scene_len {
        settings.min_scene_len = min_scene_len;
    }
    if let Some(output_dir) = &cli.output_dir {
        settings.output_dir = output_dir.clone();
    }
    if cli.display.is_some() {
        settings.display = cli.display;
    }
    settings
}

fn select_region(
    input: &Path,
    preview: &Path,
    display: Option<(u32, u32)>,
) -> Result<Option<Region>, Box<dyn std::error::Error>> {
    let frame = first_frame(&mut FfmpegReader::new(), input)?;
    eprintln!(
        "Open {} in an image viewer and type selection commands; 'confirm' to accept, 'cancel' to abort.",
        preview.display()
    );

    let mut use_case = SelectRegionUseCase::new(
        Box::new(FixedDisplayProbe::new(display)),
        Box::new(PngPreviewSurface::new(
            preview,
            Box::new(ImageFileWriter::new()),
        )),
        Box::new(LineSelectionInput::new(BufReader::new(io::stdin()))),
    );
    use_case.execute(&frame)
}

fn scan(
    input: &Path,
    region: Region,
    config: DetectorConfig,
    output_dir: &Path,
) -> Result<ScanReport, Box<dyn std::error::Error>> {
    let gate = ScanGate::new();
    let job = ScanJob::new(input, Some(region), config, output_dir);
    let (rx, cancel) = scan_worker::spawn(&gate, job)?;
    if let Err(e) = cancel_on_interrupt(cancel) {
        log::warn!("Ctrl-C will abort without a report: {e}");
    }
    wait_for_report(&rx)
}

fn wait_for_report(rx: &Receiver<ScanMessage>) -> Result<ScanReport, Box<dyn std::error::Error>> {
    for message in rx.iter() {
        match message {
            ScanMessage::Progress(percent) => eprint!("\rScanning... {percent:5.1}%"),
            ScanMessage::Finished(report) => {
                eprintln!();
                return Ok(report);
            }
            ScanMessage::Error(e) => {
                eprintln!();
                return Err(e.into());
            }
        }
    }
    Err("Scan worker exited without a result".into())
}

/// Sets `cancel` on the first Ctrl-C or SIGTERM so the scan stops at the
/// next frame and its partial report is still printed. A second signal
/// exits right away.
fn cancel_on_interrupt(cancel: Arc<AtomicBool>) -> io::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_io()
        .build()?;
    thread::spawn(move || {
        runtime.block_on(async {
            if let Err(e) = interrupt_signal().await {
                log::warn!("Failed to listen for Ctrl-C: {e}");
                return;
            }
            eprintln!("\nCancelling scan; press Ctrl-C again to quit");
            cancel.store(true, Ordering::Relaxed);
            if interrupt_signal().await.is_ok() {
                process::exit(130);
            }
        });
    });
    Ok(())
}

#[cfg(unix)]
async fn interrupt_signal() -> io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};
    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result,
        _ = terminate.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn interrupt_signal() -> io::Result<()> {
    tokio::signal::ctrl_c().await
}

fn print_events(report: &ScanReport) {
    for event in &report.events {
        println!(
            "{}\tframe {}\t{:.3}s\t{}",
            event.timestamp,
            event.frame_number,
            event.time_seconds,
            event.screenshot_path.display()
        );
    }
    log::info!(
        "{} change events in {} frames",
        report.events.len(),
        report.frames_processed
    );
    if report.screenshot_failures > 0 {
        log::warn!(
            "{} screenshots could not be written",
            report.screenshot_failures
        );
    }
}

fn validate(cli: &Cli, config: &DetectorConfig) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(ScanError::NotFound(cli.input.clone()).into());
    }
    if !is_video(&cli.input) {
        log::warn!(
            "{} does not have a known video extension ({})",
            cli.input.display(),
            VIDEO_EXTENSIONS.join(", ")
        );
    }
    if !cli.select && cli.region.is_none() {
        return Err("Either --region or --select is required".into());
    }
    config.validate()?;
    Ok(())
}

fn is_video(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn parse_resolution(value: &str) -> Result<(u32, u32), String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{value}'"))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<u32>()
            .ok()
            .filter(|&v| v > 0)
            .ok_or_else(|| format!("'{s}' is not a positive integer"))
    };
    Ok((parse(w)?, parse(h)?))
}
