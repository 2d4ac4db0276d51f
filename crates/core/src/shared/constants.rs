/// Luminance difference (0-255) at or above which a pixel counts as changed.
pub const DIFF_CUTOFF: u8 = 30;

pub const DEFAULT_CHANGE_THRESHOLD: usize = 500;
pub const DEFAULT_SENSITIVITY: f64 = 30.0;
pub const DEFAULT_MIN_SCENE_LEN: usize = 15;

/// At most one change event per this many seconds of video timeline.
pub const EVENT_WINDOW_SECONDS: f64 = 1.0;

/// Absorbs float error in `frame_number / fps` ratios when comparing times.
pub const TIMELINE_EPSILON: f64 = 1e-9;

/// Fraction of the display the selection preview may occupy.
pub const DISPLAY_MARGIN: f64 = 0.9;

/// Used when the display resolution cannot be determined.
pub const FALLBACK_DISPLAY_RESOLUTION: (u32, u32) = (1920, 1080);

pub const DEFAULT_SCREENSHOT_DIR: &str = "screenshots";
pub const SCREENSHOT_PREFIX: &str = "screenshot_";
pub const SCREENSHOT_EXTENSION: &str = "png";

/// `chrono` format for screenshot labels: `YYYYMMDD_HHMMSS_mmm`.
pub const TIMESTAMP_LABEL_FORMAT: &str = "%Y%m%d_%H%M%S_%3f";

pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv"];

/// Absorbs float error when dividing display coordinates by the scale factor.
pub const SCALE_EPSILON: f64 = 1e-6;

/// Outline drawn over the selection preview.
pub const SELECTION_OUTLINE_RGB: [u8; 3] = [0, 255, 0];
pub const SELECTION_OUTLINE_THICKNESS: u32 = 2;
