use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One detected content shift inside the region, paired with its screenshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Wall-clock label `YYYYMMDD_HHMMSS_mmm` taken when the event fired.
    pub timestamp: String,
    /// 1-based position of the frame in the stream.
    pub frame_number: usize,
    /// `frame_number / fps`.
    pub time_seconds: f64,
    pub screenshot_path: PathBuf,
}
