use std::path::PathBuf;

/// Stream properties reported by a [`VideoReader`](crate::video::domain::video_reader::VideoReader).
///
/// `total_frames` comes from the container and may be an estimate or 0
/// when unknown; callers must not rely on it for anything but progress.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub total_frames: usize,
    pub codec: String,
    pub source_path: Option<PathBuf>,
}

impl VideoMetadata {
    /// True when `fps` is finite and positive, i.e. frame times are defined.
    pub fn has_timeline(&self) -> bool {
        self.fps.is_finite() && self.fps > 0.0
    }

    /// Video-timeline time of a 1-based frame number, in seconds.
    pub fn time_at(&self, frame_number: usize) -> Option<f64> {
        self.has_timeline()
            .then(|| frame_number as f64 / self.fps)
    }

    pub fn duration_seconds(&self) -> Option<f64> {
        self.time_at(self.total_frames)
    }
}
