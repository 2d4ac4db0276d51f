use serde::{Deserialize, Serialize};

use crate::shared::constants::{
    DEFAULT_CHANGE_THRESHOLD, DEFAULT_MIN_SCENE_LEN, DEFAULT_SENSITIVITY,
};
use crate::shared::error::ScanError;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// User-facing detection parameters.
///
/// Only `change_threshold` takes part in the decision. `sensitivity` and
/// `min_scene_len` are accepted, validated and reported, but no detector
/// consults them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// 0..=100, display-only.
    pub sensitivity: f64,
    /// Changed pixels (after binarization) needed to call a frame changed.
    pub change_threshold: usize,
    /// Minimum scene length in frames, display-only.
    pub min_scene_len: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            sensitivity: DEFAULT_SENSITIVITY,
            change_threshold: DEFAULT_CHANGE_THRESHOLD,
            min_scene_len: DEFAULT_MIN_SCENE_LEN,
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<(), ScanError> {
        if !(0.0..=100.0).contains(&self.sensitivity) {
            return Err(ScanError::InvalidConfig(format!(
                "sensitivity must be between 0 and 100, got {}",
                self.sensitivity
            )));
        }
        Ok(())
    }
}

/// Stateful comparator deciding whether a frame differs from its predecessor.
///
/// Implementations keep the previous frame, hence `&mut self`. The first
/// frame after construction or [`reset`](ChangeDetector::reset) only seeds
/// that state and never reports a change.
pub trait ChangeDetector: Send {
    /// Sets the region and parameters for the next run and clears any
    /// previous frame. Neither changes while a run is in progress.
    fn configure(&mut self, region: Option<Region>, config: DetectorConfig);

    fn detect(&mut self, frame: &Frame) -> Result<bool, ScanError>;

    /// Forgets the previous frame so the next call seeds a new baseline.
    fn reset(&mut self);

    /// Changed-pixel count of the most recent comparison, if any.
    fn last_changed_pixels(&self) -> Option<usize> {
        None
    }
}
