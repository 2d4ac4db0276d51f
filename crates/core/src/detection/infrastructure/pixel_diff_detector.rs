use ndarray::Array2;

use crate::detection::domain::change_detector::{ChangeDetector, DetectorConfig};
use crate::detection::domain::frame_diff::count_changed_pixels;
use crate::shared::constants::DIFF_CUTOFF;
use crate::shared::error::ScanError;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Frame-differencing detector restricted to an optional region of interest.
///
/// Each frame is cropped to the region, reduced to luminance and compared
/// against the immediately preceding frame. Only the cropped luminance
/// plane of the previous frame is retained, and it is replaced on every
/// call whether or not a change was reported, so slow drift is measured
/// transition by transition rather than against a fixed baseline.
pub struct PixelDiffDetector {
    region: Option<Region>,
    config: DetectorConfig,
    cutoff: u8,
    previous: Option<Array2<u8>>,
    last_changed_pixels: Option<usize>,
}

impl PixelDiffDetector {
    pub fn new(region: Option<Region>, config: DetectorConfig) -> Self {
        Self {
            region,
            config,
            cutoff: DIFF_CUTOFF,
            previous: None,
            last_changed_pixels: None,
        }
    }

    pub fn with_cutoff(mut self, cutoff: u8) -> Self {
        self.cutoff = cutoff;
        self
    }

    pub fn region(&self) -> Option<&Region> {
        self.region.as_ref()
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    fn luminance_of_interest(&self, frame: &Frame) -> Result<Array2<u8>, ScanError> {
        match &self.region {
            Some(region) => Ok(frame.crop(region)?.luminance()),
            None => Ok(frame.luminance()),
        }
    }
}

impl ChangeDetector for PixelDiffDetector {
    fn configure(&mut self, region: Option<Region>, config: DetectorConfig) {
        self.region = region;
        self.config = config;
        self.reset();
    }

    fn detect(&mut self, frame: &Frame) -> Result<bool, ScanError> {
        let current = self.luminance_of_interest(frame)?;
        let comparison = self
            .previous
            .as_ref()
            .map(|previous| compare_planes(previous, &current, self.cutoff));
        self.previous = Some(current);

        let Some(comparison) = comparison else {
            self.last_changed_pixels = None;
            return Ok(false);
        };
        let changed = comparison.map_err(|reason| ScanError::Stream {
            frame_number: frame.index() + 1,
            reason,
        })?;
        self.last_changed_pixels = Some(changed);
        Ok(changed > self.config.change_threshold)
    }

    fn reset(&mut self) {
        self.previous = None;
        self.last_changed_pixels = None;
    }

    fn last_changed_pixels(&self) -> Option<usize> {
        self.last_changed_pixels
    }
}

fn compare_planes(previous: &Array2<u8>, current: &Array2<u8>, cutoff: u8) -> Result<usize, String> {
    if previous.shape() != current.shape() {
        return Err(format!(
            "frame size changed mid-stream ({:?} -> {:?})",
            previous.shape(),
            current.shape()
        ));
    }
    Ok(count_changed_pixels(previous.view(), current.view(), cutoff))
}
