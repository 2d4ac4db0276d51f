use crate::selection::domain::display_probe::DisplayProbe;
use crate::shared::constants::FALLBACK_DISPLAY_RESOLUTION;

/// Display probe returning a configured resolution.
///
/// Platform probing is left to the host; without a configured value the
/// common 1920x1080 is assumed.
#[derive(Clone, Copy, Debug)]
pub struct FixedDisplayProbe {
    resolution: (u32, u32),
}

impl FixedDisplayProbe {
    pub fn new(resolution: Option<(u32, u32)>) -> Self {
        Self {
            resolution: resolution.unwrap_or(FALLBACK_DISPLAY_RESOLUTION),
        }
    }
}

impl Default for FixedDisplayProbe {
    fn default() -> Self {
        Self::new(None)
    }
}

impl DisplayProbe for FixedDisplayProbe {
    fn resolution(&self) -> (u32, u32) {
        self.resolution
    }
}
