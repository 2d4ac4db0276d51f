use std::path::PathBuf;

use crate::shared::error::ScanError;
use crate::shared::frame::Frame;

/// Persists the frame that triggered a change event.
pub trait ScreenshotWriter: Send {
    /// Encodes `frame` under a name derived from `label` and returns the path written.
    ///
    /// Never overwrites an existing file.
    fn save(&mut self, frame: &Frame, label: &str) -> Result<PathBuf, ScanError>;
}
