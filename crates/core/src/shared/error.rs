use std::path::PathBuf;

use thiserror::Error;

/// Broad class of a [`ScanError`], used by callers to decide how to surface it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// User-correctable input problem; never retried.
    Input,
    /// Decode failure discovered while scanning.
    Stream,
    /// Filesystem or encoder failure while persisting output.
    Io,
    /// A scan is already running.
    State,
}

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("video file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to open video {path}: {reason}")]
    OpenFailed { path: PathBuf, reason: String },
    #[error("video {0} reports no usable frame rate")]
    NoTimeline(PathBuf),
    #[error("no region of interest selected")]
    MissingRegion,
    #[error("invalid region: {0}")]
    InvalidRegion(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("frame {frame_number}: {reason}")]
    Stream { frame_number: usize, reason: String },
    #[error("failed to write {path}: {reason}")]
    Write { path: PathBuf, reason: String },
    #[error("a scan is already in progress")]
    Busy,
}

impl ScanError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScanError::NotFound(_)
            | ScanError::OpenFailed { .. }
            | ScanError::NoTimeline(_)
            | ScanError::MissingRegion
            | ScanError::InvalidRegion(_)
            | ScanError::InvalidConfig(_) => ErrorKind::Input,
            ScanError::Stream { .. } => ErrorKind::Stream,
            ScanError::Write { .. } => ErrorKind::Io,
            ScanError::Busy => ErrorKind::State,
        }
    }
}
