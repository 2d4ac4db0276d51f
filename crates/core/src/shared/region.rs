use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::shared::error::ScanError;

/// Region of interest in source-frame pixel coordinates.
///
/// Always non-degenerate: `width > 0` and `height > 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Result<Self, ScanError> {
        if width == 0 || height == 0 {
            return Err(ScanError::InvalidRegion(format!(
                "width and height must be positive, got {width}x{height}"
            )));
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// Clips a possibly out-of-bounds rectangle to `[0, frame_w) x [0, frame_h)`.
    ///
    /// Returns `None` when nothing of the rectangle remains inside the frame.
    pub fn clamped(
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        frame_w: u32,
        frame_h: u32,
    ) -> Option<Self> {
        let x1 = x.max(0);
        let y1 = y.max(0);
        let x2 = (x + width).min(frame_w as i64);
        let y2 = (y + height).min(frame_h as i64);
        if x2 <= x1 || y2 <= y1 {
            return None;
        }
        Some(Self {
            x: x1 as u32,
            y: y1 as u32,
            width: (x2 - x1) as u32,
            height: (y2 - y1) as u32,
        })
    }

    pub fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    pub fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    pub fn fits_within(&self, frame_w: u32, frame_h: u32) -> bool {
        self.width > 0
            && self.height > 0
            && self.right() <= frame_w as u64
            && self.bottom() <= frame_h as u64
    }

    /// Fails with [`ScanError::InvalidRegion`] unless the region lies inside the frame.
    pub fn ensure_within(&self, frame_w: u32, frame_h: u32) -> Result<(), ScanError> {
        if self.fits_within(frame_w, frame_h) {
            Ok(())
        } else {
            Err(ScanError::InvalidRegion(format!(
                "{self} does not fit a {frame_w}x{frame_h} frame"
            )))
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x={}, y={}, w={}, h={}",
            self.x, self.y, self.width, self.height
        )
    }
}

/// Parses `x,y,width,height`.
impl FromStr for Region {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(ScanError::InvalidRegion(format!(
                "expected x,y,width,height, got '{s}'"
            )));
        }
        let mut values = [0u32; 4];
        for (value, part) in values.iter_mut().zip(&parts) {
            *value = part.parse().map_err(|_| {
                ScanError::InvalidRegion(format!("'{part}' is not a non-negative integer"))
            })?;
        }
        Region::new(values[0], values[1], values[2], values[3])
    }
}
