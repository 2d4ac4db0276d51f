use crate::selection::domain::selection::DisplayRect;
use crate::shared::constants::{DISPLAY_MARGIN, SCALE_EPSILON};
use crate::shared::region::Region;

/// Factor mapping source-frame pixels to display pixels for the selector.
///
/// Never above 1.0: frames that already fit are shown at native size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayScale {
    factor: f64,
}

impl DisplayScale {
    pub fn identity() -> Self {
        Self { factor: 1.0 }
    }

    /// `min(display_w / frame_w, display_h / frame_h) * 0.9`, capped at 1.0.
    pub fn fit(frame: (u32, u32), display: (u32, u32)) -> Self {
        let (fw, fh) = frame;
        let (dw, dh) = display;
        if fw == 0 || fh == 0 || dw == 0 || dh == 0 {
            return Self::identity();
        }
        let ratio = (dw as f64 / fw as f64).min(dh as f64 / fh as f64) * DISPLAY_MARGIN;
        Self {
            factor: ratio.min(1.0),
        }
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn is_downscaled(&self) -> bool {
        self.factor < 1.0
    }

    /// Size of the preview image shown to the user.
    pub fn display_size(&self, frame_w: u32, frame_h: u32) -> (u32, u32) {
        if !self.is_downscaled() {
            return (frame_w, frame_h);
        }
        (
            ((frame_w as f64 * self.factor) as u32).max(1),
            ((frame_h as f64 * self.factor) as u32).max(1),
        )
    }

    /// Maps a display rectangle back to source pixels, rounding toward zero.
    ///
    /// The result may extend past the frame; see [`to_region`](Self::to_region).
    pub fn to_source(&self, rect: DisplayRect) -> (i64, i64, i64, i64) {
        (
            self.unscale(rect.x),
            self.unscale(rect.y),
            self.unscale(rect.width),
            self.unscale(rect.height),
        )
    }

    /// Maps and clamps a display rectangle to a usable source region.
    ///
    /// Returns `None` when the selection has zero area inside the frame.
    pub fn to_region(&self, rect: DisplayRect, frame_w: u32, frame_h: u32) -> Option<Region> {
        let (x, y, w, h) = self.to_source(rect);
        Region::clamped(x, y, w, h, frame_w, frame_h)
    }

    fn unscale(&self, value: i32) -> i64 {
        let scaled = value as f64 / self.factor;
        (scaled + scaled.signum() * SCALE_EPSILON).trunc() as i64
    }
}
