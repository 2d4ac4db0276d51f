use std::path::PathBuf;

use crate::selection::domain::selection::DisplayRect;
use crate::selection::domain::selection_surface::SelectionSurface;
use crate::shared::constants::{SELECTION_OUTLINE_RGB, SELECTION_OUTLINE_THICKNESS};
use crate::shared::frame::Frame;
use crate::video::domain::image_writer::ImageWriter;

/// Selection surface that renders each update to an image file.
///
/// Lets a terminal user open the file in any viewer, drive the selection
/// from text input and re-open the file to see the outline move.
pub struct PngPreviewSurface {
    path: PathBuf,
    image_writer: Box<dyn ImageWriter>,
}

impl PngPreviewSurface {
    pub fn new(path: impl Into<PathBuf>, image_writer: Box<dyn ImageWriter>) -> Self {
        Self {
            path: path.into(),
            image_writer,
        }
    }
}

impl SelectionSurface for PngPreviewSurface {
    fn show(
        &mut self,
        frame: &Frame,
        overlay: Option<DisplayRect>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut canvas = frame.clone();
        if let Some(rect) = overlay {
            draw_outline(&mut canvas, rect, SELECTION_OUTLINE_RGB, SELECTION_OUTLINE_THICKNESS);
        }
        self.image_writer.write(&self.path, &canvas)?;
        log::debug!("Preview written to {}", self.path.display());
        Ok(())
    }
}

/// Draws a rectangle outline `thickness` pixels wide inside `rect`,
/// clipped to the frame. Frames with fewer than 3 channels get the
/// first color component.
pub fn draw_outline(frame: &mut Frame, rect: DisplayRect, color: [u8; 3], thickness: u32) {
    let (fw, fh) = (frame.width() as i64, frame.height() as i64);
    let x0 = rect.x as i64;
    let y0 = rect.y as i64;
    let x1 = x0 + rect.width as i64;
    let y1 = y0 + rect.height as i64;
    let t = thickness as i64;
    let channels = frame.channels() as usize;
    let mut pixels = frame.as_ndarray_mut();

    for y in y0.max(0)..y1.min(fh) {
        for x in x0.max(0)..x1.min(fw) {
            let on_edge = x < x0 + t || x >= x1 - t || y < y0 + t || y >= y1 - t;
            if !on_edge {
                continue;
            }
            for c in 0..channels.min(3) {
                pixels[[y as usize, x as usize, c]] = color[c];
            }
        }
    }
}
