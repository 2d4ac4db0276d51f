use image::imageops::FilterType;
use ndarray::{s, Array2, ArrayView3, ArrayViewMut3, Axis};

use crate::shared::error::ScanError;
use crate::shared::region::Region;

/// A single decoded video frame: contiguous RGB bytes in row-major order.
///
/// Format conversion happens at I/O boundaries only; the domain layer
/// works with this type and the luminance plane derived from it.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Zero-based position in decode order.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    pub fn as_ndarray_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        ArrayViewMut3::from_shape(self.shape(), &mut self.data)
            .expect("Frame data length must match dimensions")
    }

    /// Copies out the pixels inside `region`, which must lie within the frame.
    pub fn crop(&self, region: &Region) -> Result<Frame, ScanError> {
        region.ensure_within(self.width, self.height)?;
        let (x, y) = (region.x as usize, region.y as usize);
        let (w, h) = (region.width as usize, region.height as usize);
        let data: Vec<u8> = self
            .as_ndarray()
            .slice(s![y..y + h, x..x + w, ..])
            .iter()
            .copied()
            .collect();
        Ok(Frame::new(
            data,
            region.width,
            region.height,
            self.channels,
            self.index,
        ))
    }

    /// Single-channel 8-bit luminance plane, shape `(height, width)`.
    ///
    /// Uses BT.601 weights in 14-bit fixed point so results match the
    /// usual `RGB -> GRAY` conversion bit for bit.
    pub fn luminance(&self) -> Array2<u8> {
        let view = self.as_ndarray();
        if self.channels < 3 {
            return view.index_axis(Axis(2), 0).to_owned();
        }
        Array2::from_shape_fn(
            (self.height as usize, self.width as usize),
            |(row, col)| luma(view[[row, col, 0]], view[[row, col, 1]], view[[row, col, 2]]),
        )
    }

    /// Returns a copy scaled to `width x height` with bilinear filtering.
    pub fn resize(&self, width: u32, height: u32) -> Result<Frame, Box<dyn std::error::Error>> {
        if width == self.width && height == self.height {
            return Ok(self.clone());
        }
        let data = match self.channels {
            1 => resize_pixels::<image::Luma<u8>>(self, width, height),
            3 => resize_pixels::<image::Rgb<u8>>(self, width, height),
            4 => resize_pixels::<image::Rgba<u8>>(self, width, height),
            n => return Err(format!("cannot resize a {n}-channel frame").into()),
        }
        .ok_or("Failed to create image from frame data")?;
        Ok(Frame::new(data, width, height, self.channels, self.index))
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}

fn luma(r: u8, g: u8, b: u8) -> u8 {
    const R: u32 = 4899;
    const G: u32 = 9617;
    const B: u32 = 1868;
    ((r as u32 * R + g as u32 * G + b as u32 * B + (1 << 13)) >> 14) as u8
}

fn resize_pixels<P>(frame: &Frame, width: u32, height: u32) -> Option<Vec<u8>>
where
    P: image::Pixel<Subpixel = u8> + 'static,
{
    let img = image::ImageBuffer::<P, Vec<u8>>::from_raw(
        frame.width(),
        frame.height(),
        frame.data().to_vec(),
    )?;
    Some(image::imageops::resize(&img, width, height, FilterType::Triangle).into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn gradient_frame(width: u32, height: u32) -> Frame {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for row in 0..height {
            for col in 0..width {
                data.extend_from_slice(&[col as u8, row as u8, 0]);
            }
        }
        Frame::new(data, width, height, 3, 0)
    }

    #[test]
    fn test_construction_and_accessors() {
        let data = vec![0u8; 12]; // 2x2x3
        let frame = Frame::new(data.clone(), 2, 2, 3, 5);
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.channels(), 3);
        assert_eq!(frame.index(), 5);
        assert_eq!(frame.data(), &data[..]);
    }

    #[test]
    #[should_panic(expected = "data length must equal width * height * channels")]
    fn test_mismatched_data_length_panics_in_debug() {
        Frame::new(vec![0u8; 10], 2, 2, 3, 0);
    }

    #[test]
    fn test_as_ndarray_shape() {
        let frame = Frame::new(vec![0u8; 24], 4, 2, 3, 0);
        assert_eq!(frame.as_ndarray().shape(), &[2, 4, 3]); // (height, width, channels)
    }

    #[test]
    fn test_as_ndarray_mut_modification() {
        let mut frame = Frame::new(vec![0u8; 12], 2, 2, 3, 0);
        frame.as_ndarray_mut()[[0, 1, 2]] = 128;
        assert_eq!(frame.data()[5], 128);
    }

    // ── Crop ─────────────────────────────────────────────────────────

    #[rstest]
    #[case::full(0, 0, 16, 12)]
    #[case::interior(3, 2, 5, 4)]
    #[case::bottom_right_corner(15, 11, 1, 1)]
    #[case::single_row(0, 6, 16, 1)]
    fn test_crop_dimensions(#[case] x: u32, #[case] y: u32, #[case] w: u32, #[case] h: u32) {
        let frame = gradient_frame(16, 12);
        let cropped = frame.crop(&Region::new(x, y, w, h).unwrap()).unwrap();
        assert_eq!((cropped.width(), cropped.height()), (w, h));
        assert_eq!(cropped.data().len(), (w * h * 3) as usize);
    }

    #[test]
    fn test_crop_copies_the_right_pixels() {
        let frame = gradient_frame(16, 12);
        let cropped = frame.crop(&Region::new(3, 2, 5, 4).unwrap()).unwrap();
        let arr = cropped.as_ndarray();
        // Gradient encodes (col, row) in R and G.
        assert_eq!(arr[[0, 0, 0]], 3);
        assert_eq!(arr[[0, 0, 1]], 2);
        assert_eq!(arr[[3, 4, 0]], 7);
        assert_eq!(arr[[3, 4, 1]], 5);
    }

    #[test]
    fn test_crop_keeps_index() {
        let frame = Frame::new(vec![0u8; 48], 4, 4, 3, 42);
        let cropped = frame.crop(&Region::new(1, 1, 2, 2).unwrap()).unwrap();
        assert_eq!(cropped.index(), 42);
    }

    #[test]
    fn test_crop_out_of_bounds_is_error() {
        let frame = gradient_frame(16, 12);
        assert!(frame.crop(&Region::new(10, 10, 10, 10).unwrap()).is_err());
    }

    // ── Luminance ────────────────────────────────────────────────────

    #[rstest]
    #[case::black([0, 0, 0], 0)]
    #[case::white([255, 255, 255], 255)]
    #[case::red([255, 0, 0], 76)]
    #[case::green([0, 255, 0], 150)]
    #[case::blue([0, 0, 255], 29)]
    fn test_luminance_weights(#[case] rgb: [u8; 3], #[case] expected: u8) {
        let frame = Frame::new(rgb.to_vec(), 1, 1, 3, 0);
        assert_eq!(frame.luminance()[[0, 0]], expected);
    }

    #[test]
    fn test_luminance_shape() {
        let frame = gradient_frame(7, 5);
        assert_eq!(frame.luminance().shape(), &[5, 7]);
    }

    #[test]
    fn test_luminance_single_channel_passthrough() {
        let frame = Frame::new(vec![1, 2, 3, 4], 2, 2, 1, 0);
        let luma = frame.luminance();
        assert_eq!(luma[[1, 0]], 3);
    }

    // ── Resize ───────────────────────────────────────────────────────

    #[test]
    fn test_resize_dimensions() {
        let frame = gradient_frame(40, 20);
        let resized = frame.resize(20, 10).unwrap();
        assert_eq!((resized.width(), resized.height()), (20, 10));
        assert_eq!(resized.data().len(), 20 * 10 * 3);
    }

    #[test]
    fn test_resize_same_size_is_copy() {
        let frame = gradient_frame(8, 8);
        let resized = frame.resize(8, 8).unwrap();
        assert_eq!(resized.data(), frame.data());
    }

    #[test]
    fn test_resize_uniform_color_preserved() {
        let frame = Frame::new(vec![90u8; 30 * 30 * 3], 30, 30, 3, 0);
        let resized = frame.resize(10, 10).unwrap();
        assert!(resized.data().iter().all(|&v| v == 90));
    }

    #[test]
    fn test_resize_unsupported_channels() {
        let frame = Frame::new(vec![0u8; 8], 2, 2, 2, 0);
        assert!(frame.resize(1, 1).is_err());
    }
}
