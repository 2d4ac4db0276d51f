use std::path::Path;

use crate::selection::domain::display_probe::DisplayProbe;
use crate::selection::domain::display_scale::DisplayScale;
use crate::selection::domain::selection::{RegionSelection, SelectionStep};
use crate::selection::domain::selection_input::SelectionInput;
use crate::selection::domain::selection_surface::SelectionSurface;
use crate::shared::error::ScanError;
use crate::shared::frame::Frame;
use crate::shared::region::Region;
use crate::video::domain::video_reader::VideoReader;

/// Lets the user drag out the region of interest on a single frame.
///
/// The frame is shown downscaled to fit the display; every rectangle the
/// user draws lives in display coordinates until confirmation, when it is
/// mapped back to source pixels and clamped to the frame. Cancelling,
/// closing the input, or confirming a zero-area rectangle yields `None`.
pub struct SelectRegionUseCase {
    probe: Box<dyn DisplayProbe>,
    surface: Box<dyn SelectionSurface>,
    input: Box<dyn SelectionInput>,
}

impl SelectRegionUseCase {
    pub fn new(
        probe: Box<dyn DisplayProbe>,
        surface: Box<dyn SelectionSurface>,
        input: Box<dyn SelectionInput>,
    ) -> Self {
        Self {
            probe,
            surface,
            input,
        }
    }

    pub fn execute(&mut self, frame: &Frame) -> Result<Option<Region>, Box<dyn std::error::Error>> {
        let (fw, fh) = (frame.width(), frame.height());
        let scale = DisplayScale::fit((fw, fh), self.probe.resolution());
        let display = if scale.is_downscaled() {
            let (dw, dh) = scale.display_size(fw, fh);
            log::debug!("Selection preview scaled {fw}x{fh} -> {dw}x{dh}");
            frame.resize(dw, dh)?
        } else {
            frame.clone()
        };

        let result = self.interact(&display);
        self.surface.close();

        let rect = match result? {
            Some(rect) => rect,
            None => {
                log::info!("Region selection cancelled");
                return Ok(None);
            }
        };
        let region = scale.to_region(rect, fw, fh);
        match &region {
            Some(r) => log::info!("Selected region {r}"),
            None => log::warn!("Selection has no area inside the frame"),
        }
        Ok(region)
    }

    /// Runs the event loop until a terminal step.
    fn interact(
        &mut self,
        display: &Frame,
    ) -> Result<Option<crate::selection::domain::selection::DisplayRect>, Box<dyn std::error::Error>>
    {
        let mut selection = RegionSelection::new();
        self.surface.show(display, None)?;
        while let Some(event) = self.input.next_event() {
            let before = selection.overlay();
            match selection.handle(event) {
                SelectionStep::Continue => {}
                SelectionStep::Confirmed(None) => {
                    log::warn!("Nothing selected yet; draw a rectangle first");
                    continue;
                }
                SelectionStep::Confirmed(rect) => return Ok(rect),
                SelectionStep::Cancelled => return Ok(None),
            }
            if selection.overlay() != before {
                self.surface.show(display, selection.overlay())?;
            }
        }
        Ok(None)
    }
}

/// Decodes the first frame of `path`, closing the reader afterwards.
pub fn first_frame(reader: &mut dyn VideoReader, path: &Path) -> Result<Frame, ScanError> {
    if !path.exists() {
        return Err(ScanError::NotFound(path.to_path_buf()));
    }
    let open_failed = |reason: String| ScanError::OpenFailed {
        path: path.to_path_buf(),
        reason,
    };
    reader.open(path).map_err(|e| open_failed(e.to_string()))?;
    let first = reader.frames().next();
    reader.close();
    match first {
        Some(Ok(frame)) => Ok(frame),
        Some(Err(e)) => Err(open_failed(e.to_string())),
        None => Err(open_failed("stream contains no frames".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::domain::selection::{DisplayRect, SelectionEvent};
    use crate::selection::infrastructure::fixed_display_probe::FixedDisplayProbe;
    use crate::shared::video_metadata::VideoMetadata;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    // --- Stubs ---

    #[allow(clippy::type_complexity)]
    struct RecordingSurface {
        shown: Arc<Mutex<Vec<((u32, u32), Option<DisplayRect>)>>>,
        closed: Arc<Mutex<bool>>,
    }

    impl SelectionSurface for RecordingSurface {
        fn show(
            &mut self,
            frame: &Frame,
            overlay: Option<DisplayRect>,
        ) -> Result<(), Box<dyn std::error::Error>> {
            self.shown
                .lock()
                .unwrap()
                .push(((frame.width(), frame.height()), overlay));
            Ok(())
        }

        fn close(&mut self) {
            *self.closed.lock().unwrap() = true;
        }
    }

    struct ScriptedInput(VecDeque<SelectionEvent>);

    impl SelectionInput for ScriptedInput {
        fn next_event(&mut self) -> Option<SelectionEvent> {
            self.0.pop_front()
        }
    }

    struct Harness {
        use_case: SelectRegionUseCase,
        #[allow(clippy::type_complexity)]
        shown: Arc<Mutex<Vec<((u32, u32), Option<DisplayRect>)>>>,
        closed: Arc<Mutex<bool>>,
    }

    fn harness(display: (u32, u32), events: Vec<SelectionEvent>) -> Harness {
        let shown = Arc::new(Mutex::new(Vec::new()));
        let closed = Arc::new(Mutex::new(false));
        let surface = RecordingSurface {
            shown: shown.clone(),
            closed: closed.clone(),
        };
        Harness {
            use_case: SelectRegionUseCase::new(
                Box::new(FixedDisplayProbe::new(Some(display))),
                Box::new(surface),
                Box::new(ScriptedInput(events.into())),
            ),
            shown,
            closed,
        }
    }

    fn frame(w: u32, h: u32) -> Frame {
        Frame::new(vec![90u8; (w * h * 3) as usize], w, h, 3, 0)
    }

    fn drag(x1: i32, y1: i32, x2: i32, y2: i32) -> Vec<SelectionEvent> {
        vec![
            SelectionEvent::Press { x: x1, y: y1 },
            SelectionEvent::Drag { x: x2, y: y2 },
            SelectionEvent::Release { x: x2, y: y2 },
        ]
    }

    fn with(mut events: Vec<SelectionEvent>, last: SelectionEvent) -> Vec<SelectionEvent> {
        events.push(last);
        events
    }

    // --- Tests ---

    #[test]
    fn test_native_scale_returns_display_rect_unchanged() {
        let mut h = harness(
            (1920, 1080),
            with(drag(10, 20, 110, 70), SelectionEvent::Confirm),
        );
        let region = h.use_case.execute(&frame(640, 480)).unwrap();
        assert_eq!(region, Some(Region::new(10, 20, 100, 50).unwrap()));
        assert_eq!(h.shown.lock().unwrap()[0].0, (640, 480));
        assert!(*h.closed.lock().unwrap());
    }

    #[test]
    fn test_downscaled_selection_maps_to_source_pixels() {
        // 3840x2160 on 1920x1080 -> factor 0.45, preview 1728x972.
        let mut h = harness(
            (1920, 1080),
            with(drag(90, 45, 450, 315), SelectionEvent::Confirm),
        );
        let region = h.use_case.execute(&frame(3840, 2160)).unwrap();
        assert_eq!(region, Some(Region::new(200, 100, 800, 600).unwrap()));
        assert_eq!(h.shown.lock().unwrap()[0].0, (1728, 972));
    }

    #[test]
    fn test_reversed_drag_is_normalized() {
        let mut h = harness(
            (1920, 1080),
            with(drag(110, 70, 10, 20), SelectionEvent::Confirm),
        );
        let region = h.use_case.execute(&frame(640, 480)).unwrap();
        assert_eq!(region, Some(Region::new(10, 20, 100, 50).unwrap()));
    }

    #[test]
    fn test_drag_past_frame_is_clamped() {
        let mut h = harness(
            (1920, 1080),
            with(drag(600, 400, 700, 500), SelectionEvent::Confirm),
        );
        let region = h.use_case.execute(&frame(640, 480)).unwrap();
        assert_eq!(region, Some(Region::new(600, 400, 40, 80).unwrap()));
    }

    #[test]
    fn test_zero_area_selection_is_none() {
        let mut h = harness(
            (1920, 1080),
            with(drag(50, 50, 50, 90), SelectionEvent::Confirm),
        );
        assert_eq!(h.use_case.execute(&frame(640, 480)).unwrap(), None);
    }

    #[test]
    fn test_cancel_returns_none() {
        let mut h = harness(
            (1920, 1080),
            with(drag(10, 10, 50, 50), SelectionEvent::Cancel),
        );
        assert_eq!(h.use_case.execute(&frame(640, 480)).unwrap(), None);
        assert!(*h.closed.lock().unwrap());
    }

    #[test]
    fn test_input_closed_returns_none() {
        let mut h = harness((1920, 1080), drag(10, 10, 50, 50));
        assert_eq!(h.use_case.execute(&frame(640, 480)).unwrap(), None);
    }

    #[test]
    fn test_reset_then_redraw() {
        let mut events = drag(0, 0, 20, 20);
        events.push(SelectionEvent::Reset);
        events.extend(drag(30, 30, 60, 50));
        events.push(SelectionEvent::Confirm);
        let mut h = harness((1920, 1080), events);

        let region = h.use_case.execute(&frame(640, 480)).unwrap();
        assert_eq!(region, Some(Region::new(30, 30, 30, 20).unwrap()));
        // The reset cleared the overlay on screen.
        assert!(h.shown.lock().unwrap().iter().any(|(_, o)| o.is_none()));
    }

    #[test]
    fn test_confirm_without_rectangle_keeps_waiting() {
        let mut events = vec![SelectionEvent::Confirm];
        events.extend(drag(5, 5, 25, 15));
        events.push(SelectionEvent::Confirm);
        let mut h = harness((1920, 1080), events);

        let region = h.use_case.execute(&frame(640, 480)).unwrap();
        assert_eq!(region, Some(Region::new(5, 5, 20, 10).unwrap()));
    }

    #[test]
    fn test_overlay_redrawn_while_dragging() {
        let mut h = harness(
            (1920, 1080),
            with(drag(10, 10, 40, 40), SelectionEvent::Confirm),
        );
        h.use_case.execute(&frame(640, 480)).unwrap();
        let shown = h.shown.lock().unwrap();
        assert_eq!(shown[0].1, None);
        assert!(shown.len() >= 3);
        assert_eq!(
            shown.last().unwrap().1,
            Some(DisplayRect {
                x: 10,
                y: 10,
                width: 30,
                height: 30
            })
        );
    }

    // --- first_frame ---

    struct OneShotReader {
        frames: Vec<Frame>,
        closed: bool,
    }

    impl VideoReader for OneShotReader {
        fn open(&mut self, _path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
            Ok(VideoMetadata {
                width: 4,
                height: 4,
                fps: 25.0,
                total_frames: self.frames.len(),
                codec: "stub".into(),
                source_path: None,
            })
        }

        fn frames(
            &mut self,
        ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
            Box::new(self.frames.drain(..).map(Ok))
        }

        fn close(&mut self) {
            self.closed = true;
        }
    }

    #[test]
    fn test_first_frame_returns_index_zero_and_closes() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut reader = OneShotReader {
            frames: (0..3)
                .map(|i| Frame::new(vec![0u8; 48], 4, 4, 3, i))
                .collect(),
            closed: false,
        };
        let frame = first_frame(&mut reader, file.path()).unwrap();
        assert_eq!(frame.index(), 0);
        assert!(reader.closed);
    }

    #[test]
    fn test_first_frame_of_empty_stream_fails() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut reader = OneShotReader {
            frames: Vec::new(),
            closed: false,
        };
        assert!(matches!(
            first_frame(&mut reader, file.path()),
            Err(ScanError::OpenFailed { .. })
        ));
    }

    #[test]
    fn test_first_frame_missing_file() {
        let mut reader = OneShotReader {
            frames: Vec::new(),
            closed: false,
        };
        assert!(matches!(
            first_frame(&mut reader, Path::new("/nonexistent/clip.mp4")),
            Err(ScanError::NotFound(_))
        ));
    }
}
