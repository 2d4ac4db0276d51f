/// Pointer and keyboard input driving a region selection, in display pixels.
///
/// Coordinates are signed because a drag may leave the preview surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionEvent {
    Press { x: i32, y: i32 },
    Drag { x: i32, y: i32 },
    Release { x: i32, y: i32 },
    Confirm,
    Reset,
    Cancel,
}

/// Axis-aligned rectangle in display coordinates with non-negative size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl DisplayRect {
    /// Normalizes two opposite corners so `(x, y)` is the top-left one.
    ///
    /// Extents wider than `i32::MAX` saturate.
    pub fn from_corners(a: (i32, i32), b: (i32, i32)) -> Self {
        let (x1, x2) = (a.0.min(b.0), a.0.max(b.0));
        let (y1, y2) = (a.1.min(b.1), a.1.max(b.1));
        Self {
            x: x1,
            y: y1,
            width: extent(x1, x2),
            height: extent(y1, y2),
        }
    }
}

fn extent(lo: i32, hi: i32) -> i32 {
    (hi as i64 - lo as i64).min(i32::MAX as i64) as i32
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionState {
    Idle,
    Dragging {
        anchor: (i32, i32),
        current: (i32, i32),
    },
    /// A rectangle was released and awaits confirmation.
    Previewing,
}

/// Result of feeding one event to a [`RegionSelection`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionStep {
    Continue,
    /// Confirm pressed; carries the candidate, if one was drawn.
    Confirmed(Option<DisplayRect>),
    Cancelled,
}

/// Drag-to-select state machine, independent of any rendering surface.
///
/// `Idle -> Dragging -> Previewing -> {Confirmed, Reset -> Idle, Cancelled}`.
/// A new press while previewing starts a fresh drag; the previous candidate
/// stays until the new drag is released.
#[derive(Clone, Debug)]
pub struct RegionSelection {
    state: SelectionState,
    candidate: Option<DisplayRect>,
}

impl RegionSelection {
    pub fn new() -> Self {
        Self {
            state: SelectionState::Idle,
            candidate: None,
        }
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn candidate(&self) -> Option<DisplayRect> {
        self.candidate
    }

    /// Rectangle to draw: the live drag if one is in progress, else the candidate.
    pub fn overlay(&self) -> Option<DisplayRect> {
        match self.state {
            SelectionState::Dragging { anchor, current } => {
                Some(DisplayRect::from_corners(anchor, current))
            }
            _ => self.candidate,
        }
    }

    pub fn handle(&mut self, event: SelectionEvent) -> SelectionStep {
        match event {
            SelectionEvent::Press { x, y } => {
                self.state = SelectionState::Dragging {
                    anchor: (x, y),
                    current: (x, y),
                };
            }
            SelectionEvent::Drag { x, y } => {
                if let SelectionState::Dragging { anchor, .. } = self.state {
                    self.state = SelectionState::Dragging {
                        anchor,
                        current: (x, y),
                    };
                }
            }
            SelectionEvent::Release { x, y } => {
                if let SelectionState::Dragging { anchor, .. } = self.state {
                    self.candidate = Some(DisplayRect::from_corners(anchor, (x, y)));
                    self.state = SelectionState::Previewing;
                }
            }
            SelectionEvent::Reset => {
                self.candidate = None;
                self.state = SelectionState::Idle;
            }
            SelectionEvent::Confirm => return SelectionStep::Confirmed(self.candidate),
            SelectionEvent::Cancel => return SelectionStep::Cancelled,
        }
        SelectionStep::Continue
    }
}

impl Default for RegionSelection {
    fn default() -> Self {
        Self::new()
    }
}
