use crate::selection::domain::selection::DisplayRect;
use crate::shared::frame::Frame;

/// Render target for the selection preview.
pub trait SelectionSurface: Send {
    /// Shows the display-scaled frame with an optional rectangle overlay.
    fn show(
        &mut self,
        frame: &Frame,
        overlay: Option<DisplayRect>,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Tears down the surface once the interaction ends. Default: no-op.
    fn close(&mut self) {}
}
