/// Reports the resolution of the display the selector will be shown on.
pub trait DisplayProbe: Send {
    /// `(width, height)` in pixels.
    fn resolution(&self) -> (u32, u32);
}
