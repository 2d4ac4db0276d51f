use crate::selection::domain::selection::SelectionEvent;

/// Blocking source of selection events.
pub trait SelectionInput: Send {
    /// Waits for the next event; `None` means the input closed.
    fn next_event(&mut self) -> Option<SelectionEvent>;
}
