use crate::events::domain::wall_clock::WallClock;
use crate::shared::constants::TIMESTAMP_LABEL_FORMAT;

/// Local wall clock via `chrono`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl WallClock for SystemClock {
    fn timestamp_label(&self) -> String {
        chrono::Local::now()
            .format(TIMESTAMP_LABEL_FORMAT)
            .to_string()
    }
}
