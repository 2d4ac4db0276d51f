/// Source of wall-clock labels for events and screenshot names.
pub trait WallClock: Send {
    /// Current local time as `YYYYMMDD_HHMMSS_mmm`.
    fn timestamp_label(&self) -> String;
}
