use ndarray::{ArrayView2, Zip};

/// Counts pixels whose absolute luminance difference is at least `cutoff`.
///
/// Both planes must have the same shape.
pub fn count_changed_pixels(previous: ArrayView2<u8>, current: ArrayView2<u8>, cutoff: u8) -> usize {
    debug_assert_eq!(previous.shape(), current.shape());
    let mut count = 0usize;
    Zip::from(previous).and(current).for_each(|&a, &b| {
        if a.abs_diff(b) >= cutoff {
            count += 1;
        }
    });
    count
}
