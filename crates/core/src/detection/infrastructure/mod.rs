pub mod pixel_diff_detector;
