//! Region-scoped change detection for video files.
//!
//! A scan decodes a video, compares each frame with its predecessor inside
//! a region of interest and captures a screenshot for at most one change
//! per second of video time. The region itself can be picked interactively
//! on the first frame.

pub mod shared {
    pub mod constants;
    pub mod error;
    pub mod frame;
    pub mod region;
    pub mod video_metadata;
}

pub mod video {
    pub mod domain {
        pub mod image_writer;
        pub mod video_reader;
    }
    pub mod infrastructure {
        pub mod ffmpeg_reader;
        pub mod image_file_writer;
        #[cfg(test)]
        pub(crate) mod test_video;
    }
}

pub mod detection {
    pub mod domain {
        pub mod change_detector;
        pub mod frame_diff;
    }
    pub mod infrastructure;
}

pub mod events {
    pub mod domain {
        pub mod change_event;
        pub mod event_throttler;
        pub mod screenshot_writer;
        pub mod wall_clock;
    }
    pub mod infrastructure {
        pub mod file_screenshot_writer;
        pub mod system_clock;
    }
}

pub mod selection {
    pub mod domain {
        pub mod display_probe;
        pub mod display_scale;
        pub mod selection;
        pub mod selection_input;
        pub mod selection_surface;
    }
    pub mod infrastructure {
        pub mod fixed_display_probe;
        pub mod line_selection_input;
        pub mod png_preview_surface;
    }
}

pub mod pipeline {
    pub mod progress_tracker;
    pub mod scan_logger;
    pub mod scan_session;
    pub mod scan_video_use_case;
    pub mod select_region_use_case;
    pub mod infrastructure {
        pub mod scan_worker;
    }
}
