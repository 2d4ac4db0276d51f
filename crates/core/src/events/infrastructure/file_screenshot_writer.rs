use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::events::domain::screenshot_writer::ScreenshotWriter;
use crate::shared::constants::{SCREENSHOT_EXTENSION, SCREENSHOT_PREFIX};
use crate::shared::error::ScanError;
use crate::shared::frame::Frame;
use crate::video::domain::image_writer::ImageWriter;

/// Writes `screenshot_<label>.png` files into a fixed output directory.
///
/// The directory is created on the first save, so constructing the writer
/// never touches the filesystem. Two saves with the same label (same
/// millisecond) get `_1`, `_2`, ... suffixes instead of overwriting.
/// Names are claimed with `create_new` before encoding, so other writers
/// sharing the directory cannot collide either.
pub struct FileScreenshotWriter {
    output_dir: PathBuf,
    image_writer: Box<dyn ImageWriter>,
    dir_ready: bool,
}

impl FileScreenshotWriter {
    pub fn new(output_dir: impl Into<PathBuf>, image_writer: Box<dyn ImageWriter>) -> Self {
        Self {
            output_dir: output_dir.into(),
            image_writer,
            dir_ready: false,
        }
    }

    fn ensure_dir(&mut self) -> Result<(), ScanError> {
        if !self.dir_ready {
            fs::create_dir_all(&self.output_dir).map_err(|e| ScanError::Write {
                path: self.output_dir.clone(),
                reason: e.to_string(),
            })?;
            self.dir_ready = true;
        }
        Ok(())
    }

    /// Creates an empty file under the first free name for `label`.
    fn reserve_path(&self, label: &str) -> Result<PathBuf, ScanError> {
        let mut n = 0usize;
        loop {
            let name = if n == 0 {
                format!("{SCREENSHOT_PREFIX}{label}.{SCREENSHOT_EXTENSION}")
            } else {
                format!("{SCREENSHOT_PREFIX}{label}_{n}.{SCREENSHOT_EXTENSION}")
            };
            let candidate = self.output_dir.join(name);
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&candidate)
            {
                Ok(_) => {
                    if n > 0 {
                        log::warn!(
                            "Screenshot label {label} already used, writing {}",
                            candidate.display()
                        );
                    }
                    return Ok(candidate);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => n += 1,
                Err(e) => {
                    return Err(ScanError::Write {
                        path: candidate,
                        reason: e.to_string(),
                    })
                }
            }
        }
    }
}

impl ScreenshotWriter for FileScreenshotWriter {
    fn save(&mut self, frame: &Frame, label: &str) -> Result<PathBuf, ScanError> {
        self.ensure_dir()?;
        let path = self.reserve_path(label)?;
        if let Err(e) = self.image_writer.write(&path, frame) {
            let _ = fs::remove_file(&path);
            return Err(ScanError::Write {
                path,
                reason: e.to_string(),
            });
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::infrastructure::image_file_writer::ImageFileWriter;
    use std::path::Path;

    struct FailingImageWriter;

    impl ImageWriter for FailingImageWriter {
        fn write(&self, _path: &Path, _frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
            Err("encoder failed".into())
        }
    }

    fn frame() -> Frame {
        Frame::new(vec![10u8; 8 * 6 * 3], 8, 6, 3, 0)
    }

    fn writer(dir: &Path) -> FileScreenshotWriter {
        FileScreenshotWriter::new(dir, Box::new(ImageFileWriter::new()))
    }

    #[test]
    fn test_constructing_does_not_create_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("screenshots");
        let _writer = writer(&out);
        assert!(!out.exists());
    }

    #[test]
    fn test_save_creates_dir_and_file() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("nested").join("screenshots");
        let mut w = writer(&out);

        let path = w.save(&frame(), "20240101_120000_123").unwrap();
        assert_eq!(path, out.join("screenshot_20240101_120000_123.png"));
        assert!(path.exists());
        assert_eq!(image::open(&path).unwrap().width(), 8);
    }

    #[test]
    fn test_same_label_gets_suffix() {
        let tmp = tempfile::tempdir().unwrap();
        let mut w = writer(tmp.path());

        let first = w.save(&frame(), "20240101_120000_123").unwrap();
        let second = w.save(&frame(), "20240101_120000_123").unwrap();
        let third = w.save(&frame(), "20240101_120000_123").unwrap();

        assert_ne!(first, second);
        assert_eq!(second, tmp.path().join("screenshot_20240101_120000_123_1.png"));
        assert_eq!(third, tmp.path().join("screenshot_20240101_120000_123_2.png"));
        assert!(first.exists() && second.exists() && third.exists());
    }

    #[test]
    fn test_name_taken_by_another_writer_is_not_overwritten() {
        let tmp = tempfile::tempdir().unwrap();
        let taken = tmp.path().join("screenshot_20240101_120000_123.png");
        fs::write(&taken, b"other").unwrap();
        let mut w = writer(tmp.path());

        let path = w.save(&frame(), "20240101_120000_123").unwrap();

        assert_eq!(path, tmp.path().join("screenshot_20240101_120000_123_1.png"));
        assert_eq!(fs::read(&taken).unwrap(), b"other");
    }

    #[test]
    fn test_two_writers_on_one_dir_get_distinct_files() {
        let tmp = tempfile::tempdir().unwrap();
        let mut a = writer(tmp.path());
        let mut b = writer(tmp.path());

        let first = a.save(&frame(), "20240101_120000_123").unwrap();
        let second = b.save(&frame(), "20240101_120000_123").unwrap();

        assert_ne!(first, second);
        assert_eq!(image::open(&first).unwrap().width(), 8);
        assert_eq!(image::open(&second).unwrap().width(), 8);
    }

    #[test]
    fn test_failed_encode_releases_name() {
        let tmp = tempfile::tempdir().unwrap();
        let mut w = FileScreenshotWriter::new(tmp.path(), Box::new(FailingImageWriter));

        let err = w.save(&frame(), "20240101_120000_123").unwrap_err();

        assert!(matches!(err, ScanError::Write { .. }));
        assert!(!tmp.path().join("screenshot_20240101_120000_123.png").exists());
    }

    #[test]
    fn test_unwritable_dir_is_write_error() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not_a_dir");
        fs::write(&blocker, b"file").unwrap();
        let mut w = writer(&blocker.join("screenshots"));

        let err = w.save(&frame(), "20240101_120000_123").unwrap_err();
        assert!(matches!(err, ScanError::Write { .. }));
    }
}
