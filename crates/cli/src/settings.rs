use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use regionwatch_core::shared::constants::{
    DEFAULT_CHANGE_THRESHOLD, DEFAULT_MIN_SCENE_LEN, DEFAULT_SCREENSHOT_DIR, DEFAULT_SENSITIVITY,
};

/// Defaults persisted between runs; command-line flags override them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub change_threshold: usize,
    pub sensitivity: f64,
    pub min_scene_len: usize,
    pub output_dir: PathBuf,
    /// `[width, height]` of the display used for region selection.
    pub display: Option<(u32, u32)>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            change_threshold: DEFAULT_CHANGE_THRESHOLD,
            sensitivity: DEFAULT_SENSITIVITY,
            min_scene_len: DEFAULT_MIN_SCENE_LEN,
            output_dir: PathBuf::from(DEFAULT_SCREENSHOT_DIR),
            display: None,
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("RegionWatch").join("settings.json"))
    }

    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Missing or unreadable files fall back to the defaults.
    pub fn load_from(path: &Path) -> Self {
        let Ok(json) = fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&json).unwrap_or_else(|e| {
            log::warn!("Ignoring malformed settings {}: {e}", path.display());
            Self::default()
        })
    }

    pub fn save(&self) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let path = Self::config_path().ok_or("No configuration directory on this platform")?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
