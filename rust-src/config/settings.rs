//! Application settings and path constants.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};


/// Number of municipalities visible when a session starts.
pub const DEFAULT_VISIBLE_COUNT: usize = 15;

/// Dataset file looked up when no path is configured.
pub const DEFAULT_DATA_FILE: &str = "china_population_by_ward.json";

/// Fixed export file names.
pub const SVG_FILE_NAME: &str = "tokyo-chinese-population.svg";
pub const PNG_FILE_NAME: &str = "tokyo-chinese-population.png";

/// Chart container width (px) used when nothing can be measured.
pub const DEFAULT_CONTAINER_WIDTH: u32 = 600;

/// Year presets, intersected with the dataset extent when applied.
pub const EARLY_YEARS: (i32, i32) = (1979, 1999);
pub const RECENT_YEARS: (i32, i32) = (2000, 2025);

const APP_DIR: &str = "tokyo-popchart";
const SETTINGS_FILE: &str = "settings.json";
const LOG_FILE: &str = "popchart.log";


/// User settings, read from `settings.json` in the config directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Population dataset (JSON).
    pub data_path: PathBuf,
    /// Directory export artifacts are written to.
    pub output_dir: PathBuf,
    /// Chart width in px for headless rendering.
    pub chart_width: u32,
    /// Extra CSS files inlined into exported charts.
    pub stylesheets: Vec<PathBuf>,
}


impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            output_dir: dirs::download_dir().unwrap_or_else(|| PathBuf::from(".")),
            chart_width: 960,
            stylesheets: Vec::new(),
        }
    }
}


impl Settings {
    /// Load settings from the default location, falling back to defaults
    /// when the file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&get_settings_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Invalid settings file: {}", path.display()))
    }
}


/// Get popchart's config directory.
pub fn get_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}


/// Get the settings file path.
pub fn get_settings_path() -> PathBuf {
    get_config_dir().join(SETTINGS_FILE)
}


/// Get the log file used while the terminal dashboard owns the screen.
pub fn get_log_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(LOG_FILE)
}
