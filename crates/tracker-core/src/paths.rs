use crate::error::{Result, TrackerError};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const TRACKER_DIR: &str = ".tracker";
pub const CONFIG_FILE: &str = "config.yaml";
pub const CREDENTIALS_FILE: &str = "credentials.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// `~/.tracker`, the default state directory.
pub fn default_home() -> Result<PathBuf> {
    home::home_dir()
        .map(|h| h.join(TRACKER_DIR))
        .ok_or(TrackerError::HomeNotFound)
}

pub fn config_path(home: &Path) -> PathBuf {
    home.join(CONFIG_FILE)
}

pub fn credentials_path(home: &Path) -> PathBuf {
    home.join(CREDENTIALS_FILE)
}
