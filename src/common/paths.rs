//! Configuration paths
//!
//! Resolved through the directories crate so the config file lives in the
//! platform-appropriate place.

use std::path::PathBuf;

/// Application name used for directory lookup
const APP_NAME: &str = "review-smoke";

/// Name of the configuration file inside the config directory
const CONFIG_FILE: &str = "config.toml";

/// Get the configuration directory path
///
/// - Linux: `~/.config/review-smoke/`
/// - macOS: `~/Library/Application Support/review-smoke/`
/// - Windows: `%APPDATA%\review-smoke\`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE))
}
