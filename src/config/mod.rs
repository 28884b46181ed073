//! Configuration module for Ferret-RS
//!
//! Handles loading settings from YAML files and environment variables.

mod settings;

pub use settings::*;

use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

/// Load settings from the first settings file found, or defaults.
///
/// `FERRET_SETTINGS_PATH` is checked first. Environment overrides are
/// applied last in every case.
pub fn load() -> Result<Settings> {
    let mut paths = Vec::new();
    if let Ok(path) = std::env::var("FERRET_SETTINGS_PATH") {
        paths.push(PathBuf::from(path));
    }
    paths.push(PathBuf::from("settings.yml"));
    paths.push(PathBuf::from("config/settings.yml"));
    paths.push(PathBuf::from("/etc/ferret/settings.yml"));
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("ferret-rs/settings.yml"));
    }

    let mut settings = match paths.iter().find(|p| p.exists()) {
        Some(path) => {
            info!("Loading settings from: {}", path.display());
            Settings::from_file(path)?
        }
        None => {
            info!("No settings file found, using defaults");
            Settings::default()
        }
    };

    settings.merge_env();
    Ok(settings)
}
