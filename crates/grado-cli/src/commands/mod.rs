//! CLI commands.

pub mod config;
pub mod dictionaries;
pub mod process;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use grado_core::models::config::GradoConfig;

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("grado")
        .join("config.json")
}

/// Load the configuration from `--config`, the default location, or
/// built-in defaults, in that order.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<GradoConfig> {
    if let Some(path) = config_path {
        return GradoConfig::from_file(Path::new(path))
            .with_context(|| format!("Failed to read config file {}", path));
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        return GradoConfig::from_file(&default_path)
            .with_context(|| format!("Failed to read config file {}", default_path.display()));
    }

    Ok(GradoConfig::default())
}
