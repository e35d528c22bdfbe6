//! Scene path resolution and default file creation.

use orrery_common::ConfigError;
use std::path::{Path, PathBuf};
use tracing::info;

use super::template::default_scene_toml;

/// Get the platform-specific default scene file path.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::ParseError("could not determine config directory".into()))?;
    Ok(config_dir.join("orrery").join("scene.toml"))
}

/// Write the default TOML scene with documentation comments.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::ParseError(format!(
                "failed to create config directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    std::fs::write(path, default_scene_toml()).map_err(|e| {
        ConfigError::ParseError(format!(
            "failed to write default scene to {}: {e}",
            path.display()
        ))
    })?;

    info!("created default scene at {}", path.display());
    Ok(())
}
