//! Core scene loading: read from a path, a string, or the platform default.

use crate::schema::SceneConfig;
use crate::validation;
use orrery_common::ConfigError;
use std::path::Path;
use tracing::{info, warn};

use super::paths::{create_default_config, default_config_path};

/// Load a scene from a file path.
///
/// Files ending in `.json` are parsed as JSON, everything else as TOML.
/// Missing fields take their serde defaults. After loading, the scene is
/// validated; problems are logged and the parsed scene is returned as-is
/// so the engine can sanitize it.
pub fn load_from_path(path: &Path) -> Result<SceneConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let config = if is_json {
        load_json_str(&content)?
    } else {
        load_from_str(&content)?
    };

    info!(layers = config.layers.len(), "loaded scene from {}", path.display());
    Ok(config)
}

/// Parse a TOML scene.
pub fn load_from_str(content: &str) -> Result<SceneConfig, ConfigError> {
    let config: SceneConfig = toml::from_str(content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;
    warn_if_invalid(&config);
    Ok(config)
}

/// Parse a JSON scene (camelCase field names are accepted).
pub fn load_json_str(content: &str) -> Result<SceneConfig, ConfigError> {
    let config: SceneConfig = serde_json::from_str(content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse JSON: {e}")))?;
    warn_if_invalid(&config);
    Ok(config)
}

fn warn_if_invalid(config: &SceneConfig) {
    if let Err(e) = validation::validate(config) {
        warn!("scene validation warning: {e}; invalid values will be repaired or skipped");
    }
}

/// Load the scene from the platform-specific default path.
///
/// On macOS: `~/Library/Application Support/orrery/scene.toml`
/// On Linux: `~/.config/orrery/scene.toml`
///
/// If the file does not exist, writes the commented template and returns it parsed.
pub fn load_default() -> Result<SceneConfig, ConfigError> {
    let path = default_config_path()?;

    match load_from_path(&path) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) => {
            info!("no scene found at {}, creating default", path.display());
            create_default_config(&path)?;
            load_from_path(&path)
        }
        Err(e) => Err(e),
    }
}
