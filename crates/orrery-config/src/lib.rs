//! Orrery scene configuration.
//!
//! Provides TOML and JSON scene loading, lenient defaulting, and full
//! validation. All config sections use sensible defaults so partial
//! scenes work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use orrery_config::{config_to_json, load_config};
//!
//! let config = load_config(None).expect("failed to load scene");
//! let json = config_to_json(&config);
//! println!("{json}");
//! ```

pub mod sanitize;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use sanitize::sanitize;
pub use schema::{layer_z_order, LayerSpec, SceneConfig, CONFIG_SCHEMA_VERSION};

use orrery_common::ConfigError;
use std::path::Path;

/// Load a scene from `path`, or from the platform default location.
///
/// The default location gets a commented template written on first use.
/// Range problems are only logged here; see [`validation::validate`] for
/// the strict check.
pub fn load_config(path: Option<&Path>) -> Result<SceneConfig, ConfigError> {
    match path {
        Some(path) => toml_loader::load_from_path(path),
        None => toml_loader::load_default(),
    }
}

/// Serialize a scene to a pretty-printed JSON string.
pub fn config_to_json(config: &SceneConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize scene: {e}\"}}"))
}
