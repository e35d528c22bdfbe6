//! Full configuration validation.
//!
//! Validates numeric ranges, id uniqueness and color formats. Each domain
//! has its own submodule; this orchestrator calls them all and collects
//! errors into a single `ConfigError`.
//!
//! The engine itself only needs [`validate_structure`]. The full
//! [`validate`] is stricter than what the engine tolerates and is what
//! `orrery --check` reports.

mod effects;
mod helpers;
mod layers;
mod structure;


use crate::schema::SceneConfig;
use orrery_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &SceneConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    structure::validate_structure_into(&mut errors, config);
    for (i, layer) in config.layers.iter().enumerate() {
        layers::validate_layer(&mut errors, i, layer);
        effects::validate_layer_effects(&mut errors, i, layer);
    }

    finish(errors)
}

/// Only the problems a scene cannot be built around.
pub fn validate_structure(config: &SceneConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();
    structure::validate_structure_into(&mut errors, config);
    finish(errors)
}

fn finish(errors: Vec<String>) -> Result<(), ConfigError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
