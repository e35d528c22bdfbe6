//! Top-level structural checks: the ones a scene cannot be built without.

use std::collections::HashSet;

use crate::schema::SceneConfig;

/// Collect structural problems: non-positive stage, empty or duplicate ids.
///
/// These are the only problems the engine refuses to build around; every
/// other malformed field is repaired by `sanitize`.
pub(crate) fn validate_structure_into(errors: &mut Vec<String>, config: &SceneConfig) {
    let stage = &config.stage;
    if !(stage.width.is_finite() && stage.width > 0.0) {
        errors.push(format!("stage.width = {} must be positive", stage.width));
    }
    if !(stage.height.is_finite() && stage.height > 0.0) {
        errors.push(format!("stage.height = {} must be positive", stage.height));
    }

    let mut seen = HashSet::new();
    for (i, layer) in config.layers.iter().enumerate() {
        if layer.id.trim().is_empty() {
            errors.push(format!("layers[{i}].id is empty"));
        } else if !seen.insert(layer.id.as_str()) {
            errors.push(format!("layers[{i}].id '{}' is a duplicate", layer.id));
        }
    }
}
