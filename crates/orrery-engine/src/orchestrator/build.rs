//! Layer construction helpers shared by init and resize.

use std::collections::HashSet;

use orrery_config::LayerSpec;

use crate::backend::{RenderBackend, Scale2};
use crate::layer::{compare_layers, BuiltLayer};
use crate::stage::StageTransform;

/// Specs in draw order.
pub(crate) fn sorted_specs(layers: &[LayerSpec]) -> Vec<LayerSpec> {
    let mut sorted = layers.to_vec();
    sorted.sort_by(compare_layers);
    sorted
}

/// Every non-empty image url once, in first-use order.
pub(crate) fn unique_urls(layers: &[LayerSpec]) -> Vec<String> {
    let mut seen = HashSet::new();
    layers
        .iter()
        .map(|l| l.image_ref.trim())
        .filter(|url| !url.is_empty() && seen.insert(*url))
        .map(str::to_string)
        .collect()
}

/// Write the full resting transform. Returns false if the sprite is gone.
pub(crate) fn apply_base_transform(
    backend: &mut dyn RenderBackend,
    layer: &BuiltLayer,
    stage: &StageTransform,
) -> bool {
    let Some(sprite) = backend.sprite_mut(layer.sprite) else {
        return false;
    };
    sprite.set_position(stage.to_viewport(layer.base.position));
    sprite.scale = Scale2::uniform(layer.base.viewport_scale(stage));
    sprite.rotation = layer.base.rotation;
    sprite.z_index = layer.z_order;
    true
}

/// Write only the fields that depend on the viewport (position, scale).
pub(crate) fn reset_viewport_fields(
    backend: &mut dyn RenderBackend,
    layer: &BuiltLayer,
    stage: &StageTransform,
) -> bool {
    let Some(sprite) = backend.sprite_mut(layer.sprite) else {
        return false;
    };
    sprite.set_position(stage.to_viewport(layer.base.position));
    sprite.scale = Scale2::uniform(layer.base.viewport_scale(stage));
    true
}
