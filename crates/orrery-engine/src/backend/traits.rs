use std::any::Any;

use orrery_common::{Point, Tint, Viewport};
use orrery_config::schema::EffectSpec;

use super::types::{AssetFailure, BackendError, ContainerHandle, SpriteHandle, SpriteState};

/// Everything the engine needs from whatever draws the pixels.
pub trait RenderBackend {
    fn create_container(&mut self) -> Result<ContainerHandle, BackendError>;

    /// Create a sprite for an already loaded asset inside `container`.
    fn create_sprite(
        &mut self,
        container: ContainerHandle,
        url: &str,
    ) -> Result<SpriteHandle, BackendError>;

    /// Load every url, best-effort. Returns the ones that failed.
    fn load_assets(&mut self, urls: &[String]) -> Vec<AssetFailure>;

    fn sprite(&self, handle: SpriteHandle) -> Option<&SpriteState>;

    fn sprite_mut(&mut self, handle: SpriteHandle) -> Option<&mut SpriteState>;

    fn destroy_sprite(&mut self, handle: SpriteHandle) -> bool;

    /// Destroy a container and every sprite still inside it.
    fn destroy_container(&mut self, handle: ContainerHandle) -> bool;

    fn viewport(&self) -> Viewport;

    /// Backend-specific extras. `None` when unsupported.
    fn extensions(&mut self) -> Option<&mut dyn SpriteExtensions> {
        None
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Optional sprite features not every backend has.
pub trait SpriteExtensions {
    fn set_anchor(&mut self, sprite: SpriteHandle, anchor: Point) -> bool;

    fn set_tint(&mut self, sprite: SpriteHandle, tint: Tint) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuraKind {
    Glow,
    Bloom,
}

/// What an [`EffectHandler`] needs to build an aura behind `owner`.
#[derive(Debug, Clone, PartialEq)]
pub struct AuraRequest {
    pub owner: SpriteHandle,
    pub container: ContainerHandle,
    pub image_ref: String,
    pub kind: AuraKind,
    pub tint: Tint,
}

/// Backend-specific half of the advanced effects.
///
/// The effect processor computes the generic curves (aura alpha and
/// scale, owner perturbation); the handler creates aura sprites and
/// applies whatever the backend can do on top.
pub trait EffectHandler {
    fn create_aura_sprite(
        &mut self,
        backend: &mut dyn RenderBackend,
        request: &AuraRequest,
    ) -> Option<SpriteHandle>;

    fn apply_advanced_effect(
        &mut self,
        backend: &mut dyn RenderBackend,
        aura: SpriteHandle,
        effect: &EffectSpec,
        elapsed: f64,
    );

    fn dispose_aura_sprite(&mut self, backend: &mut dyn RenderBackend, aura: SpriteHandle);
}
