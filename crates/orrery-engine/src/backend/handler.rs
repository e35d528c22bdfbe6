use std::cell::RefCell;
use std::rc::Rc;

use orrery_config::schema::EffectSpec;
use tracing::debug;

use super::traits::{AuraRequest, EffectHandler, RenderBackend};
use super::types::SpriteHandle;

/// Aura = a second sprite of the owner's image, tinted when the backend can.
#[derive(Debug, Default)]
pub struct DefaultEffectHandler;

impl EffectHandler for DefaultEffectHandler {
    fn create_aura_sprite(
        &mut self,
        backend: &mut dyn RenderBackend,
        request: &AuraRequest,
    ) -> Option<SpriteHandle> {
        let owner = *backend.sprite(request.owner)?;
        let aura = match backend.create_sprite(request.container, &request.image_ref) {
            Ok(aura) => aura,
            Err(e) => {
                debug!("aura sprite not created: {e}");
                return None;
            }
        };
        if let Some(state) = backend.sprite_mut(aura) {
            *state = owner;
            state.alpha = 0.0;
        }
        if let Some(ext) = backend.extensions() {
            ext.set_anchor(aura, owner.anchor);
            ext.set_tint(aura, request.tint);
        }
        Some(aura)
    }

    fn apply_advanced_effect(
        &mut self,
        _backend: &mut dyn RenderBackend,
        _aura: SpriteHandle,
        _effect: &EffectSpec,
        _elapsed: f64,
    ) {
        // Tint was set once at creation; a headless or plain 2D backend has
        // nothing else to do here.
    }

    fn dispose_aura_sprite(&mut self, backend: &mut dyn RenderBackend, aura: SpriteHandle) {
        backend.destroy_sprite(aura);
    }
}

/// Calls seen by a [`RecordingEffectHandler`].
#[derive(Debug, Default)]
pub struct EffectLog {
    pub created: Vec<SpriteHandle>,
    pub applied: Vec<(SpriteHandle, &'static str)>,
    pub disposed: Vec<SpriteHandle>,
}

/// Test double that records every call and can refuse to create auras.
///
/// The log is shared, so it stays readable after the handler has been
/// boxed into an orchestrator.
#[derive(Debug, Default)]
pub struct RecordingEffectHandler {
    refuse: bool,
    log: Rc<RefCell<EffectLog>>,
    inner: DefaultEffectHandler,
}

impl RecordingEffectHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handler whose `create_aura_sprite` always fails.
    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::default()
        }
    }

    pub fn log(&self) -> Rc<RefCell<EffectLog>> {
        Rc::clone(&self.log)
    }
}

impl EffectHandler for RecordingEffectHandler {
    fn create_aura_sprite(
        &mut self,
        backend: &mut dyn RenderBackend,
        request: &AuraRequest,
    ) -> Option<SpriteHandle> {
        if self.refuse {
            return None;
        }
        let aura = self.inner.create_aura_sprite(backend, request)?;
        self.log.borrow_mut().created.push(aura);
        Some(aura)
    }

    fn apply_advanced_effect(
        &mut self,
        backend: &mut dyn RenderBackend,
        aura: SpriteHandle,
        effect: &EffectSpec,
        elapsed: f64,
    ) {
        self.log.borrow_mut().applied.push((aura, effect.kind()));
        self.inner.apply_advanced_effect(backend, aura, effect, elapsed);
    }

    fn dispose_aura_sprite(&mut self, backend: &mut dyn RenderBackend, aura: SpriteHandle) {
        self.log.borrow_mut().disposed.push(aura);
        self.inner.dispose_aura_sprite(backend, aura);
    }
}
