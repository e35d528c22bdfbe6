//! Shared fixtures for processor tests.

use orrery_common::{EventBus, Viewport};
use orrery_config::schema::StageConfig;
use orrery_config::LayerSpec;

use crate::backend::{ContainerHandle, HeadlessBackend, RenderBackend, SpriteState};
use crate::host::RecordingHost;
use crate::layer::{BaseTransform, BuiltLayer};
use crate::orchestrator::build::{apply_base_transform, reset_viewport_fields};
use crate::processor::EngineContext;
use crate::stage::StageTransform;
use crate::warn_once::WarnOnce;

pub(crate) struct Harness {
    pub backend: HeadlessBackend,
    pub host: RecordingHost,
    pub warnings: WarnOnce,
    pub events: EventBus,
    pub stage_config: StageConfig,
    pub stage: StageTransform,
    pub container: ContainerHandle,
}

impl Harness {
    /// A 2048×2048 viewport, so logical units equal pixels.
    pub fn new() -> Self {
        Self::with_backend(HeadlessBackend::new(Viewport::new(2048.0, 2048.0)))
    }

    pub fn with_backend(mut backend: HeadlessBackend) -> Self {
        let container = backend
            .create_container()
            .expect("headless container creation never fails");
        let stage_config = StageConfig::default();
        let stage = StageTransform::compute(&stage_config, backend.viewport());
        Self {
            backend,
            host: RecordingHost::new(),
            warnings: WarnOnce::new(),
            events: EventBus::new(64),
            stage_config,
            stage,
            container,
        }
    }

    pub fn ctx(&mut self) -> EngineContext<'_> {
        EngineContext {
            backend: &mut self.backend,
            host: &mut self.host,
            container: Some(self.container),
            stage: self.stage,
            warnings: &mut self.warnings,
            events: &self.events,
        }
    }

    pub fn build(&mut self, specs: &[LayerSpec]) -> Vec<BuiltLayer> {
        let urls: Vec<String> = specs.iter().map(|s| s.image_ref.clone()).collect();
        self.backend.load_assets(&urls);
        specs
            .iter()
            .map(|spec| {
                let sprite = self
                    .backend
                    .create_sprite(self.container, &spec.image_ref)
                    .expect("asset was loaded above");
                let base = BaseTransform::from_spec(spec, &self.stage);
                let layer = BuiltLayer {
                    id: spec.id.clone(),
                    sprite,
                    spec: spec.clone(),
                    z_order: spec.z_order(),
                    base,
                };
                apply_base_transform(&mut self.backend, &layer, &self.stage);
                layer
            })
            .collect()
    }

    /// Switch the viewport and reset position/scale the way a resize does.
    pub fn resize(&mut self, viewport: Viewport, layers: &[BuiltLayer]) {
        self.backend.set_viewport(viewport);
        self.stage = StageTransform::compute(&self.stage_config, viewport);
        for layer in layers {
            reset_viewport_fields(&mut self.backend, layer, &self.stage);
        }
    }

    pub fn sprite(&self, layer: &BuiltLayer) -> SpriteState {
        *self
            .backend
            .sprite(layer.sprite)
            .expect("test sprite still alive")
    }
}
