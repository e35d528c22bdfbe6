//! Scene lifecycle: build layers from a config, drive the processors,
//! react to host events, tear everything down.
//!
//! Processor order matters. `init` runs spin, clock, orbit, effects so
//! orbit can consult spin RPMs for its orientation policy. Frames and
//! resizes run spin, orbit, clock, effects so effects always compose on
//! top of the final motion of the frame.

pub(crate) mod build;
mod builder;


use std::collections::HashMap;

use orrery_common::{ConfigError, EngineError, EventBus, Point, SceneEvent, Viewport};
use orrery_config::schema::StageConfig;
use orrery_config::validation::validate_structure;
use orrery_config::{sanitize, SceneConfig};
use serde::Serialize;
use tracing::{debug, info, warn};

pub use builder::OrchestratorBuilder;

use crate::backend::{ContainerHandle, RenderBackend, SpriteHandle, SpriteState};
use crate::clock::ClockProcessor;
use crate::effects::{EffectProcessor, PointerState};
use crate::host::{Host, ListenerId, ListenerKind};
use crate::layer::{BaseTransform, BuiltLayer};
use crate::orbit::{OrbitProcessor, SpinRpmMap};
use crate::perf::FrameTimer;
use crate::processor::{EngineContext, InitReport, Processor};
use crate::spin::SpinProcessor;
use crate::stage::{StageCache, StageTransform};
use crate::warn_once::WarnOnce;

/// What `init` built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InitSummary {
    /// Layers whose sprite exists.
    pub layers: usize,
    /// Layers dropped before a sprite was created.
    pub skipped: usize,
    pub spin: InitReport,
    pub clock: InitReport,
    pub orbit: InitReport,
    pub effects: InitReport,
    /// Fields `sanitize` had to repair.
    pub repairs: Vec<String>,
}

/// Outcome of one frame or resize.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateReport {
    /// False when nothing ran (no active processor, not initialized).
    pub ran: bool,
    pub elapsed: f64,
    /// One entry per processor that had failing items.
    pub faults: Vec<EngineError>,
}

impl UpdateReport {
    fn idle(elapsed: f64) -> Self {
        Self {
            ran: false,
            elapsed,
            faults: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }

    fn collect(&mut self, result: Result<(), EngineError>) {
        if let Err(e) = result {
            debug!(error = %e, "processor faults");
            self.faults.push(e);
        }
    }
}

/// Transform of one built layer, as the backend currently holds it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSnapshot {
    pub id: String,
    pub sprite: SpriteHandle,
    #[serde(flatten)]
    pub state: SpriteState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Idle,
    Running,
    Disposed,
}

/// Everything a processor call borrows, kept apart from the processors
/// themselves so both can be borrowed at once.
struct Collaborators {
    backend: Box<dyn RenderBackend>,
    host: Box<dyn Host>,
    warnings: WarnOnce,
    events: EventBus,
    container: Option<ContainerHandle>,
    stage: StageTransform,
}

impl Collaborators {
    fn ctx(&mut self) -> EngineContext<'_> {
        EngineContext {
            backend: self.backend.as_mut(),
            host: self.host.as_mut(),
            container: self.container,
            stage: self.stage,
            warnings: &mut self.warnings,
            events: &self.events,
        }
    }

    fn skip_layer(&mut self, layer: &str, reason: &str) {
        if self.warnings.first(layer, reason) {
            warn!(layer = %layer, "layer skipped: {reason}");
        }
        self.events.publish(SceneEvent::LayerSkipped {
            layer: layer.to_string(),
            reason: reason.to_string(),
        });
    }
}

/// Owns the collaborators and the four processors of one scene.
pub struct Orchestrator {
    env: Collaborators,
    spin: SpinProcessor,
    orbit: OrbitProcessor,
    clock: ClockProcessor,
    effects: EffectProcessor,
    listeners: Vec<ListenerId>,
    layers: Vec<BuiltLayer>,
    stage_config: StageConfig,
    stage_cache: StageCache,
    elapsed: f64,
    timer: FrameTimer,
    state: Lifecycle,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("state", &self.state)
            .field("layers", &self.layers.len())
            .field("elapsed", &self.elapsed)
            .field("stage", &self.env.stage)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::new()
    }

    fn from_parts(
        backend: Box<dyn RenderBackend>,
        host: Box<dyn Host>,
        events: EventBus,
        clock: ClockProcessor,
        effects: EffectProcessor,
    ) -> Self {
        let stage_config = StageConfig::default();
        let stage = StageTransform::compute(&stage_config, backend.viewport());
        Self {
            env: Collaborators {
                backend,
                host,
                warnings: WarnOnce::new(),
                events,
                container: None,
                stage,
            },
            spin: SpinProcessor::new(),
            orbit: OrbitProcessor::new(),
            clock,
            effects,
            listeners: Vec::new(),
            layers: Vec::new(),
            stage_config,
            stage_cache: StageCache::new(),
            elapsed: 0.0,
            timer: FrameTimer::new(),
            state: Lifecycle::Idle,
        }
    }

    /// Build the scene. Calling it again replaces the previous scene.
    ///
    /// Fails without touching anything when the config is structurally
    /// broken (bad stage, empty or duplicate layer ids).
    pub fn init(&mut self, config: &SceneConfig) -> Result<InitSummary, EngineError> {
        if self.state == Lifecycle::Disposed {
            return Err(EngineError::Disposed);
        }
        let mut config = config.clone();
        let repairs = sanitize(&mut config);
        validate_structure(&config).map_err(|e| match e {
            ConfigError::ValidationError(msg) => EngineError::InvalidConfig(msg),
            other => EngineError::InvalidConfig(other.to_string()),
        })?;

        self.teardown();
        self.env.warnings.clear();
        self.stage_cache.invalidate();
        self.stage_config = config.stage;
        self.env.stage = self
            .stage_cache
            .get(&self.stage_config, self.env.backend.viewport());

        let container = self.env.backend.create_container()?;
        self.env.container = Some(container);

        let specs = build::sorted_specs(&config.layers);
        let urls = build::unique_urls(&specs);
        let failures: HashMap<String, String> = self
            .env
            .backend
            .load_assets(&urls)
            .into_iter()
            .map(|f| (f.url, f.reason))
            .collect();

        let mut summary = InitSummary {
            repairs,
            ..Default::default()
        };
        for spec in specs {
            let url = spec.image_ref.trim();
            if url.is_empty() {
                self.env.skip_layer(&spec.id, "missing image");
                summary.skipped += 1;
                continue;
            }
            if let Some(reason) = failures.get(url) {
                self.env
                    .skip_layer(&spec.id, &format!("asset failed to load: {reason}"));
                summary.skipped += 1;
                continue;
            }
            let sprite = match self.env.backend.create_sprite(container, url) {
                Ok(sprite) => sprite,
                Err(e) => {
                    self.env.skip_layer(&spec.id, &e.to_string());
                    summary.skipped += 1;
                    continue;
                }
            };
            let layer = BuiltLayer {
                id: spec.id.clone(),
                sprite,
                z_order: spec.z_order(),
                base: BaseTransform::from_spec(&spec, &self.env.stage),
                spec,
            };
            build::apply_base_transform(self.env.backend.as_mut(), &layer, &self.env.stage);
            self.layers.push(layer);
        }
        summary.layers = self.layers.len();

        self.effects.configure(config.effects);
        let mut ctx = self.env.ctx();
        summary.spin = self.spin.init(&mut ctx, &self.layers)?;
        summary.clock = self.clock.init(&mut ctx, &self.layers)?;
        let rpm: SpinRpmMap = self
            .layers
            .iter()
            .map(|l| (l.sprite, self.spin.spin_rpm(l.sprite)))
            .collect();
        self.orbit.set_spin_rpm(rpm);
        summary.orbit = self.orbit.init(&mut ctx, &self.layers)?;
        summary.effects = self.effects.init(&mut ctx, &self.layers)?;

        self.listeners.push(self.env.host.subscribe(ListenerKind::Frame));
        self.listeners.push(self.env.host.subscribe(ListenerKind::Resize));
        self.elapsed = 0.0;
        self.timer.reset();
        self.state = Lifecycle::Running;

        info!(
            layers = summary.layers,
            skipped = summary.skipped,
            spin = summary.spin.items,
            clock = summary.clock.items,
            orbit = summary.orbit.items,
            effects = summary.effects.items,
            "scene initialized"
        );
        self.env.events.publish(SceneEvent::Initialized {
            layers: summary.layers,
            skipped: summary.skipped,
        });
        Ok(summary)
    }

    /// True when at least one processor has items.
    pub fn is_active(&self) -> bool {
        self.spin.is_active()
            || self.orbit.is_active()
            || self.clock.is_active()
            || self.effects.is_active()
    }

    /// Advance by `dt` seconds and tick every processor.
    ///
    /// Non-finite or negative `dt` ticks without advancing time.
    pub fn on_frame(&mut self, dt: f64) -> UpdateReport {
        if self.state != Lifecycle::Running || !self.is_active() {
            return UpdateReport::idle(self.elapsed);
        }
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
        let elapsed = self.elapsed;
        let mut report = UpdateReport {
            ran: true,
            elapsed,
            faults: Vec::new(),
        };

        self.timer.begin();
        let mut ctx = self.env.ctx();
        report.collect(self.spin.tick(&mut ctx, elapsed));
        report.collect(self.orbit.tick(&mut ctx, elapsed));
        report.collect(self.clock.tick(&mut ctx, elapsed));
        report.collect(self.effects.tick(&mut ctx, elapsed));
        self.timer.end();
        report
    }

    /// Re-derive the stage from the backend's current viewport and let
    /// every processor recompute.
    pub fn on_resize(&mut self) -> UpdateReport {
        if self.state != Lifecycle::Running {
            return UpdateReport::idle(self.elapsed);
        }
        let viewport = self.env.backend.viewport();
        self.stage_cache.invalidate();
        self.env.stage = self.stage_cache.get(&self.stage_config, viewport);
        for layer in &self.layers {
            if !build::reset_viewport_fields(self.env.backend.as_mut(), layer, &self.env.stage) {
                debug!(layer = %layer.id, "sprite missing on resize");
            }
        }

        let elapsed = self.elapsed;
        let mut report = UpdateReport {
            ran: true,
            elapsed,
            faults: Vec::new(),
        };
        let mut ctx = self.env.ctx();
        report.collect(self.spin.recompute(&mut ctx, elapsed));
        report.collect(self.orbit.recompute(&mut ctx, elapsed));
        report.collect(self.clock.recompute(&mut ctx, elapsed));
        report.collect(self.effects.recompute(&mut ctx, elapsed));

        debug!(width = viewport.width, height = viewport.height, "resized");
        self.env.events.publish(SceneEvent::Resized(viewport));
        report
    }

    /// Pointer position in viewport pixels.
    pub fn on_pointer(&mut self, x: f64, y: f64) {
        if self.state != Lifecycle::Running {
            return;
        }
        let p = self.env.stage.normalized(Point::new(x, y));
        self.effects.pointer().set_pointer(p);
    }

    /// Device orientation in degrees (front-back `beta`, left-right `gamma`).
    pub fn on_device_orientation(&mut self, beta: f64, gamma: f64) {
        if self.state != Lifecycle::Running {
            return;
        }
        self.effects.pointer().set_orientation(beta, gamma);
    }

    /// Release everything. Later calls are no-ops.
    pub fn dispose(&mut self) {
        if self.state == Lifecycle::Disposed {
            return;
        }
        self.teardown();
        self.state = Lifecycle::Disposed;
        info!("scene disposed");
        self.env.events.publish(SceneEvent::Disposed);
    }

    pub fn is_disposed(&self) -> bool {
        self.state == Lifecycle::Disposed
    }

    /// Listeners first, then processors, then sprites and the container.
    fn teardown(&mut self) {
        for id in self.listeners.drain(..) {
            self.env.host.unsubscribe(id);
        }
        let mut ctx = self.env.ctx();
        let results = [
            self.effects.dispose(&mut ctx),
            self.clock.dispose(&mut ctx),
            self.orbit.dispose(&mut ctx),
            self.spin.dispose(&mut ctx),
        ];
        for e in results.into_iter().filter_map(Result::err) {
            warn!(error = %e, "processor dispose failed");
        }
        for layer in self.layers.drain(..) {
            self.env.backend.destroy_sprite(layer.sprite);
        }
        if let Some(container) = self.env.container.take() {
            self.env.backend.destroy_container(container);
        }
        self.elapsed = 0.0;
    }

    /// Current transform of every built layer, in draw order.
    pub fn snapshot(&self) -> Vec<LayerSnapshot> {
        self.layers
            .iter()
            .filter_map(|layer| {
                self.env.backend.sprite(layer.sprite).map(|state| LayerSnapshot {
                    id: layer.id.clone(),
                    sprite: layer.sprite,
                    state: *state,
                })
            })
            .collect()
    }

    pub fn layers(&self) -> &[BuiltLayer] {
        &self.layers
    }

    pub fn backend(&self) -> &dyn RenderBackend {
        self.env.backend.as_ref()
    }

    pub fn backend_mut(&mut self) -> &mut dyn RenderBackend {
        self.env.backend.as_mut()
    }

    pub fn events(&self) -> &EventBus {
        &self.env.events
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn stage(&self) -> StageTransform {
        self.env.stage
    }

    pub fn viewport(&self) -> Viewport {
        self.env.stage.viewport
    }

    pub fn timer(&self) -> &FrameTimer {
        &self.timer
    }

    pub fn pointer(&self) -> &PointerState {
        self.effects.pointer()
    }

    pub fn spin(&self) -> &SpinProcessor {
        &self.spin
    }

    pub fn orbit(&self) -> &OrbitProcessor {
        &self.orbit
    }

    pub fn clock(&self) -> &ClockProcessor {
        &self.clock
    }

    pub fn effects(&self) -> &EffectProcessor {
        &self.effects
    }
}

impl Drop for Orchestrator {
    fn drop(&mut self) {
        if self.state == Lifecycle::Running {
            self.teardown();
        }
    }
}
