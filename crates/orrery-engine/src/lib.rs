//! Animated layer composition engine.
//!
//! Builds image layers from a [`SceneConfig`](orrery_config::SceneConfig),
//! drives them every frame through four processors (spin, orbit, clock,
//! effects) and keeps their motion continuous across viewport resizes.
//! Pixels are someone else's problem: everything goes through the
//! [`RenderBackend`] and [`Host`] traits.

pub mod backend;
pub mod clock;
pub mod effects;
pub mod geometry;
pub mod host;
pub mod layer;
pub mod orbit;
pub mod orchestrator;
pub mod perf;
pub mod processor;
pub mod spin;
pub mod stage;
pub mod warn_once;

#[cfg(test)]
mod test_support;

pub use backend::{
    AssetFailure, AuraKind, AuraRequest, BackendError, ContainerHandle, DefaultEffectHandler,
    EffectHandler, HeadlessBackend, RecordingEffectHandler, RenderBackend, Scale2,
    SpriteExtensions, SpriteHandle, SpriteState,
};
pub use clock::{ClockProcessor, FixedClock, SystemClock, WallClock};
pub use effects::{Capabilities, EffectProcessor, PointerState};
pub use host::{Host, ListenerId, ListenerKind, RecordingHost};
pub use layer::{BaseTransform, BuiltLayer};
pub use orbit::{OrbitProcessor, SpinRpmMap};
pub use orchestrator::{
    InitSummary, LayerSnapshot, Orchestrator, OrchestratorBuilder, UpdateReport,
};
pub use perf::FrameTimer;
pub use processor::{EngineContext, InitReport, Processor};
pub use spin::SpinProcessor;
pub use stage::{StageCache, StageTransform};
pub use warn_once::WarnOnce;
