use std::rc::Rc;

use orrery_common::{EngineError, EventBus};
use orrery_config::schema::EffectsSettings;

use super::Orchestrator;
use crate::backend::{DefaultEffectHandler, EffectHandler, RenderBackend};
use crate::clock::{ClockProcessor, SystemClock, WallClock};
use crate::effects::{Capabilities, EffectProcessor, PointerState};
use crate::host::Host;

const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Collects the collaborators an [`Orchestrator`] needs.
///
/// Backend and host are required. Wall clock, capabilities, effect
/// handler and pointer state fall back to the real-world defaults.
pub struct OrchestratorBuilder {
    backend: Option<Box<dyn RenderBackend>>,
    host: Option<Box<dyn Host>>,
    clock: Option<Rc<dyn WallClock>>,
    capabilities: Capabilities,
    handler: Option<Box<dyn EffectHandler>>,
    pointer: Option<PointerState>,
    event_capacity: usize,
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            backend: None,
            host: None,
            clock: None,
            capabilities: Capabilities::default(),
            handler: None,
            pointer: None,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }

    pub fn backend(mut self, backend: impl RenderBackend + 'static) -> Self {
        self.backend = Some(Box::new(backend));
        self
    }

    pub fn host(mut self, host: impl Host + 'static) -> Self {
        self.host = Some(Box::new(host));
        self
    }

    pub fn clock(mut self, clock: Rc<dyn WallClock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn effect_handler(mut self, handler: impl EffectHandler + 'static) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Share pointer state with whoever feeds it outside the orchestrator.
    pub fn pointer(mut self, pointer: PointerState) -> Self {
        self.pointer = Some(pointer);
        self
    }

    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    pub fn build(self) -> Result<Orchestrator, EngineError> {
        let backend = self
            .backend
            .ok_or(EngineError::MissingCollaborator("backend"))?;
        let host = self.host.ok_or(EngineError::MissingCollaborator("host"))?;
        let clock = self.clock.unwrap_or_else(|| Rc::new(SystemClock));
        let handler = self
            .handler
            .unwrap_or_else(|| Box::new(DefaultEffectHandler));
        let effects = EffectProcessor::new(
            EffectsSettings::default(),
            self.capabilities,
            handler,
            self.pointer.unwrap_or_default(),
        );
        Ok(Orchestrator::from_parts(
            backend,
            host,
            EventBus::new(self.event_capacity),
            ClockProcessor::new(clock),
            effects,
        ))
    }
}
