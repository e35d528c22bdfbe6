//! The lifecycle every processor shares, and the context it runs in.

use orrery_common::{EngineError, EventBus, SceneEvent};
use tracing::warn;

use crate::backend::{ContainerHandle, RenderBackend};
use crate::host::Host;
use crate::layer::BuiltLayer;
use crate::stage::StageTransform;
use crate::warn_once::WarnOnce;

/// Borrowed view of the orchestrator's collaborators for one call.
pub struct EngineContext<'a> {
    pub backend: &'a mut dyn RenderBackend,
    pub host: &'a mut dyn Host,
    pub container: Option<ContainerHandle>,
    pub stage: StageTransform,
    pub warnings: &'a mut WarnOnce,
    pub events: &'a EventBus,
}

impl EngineContext<'_> {
    /// Report that `feature` is off for `layer`. Logged and published once
    /// per (layer, feature, reason).
    pub fn disable_feature(&mut self, layer: &str, feature: &str, reason: &str) {
        if self.warnings.first(layer, &format!("{feature}: {reason}")) {
            warn!(layer = %layer, feature, "{reason}");
            self.events.publish(SceneEvent::FeatureDisabled {
                layer: layer.to_string(),
                feature: feature.to_string(),
                reason: reason.to_string(),
            });
        }
    }
}

/// What a processor's `init` produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitReport {
    /// Items created.
    pub items: usize,
    /// Layers that asked for this processor but were left out.
    pub disabled: usize,
}

/// Unified init/tick/recompute/dispose lifecycle.
///
/// `tick` and `recompute` visit every item even when some fail; failed
/// items are left untouched and reported together as
/// [`EngineError::ItemFaults`] once the loop is done.
pub trait Processor {
    type Item;

    fn name(&self) -> &'static str;

    /// Build items for `layers`, replacing any previous ones.
    fn init(
        &mut self,
        ctx: &mut EngineContext<'_>,
        layers: &[BuiltLayer],
    ) -> Result<InitReport, EngineError>;

    /// Advance to `elapsed` seconds since init.
    fn tick(&mut self, ctx: &mut EngineContext<'_>, elapsed: f64) -> Result<(), EngineError>;

    /// Re-derive viewport-dependent state after a resize.
    fn recompute(&mut self, ctx: &mut EngineContext<'_>, elapsed: f64)
        -> Result<(), EngineError>;

    /// Drop every item and release anything the processor installed.
    fn dispose(&mut self, ctx: &mut EngineContext<'_>) -> Result<(), EngineError>;

    fn items(&self) -> &[Self::Item];

    fn is_active(&self) -> bool {
        !self.items().is_empty()
    }
}

/// Collects per-item failures during one pass.
#[derive(Debug)]
pub(crate) struct FaultLog {
    processor: &'static str,
    count: usize,
    first: Option<String>,
}

impl FaultLog {
    pub(crate) fn new(processor: &'static str) -> Self {
        Self {
            processor,
            count: 0,
            first: None,
        }
    }

    pub(crate) fn record(&mut self, layer: &str, what: &str) {
        self.count += 1;
        if self.first.is_none() {
            self.first = Some(format!("{layer}: {what}"));
        }
    }

    pub(crate) fn finish(self) -> Result<(), EngineError> {
        match self.first {
            None => Ok(()),
            Some(first) => Err(EngineError::ItemFaults {
                processor: self.processor,
                count: self.count,
                first,
            }),
        }
    }
}
