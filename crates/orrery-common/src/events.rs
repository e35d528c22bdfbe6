use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::types::Viewport;

/// Scene lifecycle notifications published by the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SceneEvent {
    Initialized {
        layers: usize,
        skipped: usize,
    },
    /// The layer was not built at all (missing asset, sprite creation failed).
    LayerSkipped {
        layer: String,
        reason: String,
    },
    /// The layer was built but one of its features (clock, orbit, effect) is off.
    FeatureDisabled {
        layer: String,
        feature: String,
        reason: String,
    },
    Resized(Viewport),
    Disposed,
    #[serde(other)]
    Unknown,
}

pub struct EventBus {
    sender: broadcast::Sender<SceneEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SceneEvent> {
        self.sender.subscribe()
    }

    /// Publish to every live subscriber. Returns how many received it.
    pub fn publish(&self, event: SceneEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
