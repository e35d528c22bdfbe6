//! Configuration schema types for Orrery scenes.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Fields are snake_case; the camelCase JSON spellings are accepted as aliases.

mod clock;
mod effects;
mod layer;
mod stage;
mod system;

pub use clock::*;
pub use effects::*;
pub use layer::*;
pub use stage::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration of a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct SceneConfig {
    pub stage: StageConfig,
    pub effects: EffectsSettings,
    pub logging: LoggingConfig,
    pub layers: Vec<LayerSpec>,
}
