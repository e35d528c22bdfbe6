//! Logical stage configuration.

use serde::{Deserialize, Serialize};

/// How the logical stage is fitted into the viewport.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum StageFit {
    /// Fill the viewport; the stage may overflow on one axis.
    #[default]
    Cover,
    /// Show the whole stage; the viewport may letterbox.
    Contain,
}

/// The fixed design coordinate space all layer positions are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Logical width in design units.
    pub width: f64,
    /// Logical height in design units.
    pub height: f64,
    pub fit: StageFit,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            width: 2048.0,
            height: 2048.0,
            fit: StageFit::Cover,
        }
    }
}
