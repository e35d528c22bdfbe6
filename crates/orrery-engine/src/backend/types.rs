use orrery_common::{EngineError, Point};
use serde::Serialize;

/// Opaque sprite id handed out by a [`RenderBackend`](super::RenderBackend).
///
/// The engine never owns the sprite behind it; a handle may go stale at
/// any time and every lookup has to cope with that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SpriteHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ContainerHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scale2 {
    pub x: f64,
    pub y: f64,
}

impl Scale2 {
    pub fn uniform(s: f64) -> Self {
        Self { x: s, y: s }
    }
}

impl Default for Scale2 {
    fn default() -> Self {
        Self::uniform(1.0)
    }
}

/// The mutable transform fields of a sprite, in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpriteState {
    pub x: f64,
    pub y: f64,
    /// Radians, positive is clockwise on screen.
    pub rotation: f64,
    pub alpha: f64,
    pub scale: Scale2,
    pub z_index: i64,
    /// Natural (unscaled) texture size.
    pub width: f64,
    pub height: f64,
    /// Normalized anchor inside the texture; `(0.5, 0.5)` is the center.
    pub anchor: Point,
}

impl SpriteState {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            alpha: 1.0,
            scale: Scale2::default(),
            z_index: 0,
            width,
            height,
            anchor: Point::new(0.5, 0.5),
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_position(&mut self, p: Point) {
        self.x = p.x;
        self.y = p.y;
    }
}

/// One asset that could not be loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetFailure {
    pub url: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BackendError {
    #[error("asset not loaded: {0}")]
    AssetNotLoaded(String),

    #[error("unknown container {0:?}")]
    UnknownContainer(ContainerHandle),

    #[error("{0}")]
    Other(String),
}

impl From<BackendError> for EngineError {
    fn from(e: BackendError) -> Self {
        EngineError::Backend(e.to_string())
    }
}
