pub mod errors;
pub mod events;
pub mod types;

pub use errors::{ConfigError, EngineError, OrreryError};
pub use events::{EventBus, SceneEvent};
pub use types::{Point, Rect, Size, Tint, Viewport};

pub type Result<T> = std::result::Result<T, OrreryError>;
