mod core;
mod tint;

pub use self::core::*;
pub use tint::*;
