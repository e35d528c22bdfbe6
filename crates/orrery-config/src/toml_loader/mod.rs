//! Scene file loading (TOML, or JSON by extension) and default creation.

mod loader;
mod paths;
mod template;

#[cfg(test)]
mod tests;

pub use loader::{load_default, load_from_path, load_from_str, load_json_str};
pub use paths::{create_default_config, default_config_path};
