//! Tests for scene loading, creation, and path resolution.

use super::*;
use crate::schema::{EffectSpec, Hand, StageFit};
use orrery_common::ConfigError;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_orrery_scene.toml"));
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scene.toml");
    std::fs::write(
        &path,
        r##"
[stage]
fit = "contain"

[[layers]]
id = "gear-1"
image_ref = "gear.png"
spin_rpm = 30
"##,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.stage.fit, StageFit::Contain);
    assert_eq!(config.layers.len(), 1);
    assert!((config.layers[0].spin_rpm - 30.0).abs() < f64::EPSILON);
    // Defaults preserved
    assert!((config.stage.width - 2048.0).abs() < f64::EPSILON);
    assert!((config.layers[0].position.x_pct - 50.0).abs() < f64::EPSILON);
}

#[test]
fn load_json_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scene.json");
    std::fs::write(
        &path,
        r#"{ "layers": [ { "id": "hand-1", "imageRef": "h.png",
              "clock": { "spinHand": "minute" } } ] }"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    let clock = config.layers[0].clock.as_ref().unwrap();
    assert_eq!(clock.spin_hand, Some(Hand::Minute));
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scene.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let result = load_from_path(&path);
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn out_of_range_values_still_load() {
    let config = load_from_str(
        r#"
[[layers]]
id = "a"
image_ref = "a.png"
spin_rpm = 500
"#,
    )
    .unwrap();
    assert!((config.layers[0].spin_rpm - 500.0).abs() < f64::EPSILON);
}

#[test]
fn unknown_effect_type_loads() {
    let config = load_json_str(
        r#"{ "layers": [ { "id": "a", "imageRef": "a.png",
              "effects": [ { "type": "sparkle" }, { "type": "fade" } ] } ] }"#,
    )
    .unwrap();
    assert_eq!(config.layers[0].effects[0], EffectSpec::Unknown);
    assert!(matches!(config.layers[0].effects[1], EffectSpec::Fade(_)));
}

#[test]
fn template_is_valid_and_complete() {
    let config = load_from_str(template::default_scene_toml()).unwrap();
    assert!(crate::validation::validate(&config).is_ok());
    assert_eq!(config.layers.len(), 4);
    assert!(config.layers[3].clock_drives_spin());
    assert_eq!(config.layers[2].effects.len(), 1);
}

#[test]
fn create_default_config_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("scene.toml");
    create_default_config(&path).unwrap();
    assert!(path.exists());
    let config = load_from_path(&path).unwrap();
    assert_eq!(config.layers[0].id, "dial-0");
}

#[test]
fn default_config_path_ends_with_scene_toml() {
    if let Ok(path) = default_config_path() {
        assert!(path.ends_with("orrery/scene.toml"));
    }
}
