//! Per-layer configuration: placement, spin, orbit.

use serde::{Deserialize, Serialize};

use super::clock::ClockConfig;
use super::effects::EffectSpec;

/// A point expressed in percent of the logical stage (0-100 on each axis).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PercentPoint {
    #[serde(alias = "xPct", alias = "x")]
    pub x_pct: f64,
    #[serde(alias = "yPct", alias = "y")]
    pub y_pct: f64,
}

impl PercentPoint {
    pub fn new(x_pct: f64, y_pct: f64) -> Self {
        Self { x_pct, y_pct }
    }

    pub fn centered() -> Self {
        Self::new(50.0, 50.0)
    }
}

impl Default for PercentPoint {
    fn default() -> Self {
        Self::centered()
    }
}

/// Uniform scale in percent of the image's natural size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleSpec {
    pub pct: f64,
}

impl Default for ScaleSpec {
    fn default() -> Self {
        Self { pct: 100.0 }
    }
}

/// Rotation direction. On a y-down screen, `cw` is the positive angle direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum Direction {
    #[default]
    #[serde(alias = "clockwise")]
    Cw,
    #[serde(alias = "counterclockwise", alias = "anticlockwise")]
    Ccw,
}

impl Direction {
    /// `+1.0` for clockwise, `-1.0` for counter-clockwise.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Cw => 1.0,
            Direction::Ccw => -1.0,
        }
    }
}

/// How an orbiting layer's rotation relates to its path.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum OrientPolicy {
    /// Rotation is left alone.
    None,
    /// Follow the path only when nothing else spins the layer.
    #[default]
    Auto,
    /// Always follow the path.
    Override,
}

/// One animated image layer.
///
/// Only `id` and `image_ref` are really needed; everything else has a
/// default so a layer with just an image renders statically at the center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerSpec {
    /// Unique id. A trailing number (e.g. `gear-12`) sets the z-order.
    pub id: String,
    #[serde(alias = "imageRef", alias = "url")]
    pub image_ref: String,
    pub position: PercentPoint,
    pub scale: ScaleSpec,
    #[serde(alias = "angleDeg")]
    pub angle_deg: f64,
    /// Revolutions per minute (valid range: 0-60). 0 disables spin.
    #[serde(alias = "spinRPM", alias = "spinRpm")]
    pub spin_rpm: f64,
    #[serde(alias = "spinDir")]
    pub spin_dir: Direction,
    /// Revolutions per minute (valid range: 0-60). 0 disables orbit.
    #[serde(alias = "orbitRPM", alias = "orbitRpm")]
    pub orbit_rpm: f64,
    #[serde(alias = "orbitDir")]
    pub orbit_dir: Direction,
    /// Orbit center in stage percent. Defaults to the stage center.
    #[serde(alias = "orbitCenter", skip_serializing_if = "Option::is_none")]
    pub orbit_center: Option<PercentPoint>,
    /// Starting angle in degrees. Defaults to the angle of `position` around the center.
    #[serde(alias = "orbitPhaseDeg", skip_serializing_if = "Option::is_none")]
    pub orbit_phase_deg: Option<f64>,
    #[serde(alias = "orbitOrientPolicy")]
    pub orbit_orient_policy: OrientPolicy,
    #[serde(alias = "orbitOrientDeg")]
    pub orbit_orient_deg: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clock: Option<ClockConfig>,
    pub effects: Vec<EffectSpec>,
}

impl Default for LayerSpec {
    fn default() -> Self {
        Self {
            id: String::new(),
            image_ref: String::new(),
            position: PercentPoint::centered(),
            scale: ScaleSpec::default(),
            angle_deg: 0.0,
            spin_rpm: 0.0,
            spin_dir: Direction::Cw,
            orbit_rpm: 0.0,
            orbit_dir: Direction::Cw,
            orbit_center: None,
            orbit_phase_deg: None,
            orbit_orient_policy: OrientPolicy::Auto,
            orbit_orient_deg: 0.0,
            clock: None,
            effects: Vec::new(),
        }
    }
}

impl LayerSpec {
    /// The enabled clock config, if any.
    pub fn active_clock(&self) -> Option<&ClockConfig> {
        self.clock.as_ref().filter(|c| c.enabled)
    }

    /// Whether an enabled clock drives this layer's rotation.
    pub fn clock_drives_spin(&self) -> bool {
        self.active_clock().is_some_and(|c| c.spin_hand.is_some())
    }

    /// Whether an enabled clock drives this layer's orbit.
    pub fn clock_drives_orbit(&self) -> bool {
        self.active_clock().is_some_and(|c| c.orbit_hand.is_some())
    }

    /// Z-order derived from the id's trailing digits (0 when there are none).
    pub fn z_order(&self) -> i64 {
        layer_z_order(&self.id)
    }
}

/// Parse the trailing run of ASCII digits of a layer id.
///
/// `"gear-12"` → 12, `"background"` → 0. Overlong suffixes saturate.
pub fn layer_z_order(id: &str) -> i64 {
    let digits: String = id
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse::<i64>().unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_defaults() {
        let layer = LayerSpec::default();
        assert_eq!(layer.position, PercentPoint::centered());
        assert!((layer.scale.pct - 100.0).abs() < f64::EPSILON);
        assert_eq!(layer.spin_dir, Direction::Cw);
        assert_eq!(layer.orbit_orient_policy, OrientPolicy::Auto);
        assert!(layer.clock.is_none());
        assert!(layer.effects.is_empty());
    }

    #[test]
    fn z_order_from_suffix() {
        assert_eq!(layer_z_order("gear-12"), 12);
        assert_eq!(layer_z_order("hand3"), 3);
        assert_eq!(layer_z_order("background"), 0);
        assert_eq!(layer_z_order(""), 0);
        assert_eq!(layer_z_order("99999999999999999999999"), i64::MAX);
    }

    #[test]
    fn camel_case_json_is_accepted() {
        let json = r#"{
            "id": "planet-2",
            "imageRef": "planet.png",
            "position": { "xPct": 100, "yPct": 50 },
            "spinRPM": 30,
            "spinDir": "ccw",
            "orbitRPM": 2,
            "orbitCenter": { "xPct": 50, "yPct": 50 },
            "orbitPhaseDeg": 45,
            "orbitOrientPolicy": "override"
        }"#;
        let layer: LayerSpec = serde_json::from_str(json).unwrap();
        assert_eq!(layer.image_ref, "planet.png");
        assert!((layer.position.x_pct - 100.0).abs() < f64::EPSILON);
        assert!((layer.spin_rpm - 30.0).abs() < f64::EPSILON);
        assert_eq!(layer.spin_dir, Direction::Ccw);
        assert_eq!(layer.orbit_phase_deg, Some(45.0));
        assert_eq!(layer.orbit_orient_policy, OrientPolicy::Override);
    }

    #[test]
    fn snake_case_toml_is_accepted() {
        let toml_str = r#"
id = "gear-1"
image_ref = "gear.png"
spin_rpm = 6
spin_dir = "clockwise"

[position]
x_pct = 25
y_pct = 75
"#;
        let layer: LayerSpec = toml::from_str(toml_str).unwrap();
        assert_eq!(layer.id, "gear-1");
        assert_eq!(layer.spin_dir, Direction::Cw);
        assert!((layer.position.y_pct - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn direction_sign() {
        assert_eq!(Direction::Cw.sign(), 1.0);
        assert_eq!(Direction::Ccw.sign(), -1.0);
    }
}
