//! Layers as built by the orchestrator.

use std::cmp::Ordering;

use orrery_common::Point;
use orrery_config::LayerSpec;

use crate::backend::SpriteHandle;
use crate::geometry::deg_to_rad;
use crate::stage::StageTransform;

/// The configured resting transform, in logical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseTransform {
    pub position: Point,
    /// Fraction of the natural size (`scale.pct / 100`).
    pub scale: f64,
    pub rotation: f64,
}

impl BaseTransform {
    pub fn from_spec(spec: &LayerSpec, stage: &StageTransform) -> Self {
        Self {
            position: stage.percent_to_logical(spec.position),
            scale: spec.scale.pct / 100.0,
            rotation: deg_to_rad(spec.angle_deg),
        }
    }

    /// Sprite scale in viewport pixels per texture pixel.
    pub fn viewport_scale(&self, stage: &StageTransform) -> f64 {
        self.scale * stage.scale
    }
}

/// A layer whose sprite exists. Replaced wholesale on every `init`.
#[derive(Debug, Clone)]
pub struct BuiltLayer {
    pub id: String,
    pub sprite: SpriteHandle,
    pub spec: LayerSpec,
    pub z_order: i64,
    pub base: BaseTransform,
}

/// Draw order: numeric id suffix, then id.
pub fn compare_layers(a: &LayerSpec, b: &LayerSpec) -> Ordering {
    a.z_order().cmp(&b.z_order()).then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_common::Viewport;
    use orrery_config::schema::{PercentPoint, ScaleSpec, StageConfig};

    fn spec(id: &str) -> LayerSpec {
        LayerSpec {
            id: id.into(),
            ..Default::default()
        }
    }

    #[test]
    fn sort_by_suffix_then_id() {
        let mut layers = vec![spec("b-10"), spec("a-2"), spec("top"), spec("c-2"), spec("a-1")];
        layers.sort_by(compare_layers);
        let ids: Vec<&str> = layers.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["top", "a-1", "a-2", "c-2", "b-10"]);
    }

    #[test]
    fn base_transform_from_spec() {
        let stage = StageTransform::compute(&StageConfig::default(), Viewport::new(1024.0, 1024.0));
        let layer = LayerSpec {
            position: PercentPoint::new(25.0, 75.0),
            scale: ScaleSpec { pct: 50.0 },
            angle_deg: 180.0,
            ..spec("a")
        };
        let base = BaseTransform::from_spec(&layer, &stage);
        assert_eq!(base.position, Point::new(512.0, 1536.0));
        assert!((base.scale - 0.5).abs() < 1e-12);
        assert!((base.rotation - std::f64::consts::PI).abs() < 1e-12);
        assert!((base.viewport_scale(&stage) - 0.25).abs() < 1e-12);
    }
}
