//! Continuous rotation at a fixed RPM.

use std::collections::HashMap;

use orrery_common::EngineError;
use tracing::debug;

use crate::backend::SpriteHandle;
use crate::geometry::{resolve_rpm, rpm_to_rad_per_sec};
use crate::layer::BuiltLayer;
use crate::processor::{EngineContext, FaultLog, InitReport, Processor};

#[derive(Debug, Clone, PartialEq)]
pub struct SpinItem {
    pub layer: usize,
    pub layer_id: String,
    pub sprite: SpriteHandle,
    pub rpm: f64,
    /// `+1` clockwise, `-1` counter-clockwise.
    pub dir: f64,
    pub base_angle: f64,
    pub rad_per_sec: f64,
}

impl SpinItem {
    pub fn angle_at(&self, elapsed: f64) -> f64 {
        self.base_angle + self.dir * self.rad_per_sec * elapsed
    }
}

/// Rotates every layer with `spin_rpm > 0` that no clock drives.
#[derive(Debug, Default)]
pub struct SpinProcessor {
    items: Vec<SpinItem>,
    index: HashMap<String, usize>,
}

impl SpinProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolved RPM for `sprite`; 0 for layers that do not spin (including
    /// clock-driven ones).
    pub fn spin_rpm(&self, sprite: SpriteHandle) -> f64 {
        self.items
            .iter()
            .find(|item| item.sprite == sprite)
            .map_or(0.0, |item| item.rpm)
    }

    pub fn item(&self, layer_id: &str) -> Option<&SpinItem> {
        self.index.get(layer_id).map(|&i| &self.items[i])
    }
}

impl Processor for SpinProcessor {
    type Item = SpinItem;

    fn name(&self) -> &'static str {
        "spin"
    }

    fn init(
        &mut self,
        ctx: &mut EngineContext<'_>,
        layers: &[BuiltLayer],
    ) -> Result<InitReport, EngineError> {
        self.items.clear();
        self.index.clear();
        let mut report = InitReport::default();

        for (i, layer) in layers.iter().enumerate() {
            let Some(rpm) = resolve_rpm(layer.spec.spin_rpm) else {
                continue;
            };
            if layer.spec.clock_drives_spin() {
                debug!(layer = %layer.id, "spin left to the clock");
                continue;
            }
            let Some(sprite) = ctx.backend.sprite(layer.sprite) else {
                report.disabled += 1;
                ctx.disable_feature(&layer.id, "spin", "sprite missing");
                continue;
            };
            let dir = layer.spec.spin_dir.sign();
            self.index.insert(layer.id.clone(), self.items.len());
            self.items.push(SpinItem {
                layer: i,
                layer_id: layer.id.clone(),
                sprite: layer.sprite,
                rpm,
                dir,
                base_angle: sprite.rotation,
                rad_per_sec: rpm_to_rad_per_sec(rpm),
            });
        }

        report.items = self.items.len();
        Ok(report)
    }

    fn tick(&mut self, ctx: &mut EngineContext<'_>, elapsed: f64) -> Result<(), EngineError> {
        let mut faults = FaultLog::new(self.name());
        for item in &self.items {
            let angle = item.angle_at(elapsed);
            if !angle.is_finite() {
                faults.record(&item.layer_id, "non-finite rotation");
                continue;
            }
            match ctx.backend.sprite_mut(item.sprite) {
                Some(sprite) => sprite.rotation = angle,
                None => faults.record(&item.layer_id, "sprite missing"),
            }
        }
        faults.finish()
    }

    /// Rotation only depends on elapsed time, never on the viewport.
    fn recompute(
        &mut self,
        _ctx: &mut EngineContext<'_>,
        _elapsed: f64,
    ) -> Result<(), EngineError> {
        Ok(())
    }

    fn dispose(&mut self, _ctx: &mut EngineContext<'_>) -> Result<(), EngineError> {
        self.items.clear();
        self.index.clear();
        Ok(())
    }

    fn items(&self) -> &[SpinItem] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RenderBackend;
    use crate::test_support::Harness;
    use orrery_config::schema::{ClockConfig, Direction, Hand};
    use orrery_config::LayerSpec;
    use std::f64::consts::PI;

    fn spinner(id: &str, rpm: f64, dir: Direction) -> LayerSpec {
        LayerSpec {
            id: id.into(),
            image_ref: "gear.png".into(),
            spin_rpm: rpm,
            spin_dir: dir,
            ..Default::default()
        }
    }

    #[test]
    fn thirty_rpm_is_half_turn_per_second() {
        let mut h = Harness::new();
        let layers = h.build(&[spinner("gear-1", 30.0, Direction::Cw)]);
        let mut spin = SpinProcessor::new();
        let report = spin.init(&mut h.ctx(), &layers).unwrap();
        assert_eq!(report.items, 1);

        spin.tick(&mut h.ctx(), 1.0).unwrap();
        assert!((h.sprite(&layers[0]).rotation - PI).abs() < 1e-9);
    }

    #[test]
    fn ccw_runs_backwards_from_static_angle() {
        let mut h = Harness::new();
        let mut layer = spinner("gear-1", 60.0, Direction::Ccw);
        layer.angle_deg = 90.0;
        let layers = h.build(&[layer]);
        let mut spin = SpinProcessor::new();
        spin.init(&mut h.ctx(), &layers).unwrap();

        spin.tick(&mut h.ctx(), 0.25).unwrap();
        // base π/2 minus a quarter turn
        assert!(h.sprite(&layers[0]).rotation.abs() < 1e-9);
    }

    #[test]
    fn angle_formula_over_range() {
        for rpm in [0.5, 1.0, 7.5, 30.0, 60.0] {
            for t in [0.0, 0.1, 1.0, 12.5, 100.0] {
                let item = SpinItem {
                    layer: 0,
                    layer_id: "x".into(),
                    sprite: SpriteHandle(1),
                    rpm,
                    dir: 1.0,
                    base_angle: 0.3,
                    rad_per_sec: rpm_to_rad_per_sec(rpm),
                };
                let expected = 0.3 + rpm * PI / 30.0 * t;
                assert!((item.angle_at(t) - expected).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn zero_negative_and_nan_rpm_make_no_item() {
        let mut h = Harness::new();
        let layers = h.build(&[
            spinner("a", 0.0, Direction::Cw),
            spinner("b", -3.0, Direction::Cw),
            spinner("c", f64::NAN, Direction::Cw),
            spinner("d", f64::INFINITY, Direction::Cw),
        ]);
        let mut spin = SpinProcessor::new();
        spin.init(&mut h.ctx(), &layers).unwrap();
        assert!(!spin.is_active());
    }

    #[test]
    fn rpm_above_sixty_is_clamped() {
        let mut h = Harness::new();
        let layers = h.build(&[spinner("a", 500.0, Direction::Cw)]);
        let mut spin = SpinProcessor::new();
        spin.init(&mut h.ctx(), &layers).unwrap();
        assert_eq!(spin.item("a").unwrap().rpm, 60.0);
    }

    #[test]
    fn clock_driven_layers_are_skipped_and_report_zero() {
        let mut h = Harness::new();
        let mut layer = spinner("hand-1", 30.0, Direction::Cw);
        layer.clock = Some(ClockConfig {
            spin_hand: Some(Hand::Second),
            ..Default::default()
        });
        let layers = h.build(&[layer, spinner("gear-2", 12.0, Direction::Cw)]);
        let mut spin = SpinProcessor::new();
        spin.init(&mut h.ctx(), &layers).unwrap();
        assert_eq!(spin.items().len(), 1);
        assert_eq!(spin.spin_rpm(layers[0].sprite), 0.0);
        assert_eq!(spin.spin_rpm(layers[1].sprite), 12.0);
        assert!(spin.item("gear-2").is_some());
    }

    #[test]
    fn disabled_clock_does_not_block_spin() {
        let mut h = Harness::new();
        let mut layer = spinner("hand-1", 30.0, Direction::Cw);
        layer.clock = Some(ClockConfig {
            enabled: false,
            spin_hand: Some(Hand::Second),
            ..Default::default()
        });
        let layers = h.build(&[layer]);
        let mut spin = SpinProcessor::new();
        spin.init(&mut h.ctx(), &layers).unwrap();
        assert!(spin.is_active());
    }

    #[test]
    fn vanished_sprite_is_a_fault_not_a_panic() {
        let mut h = Harness::new();
        let layers = h.build(&[
            spinner("a", 30.0, Direction::Cw),
            spinner("b", 30.0, Direction::Cw),
        ]);
        let mut spin = SpinProcessor::new();
        spin.init(&mut h.ctx(), &layers).unwrap();
        h.backend.destroy_sprite(layers[0].sprite);

        let err = spin.tick(&mut h.ctx(), 1.0).unwrap_err();
        assert!(matches!(err, EngineError::ItemFaults { count: 1, .. }));
        // the healthy item still moved
        assert!((h.sprite(&layers[1]).rotation - PI).abs() < 1e-9);
    }

    #[test]
    fn dispose_clears_items() {
        let mut h = Harness::new();
        let layers = h.build(&[spinner("a", 30.0, Direction::Cw)]);
        let mut spin = SpinProcessor::new();
        spin.init(&mut h.ctx(), &layers).unwrap();
        spin.dispose(&mut h.ctx()).unwrap();
        assert!(!spin.is_active());
        assert!(spin.item("a").is_none());
    }
}
