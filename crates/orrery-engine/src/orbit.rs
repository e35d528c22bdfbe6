//! Circular motion around a stage point.
//!
//! The orbit radius is where the ray from the orbit center through the
//! layer's configured position leaves the logical stage. Radius and center
//! live in logical units; pixels are re-derived from them on every resize
//! while the on-screen angle is kept.

use std::collections::HashMap;

use orrery_common::{EngineError, Point};
use orrery_config::schema::OrientPolicy;
use tracing::debug;

use crate::backend::SpriteHandle;
use crate::geometry::{
    clamp_percent, deg_to_rad, normalize_angle, project_to_border, resolve_rpm,
    rpm_to_rad_per_sec,
};
use crate::layer::BuiltLayer;
use crate::processor::{EngineContext, FaultLog, InitReport, Processor};
use crate::stage::StageTransform;

/// Resolved spin RPM per sprite; 0 when nothing spins it.
pub type SpinRpmMap = HashMap<SpriteHandle, f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct OrbitItem {
    pub layer: usize,
    pub layer_id: String,
    pub sprite: SpriteHandle,
    pub center_logical: Point,
    pub radius_logical: f64,
    /// Center in viewport pixels.
    pub center: Point,
    /// Radius in viewport pixels.
    pub radius: f64,
    pub dir: f64,
    pub rad_per_sec: f64,
    pub base_phase: f64,
    /// Angle written by the last tick.
    pub current_angle: f64,
    /// Added to the path angle when the layer's rotation follows its path.
    pub orient: Option<f64>,
}

impl OrbitItem {
    pub fn angle_at(&self, elapsed: f64) -> f64 {
        self.base_phase + self.dir * self.rad_per_sec * elapsed
    }

    pub fn position_at(&self, angle: f64) -> Point {
        self.center + Point::from_angle(angle) * self.radius
    }

    fn refresh_pixels(&mut self, stage: &StageTransform) {
        self.center = stage.to_viewport(self.center_logical);
        self.radius = stage.length_to_viewport(self.radius_logical);
    }
}

#[derive(Debug, Default)]
pub struct OrbitProcessor {
    items: Vec<OrbitItem>,
    index: HashMap<String, usize>,
    spin_rpm: SpinRpmMap,
}

impl OrbitProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spin RPMs used by the `auto` orientation policy. Set before `init`.
    pub fn set_spin_rpm(&mut self, map: SpinRpmMap) {
        self.spin_rpm = map;
    }

    pub fn item(&self, layer_id: &str) -> Option<&OrbitItem> {
        self.index.get(layer_id).map(|&i| &self.items[i])
    }

    fn orientation(&self, layer: &BuiltLayer) -> Option<f64> {
        let orient = deg_to_rad(layer.spec.orbit_orient_deg);
        match layer.spec.orbit_orient_policy {
            OrientPolicy::None => None,
            OrientPolicy::Override => Some(orient),
            OrientPolicy::Auto => {
                let rpm = self.spin_rpm.get(&layer.sprite).copied().unwrap_or(0.0);
                (rpm == 0.0).then_some(orient)
            }
        }
    }

    /// Write `angle` to the item's sprite. Returns a fault description on failure.
    fn place(
        ctx: &mut EngineContext<'_>,
        item: &mut OrbitItem,
        angle: f64,
    ) -> Result<(), &'static str> {
        let pos = item.position_at(angle);
        if !pos.is_finite() || !angle.is_finite() {
            return Err("non-finite position");
        }
        let sprite = ctx.backend.sprite_mut(item.sprite).ok_or("sprite missing")?;
        sprite.set_position(pos);
        if let Some(orient) = item.orient {
            sprite.rotation = angle + orient;
        }
        item.current_angle = angle;
        Ok(())
    }
}

impl Processor for OrbitProcessor {
    type Item = OrbitItem;

    fn name(&self) -> &'static str {
        "orbit"
    }

    fn init(
        &mut self,
        ctx: &mut EngineContext<'_>,
        layers: &[BuiltLayer],
    ) -> Result<InitReport, EngineError> {
        self.items.clear();
        self.index.clear();
        let mut report = InitReport::default();
        let stage = ctx.stage;

        for (i, layer) in layers.iter().enumerate() {
            let Some(rpm) = resolve_rpm(layer.spec.orbit_rpm) else {
                continue;
            };
            if layer.spec.clock_drives_orbit() {
                debug!(layer = %layer.id, "orbit left to the clock");
                continue;
            }

            let center_pct = clamp_percent(layer.spec.orbit_center.unwrap_or_default());
            let center = stage.percent_to_logical(center_pct);
            let start = layer.base.position;
            let border = project_to_border(center, start, stage.logical_rect());
            let radius = border.distance(center);
            if !(radius.is_finite() && radius > 0.0) {
                report.disabled += 1;
                ctx.disable_feature(&layer.id, "orbit", "zero orbit radius");
                continue;
            }

            let phase = match layer.spec.orbit_phase_deg {
                Some(deg) if deg.is_finite() => normalize_angle(deg_to_rad(deg)),
                _ => (start - center).angle(),
            };

            let mut item = OrbitItem {
                layer: i,
                layer_id: layer.id.clone(),
                sprite: layer.sprite,
                center_logical: center,
                radius_logical: radius,
                center: Point::ORIGIN,
                radius: 0.0,
                dir: layer.spec.orbit_dir.sign(),
                rad_per_sec: rpm_to_rad_per_sec(rpm),
                base_phase: phase,
                current_angle: phase,
                orient: self.orientation(layer),
            };
            item.refresh_pixels(&stage);
            if let Err(what) = Self::place(ctx, &mut item, phase) {
                report.disabled += 1;
                ctx.disable_feature(&layer.id, "orbit", what);
                continue;
            }
            debug!(layer = %layer.id, radius, rpm, "orbit ready");

            self.index.insert(layer.id.clone(), self.items.len());
            self.items.push(item);
        }

        report.items = self.items.len();
        Ok(report)
    }

    fn tick(&mut self, ctx: &mut EngineContext<'_>, elapsed: f64) -> Result<(), EngineError> {
        let mut faults = FaultLog::new("orbit");
        for item in &mut self.items {
            let angle = item.angle_at(elapsed);
            if let Err(what) = Self::place(ctx, item, angle) {
                faults.record(&item.layer_id, what);
            }
        }
        faults.finish()
    }

    /// Keep the current on-screen angle; only center and radius pixels move.
    fn recompute(&mut self, ctx: &mut EngineContext<'_>, elapsed: f64) -> Result<(), EngineError> {
        let mut faults = FaultLog::new("orbit");
        let stage = ctx.stage;
        for item in &mut self.items {
            item.refresh_pixels(&stage);
            item.base_phase = item.current_angle - item.dir * item.rad_per_sec * elapsed;
            let angle = item.current_angle;
            if let Err(what) = Self::place(ctx, item, angle) {
                faults.record(&item.layer_id, what);
            }
        }
        faults.finish()
    }

    fn dispose(&mut self, _ctx: &mut EngineContext<'_>) -> Result<(), EngineError> {
        self.items.clear();
        self.index.clear();
        self.spin_rpm.clear();
        Ok(())
    }

    fn items(&self) -> &[OrbitItem] {
        &self.items
    }
}
