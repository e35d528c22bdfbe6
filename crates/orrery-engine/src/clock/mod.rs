//! Wall-clock driven layers.
//!
//! A clock layer either spins like a hand around a pivot, orbits a stage
//! point with the hand's angle, or both (the orbit moves the pivot, the
//! spin rotates around it). All clock positions are kept in logical
//! units and converted to pixels on every placement.
//!
//! Unlike [`OrbitProcessor`](crate::orbit::OrbitProcessor), `recompute`
//! re-solves the orbit phase from the current wall time, so a resize puts
//! clock orbits back where the clock says they belong.

mod geometry;
mod hand;
mod time;


use std::collections::HashMap;
use std::f64::consts::FRAC_PI_2;
use std::rc::Rc;

use chrono::NaiveTime;
use orrery_common::{EngineError, Point};
use orrery_config::schema::{ClockFormat, Hand};
use tracing::debug;

pub use geometry::{ClockGeometry, MIN_HAND_LENGTH};
pub use hand::{hand_angle, hand_units};
pub use time::{parse_timezone, FixedClock, ResolvedSource, SystemClock, WallClock};

use crate::backend::{Scale2, SpriteHandle};
use crate::geometry::{clamp_percent, DEGENERATE_EPSILON};
use crate::layer::BuiltLayer;
use crate::processor::{EngineContext, FaultLog, InitReport, Processor};
use crate::stage::StageTransform;

/// Spin half of a clock layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockSpin {
    pub hand: Hand,
    /// Pivot to base anchor distance, logical units.
    pub radius: f64,
    pub phase: f64,
}

/// Orbit half of a clock layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockOrbit {
    pub hand: Hand,
    /// Logical units.
    pub center: Point,
    pub radius: f64,
    /// Angle of the clock center around the orbit center at init.
    pub start_angle: f64,
    pub phase: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClockItem {
    pub layer: usize,
    pub layer_id: String,
    pub sprite: SpriteHandle,
    pub source: ResolvedSource,
    pub format: ClockFormat,
    pub smooth: bool,
    pub base_deg: f64,
    pub tip_deg: f64,
    pub geometry: ClockGeometry,
    /// Clock center, logical units.
    pub center: Point,
    /// Layer position relative to `center`; followed by orbit-only layers.
    pub offset: Point,
    /// Configured static rotation, added on top of the hand.
    pub trim: f64,
    pub spin: Option<ClockSpin>,
    pub orbit: Option<ClockOrbit>,
}

impl ClockItem {
    pub fn hand_angle(&self, hand: Hand, now: NaiveTime) -> f64 {
        hand_angle(hand, now, self.format, self.smooth)
    }

    /// The point the layer hangs from at `now`, logical units.
    pub fn pivot(&self, now: NaiveTime) -> Point {
        match &self.orbit {
            Some(orbit) => {
                let angle = self.hand_angle(orbit.hand, now) + orbit.phase;
                orbit.center + Point::from_angle(angle) * orbit.radius
            }
            None => self.center,
        }
    }

    /// Rotation that points the base→tip vector at the hand's dial
    /// position at `now`. Hand angles count from twelve o'clock.
    fn static_rotation(&self, hand: f64) -> f64 {
        hand - FRAC_PI_2 - self.geometry.angle + self.trim
    }

    fn solve_phases(&mut self, now: NaiveTime) {
        if let Some(hand) = self.spin.map(|s| s.hand) {
            let angle = self.hand_angle(hand, now);
            let phase = self.static_rotation(angle) - angle;
            if let Some(spin) = self.spin.as_mut() {
                spin.phase = phase;
            }
        }
        if let Some(hand) = self.orbit.map(|o| o.hand) {
            let angle = self.hand_angle(hand, now);
            if let Some(orbit) = self.orbit.as_mut() {
                orbit.phase = orbit.start_angle - angle;
            }
        }
    }

    /// Sprite position (viewport pixels) and rotation override at `now`.
    ///
    /// `scale` is the sprite's current scale, so the base anchor stays on
    /// the pivot while an effect pulses the hand.
    pub fn placement(
        &self,
        now: NaiveTime,
        stage: &StageTransform,
        scale: Scale2,
    ) -> (Point, Option<f64>) {
        let pivot = self.pivot(now);
        match &self.spin {
            Some(spin) => {
                let rotation = self.hand_angle(spin.hand, now) + spin.phase;
                let target = pivot + Point::from_angle(rotation) * spin.radius;
                let base = self.geometry.base.scale_by(scale.x, scale.y).rotate(rotation);
                (stage.to_viewport(target) - base, Some(rotation))
            }
            None => (stage.to_viewport(pivot + self.offset), None),
        }
    }
}

/// Drives clock-enabled layers from an injected [`WallClock`].
pub struct ClockProcessor {
    items: Vec<ClockItem>,
    index: HashMap<String, usize>,
    clock: Rc<dyn WallClock>,
}

impl std::fmt::Debug for ClockProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClockProcessor")
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

impl ClockProcessor {
    pub fn new(clock: Rc<dyn WallClock>) -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
            clock,
        }
    }

    pub fn item(&self, layer_id: &str) -> Option<&ClockItem> {
        self.index.get(layer_id).map(|&i| &self.items[i])
    }

    fn place(
        ctx: &mut EngineContext<'_>,
        item: &ClockItem,
        now: NaiveTime,
    ) -> Result<(), &'static str> {
        let scale = ctx
            .backend
            .sprite(item.sprite)
            .map(|s| s.scale)
            .ok_or("sprite missing")?;
        let (pos, rotation) = item.placement(now, &ctx.stage, scale);
        if !pos.is_finite() || rotation.is_some_and(|r| !r.is_finite()) {
            return Err("non-finite placement");
        }
        let sprite = ctx.backend.sprite_mut(item.sprite).ok_or("sprite missing")?;
        sprite.set_position(pos);
        if let Some(rotation) = rotation {
            sprite.rotation = rotation;
        }
        Ok(())
    }

    fn build_item(
        &self,
        ctx: &mut EngineContext<'_>,
        index: usize,
        layer: &BuiltLayer,
    ) -> Result<Option<ClockItem>, &'static str> {
        let Some(clock) = layer.spec.active_clock() else {
            return Ok(None);
        };
        if !clock.has_hand() {
            debug!(layer = %layer.id, "clock block without a hand");
            return Ok(None);
        }
        let sprite = ctx.backend.sprite(layer.sprite).copied().ok_or("sprite missing")?;
        let geometry = ClockGeometry::from_sprite(&sprite, clock.base, clock.tip)?;

        let (source, tz_warning) = ResolvedSource::from_config(clock);
        if let Some(warning) = tz_warning {
            ctx.disable_feature(&layer.id, "timezone", &warning);
        }

        let stage = ctx.stage;
        let center = clock
            .center
            .map(|p| stage.percent_to_logical(clamp_percent(p)))
            .unwrap_or(layer.base.position);

        let spin = clock.spin_hand.map(|hand| ClockSpin {
            hand,
            radius: if clock.spin_radius.is_finite() {
                clock.spin_radius.max(0.0)
            } else {
                0.0
            },
            phase: 0.0,
        });

        let orbit = match clock.orbit_hand {
            None => None,
            Some(hand) => {
                let orbit_center =
                    stage.percent_to_logical(clamp_percent(clock.orbit_center.unwrap_or_default()));
                let radius = orbit_center.distance(center);
                if radius.is_finite() && radius > DEGENERATE_EPSILON {
                    Some(ClockOrbit {
                        hand,
                        center: orbit_center,
                        radius,
                        start_angle: (center - orbit_center).angle(),
                        phase: 0.0,
                    })
                } else if spin.is_some() {
                    ctx.disable_feature(&layer.id, "clock orbit", "zero orbit radius");
                    None
                } else {
                    return Err("zero orbit radius");
                }
            }
        };

        Ok(Some(ClockItem {
            layer: index,
            layer_id: layer.id.clone(),
            sprite: layer.sprite,
            source,
            format: clock.format,
            smooth: clock.smooth,
            base_deg: clock.base,
            tip_deg: clock.tip,
            geometry,
            center,
            offset: layer.base.position - center,
            trim: layer.base.rotation,
            spin,
            orbit,
        }))
    }
}

impl Processor for ClockProcessor {
    type Item = ClockItem;

    fn name(&self) -> &'static str {
        "clock"
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
            let mut item = match self.build_item(ctx, i, layer) {
                Ok(Some(item)) => item,
                Ok(None) => continue,
                Err(reason) => {
                    report.disabled += 1;
                    ctx.disable_feature(&layer.id, "clock", reason);
                    continue;
                }
            };
            let now = item.source.wall_time(self.clock.as_ref());
            item.solve_phases(now);
            if let Err(reason) = Self::place(ctx, &item, now) {
                report.disabled += 1;
                ctx.disable_feature(&layer.id, "clock", reason);
                continue;
            }
            debug!(
                layer = %layer.id,
                spin = ?item.spin.map(|s| s.hand),
                orbit = ?item.orbit.map(|o| o.hand),
                "clock ready"
            );
            self.index.insert(layer.id.clone(), self.items.len());
            self.items.push(item);
        }

        report.items = self.items.len();
        Ok(report)
    }

    fn tick(&mut self, ctx: &mut EngineContext<'_>, _elapsed: f64) -> Result<(), EngineError> {
        let mut faults = FaultLog::new("clock");
        for item in &self.items {
            let now = item.source.wall_time(self.clock.as_ref());
            if let Err(what) = Self::place(ctx, item, now) {
                faults.record(&item.layer_id, what);
            }
        }
        faults.finish()
    }

    /// Re-run anchor geometry and re-solve phases from the current time.
    fn recompute(&mut self, ctx: &mut EngineContext<'_>, _elapsed: f64) -> Result<(), EngineError> {
        let mut faults = FaultLog::new("clock");
        for item in &mut self.items {
            let Some(sprite) = ctx.backend.sprite(item.sprite).copied() else {
                faults.record(&item.layer_id, "sprite missing");
                continue;
            };
            match ClockGeometry::from_sprite(&sprite, item.base_deg, item.tip_deg) {
                Ok(geometry) => item.geometry = geometry,
                Err(what) => {
                    faults.record(&item.layer_id, what);
                    continue;
                }
            }
            let now = item.source.wall_time(self.clock.as_ref());
            item.solve_phases(now);
            if let Err(what) = Self::place(ctx, item, now) {
                faults.record(&item.layer_id, what);
            }
        }
        faults.finish()
    }

    fn dispose(&mut self, _ctx: &mut EngineContext<'_>) -> Result<(), EngineError> {
        self.items.clear();
        self.index.clear();
        Ok(())
    }

    fn items(&self) -> &[ClockItem] {
        &self.items
    }
}
