//! Per-layer visual effects.
//!
//! Basic effects (fade, pulse, tilt) are composed every tick on top of
//! whatever spin, orbit and clock wrote: alpha and scale absolutely,
//! tilt through an [`AdditiveChannel`]. Advanced effects (glow, bloom,
//! distort, shockwave) only run when [`advanced_allowed`] says so; glow
//! and bloom get an aura sprite from the [`EffectHandler`], distort and
//! shockwave act on the owner directly.

mod capability;
mod channel;
mod curves;
mod pointer;


use std::collections::HashMap;

use orrery_common::{EngineError, Point, Tint};
use orrery_config::schema::{EffectSpec, EffectsSettings, PulseProperty, TiltMode};
use tracing::debug;

pub use capability::{advanced_allowed, Capabilities, MIN_CORES, MIN_MEMORY_GB};
pub use channel::AdditiveChannel;
pub use curves::{
    aura_curve, distort_offset, ease, fade_alpha, ping_pong, pulse_factor, shockwave, tilt_angle,
};
pub use pointer::{PointerState, DEVICE_TILT_RANGE_DEG};

use crate::backend::{AuraKind, AuraRequest, EffectHandler, Scale2, SpriteHandle};
use crate::host::{ListenerId, ListenerKind};
use crate::layer::BuiltLayer;
use crate::processor::{EngineContext, FaultLog, InitReport, Processor};

/// An aura sprite that follows its owner.
#[derive(Debug, Clone, PartialEq)]
pub struct AuraItem {
    pub sprite: SpriteHandle,
    pub kind: AuraKind,
    pub effect: EffectSpec,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EffectItem {
    pub layer: usize,
    pub layer_id: String,
    pub sprite: SpriteHandle,
    /// Fraction of the natural sprite size.
    pub base_scale: f64,
    pub basic: Vec<EffectSpec>,
    /// Advanced effects that passed the capability gate.
    pub advanced: Vec<EffectSpec>,
    pub auras: Vec<AuraItem>,
    tilt: AdditiveChannel<f64>,
    wobble: AdditiveChannel<Point>,
}

impl EffectItem {
    /// Current tilt offset, radians.
    pub fn tilt(&self) -> f64 {
        self.tilt.offset()
    }
}

/// What one tick computed for an owner sprite.
#[derive(Debug, Default)]
struct Composed {
    alpha: Option<f64>,
    scale: Option<f64>,
    tilt: Option<f64>,
    /// Distort offset, logical units.
    wobble: Option<Point>,
}

impl Composed {
    fn is_finite(&self) -> bool {
        self.alpha.map_or(true, f64::is_finite)
            && self.scale.map_or(true, f64::is_finite)
            && self.tilt.map_or(true, f64::is_finite)
            && self.wobble.map_or(true, Point::is_finite)
    }
}

fn times(acc: &mut Option<f64>, factor: f64) {
    *acc = Some(acc.unwrap_or(1.0) * factor);
}

/// Evaluates effect lists and owns every aura sprite it created.
pub struct EffectProcessor {
    items: Vec<EffectItem>,
    index: HashMap<String, usize>,
    settings: EffectsSettings,
    capabilities: Capabilities,
    handler: Box<dyn EffectHandler>,
    pointer: PointerState,
    listeners: Vec<ListenerId>,
}

impl std::fmt::Debug for EffectProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectProcessor")
            .field("items", &self.items)
            .field("settings", &self.settings)
            .field("capabilities", &self.capabilities)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

impl EffectProcessor {
    pub fn new(
        settings: EffectsSettings,
        capabilities: Capabilities,
        handler: Box<dyn EffectHandler>,
        pointer: PointerState,
    ) -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
            settings,
            capabilities,
            handler,
            pointer,
            listeners: Vec::new(),
        }
    }

    /// Replace the scene-wide effect settings. Takes effect on the next `init`.
    pub fn configure(&mut self, settings: EffectsSettings) {
        self.settings = settings;
    }

    pub fn item(&self, layer_id: &str) -> Option<&EffectItem> {
        self.index.get(layer_id).map(|&i| &self.items[i])
    }

    pub fn advanced_enabled(&self) -> bool {
        self.settings.enabled && advanced_allowed(self.settings.advanced, &self.capabilities)
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    /// Listeners installed for pointer or device tilt.
    pub fn listeners(&self) -> &[ListenerId] {
        &self.listeners
    }

    fn release(&mut self, ctx: &mut EngineContext<'_>) {
        for id in self.listeners.drain(..) {
            ctx.host.unsubscribe(id);
        }
        for item in self.items.drain(..) {
            for aura in item.auras {
                self.handler.dispose_aura_sprite(&mut *ctx.backend, aura.sprite);
            }
        }
        self.index.clear();
    }

    fn create_aura(
        &mut self,
        ctx: &mut EngineContext<'_>,
        layer: &BuiltLayer,
        effect: &EffectSpec,
    ) -> Result<AuraItem, &'static str> {
        let (kind, color) = match effect {
            EffectSpec::Glow(glow) => (AuraKind::Glow, glow.color.as_str()),
            EffectSpec::Bloom(bloom) => (AuraKind::Bloom, bloom.color.as_str()),
            _ => return Err("not an aura effect"),
        };
        let container = ctx.container.ok_or("no container")?;
        let request = AuraRequest {
            owner: layer.sprite,
            container,
            image_ref: layer.spec.image_ref.clone(),
            kind,
            tint: Tint::from_hex(color).unwrap_or_default(),
        };
        let sprite = self
            .handler
            .create_aura_sprite(&mut *ctx.backend, &request)
            .ok_or("aura sprite not created")?;
        Ok(AuraItem {
            sprite,
            kind,
            effect: effect.clone(),
        })
    }

    fn compose(&self, item: &EffectItem, elapsed: f64) -> Composed {
        let pointer = self.pointer.pointer();
        let device = self.pointer.device();
        let mut out = Composed::default();

        for effect in &item.basic {
            match effect {
                EffectSpec::Fade(fade) => times(&mut out.alpha, fade_alpha(fade, elapsed)),
                EffectSpec::Pulse(pulse) => {
                    let s = pulse_factor(pulse, elapsed);
                    match pulse.property {
                        PulseProperty::Scale => times(&mut out.scale, s),
                        PulseProperty::Alpha => times(&mut out.alpha, s.clamp(0.0, 1.0)),
                    }
                }
                EffectSpec::Tilt(tilt) => {
                    let angle = tilt_angle(tilt, elapsed, pointer, device);
                    out.tilt = Some(out.tilt.unwrap_or(0.0) + angle);
                }
                _ => {}
            }
        }
        for effect in &item.advanced {
            match effect {
                EffectSpec::Distort(distort) => {
                    let (offset, jitter) = distort_offset(distort, elapsed);
                    out.wobble = Some(out.wobble.unwrap_or_default() + offset);
                    times(&mut out.scale, jitter);
                }
                EffectSpec::Shockwave(wave) => {
                    let (alpha, scale) = shockwave(wave, elapsed);
                    out.alpha = Some(alpha);
                    out.scale = Some(scale);
                }
                _ => {}
            }
        }
        out.alpha = out.alpha.map(|a| a.clamp(0.0, 1.0));
        out
    }

    /// Write composed values to one owner and move its auras along.
    fn apply(
        &mut self,
        ctx: &mut EngineContext<'_>,
        i: usize,
        elapsed: f64,
    ) -> Result<(), &'static str> {
        let composed = self.compose(&self.items[i], elapsed);
        if !composed.is_finite() {
            return Err("non-finite effect value");
        }
        let stage = ctx.stage;
        let item = &mut self.items[i];
        let owner = ctx.backend.sprite_mut(item.sprite).ok_or("sprite missing")?;

        if let Some(alpha) = composed.alpha {
            owner.alpha = alpha;
        }
        if let Some(scale) = composed.scale {
            owner.scale = Scale2::uniform(item.base_scale * stage.scale * scale);
        }
        if let Some(tilt) = composed.tilt {
            owner.rotation = item.tilt.compose(owner.rotation, tilt);
        }
        if let Some(wobble) = composed.wobble {
            let offset = wobble * stage.scale;
            owner.set_position(item.wobble.compose(owner.position(), offset));
        }
        let owner = *owner;

        for aura in &item.auras {
            let (strength, pulse_ms, scale) = match &aura.effect {
                EffectSpec::Glow(g) => (g.strength, g.pulse_ms, g.scale),
                EffectSpec::Bloom(b) => (b.strength, b.pulse_ms, b.scale),
                _ => continue,
            };
            let (alpha, factor) = aura_curve(strength, pulse_ms, scale, elapsed);
            let sprite = ctx.backend.sprite_mut(aura.sprite).ok_or("aura sprite missing")?;
            sprite.set_position(owner.position());
            sprite.rotation = owner.rotation;
            sprite.alpha = alpha;
            sprite.scale = Scale2 {
                x: owner.scale.x * factor,
                y: owner.scale.y * factor,
            };
            self.handler
                .apply_advanced_effect(&mut *ctx.backend, aura.sprite, &aura.effect, elapsed);
        }
        Ok(())
    }
}

impl Processor for EffectProcessor {
    type Item = EffectItem;

    fn name(&self) -> &'static str {
        "effects"
    }

    fn init(
        &mut self,
        ctx: &mut EngineContext<'_>,
        layers: &[BuiltLayer],
    ) -> Result<InitReport, EngineError> {
        self.release(ctx);
        let mut report = InitReport::default();
        if !self.settings.enabled {
            debug!("effects disabled");
            return Ok(report);
        }
        let advanced = self.advanced_enabled();
        let mut wants_pointer = false;
        let mut wants_device = false;

        for (i, layer) in layers.iter().enumerate() {
            if layer.spec.effects.is_empty() {
                continue;
            }
            let mut item = EffectItem {
                layer: i,
                layer_id: layer.id.clone(),
                sprite: layer.sprite,
                base_scale: layer.base.scale,
                basic: Vec::new(),
                advanced: Vec::new(),
                auras: Vec::new(),
                tilt: AdditiveChannel::new(),
                wobble: AdditiveChannel::new(),
            };

            for effect in &layer.spec.effects {
                match effect {
                    EffectSpec::Unknown => {
                        ctx.disable_feature(&layer.id, "effect", "unknown effect type");
                    }
                    e if e.is_advanced() && !advanced => {
                        ctx.disable_feature(&layer.id, e.kind(), "advanced effects unavailable");
                    }
                    e @ (EffectSpec::Glow(_) | EffectSpec::Bloom(_)) => {
                        match self.create_aura(ctx, layer, e) {
                            Ok(aura) => {
                                item.advanced.push(e.clone());
                                item.auras.push(aura);
                            }
                            Err(reason) => ctx.disable_feature(&layer.id, e.kind(), reason),
                        }
                    }
                    e if e.is_advanced() => item.advanced.push(e.clone()),
                    e => {
                        if let EffectSpec::Tilt(tilt) = e {
                            wants_pointer |= tilt.mode == TiltMode::Pointer;
                            wants_device |= tilt.mode == TiltMode::Device;
                        }
                        item.basic.push(e.clone());
                    }
                }
            }

            if item.basic.is_empty() && item.advanced.is_empty() {
                report.disabled += 1;
                continue;
            }
            debug!(
                layer = %layer.id,
                basic = item.basic.len(),
                advanced = item.advanced.len(),
                "effects ready"
            );
            self.index.insert(layer.id.clone(), self.items.len());
            self.items.push(item);
        }

        if wants_pointer {
            self.listeners.push(ctx.host.subscribe(ListenerKind::Pointer));
        }
        if wants_device {
            self.listeners
                .push(ctx.host.subscribe(ListenerKind::DeviceOrientation));
        }

        report.items = self.items.len();
        Ok(report)
    }

    fn tick(&mut self, ctx: &mut EngineContext<'_>, elapsed: f64) -> Result<(), EngineError> {
        let mut faults = FaultLog::new("effects");
        for i in 0..self.items.len() {
            if let Err(what) = self.apply(ctx, i, elapsed) {
                faults.record(&self.items[i].layer_id, what);
            }
        }
        faults.finish()
    }

    /// Re-apply at `elapsed` so scale and distort use the new stage scale.
    fn recompute(&mut self, ctx: &mut EngineContext<'_>, elapsed: f64) -> Result<(), EngineError> {
        self.tick(ctx, elapsed)
    }

    /// Unsubscribes pointer listeners, then destroys every aura.
    fn dispose(&mut self, ctx: &mut EngineContext<'_>) -> Result<(), EngineError> {
        self.release(ctx);
        Ok(())
    }

    fn items(&self) -> &[EffectItem] {
        &self.items
    }
}
