//! Lenient defaulting applied before a scene is built.
//!
//! Validation rejects; sanitizing repairs. A malformed numeric degrades to
//! its documented default so one bad field never takes the scene down.
//! The stage itself is left alone: a broken stage is a structural error
//! the engine refuses to build.

use crate::schema::{
    BloomEffect, ClockConfig, DistortEffect, EffectSpec, FadeEffect, GlowEffect, LayerSpec,
    PercentPoint, PulseEffect, SceneConfig, ShockwaveEffect, TiltEffect,
};

/// Maximum accepted rotation speed for spin and orbit.
pub const MAX_RPM: f64 = 60.0;

/// Largest accepted server offset, one day either way.
pub const MAX_OFFSET_MINUTES: f64 = 1440.0;

/// Repair every layer of `config` in place.
///
/// Returns one human-readable note per repaired field.
pub fn sanitize(config: &mut SceneConfig) -> Vec<String> {
    let mut notes = Vec::new();
    for (i, layer) in config.layers.iter_mut().enumerate() {
        let label = if layer.id.is_empty() {
            format!("layers[{i}]")
        } else {
            layer.id.clone()
        };
        sanitize_layer(&label, layer, &mut notes);
    }
    if !notes.is_empty() {
        tracing::debug!(count = notes.len(), "sanitized scene config");
    }
    notes
}

fn sanitize_layer(label: &str, layer: &mut LayerSpec, notes: &mut Vec<String>) {
    let mut fix = Fixer { label, notes };

    fix.point("position", &mut layer.position, 50.0, false);
    fix.finite("angle_deg", &mut layer.angle_deg, 0.0);
    fix.positive("scale.pct", &mut layer.scale.pct, 100.0);
    fix.rpm("spin_rpm", &mut layer.spin_rpm);
    fix.rpm("orbit_rpm", &mut layer.orbit_rpm);
    if let Some(center) = layer.orbit_center.as_mut() {
        fix.point("orbit_center", center, 50.0, true);
    }
    if let Some(phase) = layer.orbit_phase_deg {
        if phase.is_finite() {
            let normalized = normalize_degrees(phase);
            if normalized != phase {
                layer.orbit_phase_deg = Some(normalized);
            }
        } else {
            fix.note("orbit_phase_deg", "non-finite, using the position angle");
            layer.orbit_phase_deg = None;
        }
    }
    fix.finite("orbit_orient_deg", &mut layer.orbit_orient_deg, 0.0);

    if let Some(clock) = layer.clock.as_mut() {
        sanitize_clock(&mut fix, clock);
    }

    for effect in &mut layer.effects {
        sanitize_effect(&mut fix, effect);
    }
}

fn sanitize_clock(fix: &mut Fixer<'_>, clock: &mut ClockConfig) {
    let defaults = ClockConfig::default();
    if let Some(center) = clock.center.as_mut() {
        fix.point("clock.center", center, 50.0, false);
    }
    if let Some(center) = clock.orbit_center.as_mut() {
        fix.point("clock.orbit_center", center, 50.0, true);
    }
    fix.finite("clock.base", &mut clock.base, defaults.base);
    fix.finite("clock.tip", &mut clock.tip, defaults.tip);
    fix.finite("clock.spin_radius", &mut clock.spin_radius, 0.0);
    if clock.spin_radius < 0.0 {
        fix.note("clock.spin_radius", "negative, using 0");
        clock.spin_radius = 0.0;
    }
    fix.finite("clock.offset_minutes", &mut clock.offset_minutes, 0.0);
    let clamped = clock
        .offset_minutes
        .clamp(-MAX_OFFSET_MINUTES, MAX_OFFSET_MINUTES);
    if clamped != clock.offset_minutes {
        fix.note("clock.offset_minutes", "clamped to +/-1440");
        clock.offset_minutes = clamped;
    }
    if clock.timezone.trim().is_empty() {
        clock.timezone = defaults.timezone;
    }
}

fn sanitize_effect(fix: &mut Fixer<'_>, effect: &mut EffectSpec) {
    match effect {
        EffectSpec::Fade(f) => {
            let d = FadeEffect::default();
            fix.finite("fade.from", &mut f.from, d.from);
            fix.finite("fade.to", &mut f.to, d.to);
            fix.positive("fade.duration_ms", &mut f.duration_ms, d.duration_ms);
        }
        EffectSpec::Pulse(p) => {
            let d = PulseEffect::default();
            fix.finite("pulse.amp", &mut p.amp, d.amp);
            fix.positive("pulse.period_ms", &mut p.period_ms, d.period_ms);
            fix.finite("pulse.phase_deg", &mut p.phase_deg, d.phase_deg);
        }
        EffectSpec::Tilt(t) => {
            let d = TiltEffect::default();
            fix.finite("tilt.max_deg", &mut t.max_deg, d.max_deg);
            fix.positive("tilt.period_ms", &mut t.period_ms, d.period_ms);
        }
        EffectSpec::Glow(g) => {
            let d = GlowEffect::default();
            fix.finite("glow.strength", &mut g.strength, d.strength);
            fix.positive("glow.pulse_ms", &mut g.pulse_ms, d.pulse_ms);
            fix.positive("glow.scale", &mut g.scale, d.scale);
        }
        EffectSpec::Bloom(b) => {
            let d = BloomEffect::default();
            fix.finite("bloom.strength", &mut b.strength, d.strength);
            fix.positive("bloom.pulse_ms", &mut b.pulse_ms, d.pulse_ms);
            fix.positive("bloom.scale", &mut b.scale, d.scale);
        }
        EffectSpec::Distort(x) => {
            let d = DistortEffect::default();
            fix.finite("distort.amplitude", &mut x.amplitude, d.amplitude);
            fix.finite("distort.speed_hz", &mut x.speed_hz, d.speed_hz);
            fix.finite("distort.scale_jitter", &mut x.scale_jitter, d.scale_jitter);
        }
        EffectSpec::Shockwave(s) => {
            let d = ShockwaveEffect::default();
            fix.positive("shockwave.period_ms", &mut s.period_ms, d.period_ms);
            fix.positive("shockwave.max_scale", &mut s.max_scale, d.max_scale);
            fix.finite("shockwave.strength", &mut s.strength, d.strength);
        }
        EffectSpec::Unknown => {}
    }
}

/// Normalize an angle in degrees to `[0, 360)`.
pub fn normalize_degrees(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

struct Fixer<'a> {
    label: &'a str,
    notes: &'a mut Vec<String>,
}

impl Fixer<'_> {
    fn note(&mut self, field: &str, what: &str) {
        self.notes.push(format!("{}: {field} {what}", self.label));
    }

    fn finite(&mut self, field: &str, value: &mut f64, default: f64) {
        if !value.is_finite() {
            self.note(field, &format!("non-finite, using {default}"));
            *value = default;
        }
    }

    fn positive(&mut self, field: &str, value: &mut f64, default: f64) {
        if !value.is_finite() || *value <= 0.0 {
            self.note(field, &format!("must be positive, using {default}"));
            *value = default;
        }
    }

    fn rpm(&mut self, field: &str, value: &mut f64) {
        if !value.is_finite() {
            self.note(field, "non-finite, using 0");
            *value = 0.0;
        } else if !(0.0..=MAX_RPM).contains(&*value) {
            self.note(field, "clamped to 0-60");
            *value = value.clamp(0.0, MAX_RPM);
        }
    }

    fn point(&mut self, field: &str, p: &mut PercentPoint, default: f64, clamp: bool) {
        for (axis, v) in [("x_pct", &mut p.x_pct), ("y_pct", &mut p.y_pct)] {
            if !v.is_finite() {
                self.note(&format!("{field}.{axis}"), &format!("non-finite, using {default}"));
                *v = default;
            } else if clamp && !(0.0..=100.0).contains(&*v) {
                self.note(&format!("{field}.{axis}"), "clamped to 0-100");
                *v = v.clamp(0.0, 100.0);
            }
        }
    }
}
