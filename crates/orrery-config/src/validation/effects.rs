//! Effect list validation.

use orrery_common::Tint;

use crate::schema::{EffectSpec, LayerSpec};

use super::helpers::{validate_finite, validate_positive, validate_range_f64};

pub(crate) fn validate_layer_effects(errors: &mut Vec<String>, i: usize, layer: &LayerSpec) {
    for (j, effect) in layer.effects.iter().enumerate() {
        let name = format!("layers[{i}].effects[{j}]");
        match effect {
            EffectSpec::Fade(f) => {
                validate_range_f64(errors, &format!("{name}.from"), f.from, 0.0, 1.0);
                validate_range_f64(errors, &format!("{name}.to"), f.to, 0.0, 1.0);
                validate_positive(errors, &format!("{name}.duration_ms"), f.duration_ms);
            }
            EffectSpec::Pulse(p) => {
                validate_range_f64(errors, &format!("{name}.amp"), p.amp, 0.0, 1.0);
                validate_positive(errors, &format!("{name}.period_ms"), p.period_ms);
                validate_finite(errors, &format!("{name}.phase_deg"), p.phase_deg);
            }
            EffectSpec::Tilt(t) => {
                validate_range_f64(errors, &format!("{name}.max_deg"), t.max_deg, 0.0, 180.0);
                validate_positive(errors, &format!("{name}.period_ms"), t.period_ms);
            }
            EffectSpec::Glow(g) => {
                validate_color(errors, &format!("{name}.color"), &g.color);
                validate_range_f64(errors, &format!("{name}.strength"), g.strength, 0.0, 1.0);
                validate_positive(errors, &format!("{name}.pulse_ms"), g.pulse_ms);
                validate_positive(errors, &format!("{name}.scale"), g.scale);
            }
            EffectSpec::Bloom(b) => {
                validate_color(errors, &format!("{name}.color"), &b.color);
                validate_range_f64(errors, &format!("{name}.strength"), b.strength, 0.0, 1.0);
                validate_positive(errors, &format!("{name}.pulse_ms"), b.pulse_ms);
                validate_positive(errors, &format!("{name}.scale"), b.scale);
            }
            EffectSpec::Distort(d) => {
                validate_range_f64(errors, &format!("{name}.amplitude"), d.amplitude, 0.0, 256.0);
                validate_range_f64(errors, &format!("{name}.speed_hz"), d.speed_hz, 0.0, 60.0);
                validate_range_f64(
                    errors,
                    &format!("{name}.scale_jitter"),
                    d.scale_jitter,
                    0.0,
                    0.5,
                );
            }
            EffectSpec::Shockwave(s) => {
                validate_positive(errors, &format!("{name}.period_ms"), s.period_ms);
                validate_range_f64(errors, &format!("{name}.max_scale"), s.max_scale, 1.0, 10.0);
                validate_range_f64(errors, &format!("{name}.strength"), s.strength, 0.0, 1.0);
            }
            EffectSpec::Unknown => {
                errors.push(format!("{name}.type is not a known effect"));
            }
        }
    }
}

fn validate_color(errors: &mut Vec<String>, name: &str, color: &str) {
    if Tint::from_hex(color).is_none() {
        errors.push(format!("{name} = '{color}' is not a #rrggbb color"));
    }
}
