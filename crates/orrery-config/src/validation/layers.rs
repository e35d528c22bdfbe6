//! Per-layer validation: placement, spin, orbit, clock.

use crate::sanitize::{MAX_OFFSET_MINUTES, MAX_RPM};
use crate::schema::{ClockConfig, LayerSpec, PercentPoint};

use super::helpers::{validate_finite, validate_positive, validate_range_f64};

pub(crate) fn validate_layer(errors: &mut Vec<String>, i: usize, layer: &LayerSpec) {
    let name = format!("layers[{i}]");

    if layer.image_ref.trim().is_empty() {
        errors.push(format!("{name}.image_ref is empty"));
    }

    validate_finite(errors, &format!("{name}.position.x_pct"), layer.position.x_pct);
    validate_finite(errors, &format!("{name}.position.y_pct"), layer.position.y_pct);
    validate_positive(errors, &format!("{name}.scale.pct"), layer.scale.pct);
    validate_finite(errors, &format!("{name}.angle_deg"), layer.angle_deg);

    validate_range_f64(errors, &format!("{name}.spin_rpm"), layer.spin_rpm, 0.0, MAX_RPM);
    validate_range_f64(errors, &format!("{name}.orbit_rpm"), layer.orbit_rpm, 0.0, MAX_RPM);
    if let Some(center) = &layer.orbit_center {
        validate_percent(errors, &format!("{name}.orbit_center"), center);
    }
    if let Some(phase) = layer.orbit_phase_deg {
        validate_finite(errors, &format!("{name}.orbit_phase_deg"), phase);
    }
    validate_finite(errors, &format!("{name}.orbit_orient_deg"), layer.orbit_orient_deg);

    if let Some(clock) = &layer.clock {
        validate_clock(errors, &format!("{name}.clock"), clock);
    }
}

fn validate_percent(errors: &mut Vec<String>, name: &str, p: &PercentPoint) {
    validate_range_f64(errors, &format!("{name}.x_pct"), p.x_pct, 0.0, 100.0);
    validate_range_f64(errors, &format!("{name}.y_pct"), p.y_pct, 0.0, 100.0);
}

fn validate_clock(errors: &mut Vec<String>, name: &str, clock: &ClockConfig) {
    if let Some(center) = &clock.center {
        validate_finite(errors, &format!("{name}.center.x_pct"), center.x_pct);
        validate_finite(errors, &format!("{name}.center.y_pct"), center.y_pct);
    }
    if let Some(center) = &clock.orbit_center {
        validate_percent(errors, &format!("{name}.orbit_center"), center);
    }
    validate_finite(errors, &format!("{name}.base"), clock.base);
    validate_finite(errors, &format!("{name}.tip"), clock.tip);
    if clock.base.is_finite()
        && clock.tip.is_finite()
        && (clock.base - clock.tip).rem_euclid(360.0) == 0.0
    {
        errors.push(format!("{name}.base and {name}.tip point at the same anchor"));
    }
    validate_finite(errors, &format!("{name}.spin_radius"), clock.spin_radius);
    if clock.spin_radius < 0.0 {
        errors.push(format!("{name}.spin_radius = {} is negative", clock.spin_radius));
    }
    validate_range_f64(
        errors,
        &format!("{name}.offset_minutes"),
        clock.offset_minutes,
        -MAX_OFFSET_MINUTES,
        MAX_OFFSET_MINUTES,
    );
}
