//! Per-effect curves. Pure functions of elapsed seconds (and pointer).

use std::f64::consts::{PI, TAU};

use orrery_common::Point;
use orrery_config::schema::{
    DistortEffect, Easing, FadeEffect, PulseEffect, ShockwaveEffect, TiltAxis, TiltEffect,
    TiltMode,
};

use crate::geometry::deg_to_rad;

/// `[0, 1)` position inside a repeating window of `period` seconds.
fn cycle(elapsed: f64, period: f64) -> f64 {
    let p = elapsed.rem_euclid(period) / period;
    if p >= 1.0 {
        0.0
    } else {
        p
    }
}

/// Map a sawtooth `[0, 1)` into a triangle that peaks at 0.5.
pub fn ping_pong(phase: f64) -> f64 {
    if phase < 0.5 {
        phase * 2.0
    } else {
        2.0 - phase * 2.0
    }
}

pub fn ease(easing: Easing, p: f64) -> f64 {
    match easing {
        Easing::Linear => p,
        Easing::SineInOut => (1.0 - (PI * p).cos()) / 2.0,
    }
}

pub fn fade_alpha(fade: &FadeEffect, elapsed: f64) -> f64 {
    let duration = fade.duration_ms / 1000.0;
    if !(duration > 0.0) {
        return fade.to;
    }
    let mut phase = cycle(elapsed, duration);
    if fade.looping {
        phase = ping_pong(phase);
    }
    fade.from + (fade.to - fade.from) * ease(fade.easing, phase)
}

/// Multiplier around 1.0. Callers clamp it when it feeds alpha.
pub fn pulse_factor(pulse: &PulseEffect, elapsed: f64) -> f64 {
    let period = pulse.period_ms / 1000.0;
    if !(period > 0.0) {
        return 1.0;
    }
    1.0 + pulse.amp * (TAU * elapsed / period + deg_to_rad(pulse.phase_deg)).sin()
}

/// Absolute tilt in radians.
///
/// `pointer` and `device` are normalized stage coordinates; their
/// deviation from the center maps linearly onto `[-max, +max]`. With
/// `axis = both` the two deviations are averaged.
pub fn tilt_angle(tilt: &TiltEffect, elapsed: f64, pointer: Point, device: Point) -> f64 {
    let max = deg_to_rad(tilt.max_deg);
    match tilt.mode {
        TiltMode::Time => {
            let period = tilt.period_ms / 1000.0;
            if !(period > 0.0) {
                return 0.0;
            }
            max * (TAU * elapsed / period).sin()
        }
        TiltMode::Pointer | TiltMode::Device => {
            let source = if tilt.mode == TiltMode::Pointer {
                pointer
            } else {
                device
            };
            let dx = ((source.x - 0.5) * 2.0).clamp(-1.0, 1.0);
            let dy = ((source.y - 0.5) * 2.0).clamp(-1.0, 1.0);
            let deviation = match tilt.axis {
                TiltAxis::X => dx,
                TiltAxis::Y => dy,
                TiltAxis::Both => (dx + dy) / 2.0,
            };
            max * deviation
        }
    }
}

/// 0 at the start of each pulse, 1 at its middle.
fn swell(elapsed: f64, period_ms: f64) -> f64 {
    let period = period_ms / 1000.0;
    if !(period > 0.0) {
        return 1.0;
    }
    (1.0 - (TAU * elapsed / period).cos()) / 2.0
}

/// Alpha and scale multiplier of a glow or bloom aura.
pub fn aura_curve(strength: f64, pulse_ms: f64, scale: f64, elapsed: f64) -> (f64, f64) {
    let w = swell(elapsed, pulse_ms);
    let alpha = (strength * (0.6 + 0.4 * w)).clamp(0.0, 1.0);
    (alpha, scale * (1.0 + 0.05 * w))
}

/// Position wobble (logical units) and scale multiplier.
pub fn distort_offset(distort: &DistortEffect, elapsed: f64) -> (Point, f64) {
    let w = TAU * distort.speed_hz * elapsed;
    let offset = Point::new(
        distort.amplitude * w.sin(),
        distort.amplitude * (2.0 * w).sin() / 2.0,
    );
    (offset, 1.0 + distort.scale_jitter * w.sin())
}

/// Alpha and scale multiplier of an expanding ring. Replaces whatever the
/// basic effects computed for the owner.
pub fn shockwave(wave: &ShockwaveEffect, elapsed: f64) -> (f64, f64) {
    let period = wave.period_ms / 1000.0;
    if !(period > 0.0) {
        return (1.0, 1.0);
    }
    let p = cycle(elapsed, period);
    let alpha = (1.0 - wave.strength * p).clamp(0.0, 1.0);
    (alpha, 1.0 + (wave.max_scale - 1.0) * p)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn fade(looping: bool) -> FadeEffect {
        FadeEffect {
            from: 0.0,
            to: 1.0,
            duration_ms: 1000.0,
            looping,
            easing: Easing::Linear,
        }
    }

    #[test]
    fn looping_fade_is_symmetric() {
        let f = fade(true);
        assert!((fade_alpha(&f, 0.25) - 0.5).abs() < EPS);
        assert!((fade_alpha(&f, 0.75) - 0.5).abs() < EPS);
        assert!((fade_alpha(&f, 0.5) - 1.0).abs() < EPS);
    }

    #[test]
    fn looping_fade_returns_to_from_every_two_durations() {
        let f = FadeEffect {
            from: 0.2,
            to: 0.9,
            ..fade(true)
        };
        for k in 0..5 {
            let t = 2.0 * f64::from(k);
            assert!((fade_alpha(&f, t) - 0.2).abs() < 1e-9, "t = {t}");
        }
    }

    #[test]
    fn one_shot_fade_is_a_sawtooth() {
        let f = fade(false);
        assert!((fade_alpha(&f, 0.25) - 0.25).abs() < EPS);
        assert!((fade_alpha(&f, 0.75) - 0.75).abs() < EPS);
        assert!((fade_alpha(&f, 1.25) - 0.25).abs() < 1e-9);
        assert!(fade_alpha(&f, 3.0).abs() < 1e-9);
    }

    #[test]
    fn sine_easing() {
        assert!(ease(Easing::SineInOut, 0.0).abs() < EPS);
        assert!((ease(Easing::SineInOut, 0.5) - 0.5).abs() < EPS);
        assert!((ease(Easing::SineInOut, 1.0) - 1.0).abs() < EPS);
        assert!(ease(Easing::SineInOut, 0.25) < 0.25);
    }

    #[test]
    fn zero_duration_fade_holds_target() {
        let f = FadeEffect {
            duration_ms: 0.0,
            to: 0.3,
            ..fade(true)
        };
        assert!((fade_alpha(&f, 12.0) - 0.3).abs() < EPS);
    }

    #[test]
    fn pulse_peaks_at_quarter_period() {
        let p = PulseEffect {
            amp: 0.1,
            period_ms: 2000.0,
            ..Default::default()
        };
        assert!((pulse_factor(&p, 0.0) - 1.0).abs() < EPS);
        assert!((pulse_factor(&p, 0.5) - 1.1).abs() < EPS);
        assert!((pulse_factor(&p, 1.5) - 0.9).abs() < EPS);
        let shifted = PulseEffect {
            phase_deg: 90.0,
            ..p
        };
        assert!((pulse_factor(&shifted, 0.0) - 1.1).abs() < EPS);
    }

    #[test]
    fn pointer_tilt_is_linear_in_deviation() {
        let t = TiltEffect {
            mode: TiltMode::Pointer,
            axis: TiltAxis::X,
            max_deg: 10.0,
            ..Default::default()
        };
        let center = Point::new(0.5, 0.5);
        assert!(tilt_angle(&t, 0.0, center, center).abs() < EPS);
        let right = tilt_angle(&t, 0.0, Point::new(1.0, 0.5), center);
        assert!((right - deg_to_rad(10.0)).abs() < EPS);
        let quarter = tilt_angle(&t, 0.0, Point::new(0.25, 0.9), center);
        assert!((quarter + deg_to_rad(5.0)).abs() < EPS);
        // outside the stage clamps
        let far = tilt_angle(&t, 0.0, Point::new(-3.0, 0.5), center);
        assert!((far + deg_to_rad(10.0)).abs() < EPS);
    }

    #[test]
    fn device_tilt_reads_device_input() {
        let t = TiltEffect {
            mode: TiltMode::Device,
            axis: TiltAxis::Both,
            max_deg: 8.0,
            ..Default::default()
        };
        let angle = tilt_angle(&t, 0.0, Point::new(1.0, 1.0), Point::new(1.0, 0.5));
        assert!((angle - deg_to_rad(4.0)).abs() < EPS);
    }

    #[test]
    fn time_tilt_is_sinusoidal() {
        let t = TiltEffect {
            max_deg: 5.0,
            period_ms: 4000.0,
            ..Default::default()
        };
        let c = Point::new(0.5, 0.5);
        assert!(tilt_angle(&t, 0.0, c, c).abs() < EPS);
        assert!((tilt_angle(&t, 1.0, c, c) - deg_to_rad(5.0)).abs() < EPS);
        assert!((tilt_angle(&t, 3.0, c, c) + deg_to_rad(5.0)).abs() < EPS);
    }

    #[test]
    fn aura_alpha_swells_within_strength() {
        let (a0, s0) = aura_curve(0.5, 2000.0, 1.2, 0.0);
        let (a1, s1) = aura_curve(0.5, 2000.0, 1.2, 1.0);
        assert!((a0 - 0.3).abs() < EPS);
        assert!((a1 - 0.5).abs() < EPS);
        assert!((s0 - 1.2).abs() < EPS);
        assert!((s1 - 1.26).abs() < EPS);
    }

    #[test]
    fn distort_starts_at_rest() {
        let (offset, scale) = distort_offset(&DistortEffect::default(), 0.0);
        assert!(offset.length() < EPS);
        assert!((scale - 1.0).abs() < EPS);
        let (offset, _) = distort_offset(&DistortEffect::default(), 0.5);
        assert!((offset.x - 4.0).abs() < EPS);
    }

    #[test]
    fn shockwave_expands_and_fades() {
        let wave = ShockwaveEffect {
            period_ms: 1000.0,
            max_scale: 2.0,
            strength: 1.0,
        };
        assert_eq!(shockwave(&wave, 0.0), (1.0, 1.0));
        let (alpha, scale) = shockwave(&wave, 0.5);
        assert!((alpha - 0.5).abs() < EPS);
        assert!((scale - 1.5).abs() < EPS);
        let (alpha, _) = shockwave(&wave, 1.0);
        assert!((alpha - 1.0).abs() < EPS);
    }
}
