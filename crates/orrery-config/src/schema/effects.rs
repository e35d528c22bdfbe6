//! Per-layer effect configuration.
//!
//! Basic effects (fade, pulse, tilt) are always evaluated. Advanced effects
//! (glow, bloom, distort, shockwave) only run when the renderer passes the
//! capability check or `effects.advanced = "force"`.

use serde::{Deserialize, Serialize};

/// Easing curve for fades.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[derive(Default)]
pub enum Easing {
    #[default]
    #[serde(rename = "linear")]
    Linear,
    #[serde(rename = "sineInOut", alias = "sine_in_out", alias = "sine")]
    SineInOut,
}

/// Opacity ramp between two values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FadeEffect {
    pub from: f64,
    pub to: f64,
    /// Duration of one ramp in milliseconds.
    #[serde(alias = "durationMs")]
    pub duration_ms: f64,
    /// Ping-pong back to `from` inside each duration instead of a sawtooth.
    #[serde(rename = "loop")]
    pub looping: bool,
    pub easing: Easing,
}

impl Default for FadeEffect {
    fn default() -> Self {
        Self {
            from: 0.0,
            to: 1.0,
            duration_ms: 1000.0,
            looping: true,
            easing: Easing::Linear,
        }
    }
}

/// Which sprite field a pulse multiplies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum PulseProperty {
    #[default]
    Scale,
    Alpha,
}

/// Sinusoidal scale or alpha breathing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseEffect {
    /// Amplitude of the multiplier around 1.0.
    pub amp: f64,
    #[serde(alias = "periodMs")]
    pub period_ms: f64,
    #[serde(alias = "phaseDeg")]
    pub phase_deg: f64,
    pub property: PulseProperty,
}

impl Default for PulseEffect {
    fn default() -> Self {
        Self {
            amp: 0.05,
            period_ms: 2000.0,
            phase_deg: 0.0,
            property: PulseProperty::Scale,
        }
    }
}

/// Tilt input source.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum TiltMode {
    #[default]
    Time,
    Pointer,
    Device,
}

/// Which pointer axis feeds a tilt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum TiltAxis {
    X,
    Y,
    #[default]
    Both,
}

/// Small additive rotation, composed on top of spin/orbit/clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TiltEffect {
    pub mode: TiltMode,
    pub axis: TiltAxis,
    #[serde(alias = "maxDeg")]
    pub max_deg: f64,
    /// Only used by `time` mode.
    #[serde(alias = "periodMs")]
    pub period_ms: f64,
}

impl Default for TiltEffect {
    fn default() -> Self {
        Self {
            mode: TiltMode::Time,
            axis: TiltAxis::Both,
            max_deg: 5.0,
            period_ms: 4000.0,
        }
    }
}

/// Colored aura behind the layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlowEffect {
    /// Hex color, e.g. `"#ffcc00"`.
    pub color: String,
    /// Peak aura opacity (valid range: 0.0-1.0).
    pub strength: f64,
    #[serde(alias = "pulseMs")]
    pub pulse_ms: f64,
    /// Aura size relative to the owner.
    pub scale: f64,
}

impl Default for GlowEffect {
    fn default() -> Self {
        Self {
            color: "#ffffff".into(),
            strength: 0.6,
            pulse_ms: 2000.0,
            scale: 1.15,
        }
    }
}

/// Wide soft light bleed behind the layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomEffect {
    pub color: String,
    pub strength: f64,
    #[serde(alias = "pulseMs")]
    pub pulse_ms: f64,
    pub scale: f64,
}

impl Default for BloomEffect {
    fn default() -> Self {
        Self {
            color: "#ffffff".into(),
            strength: 0.8,
            pulse_ms: 3000.0,
            scale: 1.3,
        }
    }
}

/// Wobbles the owner's position and scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistortEffect {
    /// Position wobble in logical units.
    pub amplitude: f64,
    #[serde(alias = "speedHz")]
    pub speed_hz: f64,
    #[serde(alias = "scaleJitter")]
    pub scale_jitter: f64,
}

impl Default for DistortEffect {
    fn default() -> Self {
        Self {
            amplitude: 4.0,
            speed_hz: 0.5,
            scale_jitter: 0.02,
        }
    }
}

/// Repeating expand-and-fade ring on the owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShockwaveEffect {
    #[serde(alias = "periodMs")]
    pub period_ms: f64,
    #[serde(alias = "maxScale")]
    pub max_scale: f64,
    pub strength: f64,
}

impl Default for ShockwaveEffect {
    fn default() -> Self {
        Self {
            period_ms: 2500.0,
            max_scale: 1.4,
            strength: 1.0,
        }
    }
}

/// One entry of a layer's `effects` list, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EffectSpec {
    Fade(FadeEffect),
    Pulse(PulseEffect),
    Tilt(TiltEffect),
    Glow(GlowEffect),
    Bloom(BloomEffect),
    Distort(DistortEffect),
    Shockwave(ShockwaveEffect),
    /// Any effect type this build does not know. Skipped with a warning.
    #[serde(other)]
    Unknown,
}

impl EffectSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            EffectSpec::Fade(_) => "fade",
            EffectSpec::Pulse(_) => "pulse",
            EffectSpec::Tilt(_) => "tilt",
            EffectSpec::Glow(_) => "glow",
            EffectSpec::Bloom(_) => "bloom",
            EffectSpec::Distort(_) => "distort",
            EffectSpec::Shockwave(_) => "shockwave",
            EffectSpec::Unknown => "unknown",
        }
    }

    /// Whether the effect needs the advanced capability gate.
    pub fn is_advanced(&self) -> bool {
        matches!(
            self,
            EffectSpec::Glow(_)
                | EffectSpec::Bloom(_)
                | EffectSpec::Distort(_)
                | EffectSpec::Shockwave(_)
        )
    }
}
