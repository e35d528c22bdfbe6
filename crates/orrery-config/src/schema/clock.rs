//! Wall-clock hand configuration for a layer.

use serde::{Deserialize, Serialize};

use super::layer::PercentPoint;

/// Which clock hand drives a motion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    #[serde(alias = "sec", alias = "s")]
    Second,
    #[serde(alias = "min", alias = "m")]
    Minute,
    #[serde(alias = "hr", alias = "h")]
    Hour,
}

/// 12-hour or 24-hour dial. Accepts `12`, `24`, `"12h"`, `"24h"`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "FormatRepr", into = "u8")]
#[derive(Default)]
pub enum ClockFormat {
    #[default]
    H12,
    H24,
}

impl ClockFormat {
    /// Hours per full revolution of the hour hand.
    pub fn hours_per_rev(self) -> f64 {
        match self {
            ClockFormat::H12 => 12.0,
            ClockFormat::H24 => 24.0,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FormatRepr {
    Number(i64),
    Text(String),
}

impl TryFrom<FormatRepr> for ClockFormat {
    type Error = String;

    fn try_from(repr: FormatRepr) -> Result<Self, Self::Error> {
        match repr {
            FormatRepr::Number(12) => Ok(ClockFormat::H12),
            FormatRepr::Number(24) => Ok(ClockFormat::H24),
            FormatRepr::Number(n) => Err(format!("clock format must be 12 or 24, got {n}")),
            FormatRepr::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "12" | "12h" => Ok(ClockFormat::H12),
                "24" | "24h" => Ok(ClockFormat::H24),
                other => Err(format!("clock format must be 12 or 24, got '{other}'")),
            },
        }
    }
}

impl From<ClockFormat> for u8 {
    fn from(format: ClockFormat) -> u8 {
        match format {
            ClockFormat::H12 => 12,
            ClockFormat::H24 => 24,
        }
    }
}

/// Where the wall time comes from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum TimeSource {
    /// Local clock, or the fixed offset named by `timezone`.
    #[default]
    Device,
    Utc,
    /// Device clock shifted by `offset_minutes`.
    Server,
}

/// Clock-hand driven motion for one layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Defaults to true once a `clock` block is present.
    pub enabled: bool,
    /// Clock center in stage percent. Defaults to the layer position.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<PercentPoint>,
    /// Base anchor angle on the sprite box, in degrees (90 = bottom edge).
    pub base: f64,
    /// Tip anchor angle on the sprite box, in degrees (270 = top edge).
    pub tip: f64,
    /// `"device"`, `"utc"`, or a fixed offset like `"+05:30"`.
    pub timezone: String,
    #[serde(alias = "spinHand", skip_serializing_if = "Option::is_none")]
    pub spin_hand: Option<Hand>,
    /// Distance in logical units between the pivot and the base anchor.
    #[serde(alias = "spinRadius")]
    pub spin_radius: f64,
    #[serde(alias = "orbitHand", skip_serializing_if = "Option::is_none")]
    pub orbit_hand: Option<Hand>,
    #[serde(alias = "orbitCenter", skip_serializing_if = "Option::is_none")]
    pub orbit_center: Option<PercentPoint>,
    /// Include sub-unit fractions (milliseconds for the second hand, etc).
    pub smooth: bool,
    pub format: ClockFormat,
    pub source: TimeSource,
    /// Only used with `source = "server"` (valid range: -1440 to 1440).
    #[serde(alias = "offsetMinutes")]
    pub offset_minutes: f64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            center: None,
            base: 90.0,
            tip: 270.0,
            timezone: "device".into(),
            spin_hand: None,
            spin_radius: 0.0,
            orbit_hand: None,
            orbit_center: None,
            smooth: true,
            format: ClockFormat::H12,
            source: TimeSource::Device,
            offset_minutes: 0.0,
        }
    }
}

impl ClockConfig {
    /// Whether this clock drives anything at all.
    pub fn has_hand(&self) -> bool {
        self.spin_hand.is_some() || self.orbit_hand.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_defaults() {
        let clock = ClockConfig::default();
        assert!(clock.enabled);
        assert!((clock.base - 90.0).abs() < f64::EPSILON);
        assert!((clock.tip - 270.0).abs() < f64::EPSILON);
        assert_eq!(clock.timezone, "device");
        assert!(clock.smooth);
        assert_eq!(clock.format, ClockFormat::H12);
        assert!(!clock.has_hand());
    }

    #[test]
    fn format_accepts_numbers_and_strings() {
        #[derive(Deserialize)]
        struct Wrap {
            format: ClockFormat,
        }
        let w: Wrap = serde_json::from_str(r#"{"format": 24}"#).unwrap();
        assert_eq!(w.format, ClockFormat::H24);
        let w: Wrap = serde_json::from_str(r#"{"format": "12h"}"#).unwrap();
        assert_eq!(w.format, ClockFormat::H12);
        assert!(serde_json::from_str::<Wrap>(r#"{"format": 7}"#).is_err());
    }

    #[test]
    fn format_serializes_as_number() {
        let json = serde_json::to_string(&ClockFormat::H24).unwrap();
        assert_eq!(json, "24");
    }

    #[test]
    fn camel_case_clock_block() {
        let json = r#"{
            "spinHand": "second",
            "orbitHand": "hour",
            "spinRadius": 12,
            "source": "server",
            "offsetMinutes": -90
        }"#;
        let clock: ClockConfig = serde_json::from_str(json).unwrap();
        assert!(clock.enabled);
        assert_eq!(clock.spin_hand, Some(Hand::Second));
        assert_eq!(clock.orbit_hand, Some(Hand::Hour));
        assert_eq!(clock.source, TimeSource::Server);
        assert!((clock.offset_minutes + 90.0).abs() < f64::EPSILON);
    }
}
