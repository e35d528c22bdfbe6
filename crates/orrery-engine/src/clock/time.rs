//! Wall time: injectable clocks and per-layer time sources.

use std::cell::Cell;

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveTime, Offset, Utc};
use orrery_config::schema::{ClockConfig, TimeSource};

/// Source of the current instant. Injected so tests are deterministic.
pub trait WallClock {
    fn now(&self) -> DateTime<Utc>;

    /// The device's UTC offset, used by the `device` time source.
    fn local_offset(&self) -> FixedOffset;
}

/// The real system clock and local timezone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl WallClock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local_offset(&self) -> FixedOffset {
        *Local::now().offset()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Cell<DateTime<Utc>>,
    local_offset: FixedOffset,
}

impl FixedClock {
    /// Pinned at `now`, with the device in UTC.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(now),
            local_offset: utc_offset(),
        }
    }

    /// Parse an RFC 3339 timestamp. Its offset becomes the device offset.
    pub fn from_rfc3339(s: &str) -> Option<Self> {
        let parsed = DateTime::parse_from_rfc3339(s).ok()?;
        Some(Self {
            now: Cell::new(parsed.with_timezone(&Utc)),
            local_offset: *parsed.offset(),
        })
    }

    pub fn with_local_offset(mut self, offset: FixedOffset) -> Self {
        self.local_offset = offset;
        self
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    /// Move the pinned instant. An advance past chrono's range is ignored.
    pub fn advance(&self, by: Duration) {
        if let Some(next) = self.now.get().checked_add_signed(by) {
            self.now.set(next);
        }
    }
}

impl WallClock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }

    fn local_offset(&self) -> FixedOffset {
        self.local_offset
    }
}

fn utc_offset() -> FixedOffset {
    Utc.fix()
}

/// Where a clock layer reads its time from, resolved once at init.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedSource {
    /// The device's own offset, read on every tick.
    Device,
    Fixed(FixedOffset),
    /// Device time shifted by this many milliseconds.
    Shifted(i64),
}

impl ResolvedSource {
    /// Resolve a clock config. The error names a timezone that was not
    /// understood; the source then falls back to device time.
    pub fn from_config(config: &ClockConfig) -> (Self, Option<String>) {
        match config.source {
            TimeSource::Utc => (ResolvedSource::Fixed(utc_offset()), None),
            TimeSource::Server => {
                let ms = (config.offset_minutes * 60_000.0).round();
                let ms = if ms.is_finite() { ms as i64 } else { 0 };
                (ResolvedSource::Shifted(ms), None)
            }
            TimeSource::Device => match parse_timezone(&config.timezone) {
                Some(None) => (ResolvedSource::Device, None),
                Some(Some(offset)) => (ResolvedSource::Fixed(offset), None),
                None => (
                    ResolvedSource::Device,
                    Some(format!(
                        "timezone '{}' not understood, using device time",
                        config.timezone
                    )),
                ),
            },
        }
    }

    /// Time of day on this source's dial.
    pub fn wall_time(&self, clock: &dyn WallClock) -> NaiveTime {
        let now = clock.now();
        match *self {
            ResolvedSource::Device => now.with_timezone(&clock.local_offset()).time(),
            ResolvedSource::Fixed(offset) => now.with_timezone(&offset).time(),
            ResolvedSource::Shifted(ms) => (now + Duration::milliseconds(ms))
                .with_timezone(&clock.local_offset())
                .time(),
        }
    }
}

/// Parse a timezone setting.
///
/// `Some(None)` means the device zone (`"device"`, `"local"` or empty);
/// `Some(Some(offset))` a fixed offset (`"utc"`, `"+05:30"`, `"-0800"`,
/// `"UTC+2"`); `None` anything else. Named zones are not supported.
pub fn parse_timezone(tz: &str) -> Option<Option<FixedOffset>> {
    let tz = tz.trim().to_ascii_lowercase();
    match tz.as_str() {
        "" | "device" | "local" => return Some(None),
        "utc" | "z" | "gmt" => return Some(Some(utc_offset())),
        _ => {}
    }
    let rest = tz
        .strip_prefix("utc")
        .or_else(|| tz.strip_prefix("gmt"))
        .unwrap_or(&tz);
    let (sign, digits) = match rest.as_bytes().first()? {
        b'+' => (1, &rest[1..]),
        b'-' => (-1, &rest[1..]),
        _ => return None,
    };
    if !digits.is_ascii() {
        return None;
    }
    let (hours, minutes) = match digits.split_once(':') {
        Some((h, m)) => (h, m),
        None if digits.len() == 4 => digits.split_at(2),
        None => (digits, "0"),
    };
    if hours.is_empty() || !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn at(s: &str) -> FixedClock {
        FixedClock::from_rfc3339(s).unwrap()
    }

    fn offset(secs: i32) -> FixedOffset {
        FixedOffset::east_opt(secs).unwrap()
    }

    #[test]
    fn parse_known_zones() {
        assert_eq!(parse_timezone("device"), Some(None));
        assert_eq!(parse_timezone(" Local "), Some(None));
        assert_eq!(parse_timezone(""), Some(None));
        assert_eq!(parse_timezone("UTC"), Some(Some(offset(0))));
        assert_eq!(parse_timezone("+05:30"), Some(Some(offset(5 * 3600 + 1800))));
        assert_eq!(parse_timezone("-0800"), Some(Some(offset(-8 * 3600))));
        assert_eq!(parse_timezone("UTC+2"), Some(Some(offset(2 * 3600))));
        assert_eq!(parse_timezone("gmt-03:00"), Some(Some(offset(-3 * 3600))));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(parse_timezone("Europe/Paris"), None);
        assert_eq!(parse_timezone("+25:00"), None);
        assert_eq!(parse_timezone("+05:75"), None);
        assert_eq!(parse_timezone("+"), None);
        assert_eq!(parse_timezone("+ab"), None);
        assert_eq!(parse_timezone("+aé1"), None);
        assert_eq!(parse_timezone("UTC-1é"), None);
    }

    #[test]
    fn non_ascii_timezone_falls_back_to_device() {
        let config = ClockConfig {
            timezone: "+aé1".into(),
            ..Default::default()
        };
        let (source, warning) = ResolvedSource::from_config(&config);
        assert_eq!(source, ResolvedSource::Device);
        assert!(warning.is_some());
    }

    #[test]
    fn fixed_clock_advances() {
        let clock = at("2024-03-01T12:00:00Z");
        clock.advance(Duration::milliseconds(1500));
        assert_eq!(clock.now().time().second(), 1);
        assert_eq!(clock.now().time().nanosecond(), 500_000_000);
    }

    #[test]
    fn fixed_clock_ignores_out_of_range_advance() {
        let clock = at("2024-03-01T12:00:00Z");
        let before = clock.now();
        clock.advance(Duration::MAX);
        assert_eq!(clock.now(), before);
    }

    #[test]
    fn device_source_uses_local_offset() {
        let clock = at("2024-03-01T12:00:00+02:00");
        let (source, warning) = ResolvedSource::from_config(&ClockConfig::default());
        assert_eq!(source, ResolvedSource::Device);
        assert!(warning.is_none());
        assert_eq!(source.wall_time(&clock).hour(), 12);
    }

    #[test]
    fn utc_and_fixed_sources() {
        let clock = at("2024-03-01T12:00:00+02:00");
        let utc = ClockConfig {
            source: TimeSource::Utc,
            ..Default::default()
        };
        let (source, _) = ResolvedSource::from_config(&utc);
        assert_eq!(source.wall_time(&clock).hour(), 10);

        let tokyo = ClockConfig {
            timezone: "+09:00".into(),
            ..Default::default()
        };
        let (source, _) = ResolvedSource::from_config(&tokyo);
        assert_eq!(source.wall_time(&clock).hour(), 19);
    }

    #[test]
    fn server_source_shifts_device_time() {
        let clock = at("2024-03-01T12:00:00Z");
        let config = ClockConfig {
            source: TimeSource::Server,
            offset_minutes: -90.0,
            ..Default::default()
        };
        let (source, _) = ResolvedSource::from_config(&config);
        assert_eq!(source, ResolvedSource::Shifted(-90 * 60_000));
        let t = source.wall_time(&clock);
        assert_eq!((t.hour(), t.minute()), (10, 30));
    }

    #[test]
    fn unknown_timezone_falls_back_with_warning() {
        let config = ClockConfig {
            timezone: "Mars/Olympus".into(),
            ..Default::default()
        };
        let (source, warning) = ResolvedSource::from_config(&config);
        assert_eq!(source, ResolvedSource::Device);
        assert!(warning.unwrap().contains("Mars/Olympus"));
    }

    #[test]
    fn system_clock_is_sane() {
        let clock = SystemClock;
        assert!(clock.now().timestamp() > 1_600_000_000);
    }
}
