//! Clock hand angles.
//!
//! Angles are clockwise from twelve o'clock, in radians, `[0, 2π)`.

use std::f64::consts::TAU;

use chrono::{NaiveTime, Timelike};
use orrery_config::schema::{ClockFormat, Hand};

/// Units elapsed on `hand`'s dial and the units in one revolution.
pub fn hand_units(hand: Hand, t: NaiveTime, format: ClockFormat, smooth: bool) -> (f64, f64) {
    // leap seconds report nanos past 1e9
    let millis = f64::from(t.nanosecond().min(999_999_999)) / 1e6;
    let seconds = f64::from(t.second());
    let minutes = f64::from(t.minute());
    let hours = f64::from(t.hour());

    match hand {
        Hand::Second => {
            let units = if smooth { seconds + millis / 1000.0 } else { seconds };
            (units, 60.0)
        }
        Hand::Minute => {
            let units = if smooth { minutes + seconds / 60.0 } else { minutes };
            (units, 60.0)
        }
        Hand::Hour => {
            let per_rev = format.hours_per_rev();
            let h = hours % per_rev;
            let units = if smooth { h + minutes / 60.0 } else { h };
            (units, per_rev)
        }
    }
}

pub fn hand_angle(hand: Hand, t: NaiveTime, format: ClockFormat, smooth: bool) -> f64 {
    let (units, per_rev) = hand_units(hand, t, format, smooth);
    TAU * units / per_rev
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn t(h: u32, m: u32, s: u32, ms: u32) -> NaiveTime {
        NaiveTime::from_hms_milli_opt(h, m, s, ms).unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn second_hand_at_half_minute() {
        let angle = hand_angle(Hand::Second, t(12, 0, 30, 0), ClockFormat::H12, true);
        assert!(close(angle, PI));
        let stepped = hand_angle(Hand::Second, t(12, 0, 30, 500), ClockFormat::H12, false);
        assert!(close(stepped, PI));
        let smooth = hand_angle(Hand::Second, t(12, 0, 30, 500), ClockFormat::H12, true);
        assert!(close(smooth, TAU * 30.5 / 60.0));
    }

    #[test]
    fn minute_and_hour_quarters() {
        assert!(close(
            hand_angle(Hand::Minute, t(9, 15, 0, 0), ClockFormat::H12, true),
            FRAC_PI_2
        ));
        assert!(close(
            hand_angle(Hand::Hour, t(3, 0, 0, 0), ClockFormat::H12, true),
            FRAC_PI_2
        ));
        assert!(close(
            hand_angle(Hand::Hour, t(15, 0, 0, 0), ClockFormat::H12, true),
            FRAC_PI_2
        ));
        assert!(close(
            hand_angle(Hand::Hour, t(18, 0, 0, 0), ClockFormat::H24, true),
            3.0 * FRAC_PI_2
        ));
    }

    #[test]
    fn smoothing_includes_the_next_unit_down() {
        let minute = hand_angle(Hand::Minute, t(0, 10, 30, 0), ClockFormat::H12, true);
        assert!(close(minute, TAU * 10.5 / 60.0));
        let hour = hand_angle(Hand::Hour, t(12, 30, 0, 0), ClockFormat::H12, true);
        assert!(close(hour, TAU * 0.5 / 12.0));
        let hour = hand_angle(Hand::Hour, t(12, 30, 0, 0), ClockFormat::H12, false);
        assert!(close(hour, 0.0));
    }

    #[test]
    fn periods() {
        let cases = [
            (Hand::Second, ClockFormat::H12, 60),
            (Hand::Minute, ClockFormat::H12, 3600),
            (Hand::Hour, ClockFormat::H12, 12 * 3600),
        ];
        let start = t(7, 42, 13, 250);
        for (hand, format, period) in cases {
            let later = start + Duration::seconds(period);
            let a = hand_angle(hand, start, format, true);
            let b = hand_angle(hand, later, format, true);
            assert!(close(a, b), "{hand:?} period {period}s");
        }
        // a 24h dial wraps with the day
        let a = hand_angle(Hand::Hour, t(7, 0, 0, 0), ClockFormat::H24, true);
        let b = hand_angle(Hand::Hour, t(19, 0, 0, 0), ClockFormat::H24, true);
        assert!(close(b - a, PI));
    }

    #[test]
    fn stepped_mode_is_constant_within_a_unit() {
        let first = hand_angle(Hand::Second, t(1, 2, 3, 0), ClockFormat::H12, false);
        for ms in [1, 250, 500, 999] {
            let a = hand_angle(Hand::Second, t(1, 2, 3, ms), ClockFormat::H12, false);
            assert!(close(a, first));
        }
        let first = hand_angle(Hand::Minute, t(1, 2, 0, 0), ClockFormat::H12, false);
        let last = hand_angle(Hand::Minute, t(1, 2, 59, 999), ClockFormat::H12, false);
        assert!(close(first, last));
    }

    #[test]
    fn angles_stay_in_range() {
        for secs in (0..86_400).step_by(97) {
            let time = NaiveTime::from_num_seconds_from_midnight_opt(secs, 999_000_000).unwrap();
            for hand in [Hand::Second, Hand::Minute, Hand::Hour] {
                for format in [ClockFormat::H12, ClockFormat::H24] {
                    let a = hand_angle(hand, time, format, true);
                    assert!((0.0..TAU).contains(&a), "{hand:?} {format:?} {time}");
                }
            }
        }
    }
}
