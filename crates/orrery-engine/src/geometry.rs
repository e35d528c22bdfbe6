//! Pure geometry: ray/rectangle border projection and unit conversions.

use std::f64::consts::{PI, TAU};

use orrery_common::{Point, Rect};
use orrery_config::sanitize::MAX_RPM;
use orrery_config::schema::PercentPoint;

/// Directions shorter than this are treated as "no direction".
pub const DEGENERATE_EPSILON: f64 = 1e-9;

pub fn deg_to_rad(deg: f64) -> f64 {
    deg * PI / 180.0
}

pub fn rad_to_deg(rad: f64) -> f64 {
    rad * 180.0 / PI
}

/// Revolutions per minute to radians per second (`rpm·π/30`).
pub fn rpm_to_rad_per_sec(rpm: f64) -> f64 {
    rpm * PI / 30.0
}

/// Usable RPM: clamped to `[0, 60]`, `None` for zero or non-finite input.
pub fn resolve_rpm(rpm: f64) -> Option<f64> {
    if !rpm.is_finite() {
        return None;
    }
    let rpm = rpm.clamp(0.0, MAX_RPM);
    (rpm > 0.0).then_some(rpm)
}

/// Wrap an angle into `[0, 2π)`.
pub fn normalize_angle(rad: f64) -> f64 {
    let r = rad.rem_euclid(TAU);
    if r >= TAU {
        0.0
    } else {
        r
    }
}

/// Smallest signed difference `a - b`, in `(-π, π]`.
pub fn angle_delta(a: f64, b: f64) -> f64 {
    let d = normalize_angle(a - b);
    if d > PI {
        d - TAU
    } else {
        d
    }
}

/// Convert a percentage point (0-100 per axis) into logical stage units.
pub fn percent_to_logical(x_pct: f64, y_pct: f64, stage: Rect) -> Point {
    Point::new(
        stage.x + stage.width * x_pct / 100.0,
        stage.y + stage.height * y_pct / 100.0,
    )
}

/// Clamp each axis to `[0, 100]`; non-finite axes fall back to 50.
pub fn clamp_percent(p: PercentPoint) -> PercentPoint {
    let clamp = |v: f64| if v.is_finite() { v.clamp(0.0, 100.0) } else { 50.0 };
    PercentPoint::new(clamp(p.x_pct), clamp(p.y_pct))
}

/// Where a ray from `origin` along `dir` leaves `rect`.
///
/// Takes the nearest positive-t crossing of an axis-aligned border line.
/// Returns `None` for a degenerate direction or when the ray never
/// reaches a border in front of it.
pub fn ray_to_border(origin: Point, dir: Point, rect: Rect) -> Option<Point> {
    if !origin.is_finite() || !dir.is_finite() || dir.length() < DEGENERATE_EPSILON {
        return None;
    }

    let mut best: Option<f64> = None;
    let mut consider = |t: f64| {
        if t.is_finite() && t > 0.0 && best.map_or(true, |b| t < b) {
            best = Some(t);
        }
    };
    if dir.x > 0.0 {
        consider((rect.right() - origin.x) / dir.x);
    } else if dir.x < 0.0 {
        consider((rect.left() - origin.x) / dir.x);
    }
    if dir.y > 0.0 {
        consider((rect.bottom() - origin.y) / dir.y);
    } else if dir.y < 0.0 {
        consider((rect.top() - origin.y) / dir.y);
    }

    best.map(|t| origin + dir * t)
}

/// Project `target` onto the border of `rect` along the ray `center → target`.
///
/// - a target outside the rectangle projects to its clamped position;
/// - a degenerate direction (target on the center) returns the center;
/// - a center outside the rectangle falls back to clamping the target.
pub fn project_to_border(center: Point, target: Point, rect: Rect) -> Point {
    if !rect.contains(target) || !rect.contains(center) {
        return rect.clamp(target);
    }
    ray_to_border(center, target - center, rect).unwrap_or(center)
}

/// Project a direction given as an angle from `center` onto the border of `rect`.
///
/// Degenerate boxes (zero width and height) collapse to `center`.
pub fn project_angle_to_border(center: Point, angle: f64, rect: Rect) -> Point {
    ray_to_border(center, Point::from_angle(angle), rect).unwrap_or(center)
}
