//! Base and tip anchors of a clock-hand sprite.

use orrery_common::{Point, Rect};

use crate::backend::SpriteState;
use crate::geometry::{deg_to_rad, project_angle_to_border};

/// Shortest base→tip vector a hand may have.
pub const MIN_HAND_LENGTH: f64 = 1e-3;

/// Anchor points in the sprite's local, unscaled, anchor-relative frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockGeometry {
    pub base: Point,
    pub tip: Point,
    pub base_tip: Point,
    pub length: f64,
    /// Direction of `base_tip` in the unrotated sprite.
    pub angle: f64,
}

impl ClockGeometry {
    /// Project the base and tip angles (degrees, 0 = +x, 90 = down) from the
    /// box center onto the sprite's bounding box.
    pub fn from_sprite(
        sprite: &SpriteState,
        base_deg: f64,
        tip_deg: f64,
    ) -> Result<Self, &'static str> {
        if !(sprite.width.is_finite() && sprite.height.is_finite()) {
            return Err("non-finite sprite size");
        }
        let bounds = Rect::new(
            -sprite.anchor.x * sprite.width,
            -sprite.anchor.y * sprite.height,
            sprite.width,
            sprite.height,
        );
        let center = bounds.center();
        let base = project_angle_to_border(center, deg_to_rad(base_deg), bounds);
        let tip = project_angle_to_border(center, deg_to_rad(tip_deg), bounds);
        let base_tip = tip - base;
        let length = base_tip.length();
        if !(length > MIN_HAND_LENGTH) {
            return Err("degenerate base/tip");
        }
        Ok(Self {
            base,
            tip,
            base_tip,
            length,
            angle: base_tip.angle(),
        })
    }
}
