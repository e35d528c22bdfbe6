//! Logical stage to viewport mapping.

use orrery_common::{Point, Rect, Size, Viewport};
use orrery_config::schema::{PercentPoint, StageConfig, StageFit};

use crate::geometry::percent_to_logical;

/// Uniform scale plus offset from logical stage units to viewport pixels:
/// `screen = offset + logical · scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageTransform {
    pub scale: f64,
    pub offset: Point,
    pub logical: Size,
    pub viewport: Viewport,
}

impl StageTransform {
    pub fn compute(stage: &StageConfig, viewport: Viewport) -> Self {
        let logical = Size::new(stage.width, stage.height);
        let sx = viewport.width / logical.width;
        let sy = viewport.height / logical.height;
        let scale = match stage.fit {
            StageFit::Cover => sx.max(sy),
            StageFit::Contain => sx.min(sy),
        };
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            0.0
        };
        let offset = Point::new(
            (viewport.width - logical.width * scale) / 2.0,
            (viewport.height - logical.height * scale) / 2.0,
        );
        Self {
            scale,
            offset,
            logical,
            viewport,
        }
    }

    pub fn logical_rect(&self) -> Rect {
        Rect::from_size(self.logical)
    }

    pub fn percent_to_logical(&self, p: PercentPoint) -> Point {
        percent_to_logical(p.x_pct, p.y_pct, self.logical_rect())
    }

    pub fn to_viewport(&self, logical: Point) -> Point {
        self.offset + logical * self.scale
    }

    /// Viewport pixels back to logical units. A collapsed viewport maps
    /// everything to the stage center.
    pub fn to_logical(&self, screen: Point) -> Point {
        if self.scale <= 0.0 {
            return self.logical_rect().center();
        }
        (screen - self.offset) * (1.0 / self.scale)
    }

    pub fn length_to_viewport(&self, logical: f64) -> f64 {
        logical * self.scale
    }

    /// Viewport pixels to `0..1` stage coordinates, clamped.
    pub fn normalized(&self, screen: Point) -> Point {
        let l = self.to_logical(screen);
        Point::new(
            (l.x / self.logical.width).clamp(0.0, 1.0),
            (l.y / self.logical.height).clamp(0.0, 1.0),
        )
    }
}

/// Memoized [`StageTransform`], invalidated explicitly on resize and init.
#[derive(Debug, Default)]
pub struct StageCache {
    cached: Option<(StageConfig, Viewport, StageTransform)>,
}

impl StageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, stage: &StageConfig, viewport: Viewport) -> StageTransform {
        if let Some((s, v, t)) = &self.cached {
            if s == stage && *v == viewport {
                return *t;
            }
        }
        let t = StageTransform::compute(stage, viewport);
        self.cached = Some((*stage, viewport, t));
        t
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    pub fn is_cached(&self) -> bool {
        self.cached.is_some()
    }
}
