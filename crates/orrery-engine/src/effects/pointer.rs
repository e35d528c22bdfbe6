//! Pointer and device-orientation input shared between the host callbacks
//! and the effect tick.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use orrery_common::Point;

/// Tilt angle (degrees) that maps to the edge of the normalized range.
pub const DEVICE_TILT_RANGE_DEG: f64 = 90.0;

#[derive(Debug)]
struct Cells {
    pointer_x: AtomicU64,
    pointer_y: AtomicU64,
    device_x: AtomicU64,
    device_y: AtomicU64,
}

fn cell(v: f64) -> AtomicU64 {
    AtomicU64::new(v.to_bits())
}

/// Last known pointer and device tilt, normalized to `0..1` per axis with
/// `0.5` at rest. Lock-free; a reader may see a frame-old value.
#[derive(Debug, Clone)]
pub struct PointerState {
    cells: Arc<Cells>,
}

impl PointerState {
    pub fn new() -> Self {
        Self {
            cells: Arc::new(Cells {
                pointer_x: cell(0.5),
                pointer_y: cell(0.5),
                device_x: cell(0.5),
                device_y: cell(0.5),
            }),
        }
    }

    fn store(slot: &AtomicU64, v: f64) {
        if v.is_finite() {
            slot.store(v.clamp(0.0, 1.0).to_bits(), Ordering::Relaxed);
        }
    }

    fn load(slot: &AtomicU64) -> f64 {
        f64::from_bits(slot.load(Ordering::Relaxed))
    }

    /// Store a normalized pointer position. Non-finite axes are ignored.
    pub fn set_pointer(&self, p: Point) {
        Self::store(&self.cells.pointer_x, p.x);
        Self::store(&self.cells.pointer_y, p.y);
    }

    pub fn pointer(&self) -> Point {
        Point::new(Self::load(&self.cells.pointer_x), Self::load(&self.cells.pointer_y))
    }

    /// Store device orientation angles in degrees: `gamma` (left/right)
    /// drives x, `beta` (front/back) drives y.
    pub fn set_orientation(&self, beta_deg: f64, gamma_deg: f64) {
        let norm = |deg: f64| (deg / DEVICE_TILT_RANGE_DEG + 1.0) / 2.0;
        Self::store(&self.cells.device_x, norm(gamma_deg));
        Self::store(&self.cells.device_y, norm(beta_deg));
    }

    pub fn device(&self) -> Point {
        Point::new(Self::load(&self.cells.device_x), Self::load(&self.cells.device_y))
    }

    /// Back to rest.
    pub fn reset(&self) {
        self.set_pointer(Point::new(0.5, 0.5));
        self.set_orientation(0.0, 0.0);
    }
}

impl Default for PointerState {
    fn default() -> Self {
        Self::new()
    }
}
