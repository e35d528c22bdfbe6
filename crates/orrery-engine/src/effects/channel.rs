//! Offsets layered on top of values another processor owns.

use std::ops::Add;

/// Adds an effect offset to a sprite field without fighting its owner.
///
/// Spin, orbit and clock write rotation and position absolutely, but a
/// static layer's fields are only written once. The channel remembers
/// what it wrote: if the field still holds that value nobody else touched
/// it, and the old offset is replaced; otherwise the fresh value is the
/// new base and the offset goes on top of it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AdditiveChannel<T> {
    base: T,
    offset: T,
    written: Option<T>,
}

impl<T> AdditiveChannel<T>
where
    T: Copy + PartialEq + Default + Add<Output = T>,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Value to write back given the field's `current` value.
    pub fn compose(&mut self, current: T, offset: T) -> T {
        match self.written {
            Some(written) if written == current => {}
            _ => self.base = current,
        }
        let out = self.base + offset;
        self.offset = offset;
        self.written = Some(out);
        out
    }

    pub fn offset(&self) -> T {
        self.offset
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
