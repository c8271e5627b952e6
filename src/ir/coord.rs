//! A point tagged with its coordinate space.

use std::marker::PhantomData;

/// A 2D point in either [`Pixel`](super::Pixel) or
/// [`Normalized`](super::Normalized) space.
#[derive(Clone, Copy, PartialEq)]
pub struct Coord<TSpace> {
    pub x: f64,
    pub y: f64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> Coord<TSpace> {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            _space: PhantomData,
        }
    }

    /// Scales both axes, producing a point in another space.
    #[inline]
    pub(crate) fn scale<TOther>(&self, sx: f64, sy: f64) -> Coord<TOther> {
        Coord::new(self.x * sx, self.y * sy)
    }
}

impl<TSpace> std::fmt::Debug for Coord<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coord")
            .field("x", &self.x)
            .field("y", &self.y)
            .finish()
    }
}
