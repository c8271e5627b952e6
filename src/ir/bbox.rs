//! Bounding boxes in XYXY form and the center/size conversions used by
//! label files.

use super::coord::Coord;
use super::{Normalized, Pixel};

/// An axis-aligned box stored as (xmin, ymin, xmax, ymax).
///
/// Nothing enforces `min <= max`; a label line with a negative width simply
/// produces an inverted box, which is written out as-is.
#[derive(Clone, Copy, PartialEq)]
pub struct BBoxXYXY<TSpace> {
    pub min: Coord<TSpace>,
    pub max: Coord<TSpace>,
}

impl<TSpace> BBoxXYXY<TSpace> {
    #[inline]
    pub fn new(min: Coord<TSpace>, max: Coord<TSpace>) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn from_xyxy(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            min: Coord::new(xmin, ymin),
            max: Coord::new(xmax, ymax),
        }
    }

    /// Builds a box from its center point and size.
    #[inline]
    pub fn from_cxcywh(cx: f64, cy: f64, w: f64, h: f64) -> Self {
        Self::from_xyxy(cx - w / 2.0, cy - h / 2.0, cx + w / 2.0, cy + h / 2.0)
    }

    /// Returns (cx, cy, w, h).
    #[inline]
    pub fn to_cxcywh(&self) -> (f64, f64, f64, f64) {
        (
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
            self.width(),
            self.height(),
        )
    }

    #[inline]
    pub fn xmin(&self) -> f64 {
        self.min.x
    }

    #[inline]
    pub fn ymin(&self) -> f64 {
        self.min.y
    }

    #[inline]
    pub fn xmax(&self) -> f64 {
        self.max.x
    }

    #[inline]
    pub fn ymax(&self) -> f64 {
        self.max.y
    }

    /// May be negative if the box is inverted.
    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// May be negative if the box is inverted.
    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

impl<TSpace> std::fmt::Debug for BBoxXYXY<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BBoxXYXY")
            .field("xmin", &self.min.x)
            .field("ymin", &self.min.y)
            .field("xmax", &self.max.x)
            .field("ymax", &self.max.y)
            .finish()
    }
}

impl BBoxXYXY<Pixel> {
    /// Converts pixel coordinates to fractions of a `frame_width` x
    /// `frame_height` frame.
    pub fn to_normalized(&self, frame_width: f64, frame_height: f64) -> BBoxXYXY<Normalized> {
        BBoxXYXY::new(
            self.min.scale(1.0 / frame_width, 1.0 / frame_height),
            self.max.scale(1.0 / frame_width, 1.0 / frame_height),
        )
    }
}

impl BBoxXYXY<Normalized> {
    /// Converts to pixel coordinates in a `frame_width` x `frame_height`
    /// frame.
    ///
    /// Each edge is the normalized edge multiplied by the frame size, so
    /// `xmin = (cx - w/2) * W` exactly as computed in floating point.
    pub fn to_pixel(&self, frame_width: f64, frame_height: f64) -> BBoxXYXY<Pixel> {
        BBoxXYXY::new(
            self.min.scale(frame_width, frame_height),
            self.max.scale(frame_width, frame_height),
        )
    }
}
