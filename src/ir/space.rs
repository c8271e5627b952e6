//! Coordinate space markers.
//!
//! Label files carry boxes relative to the image frame, VOC documents carry
//! them in pixels. These uninhabited types tag `Coord`/`BBoxXYXY` so the two
//! never get mixed up.

use std::fmt;

/// Absolute pixel positions, origin at the top-left corner of the frame.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pixel {}

/// Positions expressed as fractions of the frame width/height.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Normalized {}

impl fmt::Debug for Pixel {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl fmt::Debug for Normalized {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}
