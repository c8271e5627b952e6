//! Annotation types shared by the label reader and the VOC writer.
//!
//! Boxes carry their coordinate space in the type: label files produce
//! `BBoxXYXY<Normalized>`, VOC documents hold `BBoxXYXY<Pixel>`, and the only
//! way between them is an explicit scale by the frame size.
//!
//! # Example
//!
//! ```
//! use txt2voc::ir::{BBoxXYXY, ImageSize, Normalized, VocAnnotation, VocObject};
//!
//! let norm = BBoxXYXY::<Normalized>::from_cxcywh(0.5, 0.5, 0.2, 0.4);
//! let mut doc = VocAnnotation::new("JPEGImages", "foo.jpg", ImageSize::default());
//! doc.push(VocObject::new("ship", norm.to_pixel(256.0, 256.0)));
//! assert_eq!(doc.objects.len(), 1);
//! ```

mod bbox;
mod coord;
pub mod io_voc_xml;
pub mod io_yolo_txt;
mod model;
mod space;

pub use bbox::BBoxXYXY;
pub use coord::Coord;
pub use model::{ImageSize, VocAnnotation, VocObject};
pub use space::{Normalized, Pixel};
