//! The VOC annotation document as plain data.
//!
//! One [`VocAnnotation`] describes one image. It is built from a label file,
//! then handed to [`io_voc_xml`](super::io_voc_xml) for rendering, so
//! construction and text formatting can be tested separately.

use super::bbox::BBoxXYXY;
use super::space::Pixel;

/// Declared frame of an image: width, height and channel depth.
///
/// These values describe the frame boxes were scaled against; they are not
/// read from the image file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32, depth: u32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }
}

impl Default for ImageSize {
    fn default() -> Self {
        Self::new(256, 256, 3)
    }
}

/// One `<object>` entry.
#[derive(Clone, Debug, PartialEq)]
pub struct VocObject {
    /// Class label written to `<name>`.
    pub name: String,

    /// Value of `<difficult>`; always 0 for converted label files.
    pub difficult: u8,

    /// Box in pixel space.
    pub bndbox: BBoxXYXY<Pixel>,
}

impl VocObject {
    pub fn new(name: impl Into<String>, bndbox: BBoxXYXY<Pixel>) -> Self {
        Self {
            name: name.into(),
            difficult: 0,
            bndbox,
        }
    }
}

/// A complete `<annotation>` document for one image.
#[derive(Clone, Debug, PartialEq)]
pub struct VocAnnotation {
    /// Name of the image directory relative to the dataset root.
    pub folder: String,

    /// Image filename including its extension.
    pub filename: String,

    pub size: ImageSize,

    /// Objects in label-file line order.
    pub objects: Vec<VocObject>,
}

impl VocAnnotation {
    pub fn new(folder: impl Into<String>, filename: impl Into<String>, size: ImageSize) -> Self {
        Self {
            folder: folder.into(),
            filename: filename.into(),
            size,
            objects: Vec::new(),
        }
    }

    pub fn push(&mut self, object: VocObject) {
        self.objects.push(object);
    }
}
