//! Pascal VOC XML writer and reader.
//!
//! The writer output is byte-stable: an XML declaration, then every element
//! on its own line, indented one tab deeper than its parent, with the root
//! element itself indented by one tab. Leaf elements keep their text inline.
//! Downstream tooling diffs these files, so the layout must not drift.

use std::fs;
use std::path::Path;

use roxmltree::Node;

use super::model::{ImageSize, VocAnnotation, VocObject};
use super::{BBoxXYXY, Pixel};
use crate::error::Txt2VocError;

pub const VOC_XML_EXTENSION: &str = "xml";

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>";

/// Render a document to its exact on-disk text.
pub fn to_voc_xml_string(doc: &VocAnnotation) -> String {
    let mut xml = String::with_capacity(256 + doc.objects.len() * 192);
    xml.push_str(XML_DECLARATION);
    xml.push('\n');

    open(&mut xml, 1, "annotation");
    leaf(&mut xml, 2, "folder", &doc.folder);
    leaf(&mut xml, 2, "filename", &doc.filename);

    open(&mut xml, 2, "size");
    leaf(&mut xml, 3, "width", &doc.size.width.to_string());
    leaf(&mut xml, 3, "height", &doc.size.height.to_string());
    leaf(&mut xml, 3, "depth", &doc.size.depth.to_string());
    close(&mut xml, 2, "size");

    for object in &doc.objects {
        open(&mut xml, 2, "object");
        leaf(&mut xml, 3, "name", &object.name);
        leaf(&mut xml, 3, "difficult", &object.difficult.to_string());
        open(&mut xml, 3, "bndbox");
        leaf(&mut xml, 4, "xmin", &format_coord(object.bndbox.xmin()));
        leaf(&mut xml, 4, "ymin", &format_coord(object.bndbox.ymin()));
        leaf(&mut xml, 4, "xmax", &format_coord(object.bndbox.xmax()));
        leaf(&mut xml, 4, "ymax", &format_coord(object.bndbox.ymax()));
        close(&mut xml, 3, "bndbox");
        close(&mut xml, 2, "object");
    }

    close(&mut xml, 1, "annotation");
    xml
}

/// Write a document to `xml_path` as UTF-8, replacing any existing file.
pub fn write_voc_xml(xml_path: &Path, doc: &VocAnnotation) -> Result<(), Txt2VocError> {
    fs::write(xml_path, to_voc_xml_string(doc)).map_err(Txt2VocError::Io)
}

/// Read one VOC XML file.
pub fn read_voc_xml(path: &Path) -> Result<VocAnnotation, Txt2VocError> {
    let xml = fs::read_to_string(path).map_err(Txt2VocError::Io)?;
    parse_voc_xml_str(&xml, path)
}

/// Parse VOC XML from a string.
pub fn from_voc_xml_str(xml: &str) -> Result<VocAnnotation, Txt2VocError> {
    parse_voc_xml_str(xml, Path::new("<memory>"))
}

/// Format a box coordinate.
///
/// Uses the shortest decimal that round-trips and always includes a
/// fractional part or an exponent. Magnitudes below `1e-4` or from `1e16`
/// up switch to scientific notation with a signed two-digit exponent.
pub fn format_coord(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        let text = if value > 0.0 { "inf" } else { "-inf" };
        return text.to_string();
    }

    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let sci = format!("{value:e}");
        if let Some((mantissa, exponent)) = sci.split_once('e') {
            if let Ok(exp) = exponent.parse::<i32>() {
                let sign = if exp < 0 { '-' } else { '+' };
                return format!("{mantissa}e{sign}{:02}", exp.abs());
            }
        }
        return sci;
    }

    let plain = value.to_string();
    if plain.contains('.') {
        plain
    } else {
        format!("{plain}.0")
    }
}

fn indent(xml: &mut String, depth: usize) {
    for _ in 0..depth {
        xml.push('\t');
    }
}

fn open(xml: &mut String, depth: usize, tag: &str) {
    indent(xml, depth);
    xml.push('<');
    xml.push_str(tag);
    xml.push_str(">\n");
}

fn close(xml: &mut String, depth: usize, tag: &str) {
    indent(xml, depth);
    xml.push_str("</");
    xml.push_str(tag);
    xml.push_str(">\n");
}

fn leaf(xml: &mut String, depth: usize, tag: &str, text: &str) {
    indent(xml, depth);
    xml.push('<');
    xml.push_str(tag);
    xml.push('>');
    xml.push_str(&xml_escape(text));
    xml.push_str("</");
    xml.push_str(tag);
    xml.push_str(">\n");
}

// Apostrophes are left alone in text content.
fn xml_escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('"', "&quot;")
        .replace('>', "&gt;")
}

fn parse_voc_xml_str(xml: &str, path: &Path) -> Result<VocAnnotation, Txt2VocError> {
    let document = roxmltree::Document::parse(xml).map_err(|source| Txt2VocError::VocXmlParse {
        path: path.to_path_buf(),
        message: source.to_string(),
    })?;

    let annotation = document.root_element();
    if annotation.tag_name().name() != "annotation" {
        return Err(Txt2VocError::VocXmlParse {
            path: path.to_path_buf(),
            message: "missing <annotation> root element".to_string(),
        });
    }

    let folder = optional_child_text(annotation, "folder").unwrap_or_default();
    let filename = required_child_text(annotation, "filename", path, "<annotation>")?;

    let size = required_child_element(annotation, "size", path, "<annotation>")?;
    let size = ImageSize::new(
        parse_required(size, "width", path, "<size>")?,
        parse_required(size, "height", path, "<size>")?,
        parse_required(size, "depth", path, "<size>")?,
    );

    let mut doc = VocAnnotation::new(folder, filename, size);

    for object in annotation
        .children()
        .filter(|node| node.is_element() && node.tag_name().name() == "object")
    {
        let name = required_child_text(object, "name", path, "<object>")?;
        let difficult = match optional_child_text(object, "difficult") {
            Some(raw) => raw.parse::<u8>().map_err(|_| Txt2VocError::VocXmlParse {
                path: path.to_path_buf(),
                message: format!("invalid <difficult> value '{raw}' in <object>"),
            })?,
            None => 0,
        };

        let bndbox = required_child_element(object, "bndbox", path, "<object>")?;
        let bbox = BBoxXYXY::<Pixel>::from_xyxy(
            parse_required(bndbox, "xmin", path, "<bndbox>")?,
            parse_required(bndbox, "ymin", path, "<bndbox>")?,
            parse_required(bndbox, "xmax", path, "<bndbox>")?,
            parse_required(bndbox, "ymax", path, "<bndbox>")?,
        );

        doc.push(VocObject {
            name,
            difficult,
            bndbox: bbox,
        });
    }

    Ok(doc)
}

fn required_child_element<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &str,
    path: &Path,
    context: &str,
) -> Result<Node<'a, 'input>, Txt2VocError> {
    child_element(node, tag).ok_or_else(|| Txt2VocError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("missing <{tag}> in {context}"),
    })
}

fn required_child_text(
    node: Node<'_, '_>,
    tag: &str,
    path: &Path,
    context: &str,
) -> Result<String, Txt2VocError> {
    optional_child_text(node, tag).ok_or_else(|| Txt2VocError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("missing <{tag}> in {context}"),
    })
}

fn parse_required<T: std::str::FromStr>(
    node: Node<'_, '_>,
    tag: &str,
    path: &Path,
    context: &str,
) -> Result<T, Txt2VocError> {
    let raw = required_child_text(node, tag, path, context)?;
    raw.parse::<T>().map_err(|_| Txt2VocError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("invalid <{tag}> value '{raw}' in {context}"),
    })
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == tag)
}

fn optional_child_text(node: Node<'_, '_>, tag: &str) -> Option<String> {
    child_element(node, tag)
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToOwned::to_owned)
}
