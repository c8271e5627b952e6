//! Plain-text box label reader.
//!
//! Each label file holds one object per line:
//! `<class> <x_center> <y_center> <width> <height>`, with the four numbers
//! normalized to the image frame. The leading class token is kept on the row
//! but plays no part in the conversion.
//!
//! Files are not assumed to be UTF-8. A byte-order mark decides the encoding
//! when present; otherwise it is guessed from the content.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;

use super::{BBoxXYXY, Normalized};
use crate::error::Txt2VocError;

pub const LABEL_EXTENSION: &str = "txt";

/// One parsed label line.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelRow {
    /// The first token, verbatim.
    pub class_token: String,
    pub cx: f64,
    pub cy: f64,
    pub w: f64,
    pub h: f64,
}

impl LabelRow {
    pub fn bbox(&self) -> BBoxXYXY<Normalized> {
        BBoxXYXY::from_cxcywh(self.cx, self.cy, self.w, self.h)
    }
}

/// Read and parse a label file.
pub fn read_label_file(path: &Path) -> Result<Vec<LabelRow>, Txt2VocError> {
    let bytes = fs::read(path).map_err(Txt2VocError::Io)?;
    let content = decode_label_bytes(&bytes, path)?;
    parse_label_str(&content, path)
}

/// Decode raw label bytes into text.
///
/// Decoding never substitutes replacement characters; any byte sequence that
/// is invalid for the chosen encoding is an error.
pub fn decode_label_bytes(bytes: &[u8], path: &Path) -> Result<String, Txt2VocError> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
        None => {
            let mut detector = EncodingDetector::new();
            detector.feed(bytes, true);
            (detector.guess(None, true), bytes)
        }
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(Cow::into_owned)
        .ok_or_else(|| Txt2VocError::EncodingDetection {
            path: path.to_path_buf(),
            encoding: encoding.name(),
            message: "content contains byte sequences that are invalid for this encoding"
                .to_string(),
        })
}

/// Parse decoded label text. Blank lines are skipped.
pub fn parse_label_str(content: &str, path: &Path) -> Result<Vec<LabelRow>, Txt2VocError> {
    let mut rows = Vec::new();
    for (line_idx, line) in content.lines().enumerate() {
        if let Some(row) = parse_label_line(line, path, line_idx + 1)? {
            rows.push(row);
        }
    }
    Ok(rows)
}

/// Parse a single line. Returns `Ok(None)` for whitespace-only lines.
///
/// Tokens past the fifth are ignored.
pub fn parse_label_line(
    line: &str,
    file_path: &Path,
    line_num: usize,
) -> Result<Option<LabelRow>, Txt2VocError> {
    let mut tokens = line.split_whitespace();
    let Some(class_token) = tokens.next() else {
        return Ok(None);
    };

    let values: Vec<&str> = tokens.take(4).collect();
    if values.len() < 4 {
        return Err(Txt2VocError::MalformedAnnotationLine {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!(
                "expected 4 values after the class token, found {}",
                values.len()
            ),
        });
    }

    let cx = parse_f64_token(values[0], "x_center", file_path, line_num)?;
    let cy = parse_f64_token(values[1], "y_center", file_path, line_num)?;
    let w = parse_f64_token(values[2], "width", file_path, line_num)?;
    let h = parse_f64_token(values[3], "height", file_path, line_num)?;

    Ok(Some(LabelRow {
        class_token: class_token.to_string(),
        cx,
        cy,
        w,
        h,
    }))
}

/// Fuzz-only entrypoint for single-line parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_label_line(input: &str) -> Result<(), Txt2VocError> {
    let _ = parse_label_line(input, Path::new("<fuzz>"), 1)?;
    Ok(())
}

fn parse_f64_token(
    raw: &str,
    field_name: &str,
    file_path: &Path,
    line_num: usize,
) -> Result<f64, Txt2VocError> {
    raw.parse::<f64>()
        .map_err(|_| Txt2VocError::MalformedAnnotationLine {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!("invalid {field_name} '{raw}'; expected floating-point number"),
        })
}
