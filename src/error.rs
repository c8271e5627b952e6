use std::path::PathBuf;
use thiserror::Error;

/// The main error type for txt2voc operations.
#[derive(Debug, Error)]
pub enum Txt2VocError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("The {kind} folder does not exist: {}", .path.display())]
    MissingSourceDirectory { kind: &'static str, path: PathBuf },

    #[error(
        "The image folder is the output image folder, refusing to copy onto itself: {}",
        .path.display()
    )]
    SameSourceAndDestination { path: PathBuf },

    #[error("Failed to decode {} as text (detected {encoding}): {message}", .path.display())]
    EncodingDetection {
        path: PathBuf,
        encoding: &'static str,
        message: String,
    },

    #[error("Malformed annotation line {line} in {}: {message}", .path.display())]
    MalformedAnnotationLine {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Failed to parse VOC XML from {}: {message}", .path.display())]
    VocXmlParse { path: PathBuf, message: String },

    #[error("Failed to write report: {0}")]
    ReportWrite(#[from] serde_json::Error),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
