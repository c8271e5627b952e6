//! Text-label to VOC dataset conversion.
//!
//! A run has two sequential stages:
//!
//! 1. [`stage_images`] copies every supported image from the source directory
//!    into `<root>/JPEGImages`.
//! 2. [`translate_annotations`] walks the staged images, pairs each with
//!    `<stem>.txt` from the label directory and writes `<root>/Annotations/<stem>.xml`.
//!    Images without a label file are deleted again.
//!
//! [`convert`] runs both after checking that the source directories exist.
//! Any read, decode, or parse failure aborts the run; files written before the
//! failure stay on disk.

pub mod report;

pub use report::{
    ConversionCounts, ConversionIssue, ConversionIssueCode, ConversionReport, ConversionSeverity,
};

use std::collections::BTreeSet;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::error::Txt2VocError;
use crate::ir::io_voc_xml::{write_voc_xml, VOC_XML_EXTENSION};
use crate::ir::io_yolo_txt::{read_label_file, LabelRow, LABEL_EXTENSION};
use crate::ir::{ImageSize, VocAnnotation, VocObject};

/// Extensions recognized as images, compared case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];
pub const IMAGES_DIR_NAME: &str = "JPEGImages";
pub const ANNOTATIONS_DIR_NAME: &str = "Annotations";
pub const DEFAULT_LABEL: &str = "ship";

/// Settings applied to every generated document.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvertOptions {
    /// Frame that normalized boxes are scaled against and that `<size>` reports.
    pub size: ImageSize,
    /// Name written to every `<object>`.
    pub label: String,
    /// Value of `<folder>`.
    pub folder: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            size: ImageSize::default(),
            label: DEFAULT_LABEL.to_string(),
            folder: IMAGES_DIR_NAME.to_string(),
        }
    }
}

/// Convert `image_dir` + `txt_dir` into a VOC dataset under `dataset_save_dir`.
///
/// Both source directories are checked before anything is created.
pub fn convert(
    image_dir: &Path,
    txt_dir: &Path,
    dataset_save_dir: &Path,
    opts: &ConvertOptions,
) -> Result<ConversionReport, Txt2VocError> {
    require_dir(image_dir, "image")?;
    require_dir(txt_dir, "annotation")?;

    let mut report = ConversionReport::new(
        image_dir.display().to_string(),
        txt_dir.display().to_string(),
        dataset_save_dir.display().to_string(),
    );

    fs::create_dir_all(dataset_save_dir).map_err(Txt2VocError::Io)?;

    let new_image_dir = stage_images(image_dir, dataset_save_dir, &mut report)?;
    let xml_dir = dataset_save_dir.join(ANNOTATIONS_DIR_NAME);
    translate_annotations(&new_image_dir, txt_dir, &xml_dir, opts, &mut report)?;

    info!(
        "converted {} image(s) into {} ({} dropped, {} object(s))",
        report.counts.annotations_written,
        dataset_save_dir.display(),
        report.counts.images_dropped,
        report.counts.objects
    );

    Ok(report)
}

/// [`convert`] with the default frame (256x256x3) and label (`ship`).
pub fn convert_with_defaults(
    image_dir: &Path,
    txt_dir: &Path,
    dataset_save_dir: &Path,
) -> Result<ConversionReport, Txt2VocError> {
    convert(
        image_dir,
        txt_dir,
        dataset_save_dir,
        &ConvertOptions::default(),
    )
}

/// Copy supported images from `image_dir` into `<dataset_root>/JPEGImages`.
///
/// Only the top level of `image_dir` is scanned. Existing files with the same
/// name are overwritten. Fails with [`Txt2VocError::SameSourceAndDestination`]
/// before copying anything when `image_dir` already is the staging directory.
/// Returns the staged image directory.
pub fn stage_images(
    image_dir: &Path,
    dataset_root: &Path,
    report: &mut ConversionReport,
) -> Result<PathBuf, Txt2VocError> {
    require_dir(image_dir, "image")?;

    let new_image_dir = dataset_root.join(IMAGES_DIR_NAME);
    fs::create_dir_all(&new_image_dir).map_err(Txt2VocError::Io)?;

    let source = fs::canonicalize(image_dir).map_err(Txt2VocError::Io)?;
    if source == fs::canonicalize(&new_image_dir).map_err(Txt2VocError::Io)? {
        return Err(Txt2VocError::SameSourceAndDestination { path: source });
    }

    for entry in fs::read_dir(image_dir).map_err(Txt2VocError::Io)? {
        let entry = entry.map_err(Txt2VocError::Io)?;
        let path = entry.path();
        if !path.is_file() || !is_image_file(&path) {
            continue;
        }

        fs::copy(&path, new_image_dir.join(entry.file_name())).map_err(Txt2VocError::Io)?;
        report.counts.images_copied += 1;
    }

    debug!(
        "staged {} image(s) into {}",
        report.counts.images_copied,
        new_image_dir.display()
    );
    Ok(new_image_dir)
}

/// Write one XML document per staged image.
///
/// Every regular file in `image_dir` is treated as staged. A file whose
/// `<stem>.txt` is missing from `txt_dir` is deleted and produces no XML. A
/// label path that exists but cannot be read (a directory, say) aborts the run.
pub fn translate_annotations(
    image_dir: &Path,
    txt_dir: &Path,
    xml_dir: &Path,
    opts: &ConvertOptions,
    report: &mut ConversionReport,
) -> Result<(), Txt2VocError> {
    fs::create_dir_all(xml_dir).map_err(Txt2VocError::Io)?;

    let mut class_tokens = BTreeSet::new();
    let mut skipped_entries = 0usize;

    for entry in fs::read_dir(image_dir).map_err(Txt2VocError::Io)? {
        let entry = entry.map_err(Txt2VocError::Io)?;
        let image_path = entry.path();
        if !image_path.is_file() {
            warn!(
                "skipping {}: not a regular file",
                image_path.display()
            );
            skipped_entries += 1;
            continue;
        }

        let file_name = entry.file_name();
        let img_name = file_name.to_string_lossy().into_owned();
        let stem = image_path.file_stem().unwrap_or(file_name.as_os_str());
        let txt_file = txt_dir.join(with_extension_name(stem, LABEL_EXTENSION));

        if !txt_file.exists() {
            debug!(
                "no label file for {}; removing staged image",
                image_path.display()
            );
            fs::remove_file(&image_path).map_err(Txt2VocError::Io)?;
            report.counts.images_dropped += 1;
            report.dropped_images.push(img_name);
            continue;
        }

        let rows = read_label_file(&txt_file)?;
        class_tokens.extend(rows.iter().map(|row| row.class_token.clone()));

        let doc = build_annotation(&img_name, &rows, opts);
        let xml_path = xml_dir.join(with_extension_name(stem, VOC_XML_EXTENSION));
        write_voc_xml(&xml_path, &doc)?;
        debug!(
            "wrote {} ({} object(s))",
            xml_path.display(),
            doc.objects.len()
        );

        report.counts.annotations_written += 1;
        report.counts.objects += doc.objects.len();
    }

    add_policy_notes(report, opts, &class_tokens, skipped_entries);
    Ok(())
}

/// Build the document for one image from its parsed label rows.
pub fn build_annotation(filename: &str, rows: &[LabelRow], opts: &ConvertOptions) -> VocAnnotation {
    let frame_w = opts.size.width as f64;
    let frame_h = opts.size.height as f64;

    let mut doc = VocAnnotation::new(opts.folder.clone(), filename, opts.size);
    for row in rows {
        let bndbox = row.bbox().to_pixel(frame_w, frame_h);
        doc.push(VocObject::new(opts.label.clone(), bndbox));
    }
    doc
}

/// True if `path` has one of [`IMAGE_EXTENSIONS`].
pub fn is_image_file(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    IMAGE_EXTENSIONS
        .iter()
        .any(|allowed_ext| ext.eq_ignore_ascii_case(allowed_ext))
}

fn add_policy_notes(
    report: &mut ConversionReport,
    opts: &ConvertOptions,
    class_tokens: &BTreeSet<String>,
    skipped_entries: usize,
) {
    if report.counts.images_dropped > 0 {
        report.add(ConversionIssue::warning(
            ConversionIssueCode::DropImagesWithoutLabels,
            format!(
                "{} image(s) had no label file and were removed from {}",
                report.counts.images_dropped, IMAGES_DIR_NAME
            ),
        ));
    }

    if skipped_entries > 0 {
        report.add(ConversionIssue::info(
            ConversionIssueCode::SkipNonFileEntries,
            format!(
                "{} non-file entry(s) in {} were left untouched",
                skipped_entries, IMAGES_DIR_NAME
            ),
        ));
    }

    if report.counts.objects > 0 {
        report.add(ConversionIssue::info(
            ConversionIssueCode::FixedFrameSize,
            format!(
                "boxes scaled against a fixed {}x{} frame, not the real image dimensions",
                opts.size.width, opts.size.height
            ),
        ));
    }

    if class_tokens.len() > 1 {
        report.add(ConversionIssue::info(
            ConversionIssueCode::ClassTokensIgnored,
            format!(
                "{} distinct class token(s) found; every object is named '{}'",
                class_tokens.len(),
                opts.label
            ),
        ));
    }
}

fn require_dir(path: &Path, kind: &'static str) -> Result<(), Txt2VocError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(Txt2VocError::MissingSourceDirectory {
            kind,
            path: path.to_path_buf(),
        })
    }
}

/// `<stem>.<ext>` built on the raw OS string so non-UTF-8 names survive.
fn with_extension_name(stem: &OsStr, ext: &str) -> OsString {
    let mut name = stem.to_os_string();
    name.push(".");
    name.push(ext);
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cx: f64, cy: f64, w: f64, h: f64) -> LabelRow {
        LabelRow {
            class_token: "0".to_string(),
            cx,
            cy,
            w,
            h,
        }
    }

    #[test]
    fn is_image_file_is_case_insensitive() {
        assert!(is_image_file(Path::new("a.jpg")));
        assert!(is_image_file(Path::new("a.JPEG")));
        assert!(is_image_file(Path::new("dir/a.Png")));
        assert!(is_image_file(Path::new("a.bmp")));
        assert!(!is_image_file(Path::new("a.txt")));
        assert!(!is_image_file(Path::new("a.gif")));
        assert!(!is_image_file(Path::new("jpg")));
    }

    #[test]
    fn build_annotation_applies_defaults() {
        let doc = build_annotation(
            "foo.jpg",
            &[row(0.5, 0.5, 0.2, 0.4)],
            &ConvertOptions::default(),
        );

        assert_eq!(doc.folder, "JPEGImages");
        assert_eq!(doc.filename, "foo.jpg");
        assert_eq!(doc.size, ImageSize::new(256, 256, 3));
        assert_eq!(doc.objects.len(), 1);

        let obj = &doc.objects[0];
        assert_eq!(obj.name, "ship");
        assert_eq!(obj.difficult, 0);
        assert!((obj.bndbox.xmin() - 102.4).abs() < 1e-9);
        assert!((obj.bndbox.xmax() - 153.6).abs() < 1e-9);
        assert!((obj.bndbox.ymin() - 76.8).abs() < 1e-9);
        assert!((obj.bndbox.ymax() - 179.2).abs() < 1e-9);
    }

    #[test]
    fn build_annotation_honours_custom_options() {
        let opts = ConvertOptions {
            size: ImageSize::new(640, 480, 1),
            label: "boat".to_string(),
            folder: "images".to_string(),
        };
        let doc = build_annotation("x.png", &[row(0.5, 0.5, 1.0, 1.0)], &opts);

        assert_eq!(doc.folder, "images");
        assert_eq!(doc.size.depth, 1);
        assert_eq!(doc.objects[0].name, "boat");
        assert_eq!(doc.objects[0].bndbox.xmax(), 640.0);
        assert_eq!(doc.objects[0].bndbox.ymax(), 480.0);
    }

    #[test]
    fn build_annotation_keeps_line_order() {
        let doc = build_annotation(
            "a.jpg",
            &[row(0.1, 0.1, 0.1, 0.1), row(0.9, 0.9, 0.1, 0.1)],
            &ConvertOptions::default(),
        );
        assert!(doc.objects[0].bndbox.xmin() < doc.objects[1].bndbox.xmin());
    }

    #[test]
    fn stage_images_requires_source_dir() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let mut report = ConversionReport::default();
        let err = stage_images(&temp.path().join("missing"), temp.path(), &mut report)
            .unwrap_err();
        assert!(matches!(
            err,
            Txt2VocError::MissingSourceDirectory { kind: "image", .. }
        ));
        assert!(!temp.path().join(IMAGES_DIR_NAME).exists());
    }

    #[test]
    fn stage_images_copies_only_images() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let src = temp.path().join("src");
        fs::create_dir_all(src.join("nested.jpg")).expect("create nested dir");
        fs::write(src.join("a.jpg"), b"jpeg-bytes").expect("write a.jpg");
        fs::write(src.join("b.PNG"), b"png-bytes").expect("write b.PNG");
        fs::write(src.join("notes.txt"), b"ignore").expect("write notes");

        let root = temp.path().join("out");
        let mut report = ConversionReport::default();
        let staged = stage_images(&src, &root, &mut report).expect("stage images");

        assert_eq!(staged, root.join(IMAGES_DIR_NAME));
        assert_eq!(report.counts.images_copied, 2);
        assert_eq!(fs::read(staged.join("a.jpg")).expect("read a"), b"jpeg-bytes");
        assert!(staged.join("b.PNG").is_file());
        assert!(!staged.join("notes.txt").exists());
        assert!(!staged.join("nested.jpg").exists());
    }

    #[test]
    fn stage_images_rejects_staging_dir_as_source() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let staged = temp.path().join(IMAGES_DIR_NAME);
        fs::create_dir_all(&staged).expect("create staging dir");
        fs::write(staged.join("a.jpg"), b"jpeg-bytes").expect("write a.jpg");

        let mut report = ConversionReport::default();
        let err = stage_images(&staged, temp.path(), &mut report).unwrap_err();

        assert!(matches!(err, Txt2VocError::SameSourceAndDestination { .. }));
        assert_eq!(report.counts.images_copied, 0);
        assert_eq!(fs::read(staged.join("a.jpg")).expect("read a"), b"jpeg-bytes");
    }

    #[test]
    fn with_extension_name_appends_to_raw_stem() {
        assert_eq!(
            with_extension_name(OsStr::new("foo.bar"), LABEL_EXTENSION),
            OsString::from("foo.bar.txt")
        );
        assert_eq!(
            with_extension_name(OsStr::new("foo"), VOC_XML_EXTENSION),
            OsString::from("foo.xml")
        );
    }

    #[test]
    fn label_path_that_is_a_directory_aborts_without_dropping_image() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let images = temp.path().join("JPEGImages");
        let txts = temp.path().join("txts");
        fs::create_dir_all(&images).expect("create images");
        fs::create_dir_all(txts.join("a.txt")).expect("create label dir");
        fs::write(images.join("a.jpg"), b"x").expect("write image");

        let mut report = ConversionReport::default();
        let err = translate_annotations(
            &images,
            &txts,
            &temp.path().join("Annotations"),
            &ConvertOptions::default(),
            &mut report,
        )
        .unwrap_err();

        assert!(matches!(err, Txt2VocError::Io(_)));
        assert!(images.join("a.jpg").is_file());
        assert_eq!(report.counts.images_dropped, 0);
    }

    #[test]
    fn translate_annotations_notes_multiple_class_tokens() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let images = temp.path().join("JPEGImages");
        let txts = temp.path().join("txts");
        fs::create_dir_all(&images).expect("create images");
        fs::create_dir_all(&txts).expect("create txts");
        fs::write(images.join("a.jpg"), b"x").expect("write image");
        fs::write(txts.join("a.txt"), "0 0.5 0.5 0.1 0.1\n3 0.2 0.2 0.1 0.1\n")
            .expect("write labels");

        let mut report = ConversionReport::default();
        translate_annotations(
            &images,
            &txts,
            &temp.path().join("Annotations"),
            &ConvertOptions::default(),
            &mut report,
        )
        .expect("translate");

        assert_eq!(report.counts.objects, 2);
        assert!(report
            .issues
            .iter()
            .any(|issue| issue.code == ConversionIssueCode::ClassTokensIgnored));
        assert!(!report.is_lossy());
    }
}
