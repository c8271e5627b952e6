//! Conversion report types.
//!
//! A [`ConversionReport`] records what a run produced: how many images were
//! copied, converted, or dropped, plus notes on policy decisions that affect
//! the output (fixed frame size, ignored class tokens).

use serde::Serialize;
use std::fmt;

/// Summary of a single conversion run.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ConversionReport {
    /// Source image directory.
    pub image_dir: String,
    /// Source label directory.
    pub txt_dir: String,
    /// Dataset root that received `JPEGImages/` and `Annotations/`.
    pub output_dir: String,
    pub counts: ConversionCounts,
    /// Filenames removed from `JPEGImages/` because no label file matched.
    pub dropped_images: Vec<String>,
    pub issues: Vec<ConversionIssue>,
}

impl ConversionReport {
    pub fn new(
        image_dir: impl Into<String>,
        txt_dir: impl Into<String>,
        output_dir: impl Into<String>,
    ) -> Self {
        Self {
            image_dir: image_dir.into(),
            txt_dir: txt_dir.into(),
            output_dir: output_dir.into(),
            ..Default::default()
        }
    }

    pub fn add(&mut self, issue: ConversionIssue) {
        self.issues.push(issue);
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == ConversionSeverity::Warning)
            .count()
    }

    pub fn info_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == ConversionSeverity::Info)
            .count()
    }

    /// True if any staged image was removed from the output.
    pub fn is_lossy(&self) -> bool {
        self.warning_count() > 0
    }
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Converted {} -> {}", self.txt_dir, self.output_dir)?;
        writeln!(
            f,
            "  {} image(s) copied, {} annotation file(s) written, {} object(s)",
            self.counts.images_copied, self.counts.annotations_written, self.counts.objects
        )?;

        if self.counts.images_dropped > 0 {
            writeln!(
                f,
                "  {} image(s) dropped (no matching label file)",
                self.counts.images_dropped
            )?;
        }

        let warnings = self.warning_count();
        if warnings > 0 {
            writeln!(f)?;
            writeln!(f, "Warnings ({}):", warnings)?;
            for issue in self
                .issues
                .iter()
                .filter(|i| i.severity == ConversionSeverity::Warning)
            {
                writeln!(f, "  - {}", issue.message)?;
            }
        }

        let infos = self.info_count();
        if infos > 0 {
            writeln!(f)?;
            writeln!(f, "Notes ({}):", infos)?;
            for issue in self
                .issues
                .iter()
                .filter(|i| i.severity == ConversionSeverity::Info)
            {
                writeln!(f, "  - {}", issue.message)?;
            }
        }

        Ok(())
    }
}

/// Counters collected during a run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConversionCounts {
    /// Image files copied into `JPEGImages/`.
    pub images_copied: usize,
    /// XML documents written to `Annotations/`.
    pub annotations_written: usize,
    /// Images removed again for lack of a label file.
    pub images_dropped: usize,
    /// `<object>` entries across all documents.
    pub objects: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct ConversionIssue {
    pub severity: ConversionSeverity,
    pub code: ConversionIssueCode,
    pub message: String,
}

impl ConversionIssue {
    /// Something from the input did not make it into the output.
    pub fn warning(code: ConversionIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: ConversionSeverity::Warning,
            code,
            message: message.into(),
        }
    }

    /// A policy note; nothing was lost.
    pub fn info(code: ConversionIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: ConversionSeverity::Info,
            code,
            message: message.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionSeverity {
    Warning,
    Info,
}

/// Stable issue codes for programmatic consumption.
///
/// These codes are part of the JSON report and should remain stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionIssueCode {
    /// Images without a label file were removed from `JPEGImages/`.
    DropImagesWithoutLabels,
    /// Directory entries in `JPEGImages/` that are not regular files were left alone.
    SkipNonFileEntries,
    /// Boxes were scaled against the configured frame, not real image sizes.
    FixedFrameSize,
    /// Label files used several class tokens but every object got one name.
    ClassTokensIgnored,
}
