//! txt2voc: turn plain-text box labels into a Pascal VOC dataset.
//!
//! Given a directory of images and a directory of label files (one
//! `<class> <cx> <cy> <w> <h>` line per object, normalized coordinates),
//! txt2voc writes a dataset root holding `JPEGImages/` (copied images) and
//! `Annotations/` (one XML document per image, boxes in pixels).
//!
//! # Modules
//!
//! - [`conversion`]: image staging, label translation, run reports
//! - [`ir`]: box and document types, label reader, VOC XML writer/reader
//! - [`error`]: error types for txt2voc operations

pub mod conversion;
pub mod error;
pub mod ir;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use walkdir::WalkDir;

pub use conversion::{convert, convert_with_defaults, ConvertOptions};
pub use error::Txt2VocError;

use ir::io_voc_xml::{read_voc_xml, VOC_XML_EXTENSION};
use ir::ImageSize;

/// The txt2voc CLI application.
#[derive(Parser)]
#[command(name = "txt2voc")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Convert an image directory and its label files into a VOC dataset.
    Convert(ConvertArgs),
    /// Summarize generated VOC XML files.
    Inspect(InspectArgs),
}

/// Arguments for the convert subcommand.
#[derive(clap::Args)]
struct ConvertArgs {
    /// Directory containing the source images.
    image_dir: PathBuf,

    /// Directory containing one `<stem>.txt` label file per image.
    txt_dir: PathBuf,

    /// Dataset root to create (receives JPEGImages/ and Annotations/).
    output_dir: PathBuf,

    /// Frame width that normalized boxes are scaled against.
    #[arg(long, env = "TXT2VOC_WIDTH", default_value_t = 256)]
    width: u32,

    /// Frame height that normalized boxes are scaled against.
    #[arg(long, env = "TXT2VOC_HEIGHT", default_value_t = 256)]
    height: u32,

    /// Channel depth reported in <size>.
    #[arg(long, default_value_t = 3)]
    depth: u32,

    /// Class name written to every object.
    #[arg(long, env = "TXT2VOC_LABEL", default_value = conversion::DEFAULT_LABEL)]
    label: String,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    report: String,
}

/// Arguments for the inspect subcommand.
#[derive(clap::Args)]
struct InspectArgs {
    /// A VOC XML file, or a directory of them (scanned flat).
    path: PathBuf,
}

/// Run the txt2voc CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), Txt2VocError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Convert(args)) => run_convert(args),
        Some(Commands::Inspect(args)) => run_inspect(args),
        None => {
            println!("txt2voc {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Convert plain-text box labels into a Pascal VOC dataset.");
            println!();
            println!("Run 'txt2voc --help' for usage information.");
            Ok(())
        }
    }
}

fn run_convert(args: ConvertArgs) -> Result<(), Txt2VocError> {
    // Reject a bad report format before touching the filesystem.
    let json = match args.report.as_str() {
        "text" => false,
        "json" => true,
        other => {
            return Err(Txt2VocError::UnsupportedFormat(format!(
                "'{}' (supported: text, json)",
                other
            )));
        }
    };

    let opts = ConvertOptions {
        size: ImageSize::new(args.width, args.height, args.depth),
        label: args.label,
        ..Default::default()
    };

    let report = convert(&args.image_dir, &args.txt_dir, &args.output_dir, &opts)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report);
    }
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<(), Txt2VocError> {
    if args.path.is_dir() {
        for xml_path in collect_xml_files(&args.path)? {
            print_summary(&xml_path)?;
        }
        Ok(())
    } else {
        print_summary(&args.path)
    }
}

fn collect_xml_files(dir: &Path) -> Result<Vec<PathBuf>, Txt2VocError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|source| Txt2VocError::Io(source.into()))?;
        let is_xml = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(VOC_XML_EXTENSION))
            .unwrap_or(false);
        if entry.file_type().is_file() && is_xml {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn print_summary(xml_path: &Path) -> Result<(), Txt2VocError> {
    let doc = read_voc_xml(xml_path)?;
    println!(
        "{}: {}x{}x{}, {} object(s)",
        doc.filename,
        doc.size.width,
        doc.size.height,
        doc.size.depth,
        doc.objects.len()
    );
    Ok(())
}
