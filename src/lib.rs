//! oidvoc: convert Open Images box annotations to Pascal VOC XML.
//!
//! Open Images publishes boxes as flat CSV tables with one row per object and
//! coordinates normalized to `[0, 1]`. Many detection training pipelines expect
//! Pascal VOC instead: one XML document per image with absolute pixel boxes.
//! oidvoc groups the rows by image, resolves label codes to class names, reads
//! each image's size and writes `<image id>.xml` files.
//!
//! # Modules
//!
//! - [`openimages`]: annotation and class-description table readers
//! - [`image_meta`]: image dimension lookup
//! - [`voc`]: VOC document model, builder and XML codec
//! - [`conversion`]: the end-to-end pipeline and its report
//! - [`config`]: run configuration
//! - [`error`]: error types for oidvoc operations

pub mod config;
pub mod conversion;
pub mod error;
pub mod image_meta;
pub mod openimages;
pub mod voc;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

pub use config::ConvertConfig;
pub use error::OidVocError;

/// The oidvoc CLI application.
#[derive(Parser)]
#[command(name = "oidvoc")]
#[command(version, about)]
struct Cli {
    /// Annotation file(s), e.g. train-annotations-bbox.csv.
    #[arg(required = true, num_args = 1..)]
    annotations: Vec<PathBuf>,

    /// Class description file, e.g. class-descriptions-boxable.csv.
    #[arg(long)]
    desc: PathBuf,

    /// Directory of dataset images.
    #[arg(long)]
    imgd: PathBuf,

    /// Output directory.
    #[arg(long, default_value = config::DEFAULT_OUTPUT_DIR)]
    outd: PathBuf,

    /// Extension of image files in --imgd.
    #[arg(long, default_value = image_meta::DEFAULT_IMAGE_EXTENSION)]
    image_ext: String,

    /// Value written to <folder>.
    #[arg(long, default_value = voc::DEFAULT_FOLDER)]
    folder: String,

    /// Value written to <source><database>.
    #[arg(long, default_value = voc::DEFAULT_DATABASE)]
    database: String,

    /// Keep converting other images after one fails (exit status is still non-zero).
    #[arg(long)]
    keep_going: bool,

    /// Build every document but do not write any files.
    #[arg(long)]
    dry_run: bool,

    /// Format of the summary printed on stdout.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,
}

/// Output format for the run summary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

impl From<Cli> for ConvertConfig {
    fn from(cli: Cli) -> Self {
        let mut config = ConvertConfig::new(cli.annotations, cli.desc, cli.imgd);
        config.output_dir = cli.outd;
        config.image_extension = cli.image_ext.trim_start_matches('.').to_string();
        config.build = voc::BuildOptions {
            folder: cli.folder,
            database: cli.database,
        };
        config.keep_going = cli.keep_going;
        config.dry_run = cli.dry_run;
        config
    }
}

/// Run the oidvoc CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), OidVocError> {
    let cli = Cli::parse();
    let report_format = cli.report;
    let config = ConvertConfig::from(cli);

    let report = conversion::convert(&config)?;

    match report_format {
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(&report).map_err(OidVocError::ReportJson)?;
            println!("{json}");
        }
        ReportFormat::Text => print!("{report}"),
    }

    if report.failure_count() > 0 {
        Err(OidVocError::ConversionFailed {
            failed: report.failure_count(),
            total: report.input.images,
        })
    } else {
        Ok(())
    }
}
