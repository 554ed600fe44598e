use std::path::PathBuf;
use thiserror::Error;

/// The main error type for oidvoc operations.
#[derive(Debug, Error)]
pub enum OidVocError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse annotation CSV {path}: {source}")]
    AnnotationCsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid annotation CSV {path} (line {line}): {message}")]
    AnnotationCsvInvalid {
        path: PathBuf,
        line: u64,
        message: String,
    },

    #[error("Failed to parse class descriptions {path}: {source}")]
    ClassDescriptionParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid class descriptions {path} (line {line}): {message}")]
    ClassDescriptionInvalid {
        path: PathBuf,
        line: u64,
        message: String,
    },

    #[error("Image '{image_id}': label code '{label}' not found in class descriptions")]
    UnknownLabel { image_id: String, label: String },

    #[error("Image '{image_id}': image file not found at {path}")]
    ImageNotFound { image_id: String, path: PathBuf },

    #[error("Image '{image_id}': failed to read dimensions from {path}: {source}")]
    ImageDimensionRead {
        image_id: String,
        path: PathBuf,
        #[source]
        source: imagesize::ImageError,
    },

    #[error("Image '{image_id}': invalid image size at {path}: {message}")]
    ImageSizeInvalid {
        image_id: String,
        path: PathBuf,
        message: String,
    },

    #[error("Image '{image_id}': invalid {field} value '{value}'; expected a finite floating-point number")]
    CoordinateParse {
        image_id: String,
        field: &'static str,
        value: String,
    },

    #[error("Image '{image_id}': annotation group is empty")]
    EmptyGroup { image_id: String },

    #[error("Failed to parse VOC XML from {path}: {message}")]
    VocXmlParse { path: PathBuf, message: String },

    #[error("Failed to write report JSON: {0}")]
    ReportJson(#[source] serde_json::Error),

    #[error("Conversion failed for {failed} of {total} image(s)")]
    ConversionFailed { failed: usize, total: usize },
}
