//! Run configuration.
//!
//! Everything a conversion needs is carried in [`ConvertConfig`] and handed to
//! [`crate::conversion::convert`]; nothing is read from process-wide state.

use std::path::PathBuf;

use crate::image_meta::{ImageDirectory, DEFAULT_IMAGE_EXTENSION};
use crate::voc::BuildOptions;

/// Output directory used when none is given.
pub const DEFAULT_OUTPUT_DIR: &str = "converted.d";

/// Inputs, outputs and policies for one conversion run.
#[derive(Clone, Debug)]
pub struct ConvertConfig {
    /// Annotation CSVs, read in order.
    pub annotation_paths: Vec<PathBuf>,
    /// Headerless `code,name` CSV.
    pub class_descriptions: PathBuf,
    pub image_dir: PathBuf,
    /// Extension of image files, without the dot.
    pub image_extension: String,
    pub output_dir: PathBuf,
    pub build: BuildOptions,
    /// Record per-image failures and continue instead of aborting the run.
    pub keep_going: bool,
    /// Build every document but write nothing.
    pub dry_run: bool,
}

impl ConvertConfig {
    /// A configuration with default extension, output directory and tags.
    pub fn new(
        annotation_paths: Vec<PathBuf>,
        class_descriptions: impl Into<PathBuf>,
        image_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            annotation_paths,
            class_descriptions: class_descriptions.into(),
            image_dir: image_dir.into(),
            image_extension: DEFAULT_IMAGE_EXTENSION.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            build: BuildOptions::default(),
            keep_going: false,
            dry_run: false,
        }
    }

    pub fn image_directory(&self) -> ImageDirectory {
        ImageDirectory::new(&self.image_dir, &self.image_extension)
    }
}
