//! The Open Images → VOC conversion pipeline.
//!
//! Inputs are loaded once (class descriptions, then every annotation table),
//! rows are grouped by image, and each image is converted and written in
//! lexicographic order of its identifier.
//!
//! # Failure policy
//!
//! By default the first failing image aborts the run and its error is
//! returned. With [`ConvertConfig::keep_going`] each failure is recorded in the
//! report and the remaining images are still converted. Files written before a
//! failure are left in place either way.

pub mod report;

pub use report::{
    ConversionIssue, ConversionIssueCode, ConversionReport, ConversionSeverity, InputCounts,
    OutputCounts,
};

use std::fs;

use crate::config::ConvertConfig;
use crate::error::OidVocError;
use crate::image_meta::ImageDirectory;
use crate::openimages::{group_rows, read_annotation_csvs, read_class_descriptions};
use crate::openimages::{ImageGroup, LabelTable};
use crate::voc::build::distinct_sources;
use crate::voc::xml::write_voc_xml;
use crate::voc::{build_document, VocDocument};

/// Runs a full conversion as described by `config`.
///
/// # Errors
/// Input tables that cannot be read always abort. Per-image errors abort
/// unless `config.keep_going` is set, in which case they appear in the
/// returned report as failures.
pub fn convert(config: &ConvertConfig) -> Result<ConversionReport, OidVocError> {
    let mut report = ConversionReport::new();
    report.dry_run = config.dry_run;
    report.annotation_files = config.annotation_paths.len();

    let labels = read_class_descriptions(&config.class_descriptions)?;
    if labels.duplicate_count() > 0 {
        report.add(ConversionIssue::warning(
            ConversionIssueCode::DuplicateLabelCode,
            None,
            format!(
                "{} duplicate label code(s) in {}; the last definition wins",
                labels.duplicate_count(),
                config.class_descriptions.display()
            ),
        ));
    }

    let groups = group_rows(read_annotation_csvs(&config.annotation_paths)?);
    report.input = InputCounts {
        rows: groups.row_count(),
        images: groups.len(),
        label_codes: labels.len(),
    };
    log::info!(
        "Converting {} image(s) from {} annotation row(s)",
        groups.len(),
        groups.row_count()
    );

    if !config.dry_run {
        fs::create_dir_all(&config.output_dir).map_err(OidVocError::Io)?;
    }

    let images = config.image_directory();
    for group in groups {
        check_source_homogeneity(&group, &mut report);

        match convert_group(&group, &labels, &images, config) {
            Ok(document) => {
                check_box_order(&group.image_id, &document, &mut report);
                report.output.documents += 1;
                report.output.objects += document.objects.len();
            }
            Err(err) if config.keep_going => {
                log::error!("{err}");
                report.add(ConversionIssue::failure(&group.image_id, err.to_string()));
            }
            Err(err) => return Err(err),
        }
    }

    log::info!(
        "Finished: {} document(s), {} failure(s)",
        report.output.documents,
        report.failure_count()
    );

    Ok(report)
}

/// Builds one image's document and writes it unless this is a dry run.
fn convert_group(
    group: &ImageGroup,
    labels: &LabelTable,
    images: &ImageDirectory,
    config: &ConvertConfig,
) -> Result<VocDocument, OidVocError> {
    let document = build_document(group, labels, images, &config.build)?;

    if config.dry_run {
        log::debug!("{}: built {} object(s)", group.image_id, document.objects.len());
    } else {
        let path = write_voc_xml(&config.output_dir, &group.image_id, &document)?;
        log::debug!("{}: wrote {}", group.image_id, path.display());
    }

    Ok(document)
}

fn check_source_homogeneity(group: &ImageGroup, report: &mut ConversionReport) {
    let sources = distinct_sources(group);
    if sources.len() <= 1 {
        return;
    }

    let used = group
        .rows
        .first()
        .map(|row| row.source.as_str())
        .unwrap_or_default();
    let message = format!(
        "image '{}' has rows from {} sources ({}); using '{}' from the first row",
        group.image_id,
        sources.len(),
        sources.join(", "),
        used
    );
    log::warn!("{message}");
    report.add(ConversionIssue::warning(
        ConversionIssueCode::MixedImageSource,
        Some(group.image_id.clone()),
        message,
    ));
}

fn check_box_order(image_id: &str, document: &VocDocument, report: &mut ConversionReport) {
    for (idx, object) in document.objects.iter().enumerate() {
        if object.bndbox.is_ordered() {
            continue;
        }
        let message = format!(
            "image '{}' object {} ('{}') has min > max: {:?}",
            image_id,
            idx + 1,
            object.name,
            object.bndbox
        );
        log::warn!("{message}");
        report.add(ConversionIssue::warning(
            ConversionIssueCode::UnorderedBox,
            Some(image_id.to_string()),
            message,
        ));
    }
}
