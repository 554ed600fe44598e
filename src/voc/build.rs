//! Assembles one VOC document from one image's annotation rows.

use std::collections::BTreeSet;

use super::{
    NormalizedBox, VocDocument, VocObject, DEFAULT_DATABASE, DEFAULT_DEPTH, DEFAULT_FOLDER,
    UNSPECIFIED_POSE,
};
use crate::error::OidVocError;
use crate::image_meta::ImageDirectory;
use crate::openimages::{AnnotationRow, ImageGroup, LabelTable};

/// Fixed tags written into every document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildOptions {
    pub folder: String,
    pub database: String,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            folder: DEFAULT_FOLDER.to_string(),
            database: DEFAULT_DATABASE.to_string(),
        }
    }
}

/// Builds the VOC document for `group`.
///
/// Objects appear in the same order as the group's rows. The document's
/// `<source><image>` comes from the first row; see [`distinct_sources`] to
/// detect groups where rows disagree.
///
/// # Errors
/// - [`OidVocError::EmptyGroup`] if the group has no rows
/// - [`OidVocError::ImageNotFound`] / [`OidVocError::ImageDimensionRead`] if the
///   image cannot be measured
/// - [`OidVocError::UnknownLabel`] if a label code is missing from `labels`
/// - [`OidVocError::CoordinateParse`] if a coordinate is not a number
pub fn build_document(
    group: &ImageGroup,
    labels: &LabelTable,
    images: &ImageDirectory,
    options: &BuildOptions,
) -> Result<VocDocument, OidVocError> {
    let first = group.rows.first().ok_or_else(|| OidVocError::EmptyGroup {
        image_id: group.image_id.clone(),
    })?;

    let filename = images.file_name(&group.image_id);
    let (width, height) = images.dimensions(&group.image_id)?;

    let objects = group
        .rows
        .iter()
        .map(|row| build_object(row, labels, width, height))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(VocDocument {
        folder: options.folder.clone(),
        filename,
        database: options.database.clone(),
        image_source: first.source.clone(),
        width,
        height,
        depth: DEFAULT_DEPTH,
        segmented: 0,
        objects,
    })
}

/// Returns the distinct `Source` values of a group, in sorted order.
///
/// A well-formed group has exactly one.
pub fn distinct_sources(group: &ImageGroup) -> Vec<&str> {
    group
        .rows
        .iter()
        .map(|row| row.source.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn build_object(
    row: &AnnotationRow,
    labels: &LabelTable,
    width: u32,
    height: u32,
) -> Result<VocObject, OidVocError> {
    let name = labels
        .resolve(&row.label_name)
        .ok_or_else(|| OidVocError::UnknownLabel {
            image_id: row.image_id.clone(),
            label: row.label_name.clone(),
        })?;

    let bndbox = NormalizedBox::from_row(row)?.to_pixel(width, height);

    Ok(VocObject {
        name: name.to_string(),
        pose: UNSPECIFIED_POSE.to_string(),
        truncated: row.is_truncated.clone(),
        difficult: 0,
        bndbox,
    })
}
