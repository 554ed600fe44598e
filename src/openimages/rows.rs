//! Annotation CSV reader and per-image grouping.
//!
//! Open Images box annotations are a flat table with one row per object:
//!
//! ```text
//! ImageID,Source,LabelName,Confidence,XMin,XMax,YMin,YMax,IsOccluded,IsTruncated,IsGroupOf,IsDepiction,IsInside
//! ```
//!
//! Columns are read by position; the header row is skipped. All values are
//! kept as text so they can be copied verbatim into the output, and numeric
//! interpretation happens only where a number is actually needed.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use csv::StringRecord;

use crate::error::OidVocError;

/// Number of columns in an Open Images box annotation table.
pub const ANNOTATION_COLUMNS: usize = 13;

/// One labeled object, exactly as it appears in the annotation table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnotationRow {
    pub image_id: String,
    pub source: String,
    pub label_name: String,
    pub confidence: String,
    pub xmin: String,
    pub xmax: String,
    pub ymin: String,
    pub ymax: String,
    pub is_occluded: String,
    pub is_truncated: String,
    pub is_group_of: String,
    pub is_depiction: String,
    pub is_inside: String,
}

impl AnnotationRow {
    fn from_record(record: &StringRecord) -> Self {
        let field = |idx: usize| record[idx].to_string();
        Self {
            image_id: field(0),
            source: field(1),
            label_name: field(2),
            confidence: field(3),
            xmin: field(4),
            xmax: field(5),
            ymin: field(6),
            ymax: field(7),
            is_occluded: field(8),
            is_truncated: field(9),
            is_group_of: field(10),
            is_depiction: field(11),
            is_inside: field(12),
        }
    }
}

/// All rows that belong to one image, in input order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageGroup {
    pub image_id: String,
    pub rows: Vec<AnnotationRow>,
}

/// Annotation rows grouped by image identifier.
///
/// Iteration order is lexicographic by image identifier so that repeated runs
/// over the same input process images in the same order.
#[derive(Clone, Debug, Default)]
pub struct RowGroups {
    groups: BTreeMap<String, ImageGroup>,
}

impl RowGroups {
    /// Number of distinct image identifiers.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of rows across all groups.
    pub fn row_count(&self) -> usize {
        self.groups.values().map(|group| group.rows.len()).sum()
    }

    /// Rows for one image identifier.
    pub fn get(&self, image_id: &str) -> Option<&ImageGroup> {
        self.groups.get(image_id)
    }

    /// Distinct image identifiers in processing order.
    pub fn image_ids(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageGroup> {
        self.groups.values()
    }
}

impl IntoIterator for RowGroups {
    type Item = ImageGroup;
    type IntoIter = std::collections::btree_map::IntoValues<String, ImageGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_values()
    }
}

/// Groups rows by image identifier (column 0).
///
/// Every row is placed into exactly one group; within a group rows keep the
/// order in which they were given.
pub fn group_rows(rows: impl IntoIterator<Item = AnnotationRow>) -> RowGroups {
    let mut groups: BTreeMap<String, ImageGroup> = BTreeMap::new();
    for row in rows {
        groups
            .entry(row.image_id.clone())
            .or_insert_with(|| ImageGroup {
                image_id: row.image_id.clone(),
                rows: Vec::new(),
            })
            .rows
            .push(row);
    }
    RowGroups { groups }
}

/// Reads and concatenates every annotation CSV in `paths`, in the given order.
pub fn read_annotation_csvs(paths: &[PathBuf]) -> Result<Vec<AnnotationRow>, OidVocError> {
    let mut rows = Vec::new();
    for path in paths {
        let file_rows = read_annotation_csv(path)?;
        log::info!("{}: {} annotation row(s)", path.display(), file_rows.len());
        rows.extend(file_rows);
    }
    Ok(rows)
}

/// Reads a single annotation CSV file.
///
/// # Errors
/// Fails if the file cannot be opened, is not valid CSV, or has a header or
/// data row that does not contain exactly [`ANNOTATION_COLUMNS`] fields.
pub fn read_annotation_csv(path: &Path) -> Result<Vec<AnnotationRow>, OidVocError> {
    let file = File::open(path).map_err(OidVocError::Io)?;
    parse_annotation_csv(BufReader::new(file), path)
}

/// Reads annotation rows from a string.
///
/// Useful for testing without file I/O.
pub fn from_annotation_csv_str(csv_str: &str) -> Result<Vec<AnnotationRow>, OidVocError> {
    from_annotation_csv_slice(csv_str.as_bytes())
}

/// Reads annotation rows from raw bytes.
///
/// Useful for fuzzing and processing raw bytes without requiring UTF-8 upfront.
pub fn from_annotation_csv_slice(bytes: &[u8]) -> Result<Vec<AnnotationRow>, OidVocError> {
    parse_annotation_csv(bytes, Path::new("<bytes>"))
}

fn parse_annotation_csv<R: Read>(
    reader: R,
    path: &Path,
) -> Result<Vec<AnnotationRow>, OidVocError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let header_len = csv_reader
        .headers()
        .map_err(|source| OidVocError::AnnotationCsvParse {
            path: path.to_path_buf(),
            source,
        })?
        .len();

    // A completely empty file has no header and no rows.
    if header_len == 0 {
        return Ok(Vec::new());
    }

    if header_len != ANNOTATION_COLUMNS {
        return Err(OidVocError::AnnotationCsvInvalid {
            path: path.to_path_buf(),
            line: 1,
            message: format!(
                "expected {ANNOTATION_COLUMNS} header columns, found {header_len}"
            ),
        });
    }

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result.map_err(|source| OidVocError::AnnotationCsvParse {
            path: path.to_path_buf(),
            source,
        })?;

        if record.len() != ANNOTATION_COLUMNS {
            return Err(OidVocError::AnnotationCsvInvalid {
                path: path.to_path_buf(),
                line: record.position().map(|pos| pos.line()).unwrap_or(0),
                message: format!(
                    "expected {ANNOTATION_COLUMNS} columns, found {}",
                    record.len()
                ),
            });
        }

        let image_id = &record[0];
        if let Some(problem) = invalid_image_id(image_id) {
            return Err(OidVocError::AnnotationCsvInvalid {
                path: path.to_path_buf(),
                line: record.position().map(|pos| pos.line()).unwrap_or(0),
                message: format!("image ID '{image_id}' {problem}"),
            });
        }

        rows.push(AnnotationRow::from_record(&record));
    }

    Ok(rows)
}

/// Image IDs become file names under the image and output directories, so
/// they must name a single path component.
fn invalid_image_id(image_id: &str) -> Option<&'static str> {
    if image_id.is_empty() {
        Some("is empty")
    } else if image_id.contains(['/', '\\']) {
        Some("must not contain a path separator")
    } else if image_id == "." || image_id == ".." {
        Some("must not be a relative path component")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "ImageID,Source,LabelName,Confidence,XMin,XMax,YMin,YMax,IsOccluded,IsTruncated,IsGroupOf,IsDepiction,IsInside\n";

    fn csv_with(rows: &[&str]) -> String {
        let mut out = HEADER.to_string();
        for row in rows {
            out.push_str(row);
            out.push('\n');
        }
        out
    }

    #[test]
    fn parses_rows_by_position() {
        let csv = csv_with(&["img1,xclick,/m/01,1,0.1,0.5,0.2,0.6,0,1,0,0,0"]);
        let rows = from_annotation_csv_str(&csv).expect("parse");
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.image_id, "img1");
        assert_eq!(row.source, "xclick");
        assert_eq!(row.label_name, "/m/01");
        assert_eq!(row.xmin, "0.1");
        assert_eq!(row.xmax, "0.5");
        assert_eq!(row.ymin, "0.2");
        assert_eq!(row.ymax, "0.6");
        assert_eq!(row.is_truncated, "1");
        assert_eq!(row.is_inside, "0");
    }

    #[test]
    fn header_only_yields_no_rows() {
        let rows = from_annotation_csv_str(HEADER).expect("parse");
        assert!(rows.is_empty());
    }

    #[test]
    fn empty_input_yields_no_rows() {
        let rows = from_annotation_csv_str("").expect("parse");
        assert!(rows.is_empty());
    }

    #[test]
    fn short_row_is_rejected_with_line_number() {
        let csv = csv_with(&[
            "img1,xclick,/m/01,1,0.1,0.5,0.2,0.6,0,1,0,0,0",
            "img2,xclick,/m/01,1,0.1,0.5",
        ]);
        let err = from_annotation_csv_str(&csv).expect_err("short row should fail");
        match err {
            OidVocError::AnnotationCsvInvalid { line, message, .. } => {
                assert_eq!(line, 3);
                assert!(message.contains("found 6"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn wrong_header_width_is_rejected() {
        let err = from_annotation_csv_str("ImageID,Source\nimg1,xclick\n")
            .expect_err("narrow header should fail");
        assert!(matches!(
            err,
            OidVocError::AnnotationCsvInvalid { line: 1, .. }
        ));
    }

    #[test]
    fn image_ids_that_escape_the_directory_are_rejected() {
        for bad in ["../x", "/etc/foo", "a\\b", "..", "."] {
            let csv = csv_with(&[
                "img1,xclick,/m/01,1,0.1,0.5,0.2,0.6,0,1,0,0,0",
                &format!("{bad},xclick,/m/01,1,0.1,0.5,0.2,0.6,0,1,0,0,0"),
            ]);
            let err = from_annotation_csv_str(&csv).expect_err("unsafe image id");
            match err {
                OidVocError::AnnotationCsvInvalid { line, message, .. } => {
                    assert_eq!(line, 3, "{bad}");
                    assert!(message.contains(bad), "{message}");
                }
                other => panic!("unexpected error for {bad}: {other}"),
            }
        }
    }

    #[test]
    fn empty_image_id_is_rejected() {
        let csv = csv_with(&[",xclick,/m/01,1,0.1,0.5,0.2,0.6,0,1,0,0,0"]);
        assert!(matches!(
            from_annotation_csv_str(&csv),
            Err(OidVocError::AnnotationCsvInvalid { line: 2, .. })
        ));
    }

    #[test]
    fn dotted_image_ids_are_accepted() {
        let csv = csv_with(&["img.v2,xclick,/m/01,1,0.1,0.5,0.2,0.6,0,1,0,0,0"]);
        let rows = from_annotation_csv_str(&csv).expect("parse");
        assert_eq!(rows[0].image_id, "img.v2");
    }

    #[test]
    fn grouping_places_every_row_once_and_keeps_row_order() {
        let csv = csv_with(&[
            "b,xclick,/m/01,1,0.1,0.2,0.1,0.2,0,0,0,0,0",
            "a,xclick,/m/02,1,0.1,0.2,0.1,0.2,0,0,0,0,0",
            "b,xclick,/m/03,1,0.1,0.2,0.1,0.2,0,0,0,0,0",
        ]);
        let groups = group_rows(from_annotation_csv_str(&csv).expect("parse"));

        assert_eq!(groups.len(), 2);
        assert_eq!(groups.row_count(), 3);
        assert_eq!(groups.image_ids().collect::<Vec<_>>(), vec!["a", "b"]);

        let b = groups.get("b").expect("group b");
        let labels: Vec<_> = b.rows.iter().map(|r| r.label_name.as_str()).collect();
        assert_eq!(labels, vec!["/m/01", "/m/03"]);
    }
}
