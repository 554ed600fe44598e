//! Class-description table reader.
//!
//! Open Images ships a headerless two-column CSV (`class-descriptions-boxable.csv`)
//! that maps machine label codes such as `/m/01g317` to display names such as
//! `Person`. Every annotation row refers to its class through one of these codes.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::OidVocError;

/// Lookup table from label code to human-readable class name.
///
/// Built once at startup and only read afterwards.
#[derive(Clone, Debug, Default)]
pub struct LabelTable {
    names: HashMap<String, String>,
    duplicates: usize,
}

impl LabelTable {
    /// Returns the class name for `code`, if the table knows it.
    pub fn resolve(&self, code: &str) -> Option<&str> {
        self.names.get(code).map(String::as_str)
    }

    /// Number of distinct label codes.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Number of records that redefined an already-seen code.
    ///
    /// The later definition replaces the earlier one.
    pub fn duplicate_count(&self) -> usize {
        self.duplicates
    }

    fn insert(&mut self, code: String, name: String) {
        if self.names.insert(code, name).is_some() {
            self.duplicates += 1;
        }
    }
}

/// Reads the class-description CSV at `path`.
///
/// # Errors
/// Fails if the file cannot be opened, is not valid CSV, or contains a record
/// that does not have exactly two fields.
pub fn read_class_descriptions(path: &Path) -> Result<LabelTable, OidVocError> {
    let file = File::open(path).map_err(OidVocError::Io)?;
    let table = parse_class_descriptions(BufReader::new(file), path)?;

    if table.duplicate_count() > 0 {
        log::warn!(
            "{}: {} duplicate label code(s); the last definition wins",
            path.display(),
            table.duplicate_count()
        );
    }

    Ok(table)
}

/// Reads a class-description table from a string.
///
/// Useful for testing without file I/O.
pub fn from_class_descriptions_str(csv_str: &str) -> Result<LabelTable, OidVocError> {
    from_class_descriptions_slice(csv_str.as_bytes())
}

/// Reads a class-description table from raw bytes.
pub fn from_class_descriptions_slice(bytes: &[u8]) -> Result<LabelTable, OidVocError> {
    parse_class_descriptions(bytes, Path::new("<bytes>"))
}

fn parse_class_descriptions<R: Read>(reader: R, path: &Path) -> Result<LabelTable, OidVocError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut table = LabelTable::default();
    for result in csv_reader.records() {
        let record = result.map_err(|source| OidVocError::ClassDescriptionParse {
            path: path.to_path_buf(),
            source,
        })?;

        if record.len() != 2 {
            return Err(OidVocError::ClassDescriptionInvalid {
                path: path.to_path_buf(),
                line: record.position().map(|pos| pos.line()).unwrap_or(0),
                message: format!("expected 2 columns (code, name), found {}", record.len()),
            });
        }

        table.insert(record[0].to_string(), record[1].to_string());
    }

    Ok(table)
}
