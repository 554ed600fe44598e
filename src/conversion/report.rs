//! Conversion report types.
//!
//! A report summarizes one run: what was read, what was written, and every
//! irregularity met on the way. It renders as text for people and serializes
//! to JSON for scripts.

use serde::Serialize;
use std::fmt;

/// Summary of one conversion run.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ConversionReport {
    /// Number of annotation CSV files read.
    pub annotation_files: usize,
    /// Counts from the inputs.
    pub input: InputCounts,
    /// Counts of what was produced.
    pub output: OutputCounts,
    /// True if documents were built but not written.
    pub dry_run: bool,
    /// Irregularities and per-image failures.
    pub issues: Vec<ConversionIssue>,
}

impl ConversionReport {
    /// Create a new empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an issue to the report.
    pub fn add(&mut self, issue: ConversionIssue) {
        self.issues.push(issue);
    }

    /// Number of images that could not be converted.
    pub fn failure_count(&self) -> usize {
        self.count(ConversionSeverity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(ConversionSeverity::Warning)
    }

    /// Image identifiers that failed, in processing order.
    pub fn failed_images(&self) -> impl Iterator<Item = &str> {
        self.issues
            .iter()
            .filter(|i| i.severity == ConversionSeverity::Error)
            .filter_map(|i| i.image_id.as_deref())
    }

    fn count(&self, severity: ConversionSeverity) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == severity)
            .count()
    }
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Read {} row(s) for {} image(s) from {} file(s); {} label code(s)",
            self.input.rows, self.input.images, self.annotation_files, self.input.label_codes
        )?;

        let verb = if self.dry_run { "Built" } else { "Wrote" };
        writeln!(
            f,
            "{} {} document(s) with {} object(s)",
            verb, self.output.documents, self.output.objects
        )?;

        for (title, severity) in [
            ("Failures", ConversionSeverity::Error),
            ("Warnings", ConversionSeverity::Warning),
        ] {
            let count = self.count(severity);
            if count == 0 {
                continue;
            }
            writeln!(f)?;
            writeln!(f, "{} ({}):", title, count)?;
            for issue in self.issues.iter().filter(|i| i.severity == severity) {
                writeln!(f, "  - {}", issue.message)?;
            }
        }

        Ok(())
    }
}

/// Counts taken from the input tables.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct InputCounts {
    pub rows: usize,
    pub images: usize,
    pub label_codes: usize,
}

/// Counts of produced documents.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OutputCounts {
    pub documents: usize,
    pub objects: usize,
}

/// A single issue met during conversion.
#[derive(Clone, Debug, Serialize)]
pub struct ConversionIssue {
    pub severity: ConversionSeverity,
    pub code: ConversionIssueCode,
    /// The image the issue concerns, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    pub message: String,
}

impl ConversionIssue {
    /// An image that could not be converted.
    pub fn failure(image_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: ConversionSeverity::Error,
            code: ConversionIssueCode::ImageFailed,
            image_id: Some(image_id.into()),
            message: message.into(),
        }
    }

    pub fn warning(
        code: ConversionIssueCode,
        image_id: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: ConversionSeverity::Warning,
            code,
            image_id,
            message: message.into(),
        }
    }
}

/// Severity level for conversion issues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionSeverity {
    /// The image was not converted.
    Error,
    /// The image was converted, but the output may not say what the input meant.
    Warning,
}

/// Stable issue codes for programmatic consumption.
///
/// These codes are part of the JSON schema and should remain stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionIssueCode {
    /// Building or writing the image's document failed.
    ImageFailed,
    /// Rows of one image disagree on `Source`; the first row's value is used.
    MixedImageSource,
    /// The class-description table defines a code more than once.
    DuplicateLabelCode,
    /// A box has min > max on some axis.
    UnorderedBox,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_by_severity() {
        let mut report = ConversionReport::new();
        report.add(ConversionIssue::failure("a", "a failed"));
        report.add(ConversionIssue::warning(
            ConversionIssueCode::MixedImageSource,
            Some("b".to_string()),
            "b mixed",
        ));
        report.add(ConversionIssue::failure("c", "c failed"));

        assert_eq!(report.failure_count(), 2);
        assert_eq!(report.warning_count(), 1);
        assert_eq!(report.failed_images().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn display_lists_failures_and_warnings() {
        let mut report = ConversionReport::new();
        report.input = InputCounts {
            rows: 3,
            images: 2,
            label_codes: 5,
        };
        report.output = OutputCounts {
            documents: 1,
            objects: 2,
        };
        report.annotation_files = 1;
        report.add(ConversionIssue::failure("img2", "image 'img2' missing"));

        let text = report.to_string();
        assert!(text.contains("Read 3 row(s) for 2 image(s) from 1 file(s); 5 label code(s)"));
        assert!(text.contains("Wrote 1 document(s) with 2 object(s)"));
        assert!(text.contains("Failures (1):"));
        assert!(text.contains("  - image 'img2' missing"));
        assert!(!text.contains("Warnings"));
    }

    #[test]
    fn json_uses_snake_case_codes() {
        let mut report = ConversionReport::new();
        report.add(ConversionIssue::warning(
            ConversionIssueCode::DuplicateLabelCode,
            None,
            "dup",
        ));
        let json = serde_json::to_value(&report).expect("serialize report");
        assert_eq!(json["issues"][0]["code"], "duplicate_label_code");
        assert_eq!(json["issues"][0]["severity"], "warning");
        assert!(json["issues"][0].get("image_id").is_none());
    }
}
