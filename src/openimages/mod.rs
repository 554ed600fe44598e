//! Open Images input tables.
//!
//! Two inputs come from the dataset itself: the box annotation tables (one row
//! per object) and the class-description table that names each label code.

pub mod labels;
pub mod rows;

pub use labels::{read_class_descriptions, LabelTable};
pub use rows::{group_rows, read_annotation_csvs, AnnotationRow, ImageGroup, RowGroups};
