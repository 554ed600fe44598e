//! Pascal VOC annotation documents.
//!
//! A VOC document describes one image: where it came from, how large it is,
//! and every labeled object in it with a pixel-space bounding box.
//!
//! - [`build`]: assembles a [`VocDocument`] from one image's annotation rows
//! - [`xml`]: writes documents to disk and parses them back

mod bbox;
pub mod build;
pub mod xml;

pub use bbox::{NormalizedBox, PixelBox};
pub use build::{build_document, BuildOptions};

/// Default `<folder>` tag.
pub const DEFAULT_FOLDER: &str = "open_images_volume";

/// Default `<source><database>` tag.
pub const DEFAULT_DATABASE: &str = "Open Image Dataset v6";

/// `<pose>` written for every object; Open Images has no pose information.
pub const UNSPECIFIED_POSE: &str = "Unspecified";

/// Images are assumed to be three-channel.
pub const DEFAULT_DEPTH: u32 = 3;

/// One Pascal VOC annotation document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VocDocument {
    pub folder: String,
    pub filename: String,
    pub database: String,
    /// Provenance of the image's annotations (`<source><image>`).
    pub image_source: String,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub segmented: u8,
    pub objects: Vec<VocObject>,
}

/// One labeled object inside a [`VocDocument`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VocObject {
    pub name: String,
    pub pose: String,
    /// Copied verbatim from the annotation row.
    pub truncated: String,
    pub difficult: u8,
    pub bndbox: PixelBox,
}
