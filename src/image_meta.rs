//! Image dimension lookup.
//!
//! Only the image header is read, so large JPEGs cost a few bytes of I/O each.

use std::path::PathBuf;

use crate::error::OidVocError;

/// Default extension of Open Images image files.
pub const DEFAULT_IMAGE_EXTENSION: &str = "jpg";

/// A directory holding one image file per image identifier.
#[derive(Clone, Debug)]
pub struct ImageDirectory {
    dir: PathBuf,
    extension: String,
}

impl ImageDirectory {
    /// `extension` may be given with or without a leading dot.
    pub fn new(dir: impl Into<PathBuf>, extension: impl AsRef<str>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.as_ref().trim_start_matches('.').to_string(),
        }
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// File name for an image identifier, e.g. `img1.jpg`.
    pub fn file_name(&self, image_id: &str) -> String {
        format!("{image_id}.{}", self.extension)
    }

    pub fn image_path(&self, image_id: &str) -> PathBuf {
        self.dir.join(self.file_name(image_id))
    }

    /// Returns `(width, height)` in pixels for the image of `image_id`.
    ///
    /// # Errors
    /// [`OidVocError::ImageNotFound`] if the file does not exist,
    /// [`OidVocError::ImageDimensionRead`] if its header cannot be decoded.
    pub fn dimensions(&self, image_id: &str) -> Result<(u32, u32), OidVocError> {
        let path = self.image_path(image_id);
        if !path.is_file() {
            return Err(OidVocError::ImageNotFound {
                image_id: image_id.to_string(),
                path,
            });
        }

        let size = imagesize::size(&path).map_err(|source| OidVocError::ImageDimensionRead {
            image_id: image_id.to_string(),
            path: path.clone(),
            source,
        })?;

        let width: u32 = size
            .width
            .try_into()
            .map_err(|_| OidVocError::ImageSizeInvalid {
                image_id: image_id.to_string(),
                path: path.clone(),
                message: format!("image width {} does not fit in u32", size.width),
            })?;

        let height: u32 = size
            .height
            .try_into()
            .map_err(|_| OidVocError::ImageSizeInvalid {
                image_id: image_id.to_string(),
                path: path.clone(),
                message: format!("image height {} does not fit in u32", size.height),
            })?;

        Ok((width, height))
    }
}
