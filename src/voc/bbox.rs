//! Bounding boxes in normalized and pixel space.

use crate::error::OidVocError;
use crate::openimages::AnnotationRow;

/// A box whose coordinates are fractions of the image width and height.
///
/// Like the input table, this type does not enforce `min <= max`; malformed
/// boxes pass through unchanged so the output mirrors the source data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalizedBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

/// A box in absolute pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PixelBox {
    pub xmin: i64,
    pub ymin: i64,
    pub xmax: i64,
    pub ymax: i64,
}

impl NormalizedBox {
    #[inline]
    pub fn from_xyxy(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Parses the four coordinate columns of an annotation row.
    ///
    /// The text is parsed as a real number before any scaling happens.
    /// `NaN`, infinities and values that overflow `f64` are rejected.
    pub fn from_row(row: &AnnotationRow) -> Result<Self, OidVocError> {
        let parse = |field: &'static str, raw: &str| {
            raw.trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| OidVocError::CoordinateParse {
                    image_id: row.image_id.clone(),
                    field,
                    value: raw.to_string(),
                })
        };

        Ok(Self {
            xmin: parse("XMin", &row.xmin)?,
            ymin: parse("YMin", &row.ymin)?,
            xmax: parse("XMax", &row.xmax)?,
            ymax: parse("YMax", &row.ymax)?,
        })
    }

    /// Scales to pixel space, rounding each coordinate to the nearest integer.
    ///
    /// Ties round away from zero.
    pub fn to_pixel(&self, image_width: u32, image_height: u32) -> PixelBox {
        let w = f64::from(image_width);
        let h = f64::from(image_height);
        PixelBox {
            xmin: (self.xmin * w).round() as i64,
            ymin: (self.ymin * h).round() as i64,
            xmax: (self.xmax * w).round() as i64,
            ymax: (self.ymax * h).round() as i64,
        }
    }
}

impl PixelBox {
    #[inline]
    pub fn from_xyxy(xmin: i64, ymin: i64, xmax: i64, ymax: i64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Returns true if min <= max on both axes.
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.xmin <= self.xmax && self.ymin <= self.ymax
    }
}
