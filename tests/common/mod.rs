#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub const ANNOTATION_HEADER: &str = "ImageID,Source,LabelName,Confidence,XMin,XMax,YMin,YMax,IsOccluded,IsTruncated,IsGroupOf,IsDepiction,IsInside";

/// A minimal 24-bit BMP. `imagesize` sniffs the format from the header, so the
/// bytes can be saved under a `.jpg` name.
pub fn bmp_bytes(width: u32, height: u32) -> Vec<u8> {
    let row_stride = (width * 3).div_ceil(4) * 4;
    let pixel_array_size = row_stride * height;
    let file_size = 54 + pixel_array_size;

    let mut bytes = Vec::with_capacity(file_size as usize);
    bytes.extend_from_slice(b"BM");
    bytes.extend_from_slice(&file_size.to_le_bytes());
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes.extend_from_slice(&54u32.to_le_bytes());

    bytes.extend_from_slice(&40u32.to_le_bytes());
    bytes.extend_from_slice(&(width as i32).to_le_bytes());
    bytes.extend_from_slice(&(height as i32).to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&24u16.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&pixel_array_size.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());

    bytes.resize(file_size as usize, 0);
    bytes
}

pub fn write_image(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, bmp_bytes(width, height)).expect("write image file");
}

/// An on-disk Open Images layout inside a temp dir:
/// `desc.csv`, `images/`, annotation tables and an `out/` target.
pub struct Fixture {
    pub temp: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let temp = tempfile::tempdir().expect("create temp dir");
        fs::create_dir_all(temp.path().join("images")).expect("create images dir");
        Self { temp }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn desc_path(&self) -> PathBuf {
        self.root().join("desc.csv")
    }

    pub fn image_dir(&self) -> PathBuf {
        self.root().join("images")
    }

    pub fn out_dir(&self) -> PathBuf {
        self.root().join("out")
    }

    pub fn with_classes(self, classes: &[(&str, &str)]) -> Self {
        let body: String = classes
            .iter()
            .map(|(code, name)| format!("{code},{name}\n"))
            .collect();
        fs::write(self.desc_path(), body).expect("write class descriptions");
        self
    }

    pub fn with_image(self, image_id: &str, width: u32, height: u32) -> Self {
        write_image(
            &self.image_dir().join(format!("{image_id}.jpg")),
            width,
            height,
        );
        self
    }

    /// Writes an annotation table named `name` and returns its path.
    pub fn annotations(&self, name: &str, rows: &[&str]) -> PathBuf {
        let path = self.root().join(name);
        let mut body = format!("{ANNOTATION_HEADER}\n");
        for row in rows {
            body.push_str(row);
            body.push('\n');
        }
        fs::write(&path, body).expect("write annotations");
        path
    }
}

/// One annotation row with the given identity and box, and every flag `0`
/// except `IsTruncated`.
pub fn row(
    image_id: &str,
    label: &str,
    (xmin, xmax, ymin, ymax): (f64, f64, f64, f64),
    truncated: u8,
) -> String {
    format!("{image_id},xclick,{label},1,{xmin},{xmax},{ymin},{ymax},0,{truncated},0,0,0")
}
