//! Pascal VOC XML writer and reader.
//!
//! The writer emits one `<identifier>.xml` file per document. The reader parses
//! the same layout back into a [`VocDocument`], which is how generated output is
//! checked for fidelity.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::Node;

use super::{PixelBox, VocDocument, VocObject, DEFAULT_DEPTH, UNSPECIFIED_POSE};
use crate::error::OidVocError;

const VOC_XML_EXTENSION: &str = "xml";

/// Path of the XML file for `image_id` inside `dir`.
pub fn voc_xml_path(dir: &Path, image_id: &str) -> PathBuf {
    dir.join(format!("{image_id}.{VOC_XML_EXTENSION}"))
}

/// Writes `document` to `<dir>/<image_id>.xml`.
///
/// `dir` must already exist. An existing file for the same identifier is
/// overwritten.
pub fn write_voc_xml(
    dir: &Path,
    image_id: &str,
    document: &VocDocument,
) -> Result<PathBuf, OidVocError> {
    let xml_path = voc_xml_path(dir, image_id);
    fs::write(&xml_path, to_voc_xml_string(document)).map_err(OidVocError::Io)?;
    Ok(xml_path)
}

/// Serializes a document to VOC XML text.
pub fn to_voc_xml_string(document: &VocDocument) -> String {
    let mut xml = String::new();

    writeln!(xml, "<?xml version=\"1.0\" encoding=\"utf-8\"?>").expect("write to string");
    writeln!(xml, "<annotation>").expect("write to string");
    writeln!(xml, "  <folder>{}</folder>", xml_escape(&document.folder)).expect("write to string");
    writeln!(
        xml,
        "  <filename>{}</filename>",
        xml_escape(&document.filename)
    )
    .expect("write to string");
    writeln!(xml, "  <source>").expect("write to string");
    writeln!(
        xml,
        "    <database>{}</database>",
        xml_escape(&document.database)
    )
    .expect("write to string");
    writeln!(
        xml,
        "    <image>{}</image>",
        xml_escape(&document.image_source)
    )
    .expect("write to string");
    writeln!(xml, "  </source>").expect("write to string");
    writeln!(xml, "  <size>").expect("write to string");
    writeln!(xml, "    <width>{}</width>", document.width).expect("write to string");
    writeln!(xml, "    <height>{}</height>", document.height).expect("write to string");
    writeln!(xml, "    <depth>{}</depth>", document.depth).expect("write to string");
    writeln!(xml, "  </size>").expect("write to string");
    writeln!(xml, "  <segmented>{}</segmented>", document.segmented).expect("write to string");

    for object in &document.objects {
        writeln!(xml, "  <object>").expect("write to string");
        writeln!(xml, "    <name>{}</name>", xml_escape(&object.name)).expect("write to string");
        writeln!(xml, "    <pose>{}</pose>", xml_escape(&object.pose)).expect("write to string");
        writeln!(
            xml,
            "    <truncated>{}</truncated>",
            xml_escape(&object.truncated)
        )
        .expect("write to string");
        writeln!(xml, "    <difficult>{}</difficult>", object.difficult)
            .expect("write to string");
        writeln!(xml, "    <bndbox>").expect("write to string");
        writeln!(xml, "      <xmin>{}</xmin>", object.bndbox.xmin).expect("write to string");
        writeln!(xml, "      <ymin>{}</ymin>", object.bndbox.ymin).expect("write to string");
        writeln!(xml, "      <xmax>{}</xmax>", object.bndbox.xmax).expect("write to string");
        writeln!(xml, "      <ymax>{}</ymax>", object.bndbox.ymax).expect("write to string");
        writeln!(xml, "    </bndbox>").expect("write to string");
        writeln!(xml, "  </object>").expect("write to string");
    }

    writeln!(xml, "</annotation>").expect("write to string");
    xml
}

/// Reads a VOC XML file from disk.
pub fn read_voc_xml(path: &Path) -> Result<VocDocument, OidVocError> {
    let xml = fs::read_to_string(path).map_err(OidVocError::Io)?;
    parse_voc_xml_str(&xml, path)
}

/// Parses VOC XML from a UTF-8 string.
pub fn from_voc_xml_str(xml: &str) -> Result<VocDocument, OidVocError> {
    parse_voc_xml_str(xml, Path::new("<memory>"))
}

/// Parses VOC XML from bytes.
///
/// The input must be valid UTF-8.
pub fn from_voc_xml_slice(bytes: &[u8]) -> Result<VocDocument, OidVocError> {
    let xml = std::str::from_utf8(bytes).map_err(|source| OidVocError::VocXmlParse {
        path: PathBuf::from("<memory>"),
        message: format!("input is not valid UTF-8: {source}"),
    })?;
    from_voc_xml_str(xml)
}

fn parse_voc_xml_str(xml: &str, path: &Path) -> Result<VocDocument, OidVocError> {
    let document = roxmltree::Document::parse(xml).map_err(|source| OidVocError::VocXmlParse {
        path: path.to_path_buf(),
        message: source.to_string(),
    })?;

    let annotation = document.root_element();
    if annotation.tag_name().name() != "annotation" {
        return Err(OidVocError::VocXmlParse {
            path: path.to_path_buf(),
            message: "missing <annotation> root element".to_string(),
        });
    }

    let filename = required_child_text(annotation, "filename", path, "<annotation>")?;
    let folder = optional_child_text(annotation, "folder").unwrap_or_default();

    let (database, image_source) = match child_element(annotation, "source") {
        Some(source) => (
            optional_child_text(source, "database").unwrap_or_default(),
            optional_child_text(source, "image").unwrap_or_default(),
        ),
        None => (String::new(), String::new()),
    };

    let size = required_child_element(annotation, "size", path, "<annotation>")?;
    let width = parse_required::<u32>(size, "width", path, "<size>")?;
    let height = parse_required::<u32>(size, "height", path, "<size>")?;
    let depth = parse_optional::<u32>(size, "depth", path, "<size>")?.unwrap_or(DEFAULT_DEPTH);
    let segmented = parse_optional::<u8>(annotation, "segmented", path, "<annotation>")?
        .unwrap_or(0);

    let mut objects = Vec::new();
    for object in annotation
        .children()
        .filter(|node| node.is_element() && node.tag_name().name() == "object")
    {
        let name = required_child_text(object, "name", path, "<object>")?;
        let pose =
            optional_child_text(object, "pose").unwrap_or_else(|| UNSPECIFIED_POSE.to_string());
        let truncated = optional_child_text(object, "truncated").unwrap_or_default();
        let difficult = parse_optional::<u8>(object, "difficult", path, "<object>")?.unwrap_or(0);

        let bndbox = required_child_element(object, "bndbox", path, "<object>")?;
        let bndbox = PixelBox::from_xyxy(
            parse_required_pixel(bndbox, "xmin", path)?,
            parse_required_pixel(bndbox, "ymin", path)?,
            parse_required_pixel(bndbox, "xmax", path)?,
            parse_required_pixel(bndbox, "ymax", path)?,
        );

        objects.push(VocObject {
            name,
            pose,
            truncated,
            difficult,
            bndbox,
        });
    }

    Ok(VocDocument {
        folder,
        filename,
        database,
        image_source,
        width,
        height,
        depth,
        segmented,
        objects,
    })
}

fn required_child_element<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &str,
    path: &Path,
    context: &str,
) -> Result<Node<'a, 'input>, OidVocError> {
    child_element(node, tag).ok_or_else(|| OidVocError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("missing <{tag}> in {context}"),
    })
}

fn required_child_text(
    node: Node<'_, '_>,
    tag: &str,
    path: &Path,
    context: &str,
) -> Result<String, OidVocError> {
    optional_child_text(node, tag).ok_or_else(|| OidVocError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("missing <{tag}> in {context}"),
    })
}

fn parse_required<T: std::str::FromStr>(
    node: Node<'_, '_>,
    tag: &str,
    path: &Path,
    context: &str,
) -> Result<T, OidVocError> {
    let raw = required_child_text(node, tag, path, context)?;
    parse_value(&raw, tag, path, context)
}

fn parse_optional<T: std::str::FromStr>(
    node: Node<'_, '_>,
    tag: &str,
    path: &Path,
    context: &str,
) -> Result<Option<T>, OidVocError> {
    optional_child_text(node, tag)
        .map(|raw| parse_value(&raw, tag, path, context))
        .transpose()
}

fn parse_value<T: std::str::FromStr>(
    raw: &str,
    tag: &str,
    path: &Path,
    context: &str,
) -> Result<T, OidVocError> {
    raw.parse::<T>().map_err(|_| OidVocError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("invalid <{tag}> value '{raw}' in {context}"),
    })
}

/// Box coordinates are integers in our output, but other VOC producers write
/// fractional pixels; those are rounded.
fn parse_required_pixel(node: Node<'_, '_>, tag: &str, path: &Path) -> Result<i64, OidVocError> {
    let raw = required_child_text(node, tag, path, "<bndbox>")?;
    if let Ok(value) = raw.parse::<i64>() {
        return Ok(value);
    }
    parse_value::<f64>(&raw, tag, path, "<bndbox>").map(|value| value.round() as i64)
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == tag)
}

fn optional_child_text(node: Node<'_, '_>, tag: &str) -> Option<String> {
    child_element(node, tag)
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToOwned::to_owned)
}

fn xml_escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
