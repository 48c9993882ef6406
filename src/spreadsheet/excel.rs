//! Workbook package helpers: relationships and part paths.
use crate::error::SheetError;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use log::warn;
use quick_xml::events::Event;
use std::borrow::Cow;
use std::collections::HashMap;
use std::io::Cursor;
use zip::ZipArchive;

/// In-memory xlsx container.
pub(crate) type Container = ZipArchive<Cursor<Vec<u8>>>;

/// XML tag name for relationship elements
const TAG_RELATIONSHIP: &[u8] = b"Relationship";

/// Loads worksheet relationships of a package part.
///
/// # Returns
/// Mapping of relationship IDs to worksheet paths inside the container
pub(crate) fn load_relationships(zip: &mut Container, path: &str) -> Result<HashMap<String, String>, SheetError> {
    let mut reader = zip.xml_reader(path)?
        .ok_or_else(|| SheetError::MissingPart(path.to_owned()))?;
    let mut relationships: HashMap<String, String> = HashMap::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_RELATIONSHIP => {
            let id = event.get_attribute_value("Id")?;
            let kind = event.get_attribute_value("Type")?;
            let target = event.get_attribute_value("Target")?;
            if kind.map(|it| it.ends_with("/worksheet")).unwrap_or(true) {
                match id.zip(target) {
                    Some((id, target)) => {
                        relationships.insert(id.to_string(), to_zip_path(target));
                    }
                    None => warn!("Skip incomplete relationship in '{}'", path),
                }
            }
        }
    });
    Ok(relationships)
}

/// Normalizes a relationship target into a path inside the container.
pub(crate) fn to_zip_path(path: Cow<'_, str>) -> String {
    if let Some(stripped) = path.strip_prefix('/') {
        stripped.to_owned()
    } else if path.starts_with("xl/") {
        path.into_owned()
    } else {
        format!("xl/{path}")
    }
}
