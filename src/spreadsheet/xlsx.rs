//! # Read Engine
//!
//! Extracts a bounded table region of an xlsx sheet into a [`Dataset`] and
//! reconciles it against table schemas.
use crate::dataset::Dataset;
use crate::dataset::TypedDataset;
use crate::error::ResultMessage;
use crate::error::SheetError;
use crate::helpers::xml::XmlAttributeHelper;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlReader;
use crate::helpers::xml::XmlTextContextHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::options::EngineOptions;
use crate::schema::TableDescriptor;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::delimiter::DelimiterPolicy;
use crate::spreadsheet::excel::load_relationships;
use crate::spreadsheet::excel::Container;
use crate::validator;
use log::debug;
use log::trace;
use log::warn;
use quick_xml::events::Event;
use quick_xml::name::QName;
use std::borrow::Cow;
use std::io::BufRead;
use std::io::Cursor;
use zip::ZipArchive;

// XML tag names of SpreadsheetML parts
const TAG_SHARED_STRING_ITEM: QName = QName(b"si");   // Shared string table item
const TAG_PHONETIC_TEXT: QName = QName(b"rPh");       // Phonetic text for Asian languages
const TAG_TEXT: QName = QName(b"t");                  // Text content within strings
const TAG_WORKBOOK_PROPERTIES: QName = QName(b"workbookPr"); // Workbook properties
const TAG_SHEET: QName = QName(b"sheet");             // Worksheet definition
const TAG_ROW: QName = QName(b"row");                 // Row in worksheet
const TAG_CELL: QName = QName(b"c");                  // Cell in worksheet
const TAG_INLINE_STRING: QName = QName(b"is");        // Inline string value
const TAG_VALUE: QName = QName(b"v");                 // Cell value content

/// Reads table regions from an xlsx payload.
///
/// The engine holds at most one dataset; a second read is rejected until
/// [`ReadEngine::reset`] or [`ReadEngine::take_dataset`] is called.
pub struct ReadEngine {
    options: EngineOptions,
    zip: Container,
    /// Worksheets as (name, zip_path) pairs, in workbook order
    sheets: Vec<(String, String)>,
    shared_strings: Vec<String>,
    is_1904: bool,
    dataset: Option<Dataset>,
}

impl ReadEngine {
    /// Opens an xlsx payload with default options.
    pub fn open(payload: Vec<u8>) -> Result<Self, SheetError> {
        Self::open_with_options(payload, EngineOptions::default())
    }

    /// Opens an xlsx payload and loads its workbook structure.
    pub fn open_with_options(payload: Vec<u8>, options: EngineOptions) -> Result<Self, SheetError> {
        if payload.is_empty() {
            Err(SheetError::EmptyContainer)?
        }
        let mut zip = ZipArchive::new(Cursor::new(payload))?;
        let (sheets, is_1904) = load_workbook(&mut zip).with_prefix("Load workbook failed")?;
        let shared_strings = load_shared_strings(&mut zip).with_prefix("Load shared strings failed")?;
        debug!(
            "Open workbook with {} sheets and {} shared strings (date1904: {})",
            sheets.len(),
            shared_strings.len(),
            is_1904
        );
        Ok(Self {
            options,
            zip,
            sheets,
            shared_strings,
            is_1904,
            dataset: None,
        })
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Names of the workbook sheets, in workbook order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Returns true if the workbook uses the 1904 date system.
    pub fn is_date1904(&self) -> bool {
        self.is_1904
    }

    /// Reads a table region of a sheet into the engine's dataset.
    pub fn read_table(&mut self, sheet_name: &str, policy: &DelimiterPolicy) -> Result<&Dataset, SheetError> {
        if self.dataset.is_some() {
            Err(SheetError::DataAlreadyLoaded)?
        }
        let path = self
            .sheets
            .iter()
            .find(|(name, _)| name == sheet_name)
            .map(|(_, path)| path.to_owned())
            .ok_or_else(|| SheetError::SheetNotFound(sheet_name.to_owned()))?;
        let dataset = self
            .read_region(&path, policy)
            .with_prefix(&format!("Read sheet '{}' failed", sheet_name))?;
        debug!(
            "Read sheet '{}': {} columns, {} rows",
            sheet_name,
            dataset.columns().len(),
            dataset.rows().len()
        );
        Ok(self.dataset.insert(dataset))
    }

    /// Walks the rows of a worksheet and collects the region bounded by the policy.
    fn read_region(&mut self, path: &str, policy: &DelimiterPolicy) -> Result<Dataset, SheetError> {
        let mut reader = self.zip.xml_reader(path)?
            .ok_or_else(|| SheetError::MissingPart(path.to_owned()))?;
        let mut dataset = None::<Dataset>;
        let mut row_index = 0usize;
        let mut accepted = 0usize;
        let mut cells = Vec::<Cell>::new();
        let mut kind = CellType::default();
        let mut value = String::new();
        match_xml_events!(reader => {
            Event::Start(event) if event.name() == TAG_ROW => cells.clear(),
            Event::Start(event) if event.name() == TAG_CELL => {
                kind = CellType::parse(event.get_attribute_value("t")?.as_deref());
                value.clear();
            }
            Event::Start(event) if event.name() == TAG_INLINE_STRING => {
                value = read_string_value(&mut reader, TAG_INLINE_STRING, false)?;
            }
            Event::Start(event) if event.name() == TAG_VALUE => {
                value = read_string_value(&mut reader, TAG_VALUE, true)?;
            }
            Event::End(event) if event.name() == TAG_CELL => {
                cells.push(Cell {
                    kind,
                    value: std::mem::take(&mut value),
                });
            }
            Event::End(event) if event.name() == TAG_ROW => {
                let position = row_index;
                row_index += 1;
                if position < policy.start_row_index {
                    continue;
                }
                match dataset.as_mut() {
                    None => {
                        let columns = cells
                            .iter()
                            .take(policy.max_column_number)
                            .map(|cell| {
                                cell.resolve(&self.shared_strings, self.is_1904)
                                    .map(|value| value.map(|value| value.to_string()).unwrap_or_default())
                            })
                            .collect::<Result<Vec<_>, SheetError>>()?;
                        trace!("Header at row {}: {:?}", position, columns);
                        dataset = Some(Dataset::new(columns, self.is_1904));
                    }
                    Some(dataset) => {
                        let first_cell_blank = cells.first().map(Cell::is_blank).unwrap_or(true);
                        if !policy.accepts(accepted, first_cell_blank) {
                            debug!("Stop at row {} after {} rows ({:?})", position, accepted, policy.termination);
                            break;
                        }
                        let row = cells
                            .iter()
                            .take(dataset.columns().len())
                            .map(|cell| cell.resolve(&self.shared_strings, self.is_1904))
                            .collect::<Result<Vec<_>, SheetError>>()?;
                        trace!("Accept row {}", position);
                        dataset.push_row(row);
                        accepted += 1;
                    }
                }
            }
        });
        Ok(dataset.unwrap_or_default())
    }

    /// Dataset of the last read, if any.
    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    /// Moves the dataset out of the engine, allowing another read.
    pub fn take_dataset(&mut self) -> Option<Dataset> {
        self.dataset.take()
    }

    /// Drops the dataset, allowing another read.
    pub fn reset(&mut self) {
        self.dataset = None;
    }

    /// Validates the read dataset against a table schema.
    pub fn validate(&self, table: &TableDescriptor) -> Result<Vec<String>, SheetError> {
        let dataset = self.dataset.as_ref().ok_or(SheetError::NoDataLoaded)?;
        Ok(validator::validate(table, dataset, &self.options))
    }

    /// Projects the read dataset onto the native types of a table schema.
    pub fn typed_table(&self, table: &TableDescriptor) -> Result<TypedDataset, SheetError> {
        let dataset = self.dataset.as_ref().ok_or(SheetError::NoDataLoaded)?;
        validator::typed_projection(table, dataset, &self.options)
    }
}

/// Loads worksheet names and paths from `xl/workbook.xml`, and the date system.
fn load_workbook(zip: &mut Container) -> Result<(Vec<(String, String)>, bool), SheetError> {
    let relationships = load_relationships(zip, "xl/_rels/workbook.xml.rels")?;
    let mut reader = zip.xml_reader("xl/workbook.xml")?
        .ok_or_else(|| SheetError::MissingPart("xl/workbook.xml".to_owned()))?;
    let mut sheets: Vec<(String, String)> = Vec::new();
    let mut is_1904 = false;
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_SHEET => {
            let mut name = None::<Cow<str>>;
            let mut id = None::<Cow<str>>;
            for result in event.attributes() {
                let attribute = result?;
                let key = attribute.key.local_name();
                if key.as_ref() == b"name" {
                    name = Some(attribute.get_value()?);
                } else if key.as_ref() == b"id" {
                    id = Some(attribute.get_value()?);
                }
            }
            if let Some((name, id)) = name.zip(id) {
                match relationships.get(&*id) {
                    Some(path) => sheets.push((name.to_string(), path.to_owned())),
                    None => warn!("Skip sheet '{}': relationship '{}' not found", name, id),
                }
            }
        }
        Event::Start(event) if event.name() == TAG_WORKBOOK_PROPERTIES => {
            is_1904 = event.get_attribute_value("date1904")?
                .map(|value| value.eq("1") || value.eq("true"))
                .unwrap_or(false);
        }
    });
    Ok((sheets, is_1904))
}

/// Loads the whole shared string table. A missing part is an empty table.
fn load_shared_strings(zip: &mut Container) -> Result<Vec<String>, SheetError> {
    let mut shared_strings = Vec::<String>::new();
    let mut reader = match zip.xml_reader("xl/sharedStrings.xml")? {
        Some(reader) => reader,
        None => {
            warn!("No shared string table found");
            return Ok(shared_strings);
        }
    };
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_SHARED_STRING_ITEM => {
            let string = read_string_value(&mut reader, TAG_SHARED_STRING_ITEM, false)?;
            shared_strings.push(string);
        }
    });
    Ok(shared_strings)
}

/// Reads string content up to `end_tag`, skipping phonetic runs.
///
/// `is_text_content` tells whether text is read directly (`<v>`) or only inside
/// `<t>` elements (`<si>`, `<is>`).
fn read_string_value<R: BufRead>(
    reader: &mut XmlReader<R>,
    end_tag: QName,
    is_text_content: bool,
) -> Result<String, SheetError> {
    let mut is_phonetic_text = false;
    let mut is_text = is_text_content;
    let mut text = String::new();
    match_xml_events!(reader => {
        Event::End(event) if event.name() == end_tag => break,
        Event::Start(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = true,
        Event::End(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = false,
        Event::Start(event) if !is_phonetic_text && event.name() == TAG_TEXT => is_text = true,
        Event::End(event) if is_text && event.name() == TAG_TEXT => is_text = false,
        Event::Text(event) if is_text => text.push_str(&event.xml_content()?),
        Event::CData(event) if is_text => text.push_str(&event.xml_content()?),
        Event::GeneralRef(event) if is_text => text.push_bytes_ref(&event)?,
    });
    Ok(text)
}
