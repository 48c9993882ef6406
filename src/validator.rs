//! # Validator
//!
//! Reconciles a read [`Dataset`] against a [`TableDescriptor`]: structural
//! checks first, then per-cell parse checks. Validation failures are collected
//! as messages, never raised. [`typed_projection`] turns a validated dataset
//! into a [`TypedDataset`].
use crate::dataset::CellValue;
use crate::dataset::Dataset;
use crate::dataset::TypedColumn;
use crate::dataset::TypedDataset;
use crate::dataset::TypedValue;
use crate::error::SheetError;
use crate::options::EngineOptions;
use crate::schema::ColumnType;
use crate::schema::TableDescriptor;
use crate::spreadsheet::cell::from_serial;
use crate::spreadsheet::cell::to_serial;
use crate::spreadsheet::converter::parse_boolean;
use anyhow::anyhow;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use log::debug;

/// Textual date layouts accepted besides the configured date pattern.
const ISO_DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d"];

impl ColumnType {
    /// Checks raw cell content against this column type.
    ///
    /// Returns the failure message fragment, if any.
    pub(crate) fn check(&self, name: &str, value: &CellValue, date1904: bool, options: &EngineOptions) -> Option<String> {
        let text = match value {
            CellValue::Date(_) => return None,
            CellValue::Text(text) if text.trim().is_empty() => return None,
            CellValue::Text(text) => text.trim(),
        };
        match self {
            ColumnType::String | ColumnType::Formula => None,
            ColumnType::Date => {
                if text.parse::<f64>().is_err() {
                    Some(format!("Cell {}: invalid OA date;", name))
                } else if parse_date(text, date1904, options).is_none() {
                    Some(format!("Cell {}: invalid date;", name))
                } else {
                    None
                }
            }
            ColumnType::Number => match options.culture.parse_number(text) {
                Some(_) => None,
                None => Some(format!("Cell {}: invalid number;", name)),
            },
            ColumnType::Boolean => match parse_boolean(text) {
                Some(_) => None,
                None => Some(format!("Cell {}: invalid boolean;", name)),
            },
        }
    }

    /// Maps raw cell content to the native value of this column type.
    pub(crate) fn project(&self, value: &CellValue, date1904: bool, options: &EngineOptions) -> anyhow::Result<Option<TypedValue>> {
        let text = match (self, value) {
            (ColumnType::Date, CellValue::Date(datetime)) => return Ok(Some(TypedValue::Date(*datetime))),
            (ColumnType::Number, CellValue::Date(datetime)) => {
                return Ok(Some(TypedValue::Number(to_serial(datetime, date1904))));
            }
            (_, CellValue::Date(datetime)) => return Ok(Some(TypedValue::Text(datetime.to_string()))),
            (_, CellValue::Text(text)) if text.trim().is_empty() => return Ok(None),
            (_, CellValue::Text(text)) => text,
        };
        let typed = match self {
            ColumnType::String => TypedValue::Text(text.to_owned()),
            ColumnType::Formula => TypedValue::Formula(text.to_owned()),
            ColumnType::Number => TypedValue::Number(
                options.culture.parse_number(text).ok_or_else(|| anyhow!("'{}' is not a number", text))?,
            ),
            ColumnType::Boolean => TypedValue::Boolean(
                parse_boolean(text).ok_or_else(|| anyhow!("'{}' is not a boolean", text))?,
            ),
            ColumnType::Date => TypedValue::Date(
                parse_date(text.trim(), date1904, options).ok_or_else(|| anyhow!("'{}' is not a date", text))?,
            ),
        };
        Ok(Some(typed))
    }
}

/// Parses a date given as serial number or as text in the configured or ISO layout.
fn parse_date(text: &str, date1904: bool, options: &EngineOptions) -> Option<NaiveDateTime> {
    if let Ok(serial) = text.parse::<f64>() {
        return from_serial(serial, date1904);
    }
    std::iter::once(options.date_format.as_str())
        .chain(ISO_DATETIME_FORMATS)
        .find_map(|format| {
            NaiveDateTime::parse_from_str(text, format)
                .ok()
                .or_else(|| NaiveDate::parse_from_str(text, format).ok().and_then(|date| date.and_hms_opt(0, 0, 0)))
        })
}

/// Compares the dataset header against the schema.
///
/// Names are compared trimmed and case-sensitive, at every position present in
/// both the schema and the dataset.
pub fn validate_schema(table: &TableDescriptor, dataset: &Dataset) -> Vec<String> {
    let mut errors = Vec::new();
    if dataset.columns().len() != table.columns().len() {
        errors.push(format!(
            "Wrong column number: expected <{}> but found <{}>",
            table.columns().len(),
            dataset.columns().len()
        ));
    }
    for (index, (column, name)) in table.columns().iter().zip(dataset.columns()).enumerate() {
        if column.header_text.trim() != name.trim() {
            errors.push(format!(
                "Column {}: wrong column name; expected <{}> but found <{}>",
                index, column.header_text, name
            ));
        }
    }
    errors
}

/// Checks every cell against the declared column types.
///
/// Cells are located by header text; blank or absent cells are accepted.
/// Failures of one row are concatenated into a single message.
pub fn validate_rows(table: &TableDescriptor, dataset: &Dataset, options: &EngineOptions) -> Vec<String> {
    let positions = table
        .columns()
        .iter()
        .map(|column| dataset.column_index(&column.header_text))
        .collect::<Vec<_>>();

    let mut errors = Vec::new();
    for (index, row) in dataset.rows().iter().enumerate() {
        let message = table
            .columns()
            .iter()
            .zip(&positions)
            .filter_map(|(column, position)| {
                let value = row.get((*position)?)?.as_ref()?;
                column.kind.check(&column.name, value, dataset.is_date1904(), options)
            })
            .collect::<String>();
        if !message.is_empty() {
            errors.push(format!("Row {} is invalid! {}", index, message));
        }
    }
    errors
}

/// Validates the schema, then the rows when the schema matches.
pub fn validate(table: &TableDescriptor, dataset: &Dataset, options: &EngineOptions) -> Vec<String> {
    let errors = validate_schema(table, dataset);
    if !errors.is_empty() {
        debug!("Table '{}' has {} schema errors, rows are not checked", table.name(), errors.len());
        return errors;
    }
    validate_rows(table, dataset, options)
}

/// Projects a dataset onto the native types of a table schema.
///
/// Columns are matched by position. Positions missing from the dataset are left
/// unset.
pub fn typed_projection(table: &TableDescriptor, dataset: &Dataset, options: &EngineOptions) -> Result<TypedDataset, SheetError> {
    let columns = table
        .columns()
        .iter()
        .map(|column| TypedColumn {
            name: column.name.to_owned(),
            kind: column.kind,
        })
        .collect::<Vec<_>>();

    let mut rows = Vec::with_capacity(dataset.rows().len());
    for (index, row) in dataset.rows().iter().enumerate() {
        let mut typed_row = Vec::with_capacity(columns.len());
        for (col, column) in table.columns().iter().enumerate() {
            let typed = match row.get(col).and_then(Option::as_ref) {
                Some(value) => column
                    .kind
                    .project(value, dataset.is_date1904(), options)
                    .map_err(|source| SheetError::CellConversion {
                        kind: column.kind,
                        row: index,
                        value: value.to_string(),
                        source,
                    })?,
                None => None,
            };
            typed_row.push(typed);
        }
        rows.push(typed_row);
    }
    Ok(TypedDataset { columns, rows })
}
