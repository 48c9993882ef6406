//! # Cell Converter
//!
//! Maps caller values to storable cell literals, one registered conversion per
//! column type.
use crate::error::SheetError;
use crate::options::EngineOptions;
use crate::schema::ColumnType;
use crate::schema::Value;
use crate::spreadsheet::cell::from_serial;
use anyhow::anyhow;
use anyhow::bail;
use std::collections::HashMap;

/// How a converted literal is stored in the worksheet.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CellStorage {
    /// Generic text (`t="str"`)
    Text,
    /// Number (`t="n"`)
    Number,
    /// Date (`t="d"`)
    Date,
    /// Formula body (`<f>`), no cached value
    Formula,
}

impl CellStorage {
    /// Value of the `t` attribute written for this storage.
    pub(crate) const fn type_attribute(&self) -> Option<&'static str> {
        match self {
            CellStorage::Text => Some("str"),
            CellStorage::Number => Some("n"),
            CellStorage::Date => Some("d"),
            CellStorage::Formula => None,
        }
    }
}

/// Converted cell content ready to be written.
#[derive(Clone, Debug, PartialEq)]
pub struct CellLiteral {
    pub text: String,
    pub storage: CellStorage,
}

/// Conversion function registered for a column type.
pub type ConvertFn = Box<dyn Fn(&Value, &EngineOptions) -> anyhow::Result<String>>;

struct Registration {
    convert: ConvertFn,
    storage: CellStorage,
}

/// Registry of per-type conversions.
pub struct CellConverter {
    options: EngineOptions,
    converters: HashMap<ColumnType, Registration>,
}

impl CellConverter {
    /// Creates a converter with the built-in conversions of every column type.
    pub fn new(options: EngineOptions) -> Result<Self, SheetError> {
        let mut converter = Self::empty(options);
        converter.register(ColumnType::String, CellStorage::Text, convert_string)?;
        converter.register(ColumnType::Boolean, CellStorage::Text, convert_boolean)?;
        converter.register(ColumnType::Number, CellStorage::Number, convert_number)?;
        converter.register(ColumnType::Date, CellStorage::Date, convert_date)?;
        converter.register(ColumnType::Formula, CellStorage::Formula, convert_formula)?;
        Ok(converter)
    }

    /// Creates a converter without any registered conversion.
    pub fn empty(options: EngineOptions) -> Self {
        Self {
            options,
            converters: HashMap::new(),
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Registers the conversion of a column type. A type can be registered once.
    pub fn register<F>(&mut self, kind: ColumnType, storage: CellStorage, convert: F) -> Result<(), SheetError>
    where
        F: Fn(&Value, &EngineOptions) -> anyhow::Result<String> + 'static,
    {
        if self.converters.contains_key(&kind) {
            Err(SheetError::TypeAlreadyRegistered(kind))?
        }
        self.converters.insert(kind, Registration {
            convert: Box::new(convert),
            storage,
        });
        Ok(())
    }

    /// Converts a value for a column type.
    ///
    /// `row` is the 1-based worksheet row, reported when the conversion fails.
    pub fn convert(&self, value: &Value, kind: ColumnType, row: usize) -> Result<CellLiteral, SheetError> {
        let registration = self
            .converters
            .get(&kind)
            .ok_or(SheetError::UnsupportedColumnType(kind))?;
        let text = (registration.convert)(value, &self.options).map_err(|source| SheetError::CellConversion {
            kind,
            row,
            value: value.to_string(),
            source,
        })?;
        Ok(CellLiteral {
            text,
            storage: registration.storage,
        })
    }
}

fn convert_string(value: &Value, _: &EngineOptions) -> anyhow::Result<String> {
    Ok(value.to_string())
}

fn convert_boolean(value: &Value, _: &EngineOptions) -> anyhow::Result<String> {
    let flag = match value {
        Value::Null => return Ok(String::new()),
        Value::Boolean(flag) => *flag,
        Value::Text(text) => parse_boolean(text).ok_or_else(|| anyhow!("'{}' is not a boolean", text))?,
        other => bail!("{:?} cannot be converted to a boolean", other),
    };
    Ok(Value::Boolean(flag).to_string())
}

fn convert_number(value: &Value, options: &EngineOptions) -> anyhow::Result<String> {
    let number = match value {
        Value::Null => return Ok(String::new()),
        Value::Number(number) => *number,
        Value::Boolean(flag) => if *flag { 1f64 } else { 0f64 },
        Value::Text(text) => options
            .culture
            .parse_number(text)
            .ok_or_else(|| anyhow!("'{}' is not a number", text))?,
        Value::DateTime(_) => bail!("a date cannot be converted to a number"),
    };
    if !number.is_finite() {
        bail!("{} is not a finite number", number);
    }
    Ok(number.to_string())
}

fn convert_date(value: &Value, options: &EngineOptions) -> anyhow::Result<String> {
    let datetime = match value {
        Value::Null => return Ok(String::new()),
        // already formatted by the caller, kept as is
        Value::Text(text) => return Ok(text.to_owned()),
        Value::DateTime(datetime) => *datetime,
        Value::Number(serial) => from_serial(*serial, false).ok_or_else(|| anyhow!("{} is not a valid date serial", serial))?,
        Value::Boolean(_) => bail!("a boolean cannot be converted to a date"),
    };
    Ok(datetime.format(&options.date_format).to_string())
}

fn convert_formula(value: &Value, _: &EngineOptions) -> anyhow::Result<String> {
    let formula = value.to_string();
    Ok(formula.strip_prefix('=').unwrap_or(&formula).to_owned())
}

/// Parses a boolean literal, case-insensitive and trimmed.
pub(crate) fn parse_boolean(text: &str) -> Option<bool> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
