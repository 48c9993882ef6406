use crate::error::SheetError;
use std::fmt::Display;
use std::str::FromStr;

/// Supported column data types of a table schema.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ColumnType {
    /// Free text
    String,
    /// Floating point numbers
    Number,
    /// Calendar values, stored as text or as serial numbers
    Date,
    /// True/False values, stored as text
    Boolean,
    /// Formula bodies, recomputed by the consuming application
    Formula,
}

impl ColumnType {
    /// All column types, in declaration order.
    pub const ALL: [ColumnType; 5] = [
        ColumnType::String,
        ColumnType::Number,
        ColumnType::Date,
        ColumnType::Boolean,
        ColumnType::Formula,
    ];

    /// Returns the display name of the column type.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ColumnType::String => "String",
            ColumnType::Number => "Number",
            ColumnType::Date => "Date",
            ColumnType::Boolean => "Boolean",
            ColumnType::Formula => "Formula",
        }
    }

    /// Returns true if this column type represents formula cells.
    #[inline]
    pub fn is_formula(&self) -> bool {
        matches!(self, ColumnType::Formula)
    }
}

impl Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = SheetError;

    /// Parses a column type from a string representation.
    /// Supports various aliases for each type.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_uppercase().as_str() {
            "TEXT" | "STRING" | "VARCHAR" => Ok(Self::String),
            "INT" | "INTEGER" | "FLOAT" | "DOUBLE" | "DECIMAL" | "NUMBER" | "NUMERIC" => Ok(Self::Number),
            "DATE" | "DATETIME" | "TIMESTAMP" => Ok(Self::Date),
            "BOOL" | "BOOLEAN" => Ok(Self::Boolean),
            "FORMULA" => Ok(Self::Formula),
            _ => Err(SheetError::UnknownColumnType(name.to_owned())),
        }
    }
}

/// A column of a table schema.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnDescriptor {
    /// Lookup key used by row descriptors
    pub name: String,
    /// Text written in the header row and matched on read
    pub header_text: String,
    /// Column data type
    pub kind: ColumnType,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, header_text: impl Into<String>, kind: ColumnType) -> Self {
        Self {
            name: name.into(),
            header_text: header_text.into(),
            kind,
        }
    }
}
