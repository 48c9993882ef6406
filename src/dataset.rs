//! # Datasets
//!
//! `Dataset` is the generic result of reading a table region: header names and
//! loosely-typed cells. `TypedDataset` is its projection onto a table schema.
use crate::schema::ColumnType;
use chrono::NaiveDateTime;
use std::fmt::Display;

/// Loosely-typed value of a read cell.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    /// Raw text as stored (numbers included)
    Text(String),
    /// Calendar value converted from a date-tagged serial
    Date(NaiveDateTime),
}

impl Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Text(text) => f.write_str(text),
            CellValue::Date(datetime) => write!(f, "{}", datetime),
        }
    }
}

/// Generic dataset: ordered column names and rows with one slot per column.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Option<CellValue>>>,
    /// Date system of the source workbook
    date1904: bool,
}

impl Dataset {
    pub(crate) fn new(columns: Vec<String>, date1904: bool) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            date1904,
        }
    }

    /// Returns true if serial dates of the source count from 1904.
    pub fn is_date1904(&self) -> bool {
        self.date1904
    }

    /// Appends a row, padding or truncating it to the column count.
    pub(crate) fn push_row(&mut self, mut row: Vec<Option<CellValue>>) {
        row.resize(self.columns.len(), None);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<CellValue>>] {
        &self.rows
    }

    /// Finds the position of a column by trimmed name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.columns.iter().position(|column| column.trim() == name)
    }

    /// Gets a cell by row and column position.
    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row)?.get(col)?.as_ref()
    }
}

/// Natively typed value of a projected cell.
#[derive(Clone, Debug, PartialEq)]
pub enum TypedValue {
    Text(String),
    Number(f64),
    Boolean(bool),
    Date(NaiveDateTime),
    Formula(String),
}

/// Column of a typed dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct TypedColumn {
    /// Schema column name
    pub name: String,
    /// Declared column type
    pub kind: ColumnType,
}

/// Dataset whose columns carry the native types declared by a table schema.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TypedDataset {
    pub(crate) columns: Vec<TypedColumn>,
    pub(crate) rows: Vec<Vec<Option<TypedValue>>>,
}

impl TypedDataset {
    pub fn columns(&self) -> &[TypedColumn] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<TypedValue>>] {
        &self.rows
    }

    /// Gets a cell by row position and schema column name.
    pub fn get(&self, row: usize, name: &str) -> Option<&TypedValue> {
        let col = self.columns.iter().position(|column| column.name == name)?;
        self.rows.get(row)?.get(col)?.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_pads_short_rows() {
        let mut dataset = Dataset::new(vec!["A".to_owned(), " B ".to_owned()], false);
        dataset.push_row(vec![Some(CellValue::Text("1".to_owned()))]);

        assert_eq!(dataset.rows().len(), 1);
        assert_eq!(dataset.rows()[0].len(), 2);
        assert_eq!(dataset.cell(0, 0), Some(&CellValue::Text("1".to_owned())));
        assert_eq!(dataset.cell(0, 1), None);
        assert_eq!(dataset.column_index("B"), Some(1));
        assert_eq!(dataset.column_index("C"), None);
    }
}
