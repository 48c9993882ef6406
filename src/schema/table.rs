use crate::error::SheetError;
use crate::schema::ColumnDescriptor;

/// Represents a table bound to one sheet, with an ordered column schema.
///
/// Column positions are significant: they drive column addressing on write and
/// the positional header comparison on read.
#[derive(Clone, Debug, PartialEq)]
pub struct TableDescriptor {
    name: String,
    sheet_name: String,
    columns: Vec<ColumnDescriptor>,
}

impl TableDescriptor {
    /// Creates a table schema, rejecting duplicate column names.
    pub fn new(
        name: impl Into<String>,
        sheet_name: impl Into<String>,
        columns: Vec<ColumnDescriptor>,
    ) -> Result<Self, SheetError> {
        let name = name.into();
        for (index, column) in columns.iter().enumerate() {
            if columns[..index].iter().any(|other| other.name == column.name) {
                Err(SheetError::DuplicateColumn {
                    table: name.to_owned(),
                    column: column.name.to_owned(),
                })?
            }
        }
        Ok(Self {
            name,
            sheet_name: sheet_name.into(),
            columns,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Finds a column and its position by name.
    pub fn column(&self, name: &str) -> Option<(usize, &ColumnDescriptor)> {
        self.columns
            .iter()
            .enumerate()
            .find(|(_, column)| column.name == name)
    }

    /// Returns true if any column holds formulas.
    pub fn has_formula(&self) -> bool {
        self.columns.iter().any(|column| column.kind.is_formula())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnType;

    fn columns() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::new("ID", "Id", ColumnType::Number),
            ColumnDescriptor::new("TITLE", "Title", ColumnType::String),
        ]
    }

    #[test]
    fn table_column_lookup_keeps_position() {
        let table = TableDescriptor::new("Items", "Sheet01", columns()).unwrap();
        let (index, column) = table.column("TITLE").unwrap();
        assert_eq!(index, 1);
        assert_eq!(column.header_text, "Title");
        assert!(table.column("MISSING").is_none());
        assert!(!table.has_formula());
    }

    #[test]
    fn table_rejects_duplicate_column() {
        let mut columns = columns();
        columns.push(ColumnDescriptor::new("ID", "Other", ColumnType::String));
        let error = TableDescriptor::new("Items", "Sheet01", columns).unwrap_err();
        assert_eq!(error.to_string(), "Column 'ID' already exists in table 'Items'");
    }

    #[test]
    fn table_detects_formula_column() {
        let mut columns = columns();
        columns.push(ColumnDescriptor::new("LOOKUP", "Lookup", ColumnType::Formula));
        let table = TableDescriptor::new("Items", "Sheet02", columns).unwrap();
        assert!(table.has_formula());
    }
}
