use crate::error::SheetError;
use crate::schema::Value;

/// One data row to be written into a table.
///
/// The row number is display metadata only; rows are written in the order
/// they are supplied.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RowDescriptor {
    /// Caller supplied row number
    pub row_number: usize,
    /// Cell values keyed by column name, in insertion order
    cells: Vec<(String, Value)>,
}

impl RowDescriptor {
    pub fn new(row_number: usize) -> Self {
        Self {
            row_number,
            cells: Vec::new(),
        }
    }

    /// Adds a cell value, failing if the column already has one.
    pub fn add_cell(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Result<&mut Self, SheetError> {
        let name = name.into();
        if self.get(&name).is_some() {
            return Err(SheetError::DuplicateCell(name));
        }
        self.cells.push((name, value.into()));
        Ok(self)
    }

    /// Consuming variant of [`RowDescriptor::add_cell`] for chained construction.
    pub fn with_cell(mut self, name: impl Into<String>, value: impl Into<Value>) -> Result<Self, SheetError> {
        self.add_cell(name, value)?;
        Ok(self)
    }

    /// Gets the value bound to a column name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.cells
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_lookup_by_name() {
        let row = RowDescriptor::new(1)
            .with_cell("COL1", "asjhg").unwrap()
            .with_cell("COL2", 22).unwrap()
            .with_cell("COL3", None::<bool>).unwrap();

        assert_eq!(row.len(), 3);
        assert_eq!(row.get("COL1"), Some(&Value::Text("asjhg".to_owned())));
        assert_eq!(row.get("COL3"), Some(&Value::Null));
        assert_eq!(row.get("COL4"), None);
    }

    #[test]
    fn row_rejects_duplicate_cell() {
        let mut row = RowDescriptor::new(1);
        row.add_cell("COL1", 1).unwrap();
        let error = row.add_cell("COL1", 2).unwrap_err();
        assert!(matches!(error, SheetError::DuplicateCell(name) if name == "COL1"));
        assert_eq!(row.len(), 1);
        assert_eq!(row.get("COL1"), Some(&Value::Number(1.0)));
    }
}
