//! Delimiter policy: where a table region starts and where it ends.
use crate::error::SheetError;

/// Default upper bound of columns read from the header row.
pub const DEFAULT_MAX_COLUMN_NUMBER: usize = 99;

/// Rule that ends the data rows of a table region.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Termination {
    /// Stop at the first row whose first cell has no value
    #[default]
    FirstCellEmpty,
    /// Stop once this many data rows were accepted
    MaxRows(usize),
}

/// Describes the boundaries of a table region inside a sheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DelimiterPolicy {
    /// Zero-based position of the header row
    pub start_row_index: usize,
    /// Maximum number of header columns
    pub max_column_number: usize,
    pub termination: Termination,
}

impl Default for DelimiterPolicy {
    fn default() -> Self {
        Self {
            start_row_index: 0,
            max_column_number: DEFAULT_MAX_COLUMN_NUMBER,
            termination: Termination::FirstCellEmpty,
        }
    }
}

impl DelimiterPolicy {
    /// Policy that accepts at most `max_rows` data rows.
    pub fn by_max_rows(max_rows: usize) -> Result<Self, SheetError> {
        if max_rows == 0 {
            Err(SheetError::InvalidDelimiter("row number must be greater than zero".to_owned()))?
        }
        Ok(Self {
            termination: Termination::MaxRows(max_rows),
            ..Self::default()
        })
    }

    pub fn with_start_row_index(mut self, start_row_index: usize) -> Self {
        self.start_row_index = start_row_index;
        self
    }

    pub fn with_max_column_number(mut self, max_column_number: usize) -> Self {
        self.max_column_number = max_column_number;
        self
    }

    /// Decides whether a data row is accepted.
    ///
    /// `accepted` is the number of rows already accepted and `first_cell_blank`
    /// tells whether the row lacks a value in its first cell.
    pub(crate) fn accepts(&self, accepted: usize, first_cell_blank: bool) -> bool {
        match self.termination {
            Termination::FirstCellEmpty => !first_cell_blank,
            Termination::MaxRows(max_rows) => accepted < max_rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy() {
        let policy = DelimiterPolicy::default();
        assert_eq!(policy.start_row_index, 0);
        assert_eq!(policy.max_column_number, 99);
        assert_eq!(policy.termination, Termination::FirstCellEmpty);
    }

    #[test]
    fn by_max_rows_rejects_zero() {
        let error = DelimiterPolicy::by_max_rows(0).unwrap_err();
        assert_eq!(error.to_string(), "Invalid delimiter: row number must be greater than zero");
        let policy = DelimiterPolicy::by_max_rows(3).unwrap().with_start_row_index(2);
        assert_eq!(policy.termination, Termination::MaxRows(3));
        assert_eq!(policy.start_row_index, 2);
    }

    #[test]
    fn accepts_rows() {
        let policy = DelimiterPolicy::default();
        assert!(policy.accepts(10, false));
        assert!(!policy.accepts(0, true));

        let policy = DelimiterPolicy::by_max_rows(2).unwrap();
        assert!(policy.accepts(1, true));
        assert!(!policy.accepts(2, false));
    }
}
