//! Single-letter column addressing of written worksheets.
use crate::error::SheetError;

/// Column letters available for addressing. Tables wider than this are rejected.
pub(crate) const COLUMN_LETTERS: [&str; 26] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M",
    "N", "O", "P", "Q", "R", "S", "T", "U", "V", "W", "X", "Y", "Z",
];

/// Converts a 0-based column index to its column letter.
pub(crate) fn col_to_letter(col: usize) -> Result<&'static str, SheetError> {
    COLUMN_LETTERS
        .get(col)
        .copied()
        .ok_or(SheetError::ColumnCapacityExceeded(col))
}
