//! # Sheet Table
//!
//! Schema-driven tables for xlsx workbooks. A caller declares the shape of a
//! table once, as ordered typed columns, and then either
//!
//! - writes rows of loosely-typed values into a formatted sheet, or
//! - reads a bounded region of an existing sheet back into a generic dataset
//!   and reconciles it against the declared shape.
//!
//! ## Writing
//!
//! ```no_run
//! use sheet_table::{ColumnDescriptor, ColumnType, EngineOptions, RowDescriptor, TableDescriptor, WorkbookSpec, WriteEngine};
//!
//! # fn main() -> Result<(), sheet_table::SheetError> {
//! let table = TableDescriptor::new("People", "Sheet01", vec![
//!     ColumnDescriptor::new("id", "ID", ColumnType::Number),
//!     ColumnDescriptor::new("name", "Name", ColumnType::String),
//! ])?;
//! let rows = vec![RowDescriptor::new(1).with_cell("id", 1)?.with_cell("name", "Ada")?];
//! let spec = WorkbookSpec::builder().add_table(table)?.fill_table("People", rows)?.build();
//! let payload = WriteEngine::new(EngineOptions::default())?.write(&spec)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Reading
//!
//! ```no_run
//! use sheet_table::{DelimiterPolicy, ReadEngine};
//!
//! # fn main() -> Result<(), sheet_table::SheetError> {
//! # let payload = Vec::new();
//! let mut engine = ReadEngine::open(payload)?;
//! engine.read_table("Sheet01", &DelimiterPolicy::default())?;
//! # Ok(())
//! # }
//! ```
//!
//! The library logs through the `log` facade and never installs a logger.
mod dataset;
mod error;
mod helpers;
mod options;
mod schema;
mod spreadsheet;
pub mod validator;

pub use dataset::CellValue;
pub use dataset::Dataset;
pub use dataset::TypedColumn;
pub use dataset::TypedDataset;
pub use dataset::TypedValue;
pub use error::SheetError;
pub use options::Culture;
pub use options::EngineOptions;
pub use schema::ColumnDescriptor;
pub use schema::ColumnType;
pub use schema::RowDescriptor;
pub use schema::TableDescriptor;
pub use schema::Value;
pub use spreadsheet::*;
