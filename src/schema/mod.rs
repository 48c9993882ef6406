//! # Schema Descriptors
//!
//! Caller-declared table shapes and the rows to be written into them.
//! Descriptors are built before any container work starts and are only
//! borrowed by the engines afterwards.
mod column;
mod row;
mod table;
mod value;

pub use column::ColumnDescriptor;
pub use column::ColumnType;
pub use row::RowDescriptor;
pub use table::TableDescriptor;
pub use value::Value;
