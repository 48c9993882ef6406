//! # Spreadsheet Processing Module
//!
//! Cell conversion, worksheet addressing, styling and the two engines that
//! move tables in and out of xlsx containers:
//!
//! - [`WriteEngine`] serializes a [`WorkbookSpec`] into a new container
//! - [`ReadEngine`] extracts a table region bounded by a [`DelimiterPolicy`]
pub(crate) mod cell;
pub(crate) mod converter;
pub(crate) mod delimiter;
pub(crate) mod excel;
pub(crate) mod reference;
pub(crate) mod styles;
pub(crate) mod writer;
pub(crate) mod xlsx;

pub use converter::CellConverter;
pub use converter::CellLiteral;
pub use converter::CellStorage;
pub use converter::ConvertFn;
pub use delimiter::DelimiterPolicy;
pub use delimiter::Termination;
pub use delimiter::DEFAULT_MAX_COLUMN_NUMBER;
pub use writer::TableSpec;
pub use writer::WorkbookSpec;
pub use writer::WorkbookSpecBuilder;
pub use writer::WriteEngine;
pub use xlsx::ReadEngine;
