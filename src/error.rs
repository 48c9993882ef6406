use crate::schema::ColumnType;
use thiserror::Error;

/// Main error type for the table codec.
/// Aggregates configuration, lookup, state and conversion failures together with
/// errors coming from the zip and xml layers.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("{0}")]
    WithContextError(String),

    // Configuration errors
    #[error("Table '{0}' already exists")]
    DuplicateTable(String),

    #[error("Sheet '{0}' already exists")]
    DuplicateSheet(String),

    #[error("Column '{column}' already exists in table '{table}'")]
    DuplicateColumn { table: String, column: String },

    #[error("Cell '{0}' already exists in row")]
    DuplicateCell(String),

    #[error("Unable to register {0}: type already registered")]
    TypeAlreadyRegistered(ColumnType),

    #[error("Unsupported column type {0}")]
    UnsupportedColumnType(ColumnType),

    #[error("Invalid column type '{0}'")]
    UnknownColumnType(String),

    #[error("Invalid delimiter: {0}")]
    InvalidDelimiter(String),

    // Missing-data errors
    #[error("Missing value for column {column} in table {table}, row {row}")]
    MissingValue { table: String, column: String, row: usize },

    // Lookup errors
    #[error("Sheet '{0}' not found")]
    SheetNotFound(String),

    #[error("Table '{0}' not found")]
    TableNotFound(String),

    #[error("Shared string #{0} not found")]
    SharedStringOutOfRange(usize),

    #[error("Part '{0}' is missing from the container")]
    MissingPart(String),

    // State errors
    #[error("Data already loaded: overriding a previously read table is forbidden")]
    DataAlreadyLoaded,

    #[error("No data loaded: read a table before this action")]
    NoDataLoaded,

    #[error("Container content is empty")]
    EmptyContainer,

    #[error("Rows already supplied for table '{0}'")]
    RowsAlreadySupplied(String),

    // Conversion errors
    #[error("Unable to create cell of type {kind} in row {row}: {source} [Value: {value}]")]
    CellConversion {
        kind: ColumnType,
        row: usize,
        value: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Column index {0} exceeds the supported column letters")]
    ColumnCapacityExceeded(usize),

    #[error("{0}")]
    AnyhowError(#[from] anyhow::Error),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    ParseIntError(#[from] std::num::ParseIntError),

    #[error("{0}")]
    FormatError(#[from] std::fmt::Error),

    // Third-party library errors
    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("{0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("{0}")]
    XmlEncodingError(#[from] quick_xml::encoding::EncodingError),

    #[error("{0}")]
    XmlAttributeError(#[from] quick_xml::events::attributes::AttrError),

    // Helper module errors
    #[error("{0}")]
    XmlHelperError(#[from] crate::helpers::xml::XmlError),
}

pub(crate) trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, SheetError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| SheetError::WithContextError(format!("{}: {}", message, e)))
    }
}
