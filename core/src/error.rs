use thiserror::Error;

/// Result type for av45select operations
pub type Result<T> = std::result::Result<T, Av45Error>;

/// Error types for av45select operations
///
/// Every variant is fatal for a run. Data-quality gaps (a subject without
/// metadata, a visit without a raw acquisition, an image missing from the
/// archive) are not errors; they are logged and skipped by the resolver.
#[derive(Error, Debug)]
pub enum Av45Error {
    /// Required column absent from an input table
    #[error("Missing column '{column}' in {table}")]
    MissingColumn { table: String, column: String },

    /// Cell value that cannot be interpreted
    #[error("Invalid value in {table} row {row}: {message}")]
    InvalidValue {
        table: String,
        row: usize,
        message: String,
    },

    /// Subject identifier without a trailing numeric RID
    #[error("Invalid subject identifier: {0}")]
    InvalidSubject(String),

    /// Generic resolution error
    #[error("Resolution error: {0}")]
    Resolution(String),

    /// CSV/TSV reading or writing error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Av45Error {
    /// Builds an [`Av45Error::InvalidValue`] for a 1-based data row
    pub fn invalid_value(table: &str, row: usize, message: impl Into<String>) -> Self {
        Av45Error::InvalidValue {
            table: table.to_string(),
            row,
            message: message.into(),
        }
    }
}

// Helper conversions
impl From<String> for Av45Error {
    fn from(s: String) -> Self {
        Av45Error::Resolution(s)
    }
}

impl From<&str> for Av45Error {
    fn from(s: &str) -> Self {
        Av45Error::Resolution(s.to_string())
    }
}
