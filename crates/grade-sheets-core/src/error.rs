//! Error types for grade-sheets-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the document model
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid cell address: '{0}'")]
    InvalidAddress(String),

    /// (requested, largest allowed), 0-based
    #[error("Row {0} is past the last row ({1})")]
    RowOutOfBounds(u32, u32),

    /// (requested, largest allowed), 0-based
    #[error("Column {0} is past the last column ({1})")]
    ColumnOutOfBounds(u16, u16),

    #[error("Invalid sheet name: {0}")]
    InvalidSheetName(String),

    #[error("A sheet named '{0}' already exists")]
    DuplicateSheetName(String),

    /// Anything raised by a file-format crate, flattened to its message
    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }
}
