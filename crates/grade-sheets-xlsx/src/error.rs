//! Errors raised while reading or writing XLSX packages

use thiserror::Error;

pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

#[derive(Debug, Error)]
pub enum XlsxError {
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// Not a ZIP archive, or a damaged one; what a renamed non-XLSX file gives
    #[error("not a readable XLSX package: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("unsupported workbook: {0}")]
    InvalidFormat(String),

    /// Path of the package part that is absent
    #[error("package is missing {0}")]
    MissingPart(String),

    /// A value inside a part could not be interpreted
    #[error("cannot parse value: {0}")]
    Parse(String),

    #[error(transparent)]
    Core(#[from] grade_sheets_core::Error),
}
