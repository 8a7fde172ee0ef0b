//! Errors raised while writing CSV

use thiserror::Error;

pub type CsvResult<T> = std::result::Result<T, CsvError>;

#[derive(Debug, Error)]
pub enum CsvError {
    /// Creating or flushing the output failed
    #[error("cannot write CSV output: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot encode CSV record: {0}")]
    Csv(#[from] csv::Error),
}
