//! # grade-sheets-csv
//!
//! CSV writer for grade-sheets. Worksheets are written as a dense grid
//! anchored at A1, so blank leading rows and columns survive.

mod error;
mod options;
mod writer;

pub use error::{CsvError, CsvResult};
pub use options::{CsvWriteOptions, LineTerminator};
pub use writer::CsvWriter;
