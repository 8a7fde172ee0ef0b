//! # grade-sheets-xlsx
//!
//! XLSX (Office Open XML) reader and writer for grade-sheets.
//!
//! The reader loads cell values the way a "data only" consumer sees them:
//! formulas keep their text, but the cached result saved by the authoring
//! application is what callers compare. The writer emits values only and
//! is used for generated reports.

pub mod error;
pub mod reader;
pub mod writer;

pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxReader;
pub use writer::XlsxWriter;
