//! # grade-sheets
//!
//! Score a learner's spreadsheet against a reference workbook.
//!
//! The scorer compares one row of a named sheet, column by column, starting
//! at a fixed column, and reports how many comparable cells match.
//!
//! ## Example
//!
//! ```rust
//! use grade_sheets::prelude::*;
//!
//! let mut submission = Workbook::empty();
//! submission.add_worksheet_with_name("blank").unwrap();
//! submission.worksheet_mut(0).unwrap().set_cell_value("E1", "Y").unwrap();
//!
//! let mut reference = Workbook::empty();
//! reference.add_worksheet_with_name("solution").unwrap();
//! reference.worksheet_mut(0).unwrap().set_cell_value("E1", "Y").unwrap();
//!
//! let result = score(&submission, &reference, &ScoreOptions::default()).unwrap();
//! assert_eq!(result.matches, 1);
//! assert_eq!(result.score, 1.0);
//! ```

pub mod prelude;
pub mod scorer;

pub use scorer::{
    compare_sheets, grade_files, score, FailureKind, GradeError, ScoreOptions, ScoreResult,
};

pub use grade_sheets_core::{
    CellAddress, CellError, CellValue, Error, Result, Workbook, Worksheet, MAX_COLS,
    MAX_ROWS, MAX_SHEET_NAME_LEN,
};

pub use grade_sheets_csv::{CsvError, CsvWriteOptions, CsvWriter, LineTerminator};
pub use grade_sheets_xlsx::{XlsxError, XlsxReader, XlsxWriter};

use std::path::Path;

/// File extensions accepted as spreadsheet submissions
pub const EXCEL_EXTENSIONS: &[&str] = &["xlsx", "xlsm"];

/// Whether the path has an accepted spreadsheet extension (case-insensitive)
pub fn is_excel_path<P: AsRef<Path>>(path: P) -> bool {
    lowercase_extension(path.as_ref())
        .map(|ext| EXCEL_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// File I/O for [`Workbook`], dispatched on the path's extension.
///
/// Submissions open from `.xlsx` or `.xlsm`. Reports save to `.xlsx`, or to
/// `.csv`, which holds the first sheet only.
pub trait WorkbookExt {
    fn open<P: AsRef<Path>>(path: P) -> Result<Workbook>;

    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()>;
}

fn flatten<E: std::fmt::Display>(err: E) -> Error {
    Error::other(err.to_string())
}

fn unsupported(path: &Path) -> Error {
    Error::other(format!("Unsupported file format: {}", path.display()))
}

impl WorkbookExt for Workbook {
    fn open<P: AsRef<Path>>(path: P) -> Result<Workbook> {
        let path = path.as_ref();
        if !is_excel_path(path) {
            return Err(unsupported(path));
        }
        XlsxReader::read_file(path).map_err(flatten)
    }

    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        match lowercase_extension(path).as_deref() {
            Some("xlsx") => XlsxWriter::write_file(self, path).map_err(flatten),
            Some("csv") => {
                let sheet = self
                    .worksheet(0)
                    .ok_or_else(|| Error::other("workbook has no sheet to write"))?;
                CsvWriter::write_file(sheet, path, &CsvWriteOptions::default()).map_err(flatten)
            }
            _ => Err(unsupported(path)),
        }
    }
}
