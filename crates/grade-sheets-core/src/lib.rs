//! # grade-sheets-core
//!
//! Document model shared by the grade-sheets crates.
//!
//! - [`CellValue`] - what a cell holds (text, number, boolean, error, formula)
//! - [`CellAddress`] - A1-style addressing
//! - [`Workbook`], [`Worksheet`] - named sheets over a sparse cell grid
//!
//! Indices are 0-based on the `*_at` methods, matching the file formats.
//! The scoring accessors [`Worksheet::value`], [`Worksheet::max_row`] and
//! [`Worksheet::max_column`] are 1-based, matching how graders describe
//! cells ("row 1, column E").
//!
//! ## Example
//!
//! ```rust
//! use grade_sheets_core::{CellValue, Workbook};
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.worksheet_mut(0).unwrap();
//!
//! sheet.set_cell_value("E1", "Y").unwrap();
//! sheet.set_cell_value_at(0, 5, 42.0).unwrap();
//!
//! assert_eq!(sheet.max_column(), 6);
//! assert_eq!(sheet.value(1, 5), CellValue::from("Y"));
//! ```

pub mod cell;
pub mod error;
pub mod workbook;
pub mod worksheet;

pub use cell::{CellAddress, CellError, CellValue, SharedString};
pub use error::{Error, Result};
pub use workbook::Workbook;
pub use worksheet::Worksheet;

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
