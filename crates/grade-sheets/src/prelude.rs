//! Everything needed to load workbooks and score them
//!
//! ```rust
//! use grade_sheets::prelude::*;
//! ```

pub use crate::{
    compare_sheets, grade_files, score, CellAddress, CellValue, Error, FailureKind, GradeError,
    Result, ScoreOptions, ScoreResult, Workbook, WorkbookExt, Worksheet,
};
