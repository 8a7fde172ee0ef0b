//! CSV writer

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::CsvResult;
use crate::options::CsvWriteOptions;
use grade_sheets_core::Worksheet;

/// Renders one worksheet as CSV
pub struct CsvWriter;

impl CsvWriter {
    /// Create (or truncate) `path` and write the sheet into it
    pub fn write_file<P: AsRef<Path>>(
        worksheet: &Worksheet,
        path: P,
        options: &CsvWriteOptions,
    ) -> CsvResult<()> {
        let file = File::create(path)?;
        Self::write(worksheet, file, options)
    }

    /// Rows 1 through the last used row, each padded to the last used
    /// column. Formulas are written as their cached value.
    pub fn write<W: Write>(
        worksheet: &Worksheet,
        writer: W,
        options: &CsvWriteOptions,
    ) -> CsvResult<()> {
        let mut out = options.builder().from_writer(writer);
        let width = worksheet.max_column();

        for row in 1..=worksheet.max_row() {
            out.write_record((1..=width).map(|col| worksheet.value(row, col).to_string()))?;
        }

        out.flush()?;
        Ok(())
    }
}
