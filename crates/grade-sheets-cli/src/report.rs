//! Batch summary reports

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, TimeZone};
use grade_sheets::{CellValue, ScoreResult, Workbook, WorkbookExt, Worksheet};

/// Column headers of the summary report
pub const REPORT_COLUMNS: [&str; 5] = ["filename", "percentage", "matches", "total", "status"];

/// One graded file in a batch
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRecord {
    pub filename: String,
    pub path: PathBuf,
    pub result: ScoreResult,
}

impl BatchRecord {
    pub fn new(path: &Path, result: ScoreResult) -> Self {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self {
            filename,
            path: path.to_path_buf(),
            result,
        }
    }

    pub fn status(&self) -> &'static str {
        if self.result.is_success() {
            "Success"
        } else {
            "Error"
        }
    }

    /// Percentage with two decimals, e.g. `75.00%`
    pub fn percentage_text(&self) -> String {
        format!("{:.2}%", self.result.percentage())
    }
}

/// Average, highest and lowest percentage over a batch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStats {
    pub count: usize,
    pub average: f64,
    pub highest: f64,
    pub lowest: f64,
}

impl SummaryStats {
    /// `None` for an empty batch
    pub fn from_records(records: &[BatchRecord]) -> Option<Self> {
        if records.is_empty() {
            return None;
        }

        let percentages = records.iter().map(|r| r.result.percentage());
        let total: f64 = percentages.clone().sum();
        let highest = percentages.clone().fold(f64::MIN, f64::max);
        let lowest = percentages.fold(f64::MAX, f64::min);

        Some(Self {
            count: records.len(),
            average: total / records.len() as f64,
            highest,
            lowest,
        })
    }
}

/// Report base name for a timestamp: `grading_summary_YYYYmmdd_HHMMSS`
pub fn report_name<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("grading_summary_{}", now.format("%Y%m%d_%H%M%S"))
}

/// Header row followed by one row per record
pub fn summary_sheet(records: &[BatchRecord]) -> grade_sheets::Result<Worksheet> {
    let mut sheet = Worksheet::new("Sheet1");

    for (col, header) in REPORT_COLUMNS.iter().enumerate() {
        sheet.set_cell_value_at(0, col as u16, *header)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = i as u32 + 1;
        let values: [CellValue; 5] = [
            record.filename.as_str().into(),
            record.percentage_text().into(),
            record.result.matches.into(),
            record.result.total_comparable.into(),
            record.status().into(),
        ];
        for (col, value) in values.into_iter().enumerate() {
            sheet.set_cell_value_at(row, col as u16, value)?;
        }
    }

    Ok(sheet)
}

/// Write `<name>.csv` and `<name>.xlsx` into `dir`
pub fn write_reports(
    dir: &Path,
    name: &str,
    records: &[BatchRecord],
) -> anyhow::Result<(PathBuf, PathBuf)> {
    let mut workbook = Workbook::empty();
    workbook.add_existing_worksheet(summary_sheet(records)?)?;

    let csv_path = dir.join(format!("{}.csv", name));
    workbook
        .save(&csv_path)
        .with_context(|| format!("Failed to write '{}'", csv_path.display()))?;

    let xlsx_path = dir.join(format!("{}.xlsx", name));
    workbook
        .save(&xlsx_path)
        .with_context(|| format!("Failed to write '{}'", xlsx_path.display()))?;

    Ok((csv_path, xlsx_path))
}

/// Print totals, statistics and the 80-column result table
pub fn print_summary<W: Write>(records: &[BatchRecord], out: &mut W) -> io::Result<()> {
    writeln!(out, "\n===== GRADING SUMMARY =====")?;
    writeln!(out, "Total files processed: {}", records.len())?;

    if let Some(stats) = SummaryStats::from_records(records) {
        writeln!(out, "Average score: {:.2}%", stats.average)?;
        writeln!(out, "Highest score: {:.2}%", stats.highest)?;
        writeln!(out, "Lowest score: {:.2}%", stats.lowest)?;
    }

    writeln!(out, "\n{}", "=".repeat(80))?;
    writeln!(
        out,
        "{:<30} {:<10} {:<15} {:<10}",
        "Filename", "Score", "Matches", "Status"
    )?;
    writeln!(out, "{}", "-".repeat(80))?;

    for record in records {
        writeln!(
            out,
            "{:<30} {:<10} {}/{:<15} {:<10}",
            record.filename,
            record.percentage_text(),
            record.result.matches,
            record.result.total_comparable,
            record.status()
        )?;
    }

    writeln!(out, "{}", "=".repeat(80))
}
