//! Shared fixtures for the CLI integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use grade_sheets::{Workbook, WorkbookExt};

/// Write a workbook whose `sheet` holds `answers` in row 1 from column E
pub fn write_answers(path: &Path, sheet: &str, answers: &[&str]) -> PathBuf {
    let mut wb = Workbook::empty();
    wb.add_worksheet_with_name(sheet).unwrap();
    let ws = wb.worksheet_mut(0).unwrap();
    ws.set_cell_value("A1", "Learner").unwrap();
    for (i, answer) in answers.iter().enumerate() {
        ws.set_cell_value_at(0, 4 + i as u16, *answer).unwrap();
    }
    wb.save(path).unwrap();
    path.to_path_buf()
}

pub fn write_reference(dir: &Path) -> PathBuf {
    write_answers(&dir.join("solution.xlsx"), "solution", &["Y", "N", "Y", "Y"])
}
