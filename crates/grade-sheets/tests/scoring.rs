//! Grading submissions stored on disk

use std::path::{Path, PathBuf};

use grade_sheets::prelude::*;
use pretty_assertions::assert_eq;

fn write_answers(dir: &Path, file: &str, sheet: &str, answers: &[&str]) -> PathBuf {
    let mut wb = Workbook::empty();
    wb.add_worksheet_with_name(sheet).unwrap();
    let ws = wb.worksheet_mut(0).unwrap();
    ws.set_cell_value("A1", "Name").unwrap();
    for (i, answer) in answers.iter().enumerate() {
        ws.set_cell_value_at(0, 4 + i as u16, *answer).unwrap();
    }

    let path = dir.join(file);
    wb.save(&path).unwrap();
    path
}

#[test]
fn test_partial_credit() {
    let dir = tempfile::tempdir().unwrap();
    let reference = write_answers(dir.path(), "solution.xlsx", "solution", &["Y", "N", "Y", "Y"]);
    let submission = write_answers(dir.path(), "alice.xlsx", "blank", &["Y", "N", "N", "Y"]);

    let result = grade_files(&submission, &reference, &ScoreOptions::default());

    assert_eq!(result.score, 0.75);
    assert_eq!(result.matches, 3);
    assert_eq!(result.total_comparable, 4);
    assert!(result.feedback.contains("75.00%"));
    assert!(result.feedback.contains("3 out of 4"));
    assert!(result.is_success());
}

#[test]
fn test_wrong_sheet_name() {
    let dir = tempfile::tempdir().unwrap();
    let reference = write_answers(dir.path(), "solution.xlsx", "solution", &["Y", "N", "Y", "Y"]);
    let submission = write_answers(dir.path(), "bob.xlsx", "Sheet1", &["Y", "N", "Y", "Y"]);

    let result = grade_files(&submission, &reference, &ScoreOptions::default());

    assert_eq!(result.score, 0.0);
    assert_eq!(result.failure, Some(FailureKind::MissingSubmissionSheet));
    assert_eq!(
        result.feedback,
        "Error: Worksheet 'blank' not found in your submission."
    );
}

#[test]
fn test_empty_reference_row() {
    let dir = tempfile::tempdir().unwrap();
    let reference = write_answers(dir.path(), "solution.xlsx", "solution", &[]);
    let submission = write_answers(dir.path(), "carol.xlsx", "blank", &["Y", "N"]);

    let result = grade_files(&submission, &reference, &ScoreOptions::default());

    assert_eq!(result.score, 0.0);
    assert_eq!(result.total_comparable, 0);
    assert!(result.is_success());
}

#[test]
fn test_submission_is_not_a_spreadsheet() {
    let dir = tempfile::tempdir().unwrap();
    let reference = write_answers(dir.path(), "solution.xlsx", "solution", &["Y", "N", "Y", "Y"]);
    let submission = dir.path().join("notes.xlsx");
    std::fs::write(&submission, "plain text pretending to be a workbook").unwrap();

    let result = grade_files(&submission, &reference, &ScoreOptions::default());

    assert_eq!(result.score, 0.0);
    assert_eq!(result.failure, Some(FailureKind::DocumentRead));
    assert!(result.feedback.starts_with("Error grading your submission: "));
}

#[test]
fn test_missing_submission_file() {
    let dir = tempfile::tempdir().unwrap();
    let reference = write_answers(dir.path(), "solution.xlsx", "solution", &["Y"]);

    let result = grade_files(dir.path().join("absent.xlsx"), &reference, &ScoreOptions::default());

    assert_eq!(result.score, 0.0);
    assert_eq!(result.failure, Some(FailureKind::DocumentRead));
}
