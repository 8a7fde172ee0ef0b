//! Uploading a single file into the uploads folder

mod common;

use std::fs;

use chrono::{Local, TimeZone};
use grade_sheets::ScoreOptions;
use grade_sheets_cli::upload::{self, UploadOptions};
use pretty_assertions::assert_eq;

fn options(root: &std::path::Path) -> UploadOptions {
    UploadOptions {
        reference: common::write_reference(root),
        uploads_dir: root.join("uploads"),
        scoring: ScoreOptions::default(),
    }
}

#[test]
fn test_upload_copies_and_grades() {
    let root = tempfile::tempdir().unwrap();
    let options = options(root.path());
    let source = common::write_answers(&root.path().join("hw1.xlsx"), "blank", &["Y", "N", "N", "Y"]);
    let now = Local.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();

    let mut out = Vec::new();
    let report = upload::upload_and_grade(&source, &options, now, &mut out).unwrap();

    assert!(report.copied);
    assert_eq!(
        report.destination,
        options.uploads_dir.join("hw1_20261019_080000.xlsx")
    );
    assert!(report.destination.is_file());
    assert!(source.is_file());
    assert_eq!(report.result.score, 0.75);
    assert_eq!(
        report.feedback_path,
        options.uploads_dir.join("hw1_20261019_080000_feedback.txt")
    );
    assert_eq!(
        fs::read_to_string(&report.feedback_path).unwrap(),
        report.result.feedback
    );

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("File uploaded to: "));
    assert!(printed.contains(&format!(
        "{}\n{}\n{}",
        "=".repeat(50),
        report.result.feedback,
        "=".repeat(50)
    )));
}

#[test]
fn test_upload_skips_copy_inside_uploads_folder() {
    let root = tempfile::tempdir().unwrap();
    let options = options(root.path());
    fs::create_dir_all(&options.uploads_dir).unwrap();
    let source = common::write_answers(
        &options.uploads_dir.join("already.xlsx"),
        "blank",
        &["Y", "N", "Y", "Y"],
    );

    let mut out = Vec::new();
    let report = upload::upload_and_grade(&source, &options, Local::now(), &mut out).unwrap();

    assert!(!report.copied);
    assert_eq!(report.destination, source);
    assert_eq!(report.result.score, 1.0);
    assert_eq!(
        report.feedback_path,
        options.uploads_dir.join("already_feedback.txt")
    );
    assert_eq!(fs::read_dir(&options.uploads_dir).unwrap().count(), 2);
    assert!(String::from_utf8(out)
        .unwrap()
        .contains("File already in uploads folder"));
}

#[test]
fn test_upload_run_reports_grading_errors_as_feedback() {
    let root = tempfile::tempdir().unwrap();
    let options = options(root.path());
    let source = common::write_answers(&root.path().join("hw2.xlsx"), "Sheet1", &["Y"]);

    let mut out = Vec::new();
    assert!(upload::run(&source, &options, &mut out).unwrap());

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("Error: Worksheet 'blank' not found in your submission."));
    assert!(printed.contains("Process completed successfully!"));
}
