//! Row-comparison scoring
//!
//! A submission is scored by walking one row of the learner's sheet and the
//! reference sheet side by side, starting at a fixed column and ending at the
//! last column used by either sheet. Only positions where *both* sheets hold
//! a value are comparable; of those, the ones whose values are identical
//! (same type, same content) count as matches.
//!
//! Formula cells take part through the result cached in the file, so an
//! uncalculated formula is treated as an empty cell.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::{Workbook, WorkbookExt, Worksheet};

/// Which sheets, row and first column to compare
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreOptions {
    /// Sheet name looked up in the submission
    pub student_sheet: String,
    /// Sheet name looked up in the reference workbook
    pub solution_sheet: String,
    /// First compared column, 1-based (5 is column E)
    pub start_column: u32,
    /// Compared row, 1-based
    pub row: u32,
}

impl Default for ScoreOptions {
    fn default() -> Self {
        Self {
            student_sheet: "blank".to_string(),
            solution_sheet: "solution".to_string(),
            start_column: 5,
            row: 1,
        }
    }
}

/// Category of a grading failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    ConfigurationMismatch,
    SubmissionNotFound,
    UnsupportedFileType,
    FileNotFound,
    CopyFailure,
    MissingSubmissionSheet,
    MissingReferenceSheet,
    DocumentRead,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::ConfigurationMismatch => "configuration_mismatch",
            FailureKind::SubmissionNotFound => "submission_not_found",
            FailureKind::UnsupportedFileType => "unsupported_file_type",
            FailureKind::FileNotFound => "file_not_found",
            FailureKind::CopyFailure => "copy_failure",
            FailureKind::MissingSubmissionSheet => "missing_submission_sheet",
            FailureKind::MissingReferenceSheet => "missing_reference_sheet",
            FailureKind::DocumentRead => "document_read",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything that can stop a submission from being scored.
///
/// `Display` is the diagnostic for logs; [`GradeError::feedback`] is the
/// text shown to the learner.
#[derive(Debug, Error)]
pub enum GradeError {
    /// The submission was sent to a different assignment part
    #[error("part identifier mismatch: expected '{expected}', got '{actual}'")]
    ConfigurationMismatch { expected: String, actual: String },

    /// No `.xlsx`/`.xlsm` file in the submission directory
    #[error("no .xlsx or .xlsm file found in {}", .0.display())]
    SubmissionNotFound(PathBuf),

    /// A file was offered that is not a spreadsheet
    #[error("unsupported file type: {}", .0.display())]
    UnsupportedFileType(PathBuf),

    /// A file named on the command line does not exist
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The submission could not be copied to its working location
    #[error("failed to copy {} to {}: {source}", .from.display(), .to.display())]
    CopyFailure {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    /// The learner's workbook lacks the graded sheet
    #[error("worksheet '{0}' not found in submission")]
    MissingSubmissionSheet(String),

    /// The reference workbook lacks the answer sheet
    #[error("worksheet '{0}' not found in reference workbook")]
    MissingReferenceSheet(String),

    /// A workbook could not be opened or parsed
    #[error("failed to read {}: {source}", .path.display())]
    DocumentRead {
        path: PathBuf,
        source: crate::Error,
    },
}

impl GradeError {
    /// Learner-facing explanation of the failure
    pub fn feedback(&self) -> String {
        match self {
            GradeError::ConfigurationMismatch { .. } => {
                "Please verify that you have submitted to the proper part of the assignment."
                    .to_string()
            }
            GradeError::SubmissionNotFound(_) => concat!(
                "Your submission file does not have the right file extension. ",
                "Please submit an Excel file (.xlsx, .xlsm)."
            )
            .to_string(),
            GradeError::UnsupportedFileType(_) => {
                "File must be an Excel file (.xlsx, .xlsm)".to_string()
            }
            GradeError::FileNotFound(path) => format!("Error: File not found: {}", path.display()),
            GradeError::CopyFailure { .. } => {
                "Error processing your submission file.".to_string()
            }
            GradeError::MissingSubmissionSheet(name) => {
                format!("Error: Worksheet '{}' not found in your submission.", name)
            }
            GradeError::MissingReferenceSheet(_) => {
                "Error: Internal error - Solution worksheet not found.".to_string()
            }
            GradeError::DocumentRead { source, .. } => {
                format!("Error grading your submission: {}", source)
            }
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            GradeError::ConfigurationMismatch { .. } => FailureKind::ConfigurationMismatch,
            GradeError::SubmissionNotFound(_) => FailureKind::SubmissionNotFound,
            GradeError::UnsupportedFileType(_) => FailureKind::UnsupportedFileType,
            GradeError::FileNotFound(_) => FailureKind::FileNotFound,
            GradeError::CopyFailure { .. } => FailureKind::CopyFailure,
            GradeError::MissingSubmissionSheet(_) => FailureKind::MissingSubmissionSheet,
            GradeError::MissingReferenceSheet(_) => FailureKind::MissingReferenceSheet,
            GradeError::DocumentRead { .. } => FailureKind::DocumentRead,
        }
    }
}

/// Outcome of grading one submission
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    /// Fraction of comparable cells that match, in `[0, 1]`
    pub score: f64,
    pub matches: usize,
    /// Positions where both sheets hold a value
    pub total_comparable: usize,
    pub feedback: String,
    /// Set when grading stopped on an error
    pub failure: Option<FailureKind>,
}

impl ScoreResult {
    /// Build a completed result from the match counts
    pub fn from_counts(matches: usize, total_comparable: usize) -> Self {
        debug_assert!(matches <= total_comparable);

        let score = if total_comparable > 0 {
            matches as f64 / total_comparable as f64
        } else {
            0.0
        };

        let feedback = format!(
            "Your score: {:.2}%\nYou correctly matched {} out of {} cells.",
            score * 100.0,
            matches,
            total_comparable
        );

        Self {
            score,
            matches,
            total_comparable,
            feedback,
            failure: None,
        }
    }

    /// Zero-score result carrying the error's learner feedback
    pub fn from_error(error: &GradeError) -> Self {
        Self {
            score: 0.0,
            matches: 0,
            total_comparable: 0,
            feedback: error.feedback(),
            failure: Some(error.kind()),
        }
    }

    /// Score as a percentage in `[0, 100]`
    pub fn percentage(&self) -> f64 {
        self.score * 100.0
    }

    /// Whether the comparison ran to completion
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

impl From<GradeError> for ScoreResult {
    fn from(error: GradeError) -> Self {
        ScoreResult::from_error(&error)
    }
}

/// Score a submission workbook against a reference workbook.
///
/// The submission's sheet is looked up first, so a workbook missing both
/// sheets reports the learner-side problem.
pub fn score(
    submission: &Workbook,
    reference: &Workbook,
    options: &ScoreOptions,
) -> Result<ScoreResult, GradeError> {
    let student = submission
        .worksheet_by_name(&options.student_sheet)
        .ok_or_else(|| GradeError::MissingSubmissionSheet(options.student_sheet.clone()))?;
    let solution = reference
        .worksheet_by_name(&options.solution_sheet)
        .ok_or_else(|| GradeError::MissingReferenceSheet(options.solution_sheet.clone()))?;

    Ok(compare_sheets(student, solution, options))
}

/// Compare the configured row of two sheets.
///
/// `options.start_column` and `options.row` below 1 are treated as 1.
pub fn compare_sheets(
    student: &Worksheet,
    solution: &Worksheet,
    options: &ScoreOptions,
) -> ScoreResult {
    let start_column = options.start_column.max(1);
    let row = options.row.max(1);
    let max_column = student.max_column().max(solution.max_column());

    let mut matches = 0;
    let mut total_comparable = 0;

    for column in start_column..=max_column {
        let student_value = student.value(row, column);
        let solution_value = solution.value(row, column);

        if let (Some(given), Some(expected)) =
            (student_value.resolved(), solution_value.resolved())
        {
            total_comparable += 1;
            if given == expected {
                matches += 1;
            }
        }
    }

    tracing::debug!(
        row,
        start_column,
        max_column,
        matches,
        total_comparable,
        "compared sheets"
    );

    ScoreResult::from_counts(matches, total_comparable)
}

/// Open both files and score them. Never fails: any error becomes a
/// zero-score result with learner feedback.
pub fn grade_files<P: AsRef<Path>, Q: AsRef<Path>>(
    submission_path: P,
    reference_path: Q,
    options: &ScoreOptions,
) -> ScoreResult {
    let submission_path = submission_path.as_ref();

    match try_grade_files(submission_path, reference_path.as_ref(), options) {
        Ok(result) => {
            tracing::info!(
                path = %submission_path.display(),
                score = result.score,
                matches = result.matches,
                total = result.total_comparable,
                "graded submission"
            );
            result
        }
        Err(err) => {
            tracing::warn!(path = %submission_path.display(), error = %err, "grading failed");
            ScoreResult::from_error(&err)
        }
    }
}

fn try_grade_files(
    submission_path: &Path,
    reference_path: &Path,
    options: &ScoreOptions,
) -> Result<ScoreResult, GradeError> {
    let submission = open_document(submission_path)?;
    let reference = open_document(reference_path)?;
    score(&submission, &reference, options)
}

fn open_document(path: &Path) -> Result<Workbook, GradeError> {
    Workbook::open(path).map_err(|source| GradeError::DocumentRead {
        path: path.to_path_buf(),
        source,
    })
}
