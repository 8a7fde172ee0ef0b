//! Grade many submissions and summarize them

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Local};
use grade_sheets::{grade_files, ScoreOptions};

use crate::config::GraderConfig;
use crate::discovery;
use crate::report::{self, BatchRecord};

/// Settings for one batch run
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub reference: PathBuf,
    pub results_dir: PathBuf,
    pub scoring: ScoreOptions,
}

impl From<&GraderConfig> for BatchOptions {
    fn from(config: &GraderConfig) -> Self {
        Self {
            reference: config.local.reference.clone(),
            results_dir: config.local.results_dir.clone(),
            scoring: config.scoring.options(),
        }
    }
}

/// What a completed batch produced
#[derive(Debug)]
pub struct BatchSummary {
    pub records: Vec<BatchRecord>,
    /// `(csv, xlsx)` report paths, when they were written
    pub reports: Option<(PathBuf, PathBuf)>,
}

/// Grade `files` one after another.
///
/// A file that fails to grade is recorded with status `Error` and the batch
/// moves on. Returns `None` when there is nothing to grade.
pub fn grade_all<W: Write>(
    files: &[PathBuf],
    options: &BatchOptions,
    now: DateTime<Local>,
    out: &mut W,
) -> anyhow::Result<Option<BatchSummary>> {
    fs::create_dir_all(&options.results_dir).with_context(|| {
        format!(
            "Failed to create results folder '{}'",
            options.results_dir.display()
        )
    })?;

    if files.is_empty() {
        writeln!(out, "No files to grade.")?;
        return Ok(None);
    }

    writeln!(out, "Found {} files to grade.", files.len())?;

    let mut records = Vec::with_capacity(files.len());
    for path in files {
        writeln!(out, "Grading: {}", path.display())?;

        let result = grade_files(path, &options.reference, &options.scoring);
        if !result.is_success() {
            writeln!(out, "Error processing {}: {}", path.display(), result.feedback)?;
        }

        let feedback_path = feedback_path_for(&options.results_dir, path);
        if let Err(err) = fs::write(&feedback_path, &result.feedback) {
            tracing::error!(
                path = %feedback_path.display(),
                error = %err,
                "cannot write feedback"
            );
            writeln!(out, "Error saving feedback for {}: {}", path.display(), err)?;
        }

        records.push(BatchRecord::new(path, result));
    }

    let name = report::report_name(&now);
    let reports = match report::write_reports(&options.results_dir, &name, &records) {
        Ok(paths) => Some(paths),
        Err(err) => {
            tracing::error!(error = ?err, "cannot write summary reports");
            writeln!(out, "Error writing reports: {:#}", err)?;
            None
        }
    };

    report::print_summary(&records, out)?;
    if reports.is_some() {
        writeln!(
            out,
            "\nReports saved to: {}/{}.csv/xlsx",
            options.results_dir.display(),
            name
        )?;
    }

    Ok(Some(BatchSummary { records, reports }))
}

/// The `batch` subcommand: expand arguments, grade, print the outcome banner.
///
/// Failures are printed, never returned; `Ok(false)` means nothing was graded.
pub fn run<W: Write>(
    args: &[PathBuf],
    options: &BatchOptions,
    out: &mut W,
) -> anyhow::Result<bool> {
    writeln!(out, "\n===== EXCEL WORKSHEET BATCH GRADER =====")?;

    let files = discovery::collect_batch_inputs(args, out)?;
    let completed = match grade_all(&files, options, Local::now(), out) {
        Ok(summary) => summary.is_some(),
        Err(err) => {
            tracing::error!(error = ?err, "batch aborted");
            writeln!(out, "Error: {:#}", err)?;
            false
        }
    };

    if completed {
        writeln!(out, "\nBatch grading completed successfully!")?;
    } else {
        writeln!(out, "\nBatch grading failed or had no files to process.")?;
    }
    Ok(completed)
}

/// `<results>/<stem>_feedback.txt`
pub fn feedback_path_for(results_dir: &Path, submission: &Path) -> PathBuf {
    let stem = submission
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    results_dir.join(format!("{}_feedback.txt", stem))
}
