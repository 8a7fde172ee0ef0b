//! Grading-platform entry point
//!
//! The platform drops one submission into a shared directory, sets the part
//! identifier in the environment and expects a JSON payload on stdout (and in
//! a feedback file).

use std::fs;
use std::io::Write;

use grade_sheets::{grade_files, GradeError, ScoreResult};

use crate::config::GraderConfig;
use crate::discovery;
use crate::feedback::FeedbackPayload;

/// Grade the platform submission for `part_id` and report the payload.
///
/// Every failure ends up as a zero-score payload; diagnostics go to `err`.
pub fn run<O: Write, E: Write>(
    config: &GraderConfig,
    part_id: &str,
    out: &mut O,
    err: &mut E,
) -> anyhow::Result<FeedbackPayload> {
    let result = match grade_submission(config, part_id) {
        Ok(result) => result,
        Err(error) => {
            match &error {
                GradeError::ConfigurationMismatch { .. } => {
                    writeln!(
                        err,
                        "Cannot find matching partId. Please double check your partId's"
                    )?;
                }
                GradeError::CopyFailure { source, .. } => {
                    writeln!(err, "Error copying submission: {}", source)?;
                }
                _ => {}
            }
            tracing::warn!(error = %error, "submission not graded");
            ScoreResult::from_error(&error)
        }
    };

    let payload = FeedbackPayload::from(&result);
    send_feedback(config, &payload, out, err)?;
    Ok(payload)
}

fn grade_submission(config: &GraderConfig, part_id: &str) -> Result<ScoreResult, GradeError> {
    let settings = &config.autograder;

    if part_id != settings.part_id {
        return Err(GradeError::ConfigurationMismatch {
            expected: settings.part_id.clone(),
            actual: part_id.to_string(),
        });
    }

    let learner_file = discovery::find_submission(&settings.submission_dir)?;
    tracing::info!(path = %learner_file.display(), "found submission");

    fs::copy(&learner_file, &settings.submission_destination).map_err(|source| {
        GradeError::CopyFailure {
            from: learner_file.clone(),
            to: settings.submission_destination.clone(),
            source,
        }
    })?;

    Ok(grade_files(
        &settings.submission_destination,
        &settings.reference,
        &config.scoring.options(),
    ))
}

/// Print the payload and persist it; a failed file write is only reported
fn send_feedback<O: Write, E: Write>(
    config: &GraderConfig,
    payload: &FeedbackPayload,
    out: &mut O,
    err: &mut E,
) -> anyhow::Result<()> {
    writeln!(out, "{}", payload.to_json()?)?;

    let path = &config.autograder.feedback_path;
    if let Err(error) = payload.write_to(path) {
        tracing::error!(path = %path.display(), error = %error, "cannot write feedback file");
        writeln!(err, "Error writing feedback: {}", error)?;
    }

    Ok(())
}
