//! Upload a single spreadsheet into the uploads folder and grade it

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Local};
use grade_sheets::{grade_files, is_excel_path, GradeError, ScoreOptions, ScoreResult};

use crate::config::GraderConfig;

/// Settings for one upload
#[derive(Debug, Clone)]
pub struct UploadOptions {
    pub reference: PathBuf,
    pub uploads_dir: PathBuf,
    pub scoring: ScoreOptions,
}

impl From<&GraderConfig> for UploadOptions {
    fn from(config: &GraderConfig) -> Self {
        Self {
            reference: config.local.reference.clone(),
            uploads_dir: config.local.uploads_dir.clone(),
            scoring: config.scoring.options(),
        }
    }
}

/// A graded upload
#[derive(Debug)]
pub struct UploadReport {
    /// Where the graded copy lives
    pub destination: PathBuf,
    pub feedback_path: PathBuf,
    /// False when the file was already inside the uploads folder
    pub copied: bool,
    pub result: ScoreResult,
}

/// Ask for a path on `out` and read one line from `input`
pub fn prompt_for_path<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<PathBuf> {
    write!(out, "Enter the path to the Excel file: ")?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(PathBuf::from(line.trim_end_matches(['\r', '\n'])))
}

/// Timestamped destination: `<uploads>/<stem>_<YYYYmmdd_HHMMSS>.<ext>`
pub fn destination_for(uploads_dir: &Path, file: &Path, now: &DateTime<Local>) -> PathBuf {
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match file.extension() {
        Some(ext) => format!(
            "{}_{}.{}",
            stem,
            now.format("%Y%m%d_%H%M%S"),
            ext.to_string_lossy()
        ),
        None => format!("{}_{}", stem, now.format("%Y%m%d_%H%M%S")),
    };
    uploads_dir.join(name)
}

/// `<destination without extension>_feedback.txt`
pub fn feedback_path_for(destination: &Path) -> PathBuf {
    let mut path = destination.with_extension("").into_os_string();
    path.push("_feedback.txt");
    PathBuf::from(path)
}

/// Whether `file` sits directly inside `dir` (after resolving both)
fn is_inside(file: &Path, dir: &Path) -> bool {
    let parent = match file.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Path::new("."),
        Some(parent) => parent,
        None => return false,
    };

    match (fs::canonicalize(parent), fs::canonicalize(dir)) {
        (Ok(parent), Ok(dir)) => parent == dir,
        _ => false,
    }
}

/// Copy `file` into the uploads folder (unless it is already there), grade
/// it and save the feedback next to the graded copy.
pub fn upload_and_grade<W: Write>(
    file: &Path,
    options: &UploadOptions,
    now: DateTime<Local>,
    out: &mut W,
) -> anyhow::Result<UploadReport> {
    fs::create_dir_all(&options.uploads_dir).with_context(|| {
        format!(
            "Failed to create uploads folder '{}'",
            options.uploads_dir.display()
        )
    })?;

    if !file.exists() {
        return Err(GradeError::FileNotFound(file.to_path_buf()).into());
    }
    if !is_excel_path(file) {
        return Err(GradeError::UnsupportedFileType(file.to_path_buf()).into());
    }

    let (destination, copied) = if is_inside(file, &options.uploads_dir) {
        writeln!(out, "File already in uploads folder")?;
        (file.to_path_buf(), false)
    } else {
        let destination = destination_for(&options.uploads_dir, file, &now);
        fs::copy(file, &destination).map_err(|source| GradeError::CopyFailure {
            from: file.to_path_buf(),
            to: destination.clone(),
            source,
        })?;
        writeln!(out, "File uploaded to: {}", destination.display())?;
        (destination, true)
    };

    let display_name = destination
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    writeln!(out, "\n===== GRADING: {} =====", display_name)?;

    let result = grade_files(&destination, &options.reference, &options.scoring);

    writeln!(out, "\n{}", "=".repeat(50))?;
    writeln!(out, "{}", result.feedback)?;
    writeln!(out, "{}", "=".repeat(50))?;

    let feedback_path = feedback_path_for(&destination);
    fs::write(&feedback_path, &result.feedback)
        .with_context(|| format!("Failed to save feedback to '{}'", feedback_path.display()))?;
    writeln!(out, "Feedback saved to: {}", feedback_path.display())?;

    Ok(UploadReport {
        destination,
        feedback_path,
        copied,
        result,
    })
}

/// The `upload` subcommand: grade one file and print the outcome banner
pub fn run<W: Write>(file: &Path, options: &UploadOptions, out: &mut W) -> anyhow::Result<bool> {
    match upload_and_grade(file, options, Local::now(), out) {
        Ok(_) => {
            writeln!(out, "\nProcess completed successfully!")?;
            Ok(true)
        }
        Err(err) => {
            match err.downcast_ref::<GradeError>() {
                Some(GradeError::CopyFailure { source, .. }) => {
                    writeln!(out, "Error copying file: {}", source)?
                }
                Some(grade_error) => writeln!(out, "{}", upload_message(grade_error))?,
                None => writeln!(out, "Error: {:#}", err)?,
            }
            writeln!(out, "\nUpload failed. Please check the file and try again.")?;
            Ok(false)
        }
    }
}

fn upload_message(error: &GradeError) -> String {
    match error {
        GradeError::UnsupportedFileType(_) => format!("Error: {}", error.feedback()),
        _ => error.feedback(),
    }
}
