//! Finding spreadsheets on disk

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use grade_sheets::{is_excel_path, GradeError};

/// Spreadsheet files directly inside `dir`, sorted by path.
///
/// Not recursive. The extension check is case-insensitive.
pub fn excel_files_in(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && is_excel_path(&path) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// First spreadsheet in the submission directory
pub fn find_submission(dir: &Path) -> Result<PathBuf, GradeError> {
    let files = excel_files_in(dir).map_err(|err| {
        tracing::warn!(dir = %dir.display(), error = %err, "cannot list submission directory");
        GradeError::SubmissionNotFound(dir.to_path_buf())
    })?;

    files
        .into_iter()
        .next()
        .ok_or_else(|| GradeError::SubmissionNotFound(dir.to_path_buf()))
}

/// Expand batch arguments into the files to grade.
///
/// No arguments means the current directory. Directories contribute their
/// spreadsheets; spreadsheet files are taken as given; anything else is
/// reported on `out` and skipped.
pub fn collect_batch_inputs<W: Write>(args: &[PathBuf], out: &mut W) -> io::Result<Vec<PathBuf>> {
    if args.is_empty() {
        writeln!(out, "Processing all Excel files in current directory.")?;
        return list_or_warn(Path::new("."));
    }

    let mut files = Vec::new();
    for arg in args {
        if arg.is_dir() {
            writeln!(out, "Processing directory: {}", arg.display())?;
            files.extend(list_or_warn(arg)?);
        } else if arg.is_file() && is_excel_path(arg) {
            files.push(arg.clone());
        } else {
            tracing::warn!(path = %arg.display(), "skipping input");
            writeln!(
                out,
                "Skipping '{}' - not an Excel file or directory",
                arg.display()
            )?;
        }
    }

    Ok(files)
}

fn list_or_warn(dir: &Path) -> io::Result<Vec<PathBuf>> {
    match excel_files_in(dir) {
        Ok(files) => Ok(files),
        Err(err) => {
            tracing::warn!(dir = %dir.display(), error = %err, "cannot list directory");
            Ok(Vec::new())
        }
    }
}
