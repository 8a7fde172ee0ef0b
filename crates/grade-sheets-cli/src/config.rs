//! Grader configuration
//!
//! Values are layered, lowest precedence first: built-in defaults, an
//! optional TOML file, `GRADER_*` environment variables, then command-line
//! flags (applied by the binary).

use std::fs;
use std::path::{Path, PathBuf};

use grade_sheets::ScoreOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors while loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Complete configuration for every front end
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraderConfig {
    pub scoring: ScoringConfig,
    pub autograder: AutograderConfig,
    pub local: LocalConfig,
}

/// Which sheets and cells are compared
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub student_sheet: String,
    pub solution_sheet: String,
    /// 1-based, 5 = column E
    pub start_column: u32,
    /// 1-based
    pub row: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let defaults = ScoreOptions::default();
        Self {
            student_sheet: defaults.student_sheet,
            solution_sheet: defaults.solution_sheet,
            start_column: defaults.start_column,
            row: defaults.row,
        }
    }
}

impl ScoringConfig {
    pub fn options(&self) -> ScoreOptions {
        ScoreOptions {
            student_sheet: self.student_sheet.clone(),
            solution_sheet: self.solution_sheet.clone(),
            start_column: self.start_column,
            row: self.row,
        }
    }
}

/// Locations used inside the grading platform's container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutograderConfig {
    /// Part identifier this grader accepts
    pub part_id: String,
    /// Environment variable carrying the submitted part identifier
    pub part_id_env: String,
    pub submission_dir: PathBuf,
    pub submission_destination: PathBuf,
    pub reference: PathBuf,
    pub feedback_path: PathBuf,
}

impl Default for AutograderConfig {
    fn default() -> Self {
        Self {
            part_id: "Lg9eS".to_string(),
            part_id_env: "partId".to_string(),
            submission_dir: PathBuf::from("/shared/submission"),
            submission_destination: PathBuf::from("/grader/submission.xlsx"),
            reference: PathBuf::from("/grader/solution.xlsx"),
            feedback_path: PathBuf::from("/shared/feedback.json"),
        }
    }
}

/// Paths for the local `batch` and `upload` tools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    pub reference: PathBuf,
    pub results_dir: PathBuf,
    pub uploads_dir: PathBuf,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            reference: PathBuf::from("solution.xlsx"),
            results_dir: PathBuf::from("results"),
            uploads_dir: PathBuf::from("uploads"),
        }
    }
}

impl GraderConfig {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Read and parse a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Defaults, overlaid with `path` when given.
    ///
    /// An unreadable or malformed file is reported and the defaults are used.
    pub fn load(path: Option<&Path>) -> Self {
        match path {
            None => Self::default(),
            Some(path) => Self::from_file(path).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "using default configuration");
                Self::default()
            }),
        }
    }

    /// Apply `GRADER_*` overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply `GRADER_*` overrides from an arbitrary lookup
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(reference) = lookup("GRADER_REFERENCE") {
            let reference = PathBuf::from(reference);
            self.autograder.reference = reference.clone();
            self.local.reference = reference;
        }
        if let Some(sheet) = lookup("GRADER_STUDENT_SHEET") {
            self.scoring.student_sheet = sheet;
        }
        if let Some(sheet) = lookup("GRADER_SOLUTION_SHEET") {
            self.scoring.solution_sheet = sheet;
        }
        if let Some(raw) = lookup("GRADER_START_COLUMN") {
            match raw.trim().parse::<u32>() {
                Ok(column) => self.scoring.start_column = column,
                Err(_) => tracing::warn!(value = %raw, "ignoring invalid GRADER_START_COLUMN"),
            }
        }
        if let Some(part_id) = lookup("GRADER_PART_ID") {
            self.autograder.part_id = part_id;
        }
    }
}
