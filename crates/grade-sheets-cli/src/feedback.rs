//! Payload reported back to the grading platform

use std::fs;
use std::path::Path;

use grade_sheets::ScoreResult;
use serde::{Deserialize, Serialize};

/// `{"fractionalScore": <f64>, "feedback": "<text>"}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackPayload {
    #[serde(rename = "fractionalScore")]
    pub fractional_score: f64,
    pub feedback: String,
}

impl FeedbackPayload {
    pub fn new<S: Into<String>>(fractional_score: f64, feedback: S) -> Self {
        Self {
            fractional_score,
            feedback: feedback.into(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Write the JSON payload to `path`, replacing any previous file
    pub fn write_to(&self, path: &Path) -> anyhow::Result<()> {
        let json = self.to_json()?;
        fs::write(path, json)?;
        Ok(())
    }
}

impl From<&ScoreResult> for FeedbackPayload {
    fn from(result: &ScoreResult) -> Self {
        Self::new(result.score, result.feedback.clone())
    }
}
