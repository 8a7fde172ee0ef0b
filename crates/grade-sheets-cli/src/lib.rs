//! # grade-sheets-cli
//!
//! The pieces behind the `grade` binary: configuration, submission
//! discovery, the three front ends (`autograde`, `batch`, `upload`) and
//! report generation. Each front end writes its user-facing text to a
//! caller-supplied writer so it can be exercised without a terminal.

pub mod autograder;
pub mod batch;
pub mod config;
pub mod discovery;
pub mod feedback;
pub mod report;
pub mod upload;

pub use config::{AutograderConfig, ConfigError, GraderConfig, LocalConfig, ScoringConfig};
pub use feedback::FeedbackPayload;

use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `verbosity` picks the level
/// (0 = warn, 1 = info, 2+ = debug).
pub fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A subscriber may already be installed (tests); keep the first one
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
