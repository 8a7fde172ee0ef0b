//! grade - spreadsheet autograder

use anyhow::Result;
use clap::{Parser, Subcommand};
use grade_sheets_cli::batch::{self, BatchOptions};
use grade_sheets_cli::upload::{self, UploadOptions};
use grade_sheets_cli::{autograder, init_logging, GraderConfig};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "grade")]
#[command(
    author,
    version,
    about = "Score spreadsheet submissions against a reference workbook"
)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade the submission provided by the grading platform
    Autograde,

    /// Grade every spreadsheet in the given files and directories
    Batch {
        /// Files or directories (default: current directory)
        paths: Vec<PathBuf>,

        /// Reference workbook
        #[arg(long)]
        reference: Option<PathBuf>,

        /// Folder for feedback files and summary reports
        #[arg(long)]
        results_dir: Option<PathBuf>,
    },

    /// Copy one spreadsheet into the uploads folder and grade it
    Upload {
        /// Spreadsheet to grade (prompted for when omitted)
        file: Option<PathBuf>,

        /// Reference workbook
        #[arg(long)]
        reference: Option<PathBuf>,

        /// Folder receiving uploaded copies
        #[arg(long)]
        uploads_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = GraderConfig::load(cli.config.as_deref());
    config.apply_env_overrides();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Autograde => {
            let part_id = std::env::var(&config.autograder.part_id_env).unwrap_or_default();
            autograder::run(&config, &part_id, &mut out, &mut io::stderr())?;
        }
        Commands::Batch {
            paths,
            reference,
            results_dir,
        } => {
            let mut options = BatchOptions::from(&config);
            if let Some(reference) = reference {
                options.reference = reference;
            }
            if let Some(results_dir) = results_dir {
                options.results_dir = results_dir;
            }
            batch::run(&paths, &options, &mut out)?;
        }
        Commands::Upload {
            file,
            reference,
            uploads_dir,
        } => {
            let mut options = UploadOptions::from(&config);
            if let Some(reference) = reference {
                options.reference = reference;
            }
            if let Some(uploads_dir) = uploads_dir {
                options.uploads_dir = uploads_dir;
            }

            writeln!(out, "\n===== EXCEL WORKSHEET UPLOADER & GRADER =====")?;
            let file = match file {
                Some(file) => file,
                None => upload::prompt_for_path(&mut io::stdin().lock(), &mut out)?,
            };
            upload::run(&file, &options, &mut out)?;
        }
    }

    Ok(())
}
