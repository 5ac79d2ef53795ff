//! Validate command implementation
//!
//! Checks a level, and optionally a pack and clip catalog, before any round is
//! generated from them.

use anyhow::Result;
use colored::Colorize;
use std::process::ExitCode;

use chirpline_spec::validation::{validate_level, validate_pack, validate_pool};
use chirpline_spec::{ConfigError, GameError};

use crate::input::{load_clips, load_level, load_pack};

/// Result of one validation check.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    /// What was checked (`level`, `pack`, `clips`).
    pub subject: &'static str,
    pub path: String,
    pub error: Option<ConfigError>,
}

impl CheckOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Runs every requested check. Files that fail to load are reported as errors
/// through the returned `Result`.
pub fn check_all(level: &str, pack: Option<&str>, clips: Option<&str>) -> Result<Vec<CheckOutcome>> {
    let mut outcomes = vec![CheckOutcome {
        subject: "level",
        path: level.to_string(),
        error: validate_level(&load_level(level)?).err(),
    }];
    if let Some(path) = pack {
        outcomes.push(CheckOutcome {
            subject: "pack",
            path: path.to_string(),
            error: validate_pack(&load_pack(path)?).err(),
        });
    }
    if let Some(path) = clips {
        outcomes.push(CheckOutcome {
            subject: "clips",
            path: path.to_string(),
            error: validate_pool(&load_clips(path)?).err(),
        });
    }
    Ok(outcomes)
}

/// Run the validate command
///
/// # Returns
/// Exit code: 0 if valid, 1 if invalid
pub fn run(level: &str, pack: Option<&str>, clips: Option<&str>) -> Result<ExitCode> {
    println!("{} {}", "Validating:".cyan().bold(), level);

    let outcomes = check_all(level, pack, clips)?;
    for outcome in &outcomes {
        match &outcome.error {
            None => println!("  {} {} {}", "ok".green(), outcome.subject, outcome.path),
            Some(err) => println!(
                "  {} {} {}: [{}] {}",
                "error".red().bold(),
                outcome.subject,
                outcome.path,
                err.code(),
                err.message()
            ),
        }
    }

    if outcomes.iter().all(CheckOutcome::is_ok) {
        println!("{}", "Valid".green().bold());
        Ok(ExitCode::SUCCESS)
    } else {
        println!("{}", "Invalid".red().bold());
        Ok(ExitCode::from(1))
    }
}
