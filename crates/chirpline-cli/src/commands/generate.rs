//! Generate command implementation
//!
//! Generates the events for one round and prints them as a table or JSON.

use anyhow::{Context, Result};
use colored::Colorize;
use std::process::ExitCode;

use crate::input::{load_clips, load_level, load_optional_pack, load_ramp};
use crate::round::{build_round, Pacing};
use chirpline_generate::DifficultyRamp;

/// Options for the generate command.
#[derive(Debug, Clone, Default)]
pub struct GenerateArgs<'a> {
    pub level: &'a str,
    pub clips: &'a str,
    pub pack: Option<&'a str>,
    pub seed: u32,
    /// Use the endless ramp instead of the level's fixed difficulty.
    pub ramp: bool,
    /// Custom ramp file; implies `ramp`.
    pub ramp_file: Option<&'a str>,
    pub offset_ms: i64,
    pub json: bool,
}

/// Run the generate command
///
/// # Returns
/// Exit code: 0 on success
pub fn run(args: &GenerateArgs<'_>) -> Result<ExitCode> {
    let level = load_level(args.level)?;
    let pool = load_clips(args.clips)?;
    let pack = load_optional_pack(args.pack)?;

    let pacing = match (args.ramp_file, args.ramp) {
        (Some(path), _) => Pacing::Ramp {
            ramp: load_ramp(path)?,
            offset_ms: args.offset_ms,
        },
        (None, true) => Pacing::Ramp {
            ramp: DifficultyRamp::endless(),
            offset_ms: args.offset_ms,
        },
        (None, false) => Pacing::Level,
    };

    let round = build_round(&level, &pool, pack.as_ref(), args.seed, &pacing)
        .with_context(|| format!("cannot generate level {}", level.level_id))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&round)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!(
        "{} level {} seed {} ({} ms, species: {})",
        "Generated:".cyan().bold(),
        round.level_id,
        round.seed,
        round.round_duration_ms,
        round.species.join(", ")
    );
    println!(
        "  {:<10} {:>8} {:<6} {:<8} {:<12} {:>8}",
        "id".dimmed(),
        "time".dimmed(),
        "chan".dimmed(),
        "species".dimmed(),
        "window".dimmed(),
        "dur".dimmed()
    );
    for event in &round.events {
        let window = format!(
            "{}-{}",
            event.scoring_window_start_ms, event.scoring_window_end_ms
        );
        println!(
            "  {:<10} {:>8} {:<6} {:<8} {:<12} {:>8}",
            event.event_id,
            event.scheduled_time_ms,
            event.channel.as_str(),
            event.species_code,
            window,
            event.duration_ms
        );
    }
    println!(
        "{} {} events, {} overlapping pairs",
        "Total:".green().bold(),
        round.events.len(),
        round.overlap_count
    );
    Ok(ExitCode::SUCCESS)
}
