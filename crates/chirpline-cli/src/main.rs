//! Chirpline CLI - Command-line interface for the bird-call timing game core
//!
//! This binary provides commands for validating level data, generating rounds,
//! rendering them to audio, and scoring them against a simulated player.

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use chirpline_cli::commands;
use chirpline_score::TimingLaw;

/// Chirpline - Bird Call Timing Game
#[derive(Parser)]
#[command(name = "chirpline")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the events for one round
    Generate {
        /// Path to the level JSON file
        #[arg(short, long)]
        level: String,

        /// Path to the clip catalog JSON file
        #[arg(short, long)]
        clips: String,

        /// Path to a pack modifiers JSON file
        #[arg(short, long)]
        pack: Option<String>,

        /// Round seed
        #[arg(short, long, default_value_t = 0)]
        seed: u32,

        /// Use the endless difficulty ramp instead of the level's fixed difficulty
        #[arg(long)]
        ramp: bool,

        /// Path to a custom difficulty ramp JSON file (implies --ramp)
        #[arg(long)]
        ramp_file: Option<String>,

        /// Session time at which the round starts, for ramped generation
        #[arg(long, default_value_t = 0)]
        offset_ms: i64,

        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate a round and render it to a stereo WAV file
    Render {
        /// Path to the level JSON file
        #[arg(short, long)]
        level: String,

        /// Path to the clip catalog JSON file
        #[arg(short, long)]
        clips: String,

        /// Directory clip file paths are resolved against
        #[arg(long, default_value = ".")]
        clip_root: String,

        /// Output WAV path
        #[arg(short, long)]
        out: String,

        /// Path to a pack modifiers JSON file
        #[arg(short, long)]
        pack: Option<String>,

        /// Round seed
        #[arg(short, long, default_value_t = 0)]
        seed: u32,

        /// Force the equal-power fallback panner
        #[arg(long)]
        no_native_pan: bool,

        /// Output sample rate (default: 48000)
        #[arg(long)]
        sample_rate: Option<u32>,
    },

    /// Play a round against a simulated player and report the score
    Simulate {
        /// Path to the level JSON file
        #[arg(short, long)]
        level: String,

        /// Path to the clip catalog JSON file
        #[arg(short, long)]
        clips: String,

        /// Path to a pack modifiers JSON file
        #[arg(short, long)]
        pack: Option<String>,

        /// Round seed (also seeds the player)
        #[arg(short, long, default_value_t = 0)]
        seed: u32,

        /// Player skill between 0 and 1
        #[arg(long, default_value_t = 0.7)]
        skill: f64,

        /// Timing law
        #[arg(long, default_value = "closest", value_parser = ["closest", "earlier"])]
        law: String,

        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a level, pack and clip catalog
    Validate {
        /// Path to the level JSON file
        #[arg(short, long)]
        level: String,

        /// Path to a pack modifiers JSON file
        #[arg(short, long)]
        pack: Option<String>,

        /// Path to the clip catalog JSON file
        #[arg(short, long)]
        clips: Option<String>,
    },
}

fn timing_law(name: &str) -> TimingLaw {
    match name {
        "earlier" => TimingLaw::EarlierIsBetter,
        _ => TimingLaw::ClosestToPerfect,
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Generate {
            level,
            clips,
            pack,
            seed,
            ramp,
            ramp_file,
            offset_ms,
            json,
        } => commands::generate::run(&commands::generate::GenerateArgs {
            level: &level,
            clips: &clips,
            pack: pack.as_deref(),
            seed,
            ramp,
            ramp_file: ramp_file.as_deref(),
            offset_ms,
            json,
        }),
        Commands::Render {
            level,
            clips,
            clip_root,
            out,
            pack,
            seed,
            no_native_pan,
            sample_rate,
        } => commands::render::run(&commands::render::RenderArgs {
            level: &level,
            clips: &clips,
            clip_root: &clip_root,
            out: &out,
            pack: pack.as_deref(),
            seed,
            no_native_pan,
            sample_rate,
        }),
        Commands::Simulate {
            level,
            clips,
            pack,
            seed,
            skill,
            law,
            json,
        } => commands::simulate::run(&commands::simulate::SimulateArgs {
            level: &level,
            clips: &clips,
            pack: pack.as_deref(),
            seed,
            skill,
            law: timing_law(&law),
            json,
        }),
        Commands::Validate { level, pack, clips } => {
            commands::validate::run(&level, pack.as_deref(), clips.as_deref())
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
