//! Simulate command implementation
//!
//! Plays a generated round against a seeded simulated player. Inputs are
//! routed through the open-window tracker, so windows that close without a
//! matching input are scored as misses exactly as a live host would.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::process::ExitCode;

use chirpline_generate::{derive_component_seed, sort_chronological, GameRng};
use chirpline_score::{
    PlayerInput, ScoreAggregate, ScoreBreakdown, ScoreEvaluator, ScoringConfig, TimingLaw,
    WindowTracker,
};
use chirpline_spec::GameEvent;

use crate::input::{load_clips, load_level, load_optional_pack};
use crate::round::{build_round, Pacing, Round};

/// Options for the simulate command.
#[derive(Debug, Clone)]
pub struct SimulateArgs<'a> {
    pub level: &'a str,
    pub clips: &'a str,
    pub pack: Option<&'a str>,
    pub seed: u32,
    /// Player skill in `[0, 1]`.
    pub skill: f64,
    pub law: TimingLaw,
    pub json: bool,
}

/// Seeded stand-in for a human player.
///
/// Higher skill answers more often, closer to the scheduled time, and with
/// the right species and channel more often.
#[derive(Debug, Clone)]
pub struct SimulatedPlayer {
    rng: GameRng,
    skill: f64,
}

impl SimulatedPlayer {
    pub fn new(seed: u32, skill: f64) -> Self {
        let skill = if skill.is_finite() {
            skill.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            rng: GameRng::new(derive_component_seed(seed, "player")),
            skill,
        }
    }

    pub fn skill(&self) -> f64 {
        self.skill
    }

    /// The player's answer to one event, if they answer at all.
    ///
    /// Every call takes the same number of draws so answers stay aligned
    /// with events regardless of earlier outcomes.
    pub fn respond(&mut self, event: &GameEvent, species: &[String]) -> Option<PlayerInput> {
        let answers = self.rng.chance(0.35 + 0.65 * self.skill);
        // Low skill can land outside the window.
        let spread = ((1.0 - self.skill) * event.window_width_ms() as f64 * 0.6).round() as i64;
        let offset = self.rng.range_inclusive(-spread, spread);
        let knows_species = self.rng.chance(self.skill);
        let guess = self.rng.pick(species);
        let knows_channel = self.rng.chance(0.5 + self.skill / 2.0);

        if !answers {
            return None;
        }
        let species_code = match guess {
            Some(code) if !knows_species => code.clone(),
            _ => event.species_code.clone(),
        };
        let channel = if knows_channel {
            event.channel
        } else {
            event.channel.opposite()
        };
        Some(PlayerInput::new(
            species_code,
            channel,
            event.scheduled_time_ms + offset,
        ))
    }
}

/// Outcome of a simulated round.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub seed: u32,
    pub skill: f64,
    pub timing_law: TimingLaw,
    pub inputs: usize,
    pub stray_inputs: u32,
    pub results: Vec<ScoreBreakdown>,
    pub aggregate: ScoreAggregate,
    pub accuracy_percent: f64,
}

/// Plays a round against a simulated player.
pub fn simulate_round(
    round: &Round,
    player: &mut SimulatedPlayer,
    scoring: ScoringConfig,
) -> SimulationReport {
    let mut events = round.events.clone();
    sort_chronological(&mut events);

    let mut inputs: Vec<PlayerInput> = events
        .iter()
        .filter_map(|event| player.respond(event, &round.species))
        .collect();
    inputs.sort_by_key(|input| input.timestamp_ms);

    let mut evaluator = ScoreEvaluator::new(scoring);
    let mut tracker = WindowTracker::new();
    let mut results = Vec::new();
    let mut upcoming = events.into_iter().peekable();

    for input in &inputs {
        while let Some(event) = upcoming.next_if(|e| e.scoring_window_start_ms <= input.timestamp_ms) {
            tracker.register(event);
        }
        results.extend(tracker.close_expired(input.timestamp_ms, &mut evaluator));
        results.extend(tracker.submit(input, &mut evaluator));
    }
    tracker.register_all(upcoming);
    results.extend(tracker.close_all(&mut evaluator));

    SimulationReport {
        seed: round.seed,
        skill: player.skill(),
        timing_law: scoring.timing_law,
        inputs: inputs.len(),
        stray_inputs: tracker.stray_inputs(),
        results,
        aggregate: *evaluator.aggregate(),
        accuracy_percent: evaluator.accuracy_percent(),
    }
}

/// Run the simulate command
///
/// # Returns
/// Exit code: 0 on success
pub fn run(args: &SimulateArgs<'_>) -> Result<ExitCode> {
    let level = load_level(args.level)?;
    let pool = load_clips(args.clips)?;
    let pack = load_optional_pack(args.pack)?;
    let round = build_round(&level, &pool, pack.as_ref(), args.seed, &Pacing::Level)
        .with_context(|| format!("cannot generate level {}", level.level_id))?;

    let mut player = SimulatedPlayer::new(args.seed, args.skill);
    let scoring = ScoringConfig::default().with_timing_law(args.law);
    let report = simulate_round(&round, &mut player, scoring);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!(
        "{} level {} seed {} skill {:.2} ({})",
        "Simulating:".cyan().bold(),
        round.level_id,
        report.seed,
        report.skill,
        report.timing_law
    );
    for result in &report.results {
        let feedback = result.feedback.to_string();
        let feedback = match result.feedback {
            chirpline_score::FeedbackType::Perfect => feedback.green(),
            chirpline_score::FeedbackType::Good => feedback.cyan(),
            chirpline_score::FeedbackType::Partial => feedback.yellow(),
            chirpline_score::FeedbackType::Miss => feedback.red(),
        };
        println!(
            "  {:<10} {:>4} pts  {}",
            result.event_id, result.total_points, feedback
        );
    }

    let agg = &report.aggregate;
    println!(
        "{} {} / {} points ({:.1}%)",
        "Score:".green().bold(),
        agg.total_points,
        agg.max_possible_points,
        report.accuracy_percent
    );
    println!(
        "  {} events, {} perfect, {} missed, {} species right, {} channel right, {} stray inputs",
        agg.events_scored,
        agg.perfect_count,
        agg.miss_count,
        agg.species_correct,
        agg.channel_correct,
        report.stray_inputs
    );
    Ok(ExitCode::SUCCESS)
}
