//! Round setup shared by the commands.

use chirpline_generate::{
    count_overlaps, select_species, DifficultyRamp, EventGenerator, GameRng, RampedGenerator,
};
use chirpline_spec::{ConfigError, GameEvent, LevelConfig, PackModifiers, SpeciesPool, TimeMs};
use serde::Serialize;

/// How difficulty is chosen for a round.
#[derive(Debug, Clone, Default)]
pub enum Pacing {
    /// Fixed difficulty from the level and pack.
    #[default]
    Level,
    /// Difficulty follows a ramp from a session offset.
    Ramp {
        ramp: DifficultyRamp,
        offset_ms: TimeMs,
    },
}

/// A generated round.
#[derive(Debug, Clone, Serialize)]
pub struct Round {
    pub seed: u32,
    pub level_id: u32,
    pub round_duration_ms: TimeMs,
    /// Species drawn for the round, sorted by code.
    pub species: Vec<String>,
    pub overlap_count: usize,
    pub events: Vec<GameEvent>,
}

/// Draws the round's species and generates its events.
///
/// Species are drawn from a child stream so that the event stream only
/// depends on the seed and the chosen set.
pub fn build_round(
    level: &LevelConfig,
    pool: &SpeciesPool,
    pack: Option<&PackModifiers>,
    seed: u32,
    pacing: &Pacing,
) -> Result<Round, ConfigError> {
    let mut rng = GameRng::new(seed);
    let mut selector = rng.fork("species");
    let chosen = select_species(pool, level.species_count as usize, &mut selector);

    let events = match pacing {
        Pacing::Level => EventGenerator::new().generate(&mut rng, level, &chosen, pack)?,
        Pacing::Ramp { ramp, offset_ms } => RampedGenerator::new(ramp.clone())
            .with_session_offset(*offset_ms)
            .generate(&mut rng, level, &chosen, pack)?,
    };

    Ok(Round {
        seed,
        level_id: level.level_id,
        round_duration_ms: level.round_duration_ms(),
        species: chosen.codes().into_iter().map(str::to_string).collect(),
        overlap_count: count_overlaps(&events),
        events,
    })
}
