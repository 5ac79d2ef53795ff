//! Procedural event generation.
//!
//! Both generators walk a virtual clock from [`ROUND_LEAD_IN_MS`] to the last
//! schedulable instant of the round, emitting one primary event per step and,
//! with the configured probability, a secondary event on the opposite channel
//! within ±[`OVERLAP_OFFSET_MS`] of it. They differ only in where the
//! per-step [`DifficultyParams`] come from: [`EventGenerator`] computes them
//! once per round, [`RampedGenerator`] reads them off a [`DifficultyRamp`] at
//! the current session time.

use chirpline_spec::validation::{validate_level, validate_pack, validate_pool};
use chirpline_spec::{
    Channel, ClipMeta, ConfigError, DifficultyParams, GameEvent, LevelConfig, PackModifiers,
    SpeciesEntry, SpeciesPool, TimeMs, ROUND_LEAD_IN_MS,
};
use tracing::debug;

use crate::difficulty::{calculate, select_vocalization_type};
use crate::overlap::count_overlaps;
use crate::ramp::DifficultyRamp;
use crate::rng::GameRng;

/// Largest distance between a secondary event and its primary.
pub const OVERLAP_OFFSET_MS: TimeMs = 200;

/// Upper bound on gap-widening passes in no-overlap mode.
const MAX_WIDEN_PASSES: usize = 8;

/// Source of difficulty parameters over round time.
pub trait ParamSchedule {
    /// Parameters in effect at `round_ms` on the round timeline.
    fn params_at(&self, round_ms: TimeMs) -> DifficultyParams;
}

impl ParamSchedule for DifficultyParams {
    fn params_at(&self, _round_ms: TimeMs) -> DifficultyParams {
        *self
    }
}

/// Ramp schedule anchored at a session offset.
struct RampSchedule<'a> {
    ramp: &'a DifficultyRamp,
    pack: Option<&'a PackModifiers>,
    session_offset_ms: TimeMs,
}

impl ParamSchedule for RampSchedule<'_> {
    fn params_at(&self, round_ms: TimeMs) -> DifficultyParams {
        self.ramp
            .params_at(self.session_offset_ms + round_ms, self.pack)
    }
}

/// Base generator: difficulty is fixed for the whole round.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventGenerator;

impl EventGenerator {
    /// Creates a generator.
    pub fn new() -> Self {
        Self
    }

    /// Generates the events for one round.
    ///
    /// Identical RNG state, level, pool and pack give an identical sequence.
    pub fn generate(
        &self,
        rng: &mut GameRng,
        level: &LevelConfig,
        pool: &SpeciesPool,
        pack: Option<&PackModifiers>,
    ) -> Result<Vec<GameEvent>, ConfigError> {
        let params = calculate(level, pack);
        generate_with(rng, level, pool, pack, &params)
    }
}

/// Ramped generator for endless play.
#[derive(Debug, Clone, Default)]
pub struct RampedGenerator {
    ramp: DifficultyRamp,
    session_offset_ms: TimeMs,
}

impl RampedGenerator {
    /// Creates a generator starting at session time zero.
    pub fn new(ramp: DifficultyRamp) -> Self {
        Self {
            ramp,
            session_offset_ms: 0,
        }
    }

    /// Starts the round at a later point of the session.
    ///
    /// Endless mode passes the accumulated session time here so difficulty
    /// keeps climbing across consecutive rounds.
    pub fn with_session_offset(mut self, offset_ms: TimeMs) -> Self {
        self.session_offset_ms = offset_ms;
        self
    }

    /// Returns the ramp.
    pub fn ramp(&self) -> &DifficultyRamp {
        &self.ramp
    }

    /// Session time at which round time zero falls.
    pub fn session_offset_ms(&self) -> TimeMs {
        self.session_offset_ms
    }

    /// Generates the events for one round.
    ///
    /// The level's density tier, overlap probability and scoring window are
    /// superseded by the ramp; its duration and no-overlap flag still apply.
    pub fn generate(
        &self,
        rng: &mut GameRng,
        level: &LevelConfig,
        pool: &SpeciesPool,
        pack: Option<&PackModifiers>,
    ) -> Result<Vec<GameEvent>, ConfigError> {
        let schedule = RampSchedule {
            ramp: &self.ramp,
            pack,
            session_offset_ms: self.session_offset_ms,
        };
        generate_with(rng, level, pool, pack, &schedule)
    }
}

/// Runs the generation loop against any parameter schedule.
pub fn generate_with<S: ParamSchedule>(
    rng: &mut GameRng,
    level: &LevelConfig,
    pool: &SpeciesPool,
    pack: Option<&PackModifiers>,
    schedule: &S,
) -> Result<Vec<GameEvent>, ConfigError> {
    validate_level(level)?;
    if let Some(pack) = pack {
        validate_pack(pack)?;
    }
    validate_pool(pool)?;

    let filter_vocalization = pack.and_then(|p| p.vocalization_weights).is_some();
    let last_ms = level.last_event_ms();
    let mut clock = ROUND_LEAD_IN_MS;
    let mut events: Vec<GameEvent> = Vec::new();

    while clock < last_ms {
        let params = schedule.params_at(clock);
        let half = params.half_window_ms();

        let channel = Channel::ALL[rng.index(Channel::ALL.len())];
        let (species, clip) = pick_clip(rng, pool, &params, filter_vocalization)?;
        let primary = build_event(events.len() + 1, species, clip, channel, clock, half);
        let primary_duration = TimeMs::from(primary.duration_ms);
        events.push(primary);

        if !level.no_overlap && rng.chance(params.overlap_probability) {
            let offset = rng.range_inclusive(-OVERLAP_OFFSET_MS, OVERLAP_OFFSET_MS);
            let time = (clock + offset).clamp(ROUND_LEAD_IN_MS, last_ms);
            let (species, clip) = pick_clip(rng, pool, &params, filter_vocalization)?;
            let secondary =
                build_event(events.len() + 1, species, clip, channel.opposite(), time, half);
            events.push(secondary);
        }

        let mut gap = rng.range_inclusive(params.min_gap_ms, params.max_gap_ms);
        if level.no_overlap {
            gap = widen_gap(schedule, clock, gap, half, primary_duration);
        }
        clock += gap.max(1);
    }

    debug!(
        level = level.level_id,
        events = events.len(),
        overlaps = count_overlaps(&events),
        draws = rng.draws(),
        "generated round"
    );
    Ok(events)
}

/// Widens a gap so the next window cannot intersect the current one and the
/// current clip has finished before the next event.
fn widen_gap<S: ParamSchedule>(
    schedule: &S,
    clock: TimeMs,
    gap: TimeMs,
    half: TimeMs,
    clip_duration: TimeMs,
) -> TimeMs {
    let mut gap = gap.max(clip_duration);
    for _ in 0..MAX_WIDEN_PASSES {
        let required = half + schedule.params_at(clock + gap).half_window_ms();
        if gap >= required {
            break;
        }
        gap = required;
    }
    gap
}

fn pick_clip<'a>(
    rng: &mut GameRng,
    pool: &'a SpeciesPool,
    params: &DifficultyParams,
    filter_vocalization: bool,
) -> Result<(&'a SpeciesEntry, &'a ClipMeta), ConfigError> {
    if filter_vocalization {
        let draw = rng.next_unit();
        if let Some(voc) = select_vocalization_type(&params.vocalization_weights, draw) {
            let candidates: Vec<&SpeciesEntry> = pool
                .species()
                .iter()
                .filter(|s| s.has_vocalization(voc))
                .collect();
            if let Some(species) = rng.pick(&candidates).copied() {
                let clips: Vec<&ClipMeta> = species.clips_of(voc).collect();
                if let Some(clip) = rng.pick(&clips).copied() {
                    return Ok((species, clip));
                }
            }
        }
    }

    let species = rng
        .pick(pool.species())
        .ok_or(ConfigError::EmptySpeciesPool)?;
    let clip = rng
        .pick(&species.clips)
        .ok_or_else(|| ConfigError::SpeciesWithoutClips {
            species: species.code.clone(),
        })?;
    Ok((species, clip))
}

fn build_event(
    ordinal: usize,
    species: &SpeciesEntry,
    clip: &ClipMeta,
    channel: Channel,
    time_ms: TimeMs,
    half_window_ms: TimeMs,
) -> GameEvent {
    GameEvent {
        event_id: format!("evt_{ordinal:04}"),
        clip_id: clip.clip_id.clone(),
        file_path: clip.file_path.clone(),
        species_code: species.code.clone(),
        channel,
        scheduled_time_ms: time_ms,
        scoring_window_start_ms: time_ms - half_window_ms,
        scoring_window_end_ms: time_ms + half_window_ms,
        duration_ms: clip.duration_ms,
        vocalization_type: clip.vocalization_type,
    }
}
