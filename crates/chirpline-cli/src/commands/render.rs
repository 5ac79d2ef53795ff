//! Render command implementation
//!
//! Generates a round, sounds it through the playback scheduler against a
//! manual clock, and writes the mixed stereo output to a WAV file.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};

use chirpline_generate::sort_chronological;
use chirpline_playback::{
    write_stereo_wav, ClipFetcher, ManualClock, PlaybackScheduler, ScheduleError,
    SchedulerConfig, StaticProbe, StereoOutput, WavFileFetcher,
};
use chirpline_spec::{GameEvent, TimeMs};

use crate::input::{load_clips, load_level, load_optional_pack};
use crate::round::{build_round, Pacing};

/// Frames mixed per render step.
pub const BLOCK_FRAMES: usize = 1024;

/// How long rendering may run past the round end waiting for voices to finish.
const MAX_OVERRUN_MS: TimeMs = 30_000;

/// Options for the render command.
#[derive(Debug, Clone, Default)]
pub struct RenderArgs<'a> {
    pub level: &'a str,
    pub clips: &'a str,
    pub clip_root: &'a str,
    pub out: &'a str,
    pub pack: Option<&'a str>,
    pub seed: u32,
    /// Forces the equal-power fallback router.
    pub no_native_pan: bool,
    pub sample_rate: Option<u32>,
}

/// Outcome of an offline render.
#[derive(Debug, Clone)]
pub struct RenderSummary {
    pub output: StereoOutput,
    pub scheduled: usize,
    pub skipped: usize,
    pub completed: usize,
}

/// Run the render command
///
/// # Returns
/// Exit code: 0 on success
pub fn run(args: &RenderArgs<'_>) -> Result<ExitCode> {
    let level = load_level(args.level)?;
    let pool = load_clips(args.clips)?;
    let pack = load_optional_pack(args.pack)?;
    let round = build_round(&level, &pool, pack.as_ref(), args.seed, &Pacing::Level)
        .with_context(|| format!("cannot generate level {}", level.level_id))?;

    let mut config = SchedulerConfig::default();
    if let Some(rate) = args.sample_rate {
        config = config.with_sample_rate(rate);
    }
    let probe = if args.no_native_pan {
        StaticProbe::fallback()
    } else {
        StaticProbe::native()
    };
    let fetcher: Arc<dyn ClipFetcher> = Arc::new(WavFileFetcher::new(args.clip_root));

    println!(
        "{} level {} seed {} ({} events)",
        "Rendering:".cyan().bold(),
        round.level_id,
        round.seed,
        round.events.len()
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to start async runtime")?;
    let summary = runtime.block_on(render_events(
        &round.events,
        round.round_duration_ms,
        fetcher,
        config,
        probe,
    ))?;

    write_stereo_wav(Path::new(args.out), &summary.output, config.sample_rate)
        .with_context(|| format!("failed to write {}", args.out))?;

    let (left, right) = summary.output.peaks();
    println!(
        "  {} scheduled, {} skipped, {} completed",
        summary.scheduled, summary.skipped, summary.completed
    );
    println!("  peak L {:.3} R {:.3}", left, right);
    println!(
        "{} {} ({} frames at {} Hz)",
        "Wrote:".green().bold(),
        args.out,
        summary.output.len(),
        config.sample_rate
    );
    Ok(ExitCode::SUCCESS)
}

/// Renders a round offline.
///
/// Events are scheduled one block ahead of the render cursor so the
/// polyphony cap only ever sees voices that are about to sound. Rendering
/// continues past `round_duration_ms` until every voice has finished.
/// Events whose clip fails to load are skipped.
pub async fn render_events(
    events: &[GameEvent],
    round_duration_ms: TimeMs,
    fetcher: Arc<dyn ClipFetcher>,
    config: SchedulerConfig,
    probe: StaticProbe,
) -> Result<RenderSummary, ScheduleError> {
    let mut ordered = events.to_vec();
    sort_chronological(&mut ordered);

    let clock = Arc::new(ManualClock::new());
    let mut scheduler = PlaybackScheduler::new(config, fetcher)
        .with_clock(clock.clone())
        .with_probe(probe);
    scheduler.initialize()?;
    let cached = scheduler
        .preload(ordered.iter().map(|e| e.file_path.as_str()))
        .await?;
    info!(cached, events = ordered.len(), "clips preloaded");
    scheduler.start()?;

    let sample_rate = config.sample_rate.max(1);
    let block_ms = (BLOCK_FRAMES as u64 * 1000).div_ceil(u64::from(sample_rate)) as TimeMs;
    let limit_ms = round_duration_ms + MAX_OVERRUN_MS;

    let mut summary = RenderSummary {
        output: StereoOutput::new(0),
        scheduled: 0,
        skipped: 0,
        completed: 0,
    };
    let mut pending = ordered.iter().peekable();

    loop {
        let horizon = scheduler.rendered_ms() + block_ms;
        while let Some(event) = pending.next_if(|e| e.scheduled_time_ms < horizon) {
            match scheduler.schedule_event(event).await {
                Ok(_) => summary.scheduled += 1,
                Err(ScheduleError::Load(e)) => {
                    warn!(event_id = %event.event_id, error = %e, "skipping event, clip failed to load");
                    summary.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        let block = scheduler.render_block(BLOCK_FRAMES);
        summary.output.extend(&block);
        clock.advance_frames(BLOCK_FRAMES as u64, sample_rate);
        summary.completed += scheduler.poll().completed.len();

        let rendered = scheduler.rendered_ms();
        let drained = pending.peek().is_none() && scheduler.active_count() == 0;
        if (drained && rendered >= round_duration_ms) || rendered >= limit_ms {
            break;
        }
    }

    scheduler.stop();
    scheduler.dispose();
    Ok(summary)
}
