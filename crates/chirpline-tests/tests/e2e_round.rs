//! End-to-End Round Flow Tests for Chirpline
//!
//! Drives a round the way a host would: generate events, hand them to the
//! playback scheduler, advance the engine clock, and score player input
//! against the scoring windows.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p chirpline-tests --test e2e_round
//! ```

use std::sync::Arc;

use chirpline_generate::{has_overlaps, EventGenerator, GameRng, OVERLAP_OFFSET_MS};
use chirpline_playback::{
    ManualClock, PlaybackScheduler, PlaybackStatus, SchedulerConfig, StaticProbe,
};
use chirpline_score::{
    FeedbackType, PlayerInput, ScoreEvaluator, ScoringConfig, TimingLaw, WindowTracker,
};
use chirpline_spec::{EventDensity, GameEvent, ROUND_LEAD_IN_MS};
use chirpline_tests::fixtures;
use pretty_assertions::assert_eq;

fn generate(seed: u32, duration_sec: f64, density: EventDensity) -> Vec<GameEvent> {
    let mut rng = GameRng::new(seed);
    EventGenerator::new()
        .generate(
            &mut rng,
            &fixtures::level(duration_sec, density),
            &fixtures::pool(),
            None,
        )
        .unwrap()
}

fn scheduler(config: SchedulerConfig) -> (PlaybackScheduler, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let scheduler = PlaybackScheduler::new(config, Arc::new(fixtures::memory_fetcher()))
        .with_clock(clock.clone())
        .with_probe(StaticProbe::native());
    (scheduler, clock)
}

// ============================================================================
// Generation invariants
// ============================================================================

#[test]
fn test_windows_and_bounds_hold_for_every_density() {
    for density in [EventDensity::Low, EventDensity::Medium, EventDensity::High] {
        for seed in 0..20 {
            let level = fixtures::level(40.0, density);
            let events = generate(seed, 40.0, density);
            assert!(!events.is_empty());

            // Primaries are in order; a secondary may sit just before its primary.
            for pair in events.windows(2) {
                assert!(pair[1].scheduled_time_ms >= pair[0].scheduled_time_ms - OVERLAP_OFFSET_MS);
            }
            for event in &events {
                assert!(event.scoring_window_start_ms <= event.scheduled_time_ms);
                assert!(event.scheduled_time_ms <= event.scoring_window_end_ms);
                assert!(event.scheduled_time_ms >= ROUND_LEAD_IN_MS);
                assert!(event.scheduled_time_ms <= level.last_event_ms());
                assert!(fixtures::SPECIES.contains(&event.species_code.as_str()));
                assert_ne!(event.clip_id, "NOCA_bad");
            }
        }
    }
}

#[test]
fn test_no_overlap_level_has_disjoint_windows() {
    let mut level = fixtures::level(40.0, EventDensity::High);
    level.no_overlap = true;
    level.overlap_probability = 1.0;
    for seed in 0..10 {
        let mut rng = GameRng::new(seed);
        let events = EventGenerator::new()
            .generate(&mut rng, &level, &fixtures::pool(), None)
            .unwrap();
        assert!(!has_overlaps(&events), "seed {} produced overlapping windows", seed);
    }
}

// ============================================================================
// Playback
// ============================================================================

#[tokio::test]
async fn test_every_voice_completes_as_the_clock_advances() {
    let events = generate(4, 20.0, EventDensity::Low);
    let (mut scheduler, clock) = scheduler(SchedulerConfig::default().with_max_polyphony(64));
    scheduler.initialize().unwrap();
    scheduler.start().unwrap();

    let handles = scheduler.schedule_all(&events).await.unwrap();
    assert_eq!(handles.len(), events.len());
    assert!(handles
        .iter()
        .all(|h| h.status() == PlaybackStatus::Scheduled));

    let mut started = 0;
    let mut completed = 0;
    for _ in 0..250 {
        clock.advance_ms(100);
        let report = scheduler.poll();
        started += report.started.len();
        completed += report.completed.len();
    }

    assert_eq!(scheduler.active_count(), 0);
    assert_eq!(started, events.len());
    assert_eq!(completed, events.len());
    for handle in &handles {
        assert_eq!(handle.finished().await, PlaybackStatus::Completed);
    }
}

#[tokio::test]
async fn test_stop_cancels_pending_voices() {
    let events = generate(6, 20.0, EventDensity::Medium);
    let (mut scheduler, clock) = scheduler(SchedulerConfig::default());
    scheduler.initialize().unwrap();
    scheduler.start().unwrap();

    let first = scheduler.schedule_event(&events[0]).await.unwrap();
    let last = scheduler
        .schedule_event(&events[events.len() - 1])
        .await
        .unwrap();

    clock.advance_ms(events[0].scheduled_time_ms as u64 + 10);
    scheduler.poll();
    assert_eq!(first.status(), PlaybackStatus::Playing);

    scheduler.stop();
    assert_eq!(first.finished().await, PlaybackStatus::Cancelled);
    assert_eq!(last.finished().await, PlaybackStatus::Cancelled);
    assert_eq!(scheduler.active_count(), 0);
}

// ============================================================================
// Scoring
// ============================================================================

#[test]
fn test_perfect_play_scores_full_marks() {
    let events = generate(12, 30.0, EventDensity::Medium);
    let mut evaluator = ScoreEvaluator::default();
    let mut tracker = WindowTracker::new();
    tracker.register_all(events.clone());

    for event in &events {
        let input = PlayerInput::new(
            event.species_code.clone(),
            event.channel,
            event.scheduled_time_ms,
        );
        let result = tracker.submit(&input, &mut evaluator).unwrap();
        assert_eq!(result.event_id, event.event_id);
        assert_eq!(result.feedback, FeedbackType::Perfect);
    }

    let agg = evaluator.aggregate();
    assert_eq!(tracker.pending(), 0);
    assert_eq!(agg.events_scored as usize, events.len());
    assert_eq!(agg.total_points, agg.max_possible_points);
    assert_eq!(evaluator.accuracy_percent(), 100.0);
}

#[test]
fn test_silent_player_misses_every_window() {
    let events = generate(12, 30.0, EventDensity::Medium);
    let mut evaluator = ScoreEvaluator::default();
    let mut tracker = WindowTracker::new();
    tracker.register_all(events.clone());

    let end = events.iter().map(|e| e.scoring_window_end_ms).max().unwrap();
    let missed = tracker.close_expired(end + 1, &mut evaluator);

    assert_eq!(missed.len(), events.len());
    assert!(missed.iter().all(|r| r.missed && r.total_points == 0));
    assert_eq!(evaluator.aggregate().miss_count as usize, events.len());
    assert_eq!(evaluator.accuracy_percent(), 0.0);
}

#[test]
fn test_earlier_law_rewards_quick_answers() {
    let events = generate(21, 30.0, EventDensity::Low);
    let config = ScoringConfig::default().with_timing_law(TimingLaw::EarlierIsBetter);
    let mut quick = ScoreEvaluator::new(config);
    let mut slow = ScoreEvaluator::new(config);

    for event in &events {
        let at = |t| PlayerInput::new(event.species_code.clone(), event.channel, t);
        quick.score_event(event, &at(event.scoring_window_start_ms));
        slow.score_event(event, &at(event.scoring_window_end_ms));
    }

    assert_eq!(quick.accuracy_percent(), 100.0);
    assert!(slow.total_points() < quick.total_points());
    assert_eq!(slow.aggregate().miss_count, 0);
}
