//! Tests for the engine state machine, voice status and cancellation.

use chirpline_spec::Channel;
use pretty_assertions::assert_eq;

use super::tests_support::*;
use super::*;
use crate::error::LoadError;

#[tokio::test]
async fn test_schedule_before_initialize_fails_fast() {
    let (mut scheduler, _, _) = scheduler(SchedulerConfig::default());
    let result = scheduler
        .schedule_event(&event("evt_0001", 1000, Channel::Left, "clips/one.wav"))
        .await;
    assert!(matches!(result, Err(ScheduleError::NotInitialized)));
    assert!(matches!(
        scheduler.load_clip("clips/one.wav").await,
        Err(ScheduleError::NotInitialized)
    ));
    assert!(matches!(scheduler.start(), Err(ScheduleError::NotInitialized)));
}

#[tokio::test]
async fn test_schedule_before_start_is_not_running() {
    let (mut scheduler, _, _) = scheduler(SchedulerConfig::default());
    scheduler.initialize().unwrap();
    assert_eq!(scheduler.state(), EngineState::Initialized);

    let result = scheduler
        .schedule_event(&event("evt_0001", 1000, Channel::Left, "clips/one.wav"))
        .await;
    assert!(matches!(result, Err(ScheduleError::NotRunning)));

    // Loading is allowed once initialized.
    let clip = scheduler.load_clip("clips/one.wav").await.unwrap();
    assert_eq!(clip.len(), 1000);
}

#[test]
fn test_initialize_detects_router_once() {
    let (mut scheduler, _, _) = scheduler(SchedulerConfig::default());
    assert_eq!(scheduler.router(), None);
    scheduler.initialize().unwrap();
    scheduler.initialize().unwrap();
    assert_eq!(
        scheduler.router().map(|r| r.mode()),
        Some(crate::router::PanMode::EqualPower)
    );
}

#[test]
fn test_current_time_is_zero_unless_running() {
    let (mut scheduler, clock, _) = scheduler(SchedulerConfig::default());
    scheduler.initialize().unwrap();
    clock.advance_ms(700);
    assert_eq!(scheduler.current_time_ms(), 0);

    scheduler.start().unwrap();
    clock.advance_ms(1500);
    assert_eq!(scheduler.current_time_ms(), 1500);

    scheduler.stop();
    assert_eq!(scheduler.current_time_ms(), 0);
}

#[tokio::test]
async fn test_voice_moves_through_statuses() {
    let (mut scheduler, clock, _) = running();
    let handle = scheduler
        .schedule_event(&event("evt_0001", 500, Channel::Right, "clips/one.wav"))
        .await
        .unwrap();
    assert_eq!(handle.start_at_secs(), 0.5);
    assert_eq!(scheduler.status("evt_0001"), Some(PlaybackStatus::Scheduled));

    assert!(scheduler.poll().is_empty());

    clock.advance_ms(500);
    let report = scheduler.poll();
    assert_eq!(report.started, vec!["evt_0001".to_string()]);
    assert_eq!(handle.status(), PlaybackStatus::Playing);

    clock.advance_ms(1000);
    let report = scheduler.poll();
    assert_eq!(report.completed, vec!["evt_0001".to_string()]);
    assert_eq!(scheduler.status("evt_0001"), Some(PlaybackStatus::Completed));
    assert_eq!(scheduler.active_count(), 0);
    assert_eq!(handle.finished().await, PlaybackStatus::Completed);
}

#[tokio::test]
async fn test_cancel_is_idempotent() {
    let (mut scheduler, _, _) = running();
    let handle = scheduler
        .schedule_event(&event("evt_0001", 2000, Channel::Left, "clips/one.wav"))
        .await
        .unwrap();

    scheduler.cancel_event("evt_0001");
    scheduler.cancel_event("evt_0001");
    scheduler.cancel_event("evt_9999");

    assert_eq!(scheduler.status("evt_0001"), Some(PlaybackStatus::Cancelled));
    assert_eq!(scheduler.active_count(), 0);
    assert_eq!(handle.finished().await, PlaybackStatus::Cancelled);
}

#[tokio::test]
async fn test_cancel_after_completion_keeps_completed() {
    let (mut scheduler, clock, _) = running();
    scheduler
        .schedule_event(&event("evt_0001", 0, Channel::Left, "clips/short.wav"))
        .await
        .unwrap();
    clock.advance_ms(200);
    scheduler.poll();

    scheduler.cancel_event("evt_0001");
    assert_eq!(scheduler.status("evt_0001"), Some(PlaybackStatus::Completed));
}

#[tokio::test]
async fn test_late_event_starts_immediately() {
    let (mut scheduler, clock, _) = running();
    clock.advance_ms(5000);
    let handle = scheduler
        .schedule_event(&event("evt_0001", 1000, Channel::Left, "clips/one.wav"))
        .await
        .unwrap();
    assert_eq!(handle.start_at_secs(), 5.0);
    assert_eq!(scheduler.poll().started, vec!["evt_0001".to_string()]);
}

#[tokio::test]
async fn test_stop_cancels_voices_and_keeps_cache() {
    let (mut scheduler, _, fetcher) = running();
    let handle = scheduler
        .schedule_event(&event("evt_0001", 1000, Channel::Left, "clips/one.wav"))
        .await
        .unwrap();

    scheduler.stop();
    assert_eq!(scheduler.state(), EngineState::Stopped);
    assert_eq!(handle.status(), PlaybackStatus::Cancelled);
    assert_eq!(scheduler.active_count(), 0);
    assert_eq!(scheduler.status("evt_0001"), Some(PlaybackStatus::Cancelled));
    assert!(scheduler.cache().contains("clips/one.wav"));

    scheduler.start().unwrap();
    assert_eq!(scheduler.status("evt_0001"), None);
    scheduler
        .schedule_event(&event("evt_0002", 1000, Channel::Left, "clips/one.wav"))
        .await
        .unwrap();
    assert_eq!(fetcher.fetch_count(), 1);
}

#[tokio::test]
async fn test_dispose_releases_everything() {
    let (mut scheduler, _, _) = running();
    let handle = scheduler
        .schedule_event(&event("evt_0001", 1000, Channel::Left, "clips/one.wav"))
        .await
        .unwrap();

    scheduler.dispose();
    scheduler.dispose();
    assert_eq!(scheduler.state(), EngineState::Disposed);
    assert_eq!(handle.status(), PlaybackStatus::Cancelled);
    assert_eq!(scheduler.status("evt_0001"), None);
    assert!(scheduler.cache().is_empty());
    assert_eq!(scheduler.router(), None);

    let result = scheduler
        .schedule_event(&event("evt_0002", 1000, Channel::Left, "clips/one.wav"))
        .await;
    assert!(matches!(result, Err(ScheduleError::Disposed)));
    assert!(matches!(scheduler.initialize(), Err(ScheduleError::Disposed)));
    assert!(scheduler.poll().is_empty());
}

#[tokio::test]
async fn test_load_failure_is_per_clip() {
    let (mut scheduler, _, _) = running();
    let result = scheduler
        .schedule_event(&event("evt_0001", 1000, Channel::Left, "clips/missing.wav"))
        .await;
    assert!(matches!(
        result,
        Err(ScheduleError::Load(LoadError::Fetch { .. }))
    ));

    let events = vec![
        event("evt_0001", 1000, Channel::Left, "clips/one.wav"),
        event("evt_0002", 1500, Channel::Right, "clips/missing.wav"),
        event("evt_0003", 2000, Channel::Right, "clips/half.wav"),
    ];
    let handles = scheduler.schedule_all(&events).await.unwrap();
    let ids: Vec<&str> = handles.iter().map(|h| h.event_id()).collect();
    assert_eq!(ids, vec!["evt_0001", "evt_0003"]);
    assert_eq!(scheduler.active_count(), 2);
}

#[tokio::test]
async fn test_rescheduling_an_id_replaces_its_voice() {
    let (mut scheduler, _, _) = running();
    let first = scheduler
        .schedule_event(&event("evt_0001", 1000, Channel::Left, "clips/one.wav"))
        .await
        .unwrap();
    let second = scheduler
        .schedule_event(&event("evt_0001", 3000, Channel::Left, "clips/one.wav"))
        .await
        .unwrap();

    assert_eq!(first.status(), PlaybackStatus::Cancelled);
    assert_eq!(second.status(), PlaybackStatus::Scheduled);
    assert_eq!(scheduler.active_count(), 1);
}

#[tokio::test]
async fn test_preload_warms_cache() {
    let (mut scheduler, _, fetcher) = scheduler(SchedulerConfig::default());
    scheduler.initialize().unwrap();
    let loaded = scheduler
        .preload(["clips/one.wav", "clips/missing.wav", "clips/half.wav"])
        .await
        .unwrap();
    assert_eq!(loaded, 2);
    assert_eq!(scheduler.cache().len(), 2);

    scheduler.load_clip("clips/one.wav").await.unwrap();
    assert_eq!(fetcher.fetch_count(), 3);
}

#[tokio::test]
async fn test_run_until_idle_on_system_clock() {
    let mut scheduler = PlaybackScheduler::new(
        SchedulerConfig::default().with_sample_rate(RATE),
        fetcher(),
    );
    scheduler.initialize().unwrap();
    scheduler.start().unwrap();
    let handle = scheduler
        .schedule_event(&event("evt_0001", 0, Channel::Left, "clips/short.wav"))
        .await
        .unwrap();

    scheduler.run_until_idle().await;
    assert_eq!(handle.status(), PlaybackStatus::Completed);
    assert_eq!(scheduler.active_count(), 0);
    assert!(scheduler.current_time_ms() >= 99);
}
