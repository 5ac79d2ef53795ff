//! Tests for the polyphony cap.

use chirpline_spec::Channel;
use pretty_assertions::assert_eq;

use super::tests_support::*;
use super::*;

#[tokio::test]
async fn test_cap_plus_one_evicts_earliest_start() {
    let (mut scheduler, _, _) = running();
    let cap = scheduler.config().max_polyphony;
    assert_eq!(cap, 8);

    // Start times deliberately out of insertion order.
    let times = [4000, 1500, 6000, 2500, 7000, 3500, 5000, 8000];
    let mut handles = Vec::new();
    for (i, &t) in times.iter().enumerate() {
        let id = format!("evt_{:04}", i + 1);
        let handle = scheduler
            .schedule_event(&event(&id, t, Channel::Left, "clips/one.wav"))
            .await
            .unwrap();
        handles.push(handle);
    }
    assert_eq!(scheduler.active_count(), cap);

    scheduler
        .schedule_event(&event("evt_0009", 9000, Channel::Right, "clips/half.wav"))
        .await
        .unwrap();

    assert_eq!(scheduler.active_count(), cap);
    assert_eq!(handles[1].status(), PlaybackStatus::Cancelled);
    assert_eq!(scheduler.status("evt_0002"), Some(PlaybackStatus::Cancelled));
    for (i, handle) in handles.iter().enumerate().filter(|(i, _)| *i != 1) {
        assert_eq!(handle.status(), PlaybackStatus::Scheduled, "voice {i}");
    }
}

#[tokio::test]
async fn test_small_cap_keeps_latest_voices() {
    let (mut scheduler, _, _) = scheduler(SchedulerConfig::default().with_max_polyphony(2));
    scheduler.initialize().unwrap();
    scheduler.start().unwrap();

    for (id, t) in [("a", 1000), ("b", 2000), ("c", 3000), ("d", 4000)] {
        scheduler
            .schedule_event(&event(id, t, Channel::Left, "clips/one.wav"))
            .await
            .unwrap();
        assert!(scheduler.active_count() <= 2);
    }

    assert_eq!(scheduler.active_count(), 2);
    assert_eq!(scheduler.status("a"), Some(PlaybackStatus::Cancelled));
    assert_eq!(scheduler.status("b"), Some(PlaybackStatus::Cancelled));
    assert_eq!(scheduler.status("c"), Some(PlaybackStatus::Scheduled));
    assert_eq!(scheduler.status("d"), Some(PlaybackStatus::Scheduled));
}

#[tokio::test]
async fn test_completed_voices_free_slots() {
    let (mut scheduler, clock, _) = scheduler(SchedulerConfig::default().with_max_polyphony(1));
    scheduler.initialize().unwrap();
    scheduler.start().unwrap();

    scheduler
        .schedule_event(&event("a", 0, Channel::Left, "clips/short.wav"))
        .await
        .unwrap();
    clock.advance_ms(150);
    assert_eq!(scheduler.poll().completed, vec!["a".to_string()]);

    scheduler
        .schedule_event(&event("b", 500, Channel::Left, "clips/short.wav"))
        .await
        .unwrap();
    assert_eq!(scheduler.status("a"), Some(PlaybackStatus::Completed));
    assert_eq!(scheduler.active_count(), 1);
}

#[tokio::test]
async fn test_active_count_matches_statuses() {
    let (mut scheduler, clock, _) = running();
    for i in 0..12 {
        let id = format!("evt_{i:04}");
        scheduler
            .schedule_event(&event(&id, i * 250, Channel::Right, "clips/short.wav"))
            .await
            .unwrap();
        if i % 3 == 0 {
            scheduler.cancel_event(&id);
        }
        clock.advance_ms(120);
        scheduler.poll();

        let live = (0..=i)
            .filter_map(|j| scheduler.status(&format!("evt_{j:04}")))
            .filter(|s| !s.is_terminal())
            .count();
        assert_eq!(scheduler.active_count(), live);
    }
}

#[tokio::test]
async fn test_settled_statuses_stay_bounded() {
    let (mut scheduler, clock, _) = running();
    for i in 0..2000 {
        let id = format!("evt_{i:04}");
        scheduler
            .schedule_event(&event(&id, i * 200, Channel::Left, "clips/short.wav"))
            .await
            .unwrap();
        clock.advance_ms(200);
        scheduler.poll();
        assert!(scheduler.tracked_statuses() <= MAX_RETAINED_STATUSES);
    }

    assert_eq!(scheduler.active_count(), 0);
    assert_eq!(scheduler.tracked_statuses(), MAX_RETAINED_STATUSES);
    assert_eq!(scheduler.status("evt_1999"), Some(PlaybackStatus::Completed));
    assert_eq!(scheduler.status("evt_0000"), None);
}
