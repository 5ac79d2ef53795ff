//! Tests for offline stereo rendering.

use std::sync::Arc;

use chirpline_spec::Channel;
use pretty_assertions::assert_eq;

use super::tests_support::*;
use super::*;
use crate::clock::ManualClock;
use crate::fetch::MemoryFetcher;
use crate::router::StaticProbe;

const EPS: f64 = 1e-9;

#[tokio::test]
async fn test_left_event_renders_on_left_only() {
    let (mut scheduler, _, _) = running();
    scheduler
        .schedule_event(&event("evt_0001", 0, Channel::Left, "clips/one.wav"))
        .await
        .unwrap();

    let block = scheduler.render_block(10);
    for i in 0..10 {
        assert!((block.left[i] - 1.0).abs() < EPS);
        assert!(block.right[i].abs() < EPS);
    }
}

#[tokio::test]
async fn test_start_offset_and_cursor() {
    let (mut scheduler, _, _) = running();
    scheduler
        .schedule_event(&event("evt_0001", 300, Channel::Right, "clips/half.wav"))
        .await
        .unwrap();

    let first = scheduler.render_block(250);
    assert!(first.is_silent());
    assert_eq!(scheduler.rendered_ms(), 250);

    let second = scheduler.render_block(250);
    assert!(second.right[49].abs() < EPS);
    assert!((second.right[50] - 0.5).abs() < EPS);
    assert!(second.left[50].abs() < EPS);
}

#[tokio::test]
async fn test_voice_stops_at_clip_end() {
    let (mut scheduler, _, _) = running();
    scheduler
        .schedule_event(&event("evt_0001", 0, Channel::Left, "clips/short.wav"))
        .await
        .unwrap();

    let block = scheduler.render_block(200);
    assert!((block.left[99] - 1.0).abs() < EPS);
    assert_eq!(block.left[100], 0.0);
}

#[tokio::test]
async fn test_overlapping_voices_sum() {
    let (mut scheduler, _, _) = running();
    scheduler
        .schedule_event(&event("a", 0, Channel::Left, "clips/half.wav"))
        .await
        .unwrap();
    scheduler
        .schedule_event(&event("b", 0, Channel::Left, "clips/half.wav"))
        .await
        .unwrap();

    let block = scheduler.render_block(4);
    assert!((block.left[0] - 1.0).abs() < EPS);
}

#[tokio::test]
async fn test_cancelled_voice_is_silent() {
    let (mut scheduler, _, _) = running();
    scheduler
        .schedule_event(&event("a", 0, Channel::Left, "clips/one.wav"))
        .await
        .unwrap();
    scheduler.cancel_event("a");
    assert!(scheduler.render_block(100).is_silent());
}

#[test]
fn test_not_running_renders_silence() {
    let (mut scheduler, _, _) = scheduler(SchedulerConfig::default());
    let block = scheduler.render_block(32);
    assert_eq!(block.len(), 32);
    assert!(block.is_silent());
}

#[tokio::test]
async fn test_resamples_and_applies_master_gain() {
    let fetcher = MemoryFetcher::new().with_clip(
        "ramp.wav",
        DecodedClip::new(RATE / 2, vec![0.0, 0.2, 0.4, 0.6]),
    );
    let config = SchedulerConfig::default()
        .with_sample_rate(RATE)
        .with_master_gain(0.5);
    let mut scheduler = PlaybackScheduler::new(config, Arc::new(fetcher))
        .with_clock(Arc::new(ManualClock::new()))
        .with_probe(StaticProbe::fallback());
    scheduler.initialize().unwrap();
    scheduler.start().unwrap();
    scheduler
        .schedule_event(&event("ramp", 0, Channel::Left, "ramp.wav"))
        .await
        .unwrap();

    let block = scheduler.render_block(10);
    let expected = [0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.6, 0.0, 0.0];
    for (i, want) in expected.iter().enumerate() {
        assert!(
            (block.left[i] - want * 0.5).abs() < 1e-6,
            "frame {i}: {} != {}",
            block.left[i],
            want * 0.5
        );
    }
}

#[tokio::test]
async fn test_native_router_uses_balance_gains() {
    let config = SchedulerConfig::default()
        .with_sample_rate(RATE)
        .with_master_gain(1.0);
    let mut scheduler = PlaybackScheduler::new(config, fetcher())
        .with_clock(Arc::new(ManualClock::new()))
        .with_probe(StaticProbe::native());
    scheduler.initialize().unwrap();
    scheduler.start().unwrap();
    scheduler
        .schedule_event(&event("a", 0, Channel::Right, "clips/one.wav"))
        .await
        .unwrap();

    let block = scheduler.render_block(1);
    assert_eq!((block.left[0], block.right[0]), (0.0, 1.0));
}
