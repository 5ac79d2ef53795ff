//! End-to-End CLI Tests for Chirpline
//!
//! Runs the command implementations against level, catalog and clip files
//! laid out in a temporary directory.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p chirpline-tests --test e2e_cli
//! ```

use std::process::ExitCode;

use chirpline_cli::commands::{generate, render, simulate, validate};
use chirpline_playback::decode_wav_file;
use chirpline_score::TimingLaw;
use chirpline_spec::EventDensity;
use chirpline_tests::fixtures::{self, path_str, RoundFixture, FIXTURE_RATE};
use pretty_assertions::assert_eq;

fn fixture() -> RoundFixture {
    RoundFixture::new(&fixtures::level(12.0, EventDensity::Medium))
}

#[test]
fn test_validate_accepts_fixture() {
    let fx = fixture();
    let code = validate::run(
        path_str(&fx.level_path),
        None,
        Some(path_str(&fx.clips_path)),
    )
    .unwrap();
    assert_eq!(code, ExitCode::SUCCESS);
}

#[test]
fn test_validate_flags_bad_pack() {
    let fx = fixture();
    let pack = fx.write_json("pack.json", r#"{"pack_id":"storm","tempo_multiplier":0.1}"#);
    let code = validate::run(path_str(&fx.level_path), Some(path_str(&pack)), None).unwrap();
    assert_eq!(code, ExitCode::from(1));
}

#[test]
fn test_validate_missing_file_is_an_error() {
    let fx = fixture();
    let missing = fx.path("nope.json");
    assert!(validate::run(path_str(&missing), None, None).is_err());
}

#[test]
fn test_generate_with_ramp_file() {
    let fx = fixture();
    let ramp = fx.write_json(
        "ramp.json",
        r#"{"tiers":[
            {"at_ms":0,"min_gap_ms":2000,"max_gap_ms":3000,"overlap_probability":0.1,"scoring_window_ms":2400},
            {"at_ms":60000,"min_gap_ms":900,"max_gap_ms":1500,"overlap_probability":0.4,"scoring_window_ms":1600}
        ]}"#,
    );
    let args = generate::GenerateArgs {
        level: path_str(&fx.level_path),
        clips: path_str(&fx.clips_path),
        seed: 9,
        ramp_file: Some(path_str(&ramp)),
        offset_ms: 30_000,
        json: true,
        ..Default::default()
    };
    assert_eq!(generate::run(&args).unwrap(), ExitCode::SUCCESS);
}

#[test]
fn test_generate_rejects_bad_ramp() {
    let fx = fixture();
    let ramp = fx.write_json("ramp.json", r#"{"tiers":[]}"#);
    let args = generate::GenerateArgs {
        level: path_str(&fx.level_path),
        clips: path_str(&fx.clips_path),
        ramp_file: Some(path_str(&ramp)),
        ..Default::default()
    };
    assert!(generate::run(&args).is_err());
}

#[test]
fn test_render_writes_round_wav() {
    let fx = fixture();
    let out = fx.path("round.wav");
    let args = render::RenderArgs {
        level: path_str(&fx.level_path),
        clips: path_str(&fx.clips_path),
        clip_root: path_str(&fx.clip_root),
        out: path_str(&out),
        seed: 4,
        sample_rate: Some(FIXTURE_RATE),
        ..Default::default()
    };
    assert_eq!(render::run(&args).unwrap(), ExitCode::SUCCESS);

    let rendered = decode_wav_file(&out).unwrap();
    assert_eq!(rendered.sample_rate(), FIXTURE_RATE);
    // At least the full round is rendered.
    assert!(rendered.duration_ms() >= 12_000);
    assert!(rendered.samples().iter().any(|s| s.abs() > 0.05));
}

#[test]
fn test_simulate_runs_both_laws() {
    let fx = fixture();
    for law in [TimingLaw::ClosestToPerfect, TimingLaw::EarlierIsBetter] {
        let args = simulate::SimulateArgs {
            level: path_str(&fx.level_path),
            clips: path_str(&fx.clips_path),
            pack: None,
            seed: 1,
            skill: 0.8,
            law,
            json: true,
        };
        assert_eq!(simulate::run(&args).unwrap(), ExitCode::SUCCESS);
    }
}
