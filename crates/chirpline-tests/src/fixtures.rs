//! Test fixtures: a small clip catalog, synthetic clip audio, and on-disk
//! round directories for CLI tests.

use std::fs;
use std::path::{Path, PathBuf};

use chirpline_playback::{write_mono_wav, DecodedClip, MemoryFetcher};
use chirpline_spec::{ClipMeta, EventDensity, LevelConfig, SpeciesPool, VocalizationType};
use tempfile::TempDir;

/// Sample rate of fixture audio.
pub const FIXTURE_RATE: u32 = 8000;

/// Species codes in the fixture catalog.
pub const SPECIES: [&str; 5] = ["AMRO", "BLJA", "CARW", "NOCA", "TUTI"];

/// One song and one call per species, plus a rejected clip.
pub fn catalog() -> Vec<ClipMeta> {
    let mut clips = Vec::new();
    for (i, code) in SPECIES.iter().enumerate() {
        let base = 800 + 100 * i as u32;
        clips.push(
            ClipMeta::new(
                format!("{code}_song"),
                *code,
                base + 400,
                format!("{}_song.wav", code.to_lowercase()),
            )
            .with_vocalization(VocalizationType::Song)
            .canonical(),
        );
        clips.push(
            ClipMeta::new(
                format!("{code}_call"),
                *code,
                base,
                format!("{}_call.wav", code.to_lowercase()),
            )
            .with_vocalization(VocalizationType::Call),
        );
    }
    let mut rejected = ClipMeta::new("NOCA_bad", "NOCA", 500, "noca_bad.wav");
    rejected.rejected = true;
    clips.push(rejected);
    clips
}

/// The fixture catalog grouped into a pool.
pub fn pool() -> SpeciesPool {
    SpeciesPool::from_clips(catalog())
}

/// A level with the given duration and density.
pub fn level(duration_sec: f64, density: EventDensity) -> LevelConfig {
    LevelConfig::builder(1)
        .round_duration_sec(duration_sec)
        .event_density(density)
        .overlap_probability(0.25)
        .scoring_window_ms(2000)
        .species_count(3)
        .build()
}

/// A constant-amplitude clip.
pub fn tone(sample_rate: u32, duration_ms: u32, amplitude: f32) -> DecodedClip {
    let frames = (u64::from(sample_rate) * u64::from(duration_ms) / 1000) as usize;
    DecodedClip::new(sample_rate, vec![amplitude; frames])
}

/// Serves a tone for every non-rejected catalog clip.
pub fn memory_fetcher() -> MemoryFetcher {
    catalog()
        .into_iter()
        .filter(|clip| !clip.rejected)
        .fold(MemoryFetcher::new(), |fetcher, clip| {
            fetcher.with_clip(clip.file_path, tone(FIXTURE_RATE, clip.duration_ms, 0.25))
        })
}

/// A round laid out on disk: level, catalog, and clip WAVs.
pub struct RoundFixture {
    pub root: TempDir,
    pub level_path: PathBuf,
    pub clips_path: PathBuf,
    pub clip_root: PathBuf,
}

impl RoundFixture {
    /// Writes the level, the fixture catalog, and a WAV per playable clip.
    pub fn new(level: &LevelConfig) -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        let level_path = root.path().join("level.json");
        let clips_path = root.path().join("clips.json");
        let clip_root = root.path().join("audio");
        fs::create_dir_all(&clip_root).expect("Failed to create audio dir");

        fs::write(
            &level_path,
            serde_json::to_string_pretty(level).expect("Failed to encode level"),
        )
        .expect("Failed to write level");
        let clips = catalog();
        fs::write(
            &clips_path,
            serde_json::to_string_pretty(&clips).expect("Failed to encode catalog"),
        )
        .expect("Failed to write catalog");

        for clip in clips.iter().filter(|c| !c.rejected) {
            let audio = tone(FIXTURE_RATE, clip.duration_ms, 0.25);
            write_mono_wav(&clip_root.join(&clip.file_path), audio.samples(), FIXTURE_RATE)
                .expect("Failed to write clip");
        }

        Self {
            root,
            level_path,
            clips_path,
            clip_root,
        }
    }

    /// Writes an extra JSON file into the fixture directory.
    pub fn write_json(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.root.path().join(name);
        fs::write(&path, contents).expect("Failed to write file");
        path
    }

    /// Path of a file inside the fixture directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.root.path().join(name)
    }
}

/// Converts a fixture path to the `&str` form the CLI commands take.
pub fn path_str(path: &Path) -> &str {
    path.to_str().expect("fixture paths are UTF-8")
}
