//! Loading levels, packs, clip catalogs and ramps from JSON files.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chirpline_generate::DifficultyRamp;
use chirpline_spec::{ClipMeta, LevelConfig, PackModifiers, SpeciesPool};
use serde::de::DeserializeOwned;

fn read_json<T: DeserializeOwned>(path: &str, what: &str) -> Result<T> {
    let text = fs::read_to_string(Path::new(path))
        .with_context(|| format!("failed to read {} file: {}", what, path))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {} file: {}", what, path))
}

/// Loads a level configuration.
pub fn load_level(path: &str) -> Result<LevelConfig> {
    read_json(path, "level")
}

/// Loads pack modifiers.
pub fn load_pack(path: &str) -> Result<PackModifiers> {
    read_json(path, "pack")
}

/// Loads an optional pack.
pub fn load_optional_pack(path: Option<&str>) -> Result<Option<PackModifiers>> {
    path.map(load_pack).transpose()
}

/// Loads a clip catalog (a JSON array of clips) and groups it by species.
///
/// Rejected clips are dropped.
pub fn load_clips(path: &str) -> Result<SpeciesPool> {
    let clips: Vec<ClipMeta> = read_json(path, "clip catalog")?;
    Ok(SpeciesPool::from_clips(clips))
}

/// Loads a difficulty ramp; the tiers are validated while parsing.
pub fn load_ramp(path: &str) -> Result<DifficultyRamp> {
    read_json(path, "ramp")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_level() {
        let file = write_temp(
            r#"{"level_id":3,"round_duration_sec":30,"event_density":"high","scoring_window_ms":1500}"#,
        );
        let level = load_level(file.path().to_str().unwrap()).unwrap();
        assert_eq!(level.level_id, 3);
        assert_eq!(level.round_duration_ms(), 30_000);
        assert_eq!(level.species_count, 4);
    }

    #[test]
    fn test_load_level_reports_path() {
        let err = load_level("/nonexistent/level.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/level.json"));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let file = write_temp(r#"{"pack_id":"x","speed":2}"#);
        let err = load_pack(file.path().to_str().unwrap()).unwrap_err();
        assert!(err.to_string().starts_with("failed to parse pack file"));
    }

    #[test]
    fn test_load_clips_drops_rejected() {
        let file = write_temp(
            r#"[
                {"clip_id":"NOCA_1","species_code":"NOCA","duration_ms":1200,"file_path":"noca_1.wav"},
                {"clip_id":"NOCA_2","species_code":"NOCA","duration_ms":900,"file_path":"noca_2.wav","rejected":true},
                {"clip_id":"BLJA_1","species_code":"BLJA","duration_ms":800,"file_path":"blja_1.wav","vocalization_type":"call"}
            ]"#,
        );
        let pool = load_clips(file.path().to_str().unwrap()).unwrap();
        assert_eq!(pool.codes(), vec!["BLJA", "NOCA"]);
        assert_eq!(pool.clip_count(), 2);
    }

    #[test]
    fn test_missing_pack_is_none() {
        assert!(load_optional_pack(None).unwrap().is_none());
    }
}
