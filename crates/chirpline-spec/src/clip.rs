//! Clip catalog entries and species pools.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::channel::VocalizationType;

/// One entry of the clip catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipMeta {
    /// Unique clip id (e.g., `NOCA_1a2b3c4d`).
    pub clip_id: String,
    /// Species code the clip belongs to (e.g., `NOCA`).
    pub species_code: String,
    /// Clip duration in milliseconds.
    pub duration_ms: u32,
    /// Path handed to the decoded-audio fetch capability.
    pub file_path: String,
    /// Vocalization type, when tagged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocalization_type: Option<VocalizationType>,
    /// Whether this is the reference clip for its species.
    #[serde(default)]
    pub canonical: bool,
    /// Rejected clips are kept in the catalog but never played.
    #[serde(default)]
    pub rejected: bool,
}

impl ClipMeta {
    /// Creates an untagged clip.
    pub fn new(
        clip_id: impl Into<String>,
        species_code: impl Into<String>,
        duration_ms: u32,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            clip_id: clip_id.into(),
            species_code: species_code.into(),
            duration_ms,
            file_path: file_path.into(),
            vocalization_type: None,
            canonical: false,
            rejected: false,
        }
    }

    /// Sets the vocalization type.
    pub fn with_vocalization(mut self, voc: VocalizationType) -> Self {
        self.vocalization_type = Some(voc);
        self
    }

    /// Marks the clip as canonical.
    pub fn canonical(mut self) -> Self {
        self.canonical = true;
        self
    }
}

/// A species and its playable clips.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesEntry {
    /// Species code.
    pub code: String,
    /// Playable clips, in catalog order.
    pub clips: Vec<ClipMeta>,
}

impl SpeciesEntry {
    /// Returns the clips tagged with the given vocalization type.
    pub fn clips_of(&self, voc: VocalizationType) -> impl Iterator<Item = &ClipMeta> {
        self.clips
            .iter()
            .filter(move |c| c.vocalization_type == Some(voc))
    }

    /// Returns true if at least one clip has the given vocalization type.
    pub fn has_vocalization(&self, voc: VocalizationType) -> bool {
        self.clips_of(voc).next().is_some()
    }
}

/// The species available to a round, grouped from the clip catalog.
///
/// Species are kept sorted by code so that generation over a pool built from
/// the same catalog is reproducible regardless of catalog order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpeciesPool {
    species: Vec<SpeciesEntry>,
}

impl SpeciesPool {
    /// Builds a pool from catalog clips, dropping rejected clips.
    pub fn from_clips(clips: impl IntoIterator<Item = ClipMeta>) -> Self {
        let mut grouped: BTreeMap<String, Vec<ClipMeta>> = BTreeMap::new();
        for clip in clips.into_iter().filter(|c| !c.rejected) {
            grouped
                .entry(clip.species_code.clone())
                .or_default()
                .push(clip);
        }
        Self {
            species: grouped
                .into_iter()
                .map(|(code, clips)| SpeciesEntry { code, clips })
                .collect(),
        }
    }

    /// Builds a pool from already grouped entries.
    pub fn from_entries(mut entries: Vec<SpeciesEntry>) -> Self {
        entries.sort_by(|a, b| a.code.cmp(&b.code));
        Self { species: entries }
    }

    /// Keeps only the listed species codes.
    ///
    /// Used for "keep same birds" replay: the previous round's codes are passed
    /// back in so the next round draws from the identical set.
    pub fn retain<S: AsRef<str>>(&self, codes: &[S]) -> Self {
        Self {
            species: self
                .species
                .iter()
                .filter(|s| codes.iter().any(|c| c.as_ref() == s.code))
                .cloned()
                .collect(),
        }
    }

    /// Returns all species entries.
    pub fn species(&self) -> &[SpeciesEntry] {
        &self.species
    }

    /// Returns the species codes in pool order.
    pub fn codes(&self) -> Vec<&str> {
        self.species.iter().map(|s| s.code.as_str()).collect()
    }

    /// Looks up a species by code.
    pub fn get(&self, code: &str) -> Option<&SpeciesEntry> {
        self.species.iter().find(|s| s.code == code)
    }

    /// Number of species.
    pub fn len(&self) -> usize {
        self.species.len()
    }

    /// Returns true if the pool has no species.
    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    /// Total number of playable clips.
    pub fn clip_count(&self) -> usize {
        self.species.iter().map(|s| s.clips.len()).sum()
    }
}
