//! The injected "fetch decoded audio by path" capability.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures_util::future::BoxFuture;

use crate::clip::DecodedClip;
use crate::error::LoadError;

/// Fetches and decodes a clip by path.
///
/// Implementations decide what a path means: a file under a root directory,
/// a URL, an entry in a bundle. The scheduler only sees decoded clips.
pub trait ClipFetcher: Send + Sync {
    /// Fetches and decodes the clip at `path`.
    fn fetch<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<DecodedClip, LoadError>>;
}

/// Serves clips from memory.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    clips: HashMap<String, DecodedClip>,
    fetches: AtomicUsize,
}

impl MemoryFetcher {
    /// Creates an empty fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a clip under a path.
    pub fn insert(&mut self, path: impl Into<String>, clip: DecodedClip) {
        self.clips.insert(path.into(), clip);
    }

    /// Builder-style [`MemoryFetcher::insert`].
    pub fn with_clip(mut self, path: impl Into<String>, clip: DecodedClip) -> Self {
        self.insert(path, clip);
        self
    }

    /// Number of fetches served or refused so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl ClipFetcher for MemoryFetcher {
    fn fetch<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<DecodedClip, LoadError>> {
        Box::pin(async move {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.clips
                .get(path)
                .cloned()
                .ok_or_else(|| LoadError::fetch(path, "no such clip"))
        })
    }
}
