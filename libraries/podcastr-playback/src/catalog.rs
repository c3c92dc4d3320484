//! Episode catalog loading
//!
//! A catalog is a JSON array of episodes. It is only a source of
//! [`Episode`] values; the store takes ownership of whatever it is given.

use crate::error::{PlaybackError, Result};
use crate::types::Episode;
use std::path::Path;

/// Ordered list of episodes available for playback
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    episodes: Vec<Episode>,
}

impl Catalog {
    pub fn new(episodes: Vec<Episode>) -> Self {
        Self { episodes }
    }

    /// Parse a catalog from JSON text
    ///
    /// Every episode needs a source URL; one without can never be loaded.
    pub fn from_json(json: &str) -> Result<Self> {
        let episodes: Vec<Episode> = serde_json::from_str(json)?;
        if let Some(index) = episodes.iter().position(|e| e.url.trim().is_empty()) {
            return Err(PlaybackError::Catalog(format!(
                "Episode {} ({}) has no source URL",
                index, episodes[index].title
            )));
        }
        Ok(Self { episodes })
    }

    /// Read a catalog from a JSON file
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&json)?;
        tracing::debug!(
            "Loaded {} episodes from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn episodes(&self) -> &[Episode] {
        &self.episodes
    }

    pub fn get(&self, index: usize) -> Option<&Episode> {
        self.episodes.get(index)
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    pub fn into_episodes(self) -> Vec<Episode> {
        self.episodes
    }
}
