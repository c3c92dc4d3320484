//! Core types for playback management

use serde::{Deserialize, Serialize};

/// A playable podcast episode
///
/// Immutable once created. Episodes come from a catalog and are handed to
/// the store by value; the store never edits them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    /// Episode title
    pub title: String,

    /// Members / credits line
    pub members: String,

    /// Duration in whole seconds
    pub duration: u64,

    /// Thumbnail image URI
    pub thumbnail: String,

    /// Audio source URL
    pub url: String,
}

impl Episode {
    /// Create an episode from its parts
    pub fn new(
        title: impl Into<String>,
        members: impl Into<String>,
        duration: u64,
        thumbnail: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            members: members.into(),
            duration,
            thumbnail: thumbnail.into(),
            url: url.into(),
        }
    }
}

/// Which player buttons are usable for the current state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerControls {
    /// Shuffle only makes sense with more than one episode queued
    pub can_shuffle: bool,
    pub can_go_previous: bool,
    pub can_toggle_play: bool,
    pub can_go_next: bool,
    pub can_loop: bool,
}

/// Serializable view of the session for presentation layers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSnapshot {
    /// Episode at the current index, if any
    pub episode: Option<Episode>,

    /// Current index (0 when the queue is empty)
    pub current_index: usize,

    /// Number of queued episodes
    pub queue_len: usize,

    pub is_playing: bool,
    pub is_looping: bool,
    pub is_shuffling: bool,

    /// Surfaced playback position in seconds
    pub position: u64,

    /// Duration of the current episode in seconds (0 without one)
    pub duration: u64,

    pub controls: PlayerControls,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn episode_deserializes_from_catalog_json() {
        let json = r#"{
            "title": "Faladev #30",
            "members": "Diego e Richard",
            "duration": 3981,
            "thumbnail": "https://example.com/faladev30.jpg",
            "url": "https://example.com/faladev30.m4a"
        }"#;

        let episode: Episode = serde_json::from_str(json).unwrap();
        assert_eq!(episode.title, "Faladev #30");
        assert_eq!(episode.duration, 3981);
        assert_eq!(episode.url, "https://example.com/faladev30.m4a");
    }

    #[test]
    fn snapshot_uses_camel_case() {
        let snapshot = PlaybackSnapshot {
            episode: None,
            current_index: 0,
            queue_len: 0,
            is_playing: false,
            is_looping: true,
            is_shuffling: false,
            position: 0,
            duration: 0,
            controls: PlayerControls::default(),
        };

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["isLooping"], true);
        assert_eq!(value["queueLen"], 0);
    }
}
