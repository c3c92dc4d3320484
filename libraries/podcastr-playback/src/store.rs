//! Playback state store
//!
//! Owns the episode queue, the current index and the playing / looping /
//! shuffling flags. Every mutation goes through a method here; each one
//! that changes something observable records a [`StoreEvent`] for the
//! playback surface to act on.

use crate::config::PlayerConfig;
use crate::error::{PlaybackError, Result};
use crate::events::StoreEvent;
use crate::shuffle::ShufflePicker;
use crate::types::{Episode, PlayerControls};

/// Session-scoped playback state
///
/// ```text
/// queue:          [A, B, C, D]
///                      ^
/// current_index:       1        has_previous = index > 0
///                               has_next     = shuffling || index + 1 < len
/// ```
#[derive(Debug)]
pub struct PlaybackStateStore {
    queue: Vec<Episode>,
    current_index: usize,
    is_playing: bool,
    is_looping: bool,
    is_shuffling: bool,
    picker: ShufflePicker,
    pending_events: Vec<StoreEvent>,
}

impl PlaybackStateStore {
    /// Create an empty store with the configured preferences
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            queue: Vec::new(),
            current_index: 0,
            is_playing: false,
            is_looping: config.looping,
            is_shuffling: config.shuffling,
            picker: ShufflePicker::new(config.shuffle_seed),
            pending_events: Vec::new(),
        }
    }

    // ===== Queue Replacement =====

    /// Play a single episode, replacing the queue
    pub fn play_single(&mut self, episode: Episode) {
        tracing::debug!("Playing single episode: {}", episode.title);
        self.replace_queue(vec![episode], 0);
    }

    /// Play a list of episodes starting at `start_index`
    ///
    /// An index outside the list (any index, for an empty list) is rejected
    /// and the current state is left untouched.
    pub fn play_list(&mut self, episodes: Vec<Episode>, start_index: usize) -> Result<()> {
        if start_index >= episodes.len() {
            return Err(PlaybackError::StartIndexOutOfRange {
                index: start_index,
                len: episodes.len(),
            });
        }

        tracing::debug!(
            "Playing list of {} episodes from index {}",
            episodes.len(),
            start_index
        );
        self.replace_queue(episodes, start_index);
        Ok(())
    }

    fn replace_queue(&mut self, episodes: Vec<Episode>, index: usize) {
        self.queue = episodes;
        self.current_index = index;
        self.pending_events.push(StoreEvent::QueueReplaced {
            len: self.queue.len(),
            index,
        });
        self.set_playing_state(true);
    }

    // ===== Play / Pause =====

    /// Flip the playing flag
    ///
    /// Flips even with an empty queue; the surface simply has nothing to start.
    pub fn toggle_play(&mut self) {
        self.is_playing = !self.is_playing;
        self.pending_events.push(StoreEvent::PlayingChanged {
            is_playing: self.is_playing,
        });
    }

    /// Set the playing flag directly
    ///
    /// Used to reconcile with the media output pausing or resuming itself.
    pub fn set_playing_state(&mut self, is_playing: bool) {
        if self.is_playing == is_playing {
            return;
        }
        self.is_playing = is_playing;
        self.pending_events
            .push(StoreEvent::PlayingChanged { is_playing });
    }

    // ===== Loop & Shuffle =====

    /// Flip the loop preference
    pub fn toggle_loop(&mut self) {
        self.is_looping = !self.is_looping;
        tracing::debug!("Loop {}", if self.is_looping { "on" } else { "off" });
        self.pending_events.push(StoreEvent::LoopingChanged {
            is_looping: self.is_looping,
        });
    }

    /// Flip the shuffle preference
    pub fn toggle_shuffle(&mut self) {
        self.is_shuffling = !self.is_shuffling;
        tracing::debug!(
            "Shuffle {}",
            if self.is_shuffling { "on" } else { "off" }
        );
        self.pending_events.push(StoreEvent::ShufflingChanged {
            is_shuffling: self.is_shuffling,
        });
    }

    // ===== Navigation =====

    /// Move to the next episode
    ///
    /// Shuffling jumps to a uniformly random position (possibly the current
    /// one, which then restarts). Otherwise steps forward when possible.
    pub fn play_next(&mut self) {
        if self.is_shuffling {
            if let Some(index) = self.picker.pick(self.queue.len()) {
                tracing::debug!("Shuffle picked index {}", index);
                self.select(index);
            }
        } else if self.has_next() {
            self.select(self.current_index + 1);
        }
    }

    /// Move to the previous episode, if there is one
    pub fn play_previous(&mut self) {
        if self.has_previous() {
            self.select(self.current_index - 1);
        }
    }

    fn select(&mut self, index: usize) {
        self.current_index = index;
        self.pending_events
            .push(StoreEvent::EpisodeChanged { index });
    }

    /// Abandon playback: empty queue, index 0, not playing
    ///
    /// Loop and shuffle preferences are kept.
    pub fn clear_player_state(&mut self) {
        tracing::debug!("Clearing player state");
        self.queue.clear();
        self.current_index = 0;
        self.pending_events.push(StoreEvent::Cleared);
        self.set_playing_state(false);
    }

    // ===== State Queries =====

    /// Episode at the current index
    pub fn current_episode(&self) -> Option<&Episode> {
        self.queue.get(self.current_index)
    }

    /// Whether "next" has somewhere to go
    ///
    /// Shuffle can always pick again, but an empty queue has nothing to pick.
    pub fn has_next(&self) -> bool {
        !self.queue.is_empty()
            && (self.is_shuffling || self.current_index + 1 < self.queue.len())
    }

    /// Whether "previous" has somewhere to go
    pub fn has_previous(&self) -> bool {
        !self.queue.is_empty() && self.current_index > 0
    }

    pub fn queue(&self) -> &[Episode] {
        &self.queue
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_looping(&self) -> bool {
        self.is_looping
    }

    pub fn is_shuffling(&self) -> bool {
        self.is_shuffling
    }

    /// Which player buttons should be enabled
    pub fn controls(&self) -> PlayerControls {
        let has_episode = self.current_episode().is_some();
        PlayerControls {
            can_shuffle: has_episode && self.queue.len() > 1,
            can_go_previous: has_episode && self.has_previous(),
            can_toggle_play: has_episode,
            can_go_next: has_episode && self.has_next(),
            can_loop: has_episode,
        }
    }

    // ===== Events =====

    /// Drain all pending store events
    pub fn drain_events(&mut self) -> Vec<StoreEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }
}

impl Default for PlaybackStateStore {
    fn default() -> Self {
        Self::new(&PlayerConfig::default())
    }
}
