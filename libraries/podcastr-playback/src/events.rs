//! Playback Events
//!
//! Three event streams keep the pieces in sync:
//! - `StoreEvent`: observable store changes, drained by the surface
//! - `MediaEvent`: posted by the media output onto a channel
//! - `SurfaceEvent`: what the presentation layer should redraw

use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

/// Changes made to the playback state store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreEvent {
    /// The queue was replaced by `play_single` or `play_list`
    QueueReplaced {
        /// New queue length
        len: usize,
        /// Index selected in the new queue
        index: usize,
    },

    /// A different queue position was selected (or a shuffle pick happened)
    EpisodeChanged {
        /// Newly selected index
        index: usize,
    },

    /// Playing flag flipped
    PlayingChanged { is_playing: bool },

    /// Loop preference flipped
    LoopingChanged { is_looping: bool },

    /// Shuffle preference flipped
    ShufflingChanged { is_shuffling: bool },

    /// Queue emptied and playback abandoned
    Cleared,
}

/// Events posted by the media output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaEvent {
    /// The requested source is ready to play
    Loaded {
        /// URL passed to the matching `load` call
        source: String,
    },

    /// Playhead moved (whole seconds elapsed)
    TimeProgress { seconds: u64 },

    /// Output started playing on its own
    Played,

    /// Output paused on its own
    Paused,

    /// Source reached its end naturally
    Ended,
}

/// What happened when an episode finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionOutcome {
    /// Loop is on: the same episode starts over
    Looped,

    /// Moved on to another queue position
    Advanced,

    /// Nothing left to play; the session was cleared
    Cleared,
}

/// Events emitted by the playback surface for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceEvent {
    /// Output was pointed at the episode at `index`
    EpisodeLoaded { index: usize },

    /// Surfaced position changed
    PositionChanged { seconds: u64 },

    /// An episode completed naturally
    Completed { outcome: CompletionOutcome },

    /// The media output refused a command
    Error { message: String },
}

/// Sending half handed to a media output
#[derive(Debug, Clone)]
pub struct MediaEventSender {
    tx: Sender<MediaEvent>,
}

impl MediaEventSender {
    /// Post an event
    ///
    /// Returns false once the surface side is gone (session ended).
    pub fn post(&self, event: MediaEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// Receiving half drained by the playback surface
#[derive(Debug)]
pub struct MediaEventQueue {
    rx: Receiver<MediaEvent>,
}

impl MediaEventQueue {
    /// Take the next queued event without blocking
    pub fn try_next(&self) -> Option<MediaEvent> {
        self.rx.try_recv().ok()
    }

    /// Number of events waiting
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

/// Create a connected media event channel
pub fn media_channel() -> (MediaEventSender, MediaEventQueue) {
    let (tx, rx) = unbounded();
    (MediaEventSender { tx }, MediaEventQueue { rx })
}
