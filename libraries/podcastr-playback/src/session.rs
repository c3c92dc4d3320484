//! Playback session - single owner of store, surface and output
//!
//! Constructed at session start, dropped (or turned back into its output)
//! at session end. UI code borrows the store from here instead of
//! reaching for any global.

use crate::config::PlayerConfig;
use crate::events::{MediaEventQueue, SurfaceEvent};
use crate::output::MediaOutput;
use crate::store::PlaybackStateStore;
use crate::surface::PlaybackSurface;
use crate::types::PlaybackSnapshot;

/// A running playback session
pub struct PlayerSession<O: MediaOutput> {
    store: PlaybackStateStore,
    surface: PlaybackSurface<O>,
}

impl<O: MediaOutput> PlayerSession<O> {
    /// Start a session over `output`
    ///
    /// `media_events` must be the queue paired with the sender the output posts to.
    pub fn new(config: &PlayerConfig, output: O, media_events: MediaEventQueue) -> Self {
        let store = PlaybackStateStore::new(config);
        let mut surface = PlaybackSurface::new(output, media_events, config);
        surface.bind(&store);

        tracing::debug!(
            "Playback session started (autoplay: {}, looping: {}, shuffling: {})",
            config.autoplay,
            config.looping,
            config.shuffling
        );

        Self { store, surface }
    }

    pub fn store(&self) -> &PlaybackStateStore {
        &self.store
    }

    /// Borrow the store for UI-driven mutations
    ///
    /// Changes reach the output on the next [`tick`](Self::tick).
    pub fn store_mut(&mut self) -> &mut PlaybackStateStore {
        &mut self.store
    }

    pub fn surface(&self) -> &PlaybackSurface<O> {
        &self.surface
    }

    pub fn output(&self) -> &O {
        self.surface.output()
    }

    pub fn output_mut(&mut self) -> &mut O {
        self.surface.output_mut()
    }

    /// Run one scheduling tick
    pub fn tick(&mut self) -> usize {
        self.surface.tick(&mut self.store)
    }

    /// Manual seek in the current episode
    pub fn seek(&mut self, seconds: u64) {
        self.surface.seek(&self.store, seconds);
    }

    /// Surfaced position in seconds
    pub fn position(&self) -> u64 {
        self.surface.position()
    }

    /// Drain events for the presentation layer
    pub fn drain_events(&mut self) -> Vec<SurfaceEvent> {
        self.surface.drain_events()
    }

    /// Everything a player view needs to render
    pub fn snapshot(&self) -> PlaybackSnapshot {
        let episode = self.store.current_episode().cloned();
        let duration = episode.as_ref().map_or(0, |e| e.duration);

        PlaybackSnapshot {
            episode,
            current_index: self.store.current_index(),
            queue_len: self.store.queue().len(),
            is_playing: self.store.is_playing(),
            is_looping: self.store.is_looping(),
            is_shuffling: self.store.is_shuffling(),
            position: self.surface.position(),
            duration,
            controls: self.store.controls(),
        }
    }

    /// End the session, handing back the output
    pub fn into_output(self) -> O {
        tracing::debug!("Playback session ended");
        self.surface.into_output()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{media_channel, CompletionOutcome};
    use crate::simulated::SimulatedOutput;
    use crate::types::Episode;

    fn episodes() -> Vec<Episode> {
        vec![
            Episode::new("a", "Ana", 10, "a.jpg", "a.mp3"),
            Episode::new("b", "Bia", 20, "b.jpg", "b.mp3"),
        ]
    }

    fn session(config: &PlayerConfig) -> PlayerSession<SimulatedOutput> {
        let (sender, queue) = media_channel();
        let output = SimulatedOutput::new(sender, &episodes());
        PlayerSession::new(config, output, queue)
    }

    #[test]
    fn new_session_binds_loop_preference() {
        let config = PlayerConfig {
            looping: true,
            ..Default::default()
        };
        let session = session(&config);
        assert!(session.output().is_looping());
    }

    #[test]
    fn snapshot_reflects_playback() {
        let mut session = session(&PlayerConfig::default());
        session.store_mut().play_list(episodes(), 1).unwrap();
        session.tick();
        session.output_mut().advance(4);
        session.tick();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.episode.unwrap().title, "b");
        assert_eq!(snapshot.current_index, 1);
        assert_eq!(snapshot.queue_len, 2);
        assert!(snapshot.is_playing);
        assert_eq!(snapshot.position, 4);
        assert_eq!(snapshot.duration, 20);
        assert!(snapshot.controls.can_go_previous);
        assert!(!snapshot.controls.can_go_next);
    }

    #[test]
    fn last_episode_ending_clears_session() {
        let mut session = session(&PlayerConfig::default());
        session.store_mut().play_list(episodes(), 1).unwrap();
        session.tick();

        session.output_mut().advance(20);
        session.tick();

        assert!(session.store().queue().is_empty());
        assert!(!session.store().is_playing());
        let events = session.drain_events();
        assert!(events.contains(&SurfaceEvent::Completed {
            outcome: CompletionOutcome::Cleared
        }));
    }

    #[test]
    fn into_output_returns_the_output() {
        let mut session = session(&PlayerConfig::default());
        session
            .store_mut()
            .play_single(Episode::new("a", "Ana", 10, "a.jpg", "a.mp3"));
        session.tick();

        let output = session.into_output();
        assert_eq!(output.source(), Some("a.mp3"));
        assert!(output.is_playing());
    }
}
