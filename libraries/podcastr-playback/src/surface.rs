//! Playback surface - binds a media output to the state store
//!
//! The surface is the only thing that commands the media output. Each
//! `tick` it:
//! 1. applies pending store changes to the output (load, play, pause, loop)
//! 2. drains media events in arrival order, feeding each back into the
//!    store and re-applying the resulting store changes before the next one
//!
//! Episode completion policy, in order:
//! loop on → the output repeats the episode; next available → `play_next`;
//! otherwise → `clear_player_state`.

use crate::config::PlayerConfig;
use crate::error::Result;
use crate::events::{CompletionOutcome, MediaEvent, MediaEventQueue, StoreEvent, SurfaceEvent};
use crate::output::MediaOutput;
use crate::store::PlaybackStateStore;

/// Presentation-facing driver of a [`MediaOutput`]
pub struct PlaybackSurface<O: MediaOutput> {
    output: O,
    media_events: MediaEventQueue,
    autoplay: bool,

    // URL of the most recent load request
    requested_source: Option<String>,
    // Store index the requested source belongs to
    loaded_index: Option<usize>,
    // Until the matching Loaded arrives, every other media event is stale
    load_pending: bool,
    // Media events queued before the last seek; progress among them is stale
    stale_progress: usize,
    // Last play state commanded to, or reported by, the output
    output_playing: bool,

    // Seconds elapsed, never decreases except on seek / episode change
    position: u64,

    pending_events: Vec<SurfaceEvent>,
}

impl<O: MediaOutput> PlaybackSurface<O> {
    /// Create a surface driving `output`, fed by `media_events`
    pub fn new(output: O, media_events: MediaEventQueue, config: &PlayerConfig) -> Self {
        Self {
            output,
            media_events,
            autoplay: config.autoplay,
            requested_source: None,
            loaded_index: None,
            load_pending: false,
            stale_progress: 0,
            output_playing: false,
            position: 0,
            pending_events: Vec::new(),
        }
    }

    /// Push the store's current preferences to the output
    ///
    /// Called once when the session starts.
    pub fn bind(&mut self, store: &PlaybackStateStore) {
        let looping = store.is_looping();
        self.command("set_looping", |output| output.set_looping(looping));
    }

    /// Process store changes and all queued media events
    ///
    /// Returns the number of media events handled (including discarded ones).
    pub fn tick(&mut self, store: &mut PlaybackStateStore) -> usize {
        self.apply_store_events(store);

        let mut handled = 0;
        while let Some(event) = self.media_events.try_next() {
            self.handle_media_event(event, store);
            self.apply_store_events(store);
            handled += 1;
        }
        handled
    }

    /// Jump to `seconds` in the current episode
    ///
    /// Clamped to the episode duration. The surfaced position updates
    /// immediately, and progress queued before the seek is ignored.
    /// No-op without a current episode.
    pub fn seek(&mut self, store: &PlaybackStateStore, seconds: u64) {
        let Some(episode) = store.current_episode() else {
            return;
        };
        if self.requested_source.is_none() {
            return;
        }

        let target = seconds.min(episode.duration);
        self.stale_progress = self.media_events.len();
        self.command("seek", |output| output.seek(target));
        self.set_position(target);
    }

    // ===== Store → Output =====

    fn apply_store_events(&mut self, store: &mut PlaybackStateStore) {
        // Reacting to one batch can produce another (autoplay sets the playing flag)
        loop {
            let events = store.drain_events();
            if events.is_empty() {
                break;
            }
            for event in events {
                self.apply_store_event(event, store);
            }
        }
    }

    fn apply_store_event(&mut self, event: StoreEvent, store: &mut PlaybackStateStore) {
        match event {
            StoreEvent::QueueReplaced { .. } | StoreEvent::EpisodeChanged { .. } => {
                self.load_current(store);
            }
            StoreEvent::PlayingChanged { is_playing } => {
                if !is_playing {
                    self.pause_output();
                } else if self.requested_source.is_some() {
                    self.play_output();
                }
            }
            StoreEvent::LoopingChanged { is_looping } => {
                self.command("set_looping", |output| output.set_looping(is_looping));
            }
            StoreEvent::ShufflingChanged { .. } => {}
            StoreEvent::Cleared => {
                // Unconditional: reports are ignored from here on
                self.command("pause", |output| output.pause());
                self.output_playing = false;
                self.requested_source = None;
                self.loaded_index = None;
                self.load_pending = false;
                self.stale_progress = 0;
                self.set_position(0);
            }
        }
    }

    fn load_current(&mut self, store: &mut PlaybackStateStore) {
        let Some(episode) = store.current_episode() else {
            return;
        };
        let source = episode.url.clone();
        let index = store.current_index();

        tracing::debug!("Loading episode {} from {}", index, source);

        self.requested_source = Some(source.clone());
        self.loaded_index = Some(index);
        self.load_pending = true;
        self.stale_progress = 0;
        self.set_position(0);
        self.command("load", |output| output.load(&source));
        // A new source starts paused
        self.output_playing = false;
        self.pending_events
            .push(SurfaceEvent::EpisodeLoaded { index });

        if self.autoplay {
            store.set_playing_state(true);
        }
        if store.is_playing() {
            self.play_output();
        }
    }

    // ===== Output → Store =====

    fn handle_media_event(&mut self, event: MediaEvent, store: &mut PlaybackStateStore) {
        let before_seek = self.stale_progress > 0;
        if before_seek {
            self.stale_progress -= 1;
        }

        if self.load_pending {
            match event {
                MediaEvent::Loaded { source } if self.requested_source.as_ref() == Some(&source) => {
                    tracing::debug!("Source ready: {}", source);
                    self.load_pending = false;
                }
                other => tracing::trace!("Discarding stale media event: {:?}", other),
            }
            return;
        }

        if self.requested_source.is_none() {
            // Nothing loaded: playback was cleared or never started
            tracing::trace!("Discarding media event with no source: {:?}", event);
            return;
        }

        match event {
            MediaEvent::Loaded { source } => {
                tracing::trace!("Discarding duplicate load notification: {}", source);
            }
            MediaEvent::TimeProgress { seconds } => {
                if before_seek {
                    tracing::trace!("Discarding progress from before seek: {}", seconds);
                } else if seconds > self.position {
                    self.set_position(seconds);
                }
            }
            MediaEvent::Played => {
                self.output_playing = true;
                store.set_playing_state(true);
            }
            MediaEvent::Paused => {
                self.output_playing = false;
                store.set_playing_state(false);
            }
            MediaEvent::Ended => self.handle_episode_ended(store),
        }
    }

    fn handle_episode_ended(&mut self, store: &mut PlaybackStateStore) {
        let outcome = if store.is_looping() {
            // The output repeats on its own; only the surfaced position restarts
            self.set_position(0);
            CompletionOutcome::Looped
        } else if store.has_next() {
            store.play_next();
            CompletionOutcome::Advanced
        } else {
            store.clear_player_state();
            CompletionOutcome::Cleared
        };

        tracing::debug!("Episode ended: {:?}", outcome);
        self.pending_events
            .push(SurfaceEvent::Completed { outcome });
    }

    // ===== Helpers =====

    fn set_position(&mut self, seconds: u64) {
        self.position = seconds;
        self.pending_events
            .push(SurfaceEvent::PositionChanged { seconds });
    }

    // Commands are skipped when the output is already in the wanted state,
    // so its own Played/Paused reports never bounce back as commands
    fn play_output(&mut self) {
        if !self.output_playing && self.command("play", |output| output.play()) {
            self.output_playing = true;
        }
    }

    fn pause_output(&mut self) {
        if self.output_playing && self.command("pause", |output| output.pause()) {
            self.output_playing = false;
        }
    }

    fn command(&mut self, name: &str, f: impl FnOnce(&mut O) -> Result<()>) -> bool {
        match f(&mut self.output) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Media output refused {}: {}", name, e);
                self.pending_events.push(SurfaceEvent::Error {
                    message: format!("{}: {}", name, e),
                });
                false
            }
        }
    }

    // ===== Queries =====

    /// Surfaced position in seconds
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Index of the episode the output was last pointed at
    pub fn loaded_index(&self) -> Option<usize> {
        self.loaded_index
    }

    /// Whether a load is still waiting for its `Loaded` event
    pub fn is_load_pending(&self) -> bool {
        self.load_pending
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// Give the output back, ending the binding
    pub fn into_output(self) -> O {
        self.output
    }

    /// Drain all pending surface events
    pub fn drain_events(&mut self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut self.pending_events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlaybackError;
    use crate::events::{media_channel, MediaEventSender};
    use crate::types::Episode;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Load(String),
        Play,
        Pause,
        Seek(u64),
        SetLooping(bool),
    }

    #[derive(Default)]
    struct RecordingOutput {
        calls: Vec<Call>,
        refuse_play: bool,
    }

    impl MediaOutput for RecordingOutput {
        fn load(&mut self, source: &str) -> Result<()> {
            self.calls.push(Call::Load(source.to_string()));
            Ok(())
        }

        fn play(&mut self) -> Result<()> {
            if self.refuse_play {
                return Err(PlaybackError::Output("autoplay blocked".to_string()));
            }
            self.calls.push(Call::Play);
            Ok(())
        }

        fn pause(&mut self) -> Result<()> {
            self.calls.push(Call::Pause);
            Ok(())
        }

        fn seek(&mut self, seconds: u64) -> Result<()> {
            self.calls.push(Call::Seek(seconds));
            Ok(())
        }

        fn set_looping(&mut self, looping: bool) -> Result<()> {
            self.calls.push(Call::SetLooping(looping));
            Ok(())
        }
    }

    fn episode(name: &str) -> Episode {
        Episode::new(name, "Host", 100, "thumb.jpg", format!("{}.mp3", name))
    }

    fn setup() -> (
        PlaybackSurface<RecordingOutput>,
        PlaybackStateStore,
        MediaEventSender,
    ) {
        let config = PlayerConfig::default();
        let (sender, queue) = media_channel();
        let surface = PlaybackSurface::new(RecordingOutput::default(), queue, &config);
        (surface, PlaybackStateStore::new(&config), sender)
    }

    fn loaded(name: &str) -> MediaEvent {
        MediaEvent::Loaded {
            source: format!("{}.mp3", name),
        }
    }

    #[test]
    fn bind_pushes_loop_preference() {
        let (mut surface, store, _sender) = setup();
        surface.bind(&store);
        assert_eq!(surface.output().calls, vec![Call::SetLooping(false)]);
    }

    #[test]
    fn play_single_loads_and_plays() {
        let (mut surface, mut store, _sender) = setup();

        store.play_single(episode("a"));
        surface.tick(&mut store);

        let calls = &surface.output().calls;
        assert_eq!(calls[0], Call::Load("a.mp3".to_string()));
        assert!(calls.contains(&Call::Play));
        assert!(surface.is_load_pending());
        assert_eq!(surface.loaded_index(), Some(0));
    }

    #[test]
    fn progress_before_load_is_discarded() {
        let (mut surface, mut store, sender) = setup();
        store.play_single(episode("a"));
        surface.tick(&mut store);

        sender.post(MediaEvent::TimeProgress { seconds: 40 });
        sender.post(loaded("a"));
        sender.post(MediaEvent::TimeProgress { seconds: 3 });
        surface.tick(&mut store);

        assert_eq!(surface.position(), 3);
        assert!(!surface.is_load_pending());
    }

    #[test]
    fn position_never_decreases() {
        let (mut surface, mut store, sender) = setup();
        store.play_single(episode("a"));
        sender.post(loaded("a"));
        surface.tick(&mut store);

        sender.post(MediaEvent::TimeProgress { seconds: 10 });
        sender.post(MediaEvent::TimeProgress { seconds: 7 });
        surface.tick(&mut store);

        assert_eq!(surface.position(), 10);
    }

    #[test]
    fn seek_updates_position_immediately() {
        let (mut surface, mut store, sender) = setup();
        store.play_single(episode("a"));
        sender.post(loaded("a"));
        sender.post(MediaEvent::TimeProgress { seconds: 50 });
        surface.tick(&mut store);

        surface.seek(&store, 20);

        assert_eq!(surface.position(), 20);
        assert_eq!(surface.output().calls.last(), Some(&Call::Seek(20)));
    }

    #[test]
    fn seek_clamps_to_duration() {
        let (mut surface, mut store, _sender) = setup();
        store.play_single(episode("a"));
        surface.tick(&mut store);

        surface.seek(&store, 1_000);
        assert_eq!(surface.position(), 100);
    }

    #[test]
    fn seek_without_episode_is_noop() {
        let (mut surface, store, _sender) = setup();
        surface.seek(&store, 5);
        assert!(surface.output().calls.is_empty());
        assert_eq!(surface.position(), 0);
    }

    #[test]
    fn toggle_play_pauses_and_resumes() {
        let (mut surface, mut store, _sender) = setup();
        store.play_single(episode("a"));
        surface.tick(&mut store);
        surface.output_mut().calls.clear();

        store.toggle_play();
        surface.tick(&mut store);
        assert_eq!(surface.output().calls, vec![Call::Pause]);

        store.toggle_play();
        surface.tick(&mut store);
        assert_eq!(surface.output().calls, vec![Call::Pause, Call::Play]);
    }

    #[test]
    fn toggle_play_without_episode_sends_no_play() {
        let (mut surface, mut store, _sender) = setup();
        store.toggle_play();
        surface.tick(&mut store);
        assert!(surface.output().calls.is_empty());
    }

    #[test]
    fn output_pause_reconciles_store() {
        let (mut surface, mut store, sender) = setup();
        store.play_single(episode("a"));
        sender.post(loaded("a"));
        sender.post(MediaEvent::Paused);
        surface.tick(&mut store);

        assert!(!store.is_playing());
    }

    #[test]
    fn toggle_loop_is_bound_to_output() {
        let (mut surface, mut store, _sender) = setup();
        store.toggle_loop();
        surface.tick(&mut store);
        assert_eq!(surface.output().calls, vec![Call::SetLooping(true)]);
    }

    #[test]
    fn refused_command_becomes_error_event() {
        let (mut surface, mut store, _sender) = setup();
        surface.output_mut().refuse_play = true;

        store.play_single(episode("a"));
        surface.tick(&mut store);

        let events = surface.drain_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, SurfaceEvent::Error { message } if message.starts_with("play"))));
    }

    #[test]
    fn without_autoplay_paused_store_stays_paused() {
        let config = PlayerConfig {
            autoplay: false,
            ..Default::default()
        };
        let (sender, queue) = media_channel();
        let mut surface = PlaybackSurface::new(RecordingOutput::default(), queue, &config);
        let mut store = PlaybackStateStore::new(&config);

        store
            .play_list(vec![episode("a"), episode("b")], 0)
            .unwrap();
        sender.post(loaded("a"));
        sender.post(MediaEvent::Paused);
        surface.tick(&mut store);
        surface.output_mut().calls.clear();

        store.play_next();
        surface.tick(&mut store);

        assert_eq!(surface.output().calls, vec![Call::Load("b.mp3".to_string())]);
        assert!(!store.is_playing());
    }

    #[test]
    fn events_after_clear_are_ignored() {
        let (mut surface, mut store, sender) = setup();
        store.play_single(episode("a"));
        sender.post(loaded("a"));
        surface.tick(&mut store);

        store.clear_player_state();
        sender.post(MediaEvent::TimeProgress { seconds: 9 });
        sender.post(MediaEvent::Ended);
        surface.tick(&mut store);

        assert_eq!(surface.position(), 0);
        assert_eq!(surface.loaded_index(), None);
        assert!(store.queue().is_empty());
    }

    #[test]
    fn output_reports_do_not_bounce_back_as_commands() {
        let (mut surface, mut store, sender) = setup();
        store.play_single(episode("a"));
        sender.post(loaded("a"));
        surface.tick(&mut store);
        surface.output_mut().calls.clear();

        store.toggle_play();
        store.toggle_play();
        surface.tick(&mut store);
        assert_eq!(surface.output().calls, vec![Call::Pause, Call::Play]);

        // The output confirming both commands
        sender.post(MediaEvent::Paused);
        sender.post(MediaEvent::Played);
        surface.tick(&mut store);

        assert_eq!(surface.output().calls, vec![Call::Pause, Call::Play]);
        assert!(store.is_playing());
    }

    #[test]
    fn progress_queued_before_seek_is_discarded() {
        let (mut surface, mut store, sender) = setup();
        store.play_single(episode("a"));
        sender.post(loaded("a"));
        surface.tick(&mut store);

        sender.post(MediaEvent::TimeProgress { seconds: 50 });
        surface.seek(&store, 10);
        sender.post(MediaEvent::TimeProgress { seconds: 11 });
        surface.tick(&mut store);

        assert_eq!(surface.position(), 11);
    }
}
