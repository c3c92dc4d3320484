//! Clock-driven media output
//!
//! Stands in for a real audio element: nothing is decoded, the playhead
//! only moves when [`SimulatedOutput::advance`] is called. Used by the CLI
//! and by tests that need a media output posting realistic events.

use crate::error::Result;
use crate::events::{MediaEvent, MediaEventSender};
use crate::output::MediaOutput;
use crate::types::Episode;
use std::collections::HashMap;

/// Deterministic media output driven by an external clock
#[derive(Debug)]
pub struct SimulatedOutput {
    events: MediaEventSender,
    durations: HashMap<String, u64>,
    // Post Loaded from inside load() instead of waiting for finish_load()
    instant_load: bool,

    source: Option<String>,
    loaded: bool,
    playing: bool,
    looping: bool,
    playhead: u64,
    duration: u64,
}

impl SimulatedOutput {
    /// Create an output that knows the durations of `episodes`
    pub fn new(events: MediaEventSender, episodes: &[Episode]) -> Self {
        let durations = episodes
            .iter()
            .map(|episode| (episode.url.clone(), episode.duration))
            .collect();

        Self {
            events,
            durations,
            instant_load: true,
            source: None,
            loaded: false,
            playing: false,
            looping: false,
            playhead: 0,
            duration: 0,
        }
    }

    /// Require an explicit [`finish_load`](Self::finish_load) after each load
    pub fn with_deferred_load(mut self) -> Self {
        self.instant_load = false;
        self
    }

    /// Make a source's duration known
    pub fn register(&mut self, url: impl Into<String>, duration: u64) {
        self.durations.insert(url.into(), duration);
    }

    /// Complete a pending load, posting `Loaded`
    pub fn finish_load(&mut self) {
        if self.loaded {
            return;
        }
        if let Some(source) = self.source.clone() {
            self.loaded = true;
            self.events.post(MediaEvent::Loaded { source });
        }
    }

    /// Move the playhead forward by `seconds` of playback
    ///
    /// Does nothing unless a loaded source is playing. Reaching the end
    /// either wraps to zero (looping) or pauses, posting `Ended` in both cases.
    pub fn advance(&mut self, seconds: u64) {
        if !self.playing || !self.loaded {
            return;
        }

        if self.duration == 0 {
            if !self.looping {
                self.finish_episode();
            }
            return;
        }

        let mut remaining = seconds;
        while remaining > 0 && self.playing {
            let step = remaining.min(self.duration - self.playhead);
            self.playhead += step;
            remaining -= step;
            self.events.post(MediaEvent::TimeProgress {
                seconds: self.playhead,
            });

            if self.playhead >= self.duration {
                if self.looping {
                    self.playhead = 0;
                    self.events.post(MediaEvent::Ended);
                } else {
                    self.finish_episode();
                }
            }
        }
    }

    fn finish_episode(&mut self) {
        self.playing = false;
        self.events.post(MediaEvent::Paused);
        self.events.post(MediaEvent::Ended);
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn playhead(&self) -> u64 {
        self.playhead
    }
}

impl MediaOutput for SimulatedOutput {
    fn load(&mut self, source: &str) -> Result<()> {
        // Like a media element, switching sources stops playback
        if self.playing {
            self.playing = false;
            self.events.post(MediaEvent::Paused);
        }
        self.source = Some(source.to_string());
        self.duration = self.durations.get(source).copied().unwrap_or(0);
        self.playhead = 0;
        self.loaded = false;

        if self.instant_load {
            self.finish_load();
        }
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        if !self.playing && self.source.is_some() {
            self.playing = true;
            self.events.post(MediaEvent::Played);
        }
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        if self.playing {
            self.playing = false;
            self.events.post(MediaEvent::Paused);
        }
        Ok(())
    }

    fn seek(&mut self, seconds: u64) -> Result<()> {
        self.playhead = seconds.min(self.duration);
        Ok(())
    }

    fn set_looping(&mut self, looping: bool) -> Result<()> {
        self.looping = looping;
        Ok(())
    }
}
