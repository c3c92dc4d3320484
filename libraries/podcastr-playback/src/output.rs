//! Platform-agnostic media output trait
//!
//! Abstracts the host's audio element (browser `<audio>`, a desktop
//! player, a test double) behind the few commands the surface needs.

use crate::error::Result;

/// Host media-playback primitive
///
/// Commands are fire-and-forget: loading in particular is asynchronous,
/// and the output reports back by posting [`MediaEvent`]s on the
/// [`MediaEventSender`] it was given at construction.
///
/// [`MediaEvent`]: crate::events::MediaEvent
/// [`MediaEventSender`]: crate::events::MediaEventSender
pub trait MediaOutput {
    /// Start preparing a new source
    ///
    /// Resets the playhead to zero. Posts `MediaEvent::Loaded` with the
    /// same URL once the source is ready.
    fn load(&mut self, source: &str) -> Result<()>;

    /// Start or resume playback (no-op if already playing)
    fn play(&mut self) -> Result<()>;

    /// Pause playback (no-op if already paused)
    fn pause(&mut self) -> Result<()>;

    /// Jump to a position in whole seconds
    fn seek(&mut self, seconds: u64) -> Result<()>;

    /// Repeat the current source on completion
    ///
    /// A looping output must still post `MediaEvent::Ended` each time it
    /// wraps back to the start, before any progress from the new pass.
    /// Hosts that wrap silently (the HTML `loop` attribute) can detect the
    /// wrap with [`LoopWrapDetector`].
    fn set_looping(&mut self, looping: bool) -> Result<()>;

    /// Restart the current source from the beginning
    ///
    /// Equivalent to `seek(0)`
    fn restart(&mut self) -> Result<()> {
        self.seek(0)
    }
}

/// Spots a looping playhead jumping back to the start
///
/// Feed it every reported second; `observe` returns true when the playhead
/// went backwards while looping. Seeks and loads must go through `reset`,
/// otherwise a seek back would look like a wrap.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoopWrapDetector {
    last: u64,
}

impl LoopWrapDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `seconds`, returning whether a loop wrap happened
    pub fn observe(&mut self, seconds: u64, looping: bool) -> bool {
        let wrapped = looping && seconds < self.last;
        self.last = seconds;
        wrapped
    }

    /// Move the reference point without reporting a wrap
    pub fn reset(&mut self, seconds: u64) {
        self.last = seconds;
    }
}
