//! Podcastr - Playback Management
//!
//! Platform-agnostic episode playback for Podcastr.
//!
//! This crate provides:
//! - Episode queue with a current index (single episode or whole list)
//! - Play/pause, loop and shuffle flags
//! - Derived navigation (has next / has previous) and button availability
//! - A playback surface that drives a host media output and applies the
//!   episode completion policy (loop, advance, or clear)
//!
//! # Architecture
//!
//! `podcastr-playback` does no audio work itself:
//! - The host's media primitive (browser `<audio>`, a desktop player) is
//!   reached only through the [`MediaOutput`] trait
//! - The output reports back through a typed event channel
//!   ([`media_channel`]) that the surface drains once per tick
//! - A [`PlayerSession`] owns the store, the surface and the output
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use podcastr_playback::{media_channel, Episode, PlayerConfig, PlayerSession, SimulatedOutput};
//!
//! let episodes = vec![
//!     Episode::new("Faladev #30", "Diego e Richard", 3981, "cover.jpg", "faladev30.m4a"),
//!     Episode::new("Faladev #31", "Diego e Richard", 3600, "cover.jpg", "faladev31.m4a"),
//! ];
//!
//! let (sender, queue) = media_channel();
//! let output = SimulatedOutput::new(sender, &episodes);
//! let mut session = PlayerSession::new(&PlayerConfig::default(), output, queue);
//!
//! session.store_mut().play_list(episodes, 0).unwrap();
//! session.tick();
//! assert!(session.store().is_playing());
//!
//! // Let the first episode run out
//! session.output_mut().advance(3981);
//! session.tick();
//! assert_eq!(session.store().current_index(), 1);
//! ```
//!
//! # Example: Platform Integration
//!
//! ```rust,no_run
//! use podcastr_playback::{MediaEvent, MediaEventSender, MediaOutput, Result};
//!
//! // Implement MediaOutput for your platform
//! struct MyAudioElement {
//!     events: MediaEventSender,
//! }
//!
//! impl MediaOutput for MyAudioElement {
//!     fn load(&mut self, source: &str) -> Result<()> {
//!         // Point the platform player at `source`; post Loaded when ready
//!         self.events.post(MediaEvent::Loaded { source: source.to_string() });
//!         Ok(())
//!     }
//!
//!     fn play(&mut self) -> Result<()> {
//!         Ok(())
//!     }
//!
//!     fn pause(&mut self) -> Result<()> {
//!         Ok(())
//!     }
//!
//!     fn seek(&mut self, seconds: u64) -> Result<()> {
//!         Ok(())
//!     }
//!
//!     fn set_looping(&mut self, looping: bool) -> Result<()> {
//!         Ok(())
//!     }
//! }
//! ```

mod catalog;
mod config;
mod error;
pub mod events;
mod output;
mod session;
mod shuffle;
mod simulated;
mod store;
mod surface;
pub mod types;

#[cfg(feature = "wasm")]
pub mod wasm;

// Public exports
pub use catalog::Catalog;
pub use config::PlayerConfig;
pub use error::{PlaybackError, Result};
pub use events::{
    media_channel, CompletionOutcome, MediaEvent, MediaEventQueue, MediaEventSender,
    StoreEvent, SurfaceEvent,
};
pub use output::{LoopWrapDetector, MediaOutput};
pub use session::PlayerSession;
pub use shuffle::ShufflePicker;
pub use simulated::SimulatedOutput;
pub use store::PlaybackStateStore;
pub use surface::PlaybackSurface;
pub use types::{Episode, PlaybackSnapshot, PlayerControls};
