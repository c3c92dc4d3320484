//! WASM bindings for podcastr-playback
//!
//! Drives a browser `<audio>` element from the playback session, so the
//! web player can use the same queue and completion policy as native hosts.

pub mod output;
pub mod player;

pub use output::HtmlAudioOutput;
pub use player::WasmPlayer;
