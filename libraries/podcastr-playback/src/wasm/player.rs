//! JavaScript-facing playback session

use super::output::HtmlAudioOutput;
use crate::events::media_channel;
use crate::{Episode, PlaybackError, PlayerConfig, PlayerSession};
use js_sys::Function;
use wasm_bindgen::prelude::*;

/// Playback session bound to a browser `<audio>` element
///
/// Every mutating call runs a tick, so the element reacts immediately.
/// DOM events arrive asynchronously: the page should also call `tick`
/// from its `timeupdate`/animation loop.
#[wasm_bindgen]
pub struct WasmPlayer {
    session: PlayerSession<HtmlAudioOutput>,
    on_event: Option<Function>,
}

#[wasm_bindgen]
impl WasmPlayer {
    /// Create a player with its own detached audio element
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WasmPlayer, JsValue> {
        console_error_panic_hook::set_once();

        let (sender, queue) = media_channel();
        let output = HtmlAudioOutput::new(sender).map_err(to_js)?;

        Ok(Self {
            session: PlayerSession::new(&PlayerConfig::default(), output, queue),
            on_event: None,
        })
    }

    // ===== Queue =====

    #[wasm_bindgen(js_name = playSingle)]
    pub fn play_single(&mut self, episode: JsValue) -> Result<(), JsValue> {
        let episode: Episode = serde_wasm_bindgen::from_value(episode)?;
        self.session.store_mut().play_single(episode);
        self.tick();
        Ok(())
    }

    #[wasm_bindgen(js_name = playList)]
    pub fn play_list(&mut self, episodes: JsValue, index: usize) -> Result<(), JsValue> {
        let episodes: Vec<Episode> = serde_wasm_bindgen::from_value(episodes)?;
        self.session
            .store_mut()
            .play_list(episodes, index)
            .map_err(to_js)?;
        self.tick();
        Ok(())
    }

    #[wasm_bindgen(js_name = clearPlayerState)]
    pub fn clear_player_state(&mut self) {
        self.session.store_mut().clear_player_state();
        self.tick();
    }

    // ===== Controls =====

    #[wasm_bindgen(js_name = togglePlay)]
    pub fn toggle_play(&mut self) {
        self.session.store_mut().toggle_play();
        self.tick();
    }

    /// Reconcile the flag with the element (e.g. from the media session API)
    #[wasm_bindgen(js_name = setPlayingState)]
    pub fn set_playing_state(&mut self, is_playing: bool) {
        self.session.store_mut().set_playing_state(is_playing);
        self.tick();
    }

    #[wasm_bindgen(js_name = toggleLoop)]
    pub fn toggle_loop(&mut self) {
        self.session.store_mut().toggle_loop();
        self.tick();
    }

    #[wasm_bindgen(js_name = toggleShuffle)]
    pub fn toggle_shuffle(&mut self) {
        self.session.store_mut().toggle_shuffle();
        self.tick();
    }

    #[wasm_bindgen(js_name = playNext)]
    pub fn play_next(&mut self) {
        self.session.store_mut().play_next();
        self.tick();
    }

    #[wasm_bindgen(js_name = playPrevious)]
    pub fn play_previous(&mut self) {
        self.session.store_mut().play_previous();
        self.tick();
    }

    /// Seek to position in seconds
    pub fn seek(&mut self, seconds: f64) {
        self.session.seek(seconds.max(0.0).floor() as u64);
        self.tick();
    }

    // ===== Queries =====

    #[wasm_bindgen(js_name = hasNext)]
    pub fn has_next(&self) -> bool {
        self.session.store().has_next()
    }

    #[wasm_bindgen(js_name = hasPrevious)]
    pub fn has_previous(&self) -> bool {
        self.session.store().has_previous()
    }

    /// Current position in seconds
    pub fn position(&self) -> f64 {
        self.session.position() as f64
    }

    /// Full player view state as a plain JS object
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.session.snapshot())?)
    }

    // ===== Scheduling =====

    /// Process queued element events; returns how many were handled
    pub fn tick(&mut self) -> usize {
        let handled = self.session.tick();
        self.emit_events();
        handled
    }

    /// Register a callback receiving each surface event
    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&mut self, callback: Function) {
        self.on_event = Some(callback);
    }

    fn emit_events(&mut self) {
        let events = self.session.drain_events();
        let Some(callback) = &self.on_event else {
            return;
        };
        for event in events {
            if let Ok(value) = serde_wasm_bindgen::to_value(&event) {
                callback.call1(&JsValue::NULL, &value).ok();
            }
        }
    }
}

fn to_js(error: PlaybackError) -> JsValue {
    JsValue::from_str(&error.to_string())
}
