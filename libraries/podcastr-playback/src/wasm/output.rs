//! `<audio>` element as a [`MediaOutput`]

use crate::error::{PlaybackError, Result};
use crate::events::{MediaEvent, MediaEventSender};
use crate::output::{LoopWrapDetector, MediaOutput};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlAudioElement;

type Listener = (&'static str, Closure<dyn FnMut()>);

/// Media output backed by an `HtmlAudioElement`
///
/// DOM events are translated into [`MediaEvent`]s and posted to the
/// session's channel; the element itself is never read back by the surface.
pub struct HtmlAudioOutput {
    element: HtmlAudioElement,
    // The element reports an absolute src, Loaded must carry the URL we asked for
    requested: Rc<RefCell<Option<String>>>,
    // `loop` rewinds without firing `ended`; wraps are spotted from timeupdate
    wraps: Rc<Cell<LoopWrapDetector>>,
    listeners: Vec<Listener>,
}

impl HtmlAudioOutput {
    /// Create a detached audio element and wire its listeners to `events`
    pub fn new(events: MediaEventSender) -> Result<Self> {
        let element = HtmlAudioElement::new().map_err(js_error)?;
        Self::with_element(element, events)
    }

    /// Drive an existing element (e.g. one already in the page)
    pub fn with_element(element: HtmlAudioElement, events: MediaEventSender) -> Result<Self> {
        let mut output = Self {
            element,
            requested: Rc::new(RefCell::new(None)),
            wraps: Rc::new(Cell::new(LoopWrapDetector::new())),
            listeners: Vec::new(),
        };

        {
            let events = events.clone();
            let requested = Rc::clone(&output.requested);
            output.listen("loadedmetadata", move || {
                if let Some(source) = requested.borrow().clone() {
                    events.post(MediaEvent::Loaded { source });
                }
            })?;
        }
        {
            let events = events.clone();
            let element = output.element.clone();
            let wraps = Rc::clone(&output.wraps);
            output.listen("timeupdate", move || {
                let seconds = whole_seconds(element.current_time());
                let mut detector = wraps.get();
                if detector.observe(seconds, element.loop_()) {
                    events.post(MediaEvent::Ended);
                }
                wraps.set(detector);
                events.post(MediaEvent::TimeProgress { seconds });
            })?;
        }
        {
            // Covers seeks from native controls as well as ours
            let element = output.element.clone();
            let wraps = Rc::clone(&output.wraps);
            output.listen("seeking", move || {
                let mut detector = wraps.get();
                detector.reset(whole_seconds(element.current_time()));
                wraps.set(detector);
            })?;
        }
        {
            let events = events.clone();
            output.listen("play", move || {
                events.post(MediaEvent::Played);
            })?;
        }
        {
            let events = events.clone();
            output.listen("pause", move || {
                events.post(MediaEvent::Paused);
            })?;
        }
        output.listen("ended", move || {
            events.post(MediaEvent::Ended);
        })?;

        Ok(output)
    }

    pub fn element(&self) -> &HtmlAudioElement {
        &self.element
    }

    fn reset_wraps(&self, seconds: u64) {
        let mut detector = self.wraps.get();
        detector.reset(seconds);
        self.wraps.set(detector);
    }

    fn listen(&mut self, name: &'static str, handler: impl FnMut() + 'static) -> Result<()> {
        let closure = Closure::<dyn FnMut()>::new(handler);
        self.element
            .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
            .map_err(js_error)?;
        self.listeners.push((name, closure));
        Ok(())
    }
}

impl MediaOutput for HtmlAudioOutput {
    fn load(&mut self, source: &str) -> Result<()> {
        *self.requested.borrow_mut() = Some(source.to_string());
        self.reset_wraps(0);
        self.element.set_src(source);
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        // Autoplay rejections surface as a later `pause`, not here
        self.element.play().map(|_promise| ()).map_err(js_error)
    }

    fn pause(&mut self) -> Result<()> {
        self.element.pause().map_err(js_error)
    }

    fn seek(&mut self, seconds: u64) -> Result<()> {
        self.reset_wraps(seconds);
        self.element.set_current_time(seconds as f64);
        Ok(())
    }

    fn set_looping(&mut self, looping: bool) -> Result<()> {
        self.element.set_loop(looping);
        Ok(())
    }
}

impl Drop for HtmlAudioOutput {
    fn drop(&mut self) {
        for (name, closure) in self.listeners.drain(..) {
            self.element
                .remove_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
                .ok();
        }
    }
}

fn whole_seconds(time: f64) -> u64 {
    time.max(0.0).floor() as u64
}

fn js_error(value: JsValue) -> PlaybackError {
    PlaybackError::Output(
        value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value)),
    )
}
