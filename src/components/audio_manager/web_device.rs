// Browser binding: drives the page's single <audio> element.
use std::cell::Cell;
use std::rc::Rc;

use dioxus::logger::tracing::{debug, warn};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{window, HtmlAudioElement};

use super::device::{
    DeviceEvent, DeviceEventKind, EventSink, Generation, PlayFuture, PlaybackDevice,
};
use super::error::{LoadFailure, PlayRejection, PlaybackError};

const AUDIO_ELEMENT_ID: &str = "segment-player-audio";

/// Finds the shell's audio element, creating it on first use.
pub fn get_or_create_audio_element() -> Option<HtmlAudioElement> {
    let document = window()?.document()?;

    if let Some(existing) = document.get_element_by_id(AUDIO_ELEMENT_ID) {
        return existing.dyn_into::<HtmlAudioElement>().ok();
    }

    let audio: HtmlAudioElement = document.create_element("audio").ok()?.dyn_into().ok()?;
    audio.set_id(AUDIO_ELEMENT_ID);
    audio.set_attribute("preload", "auto").ok()?;
    document.body()?.append_child(&audio).ok()?;

    Some(audio)
}

pub struct WebAudioDevice {
    audio: HtmlAudioElement,
    generation: Rc<Cell<Generation>>,
    listeners: Vec<(&'static str, Closure<dyn FnMut()>)>,
}

impl WebAudioDevice {
    pub fn new(audio: HtmlAudioElement) -> Self {
        Self {
            audio,
            generation: Rc::new(Cell::new(Generation::default())),
            listeners: Vec::new(),
        }
    }

    fn add_listener(
        &mut self,
        event_name: &'static str,
        sink: &EventSink,
        read: impl Fn(&HtmlAudioElement) -> Option<DeviceEventKind> + 'static,
    ) {
        let audio = self.audio.clone();
        let generation = self.generation.clone();
        let sink = sink.clone();
        let closure = Closure::wrap(Box::new(move || {
            if let Some(kind) = read(&audio) {
                sink(DeviceEvent::new(generation.get(), kind));
            }
        }) as Box<dyn FnMut()>);
        if let Err(err) = self
            .audio
            .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref())
        {
            warn!(event = event_name, error = ?err, "failed to attach audio listener");
            return;
        }
        self.listeners.push((event_name, closure));
    }
}

impl PlaybackDevice for WebAudioDevice {
    fn listen(&mut self, sink: EventSink) {
        self.add_listener("canplay", &sink, |_| Some(DeviceEventKind::Ready));
        self.add_listener("playing", &sink, |_| Some(DeviceEventKind::Playing));
        self.add_listener("pause", &sink, |_| Some(DeviceEventKind::Paused));
        self.add_listener("ended", &sink, |_| Some(DeviceEventKind::Ended));
        self.add_listener("timeupdate", &sink, |audio| {
            Some(DeviceEventKind::TimeAdvanced(audio.current_time()))
        });
        let duration = |audio: &HtmlAudioElement| {
            let duration = audio.duration();
            (duration.is_finite() && duration > 0.0).then_some(DeviceEventKind::DurationKnown(duration))
        };
        self.add_listener("loadedmetadata", &sink, duration);
        self.add_listener("durationchange", &sink, duration);
        self.add_listener("error", &sink, |audio| {
            Some(DeviceEventKind::LoadError(load_error(audio)))
        });
    }

    fn set_source(&mut self, source: &str, generation: Generation) {
        self.generation.set(generation);
        self.audio.set_src(source);
    }

    fn load(&mut self) {
        self.audio.load();
    }

    fn play(&mut self) -> PlayFuture {
        match self.audio.play() {
            Ok(promise) => Box::pin(async move {
                wasm_bindgen_futures::JsFuture::from(promise)
                    .await
                    .map(|_| ())
                    .map_err(play_rejection)
            }),
            Err(err) => {
                let error = play_rejection(err);
                Box::pin(async move { Err(error) })
            }
        }
    }

    fn pause(&mut self) {
        if let Err(err) = self.audio.pause() {
            debug!(error = ?err, "pause failed");
        }
    }

    fn current_time(&self) -> f64 {
        self.audio.current_time()
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.audio.set_current_time(seconds);
    }

    fn duration(&self) -> Option<f64> {
        let duration = self.audio.duration();
        duration.is_finite().then_some(duration)
    }

    fn set_volume(&mut self, percent: f64) {
        self.audio.set_volume(percent / 100.0);
    }

    fn set_muted(&mut self, muted: bool) {
        self.audio.set_muted(muted);
    }
}

impl Drop for WebAudioDevice {
    fn drop(&mut self) {
        let _ = self.audio.pause();
        for (event_name, closure) in self.listeners.drain(..) {
            let _ = self
                .audio
                .remove_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
        }
    }
}

fn load_error(audio: &HtmlAudioElement) -> PlaybackError {
    let reason = audio
        .error()
        .map(|error| LoadFailure::from_media_code(error.code()))
        .unwrap_or(LoadFailure::Unknown);
    PlaybackError::LoadFailed {
        uri: audio.current_src(),
        reason,
    }
}

fn play_rejection(err: JsValue) -> PlaybackError {
    let field = |name: &str| {
        js_sys::Reflect::get(&err, &name.into())
            .ok()
            .and_then(|value| value.as_string())
    };
    let name = field("name").unwrap_or_default();
    let message = field("message")
        .or_else(|| err.as_string())
        .unwrap_or_else(|| "unknown error".to_string());
    PlaybackError::PlayRejected {
        reason: PlayRejection::from_exception_name(&name),
        message,
    }
}
