use std::cell::{Cell, RefCell};
use std::rc::Rc;

use dioxus::core::{Runtime, RuntimeGuard};
use dioxus::prelude::*;

use super::device::{HeadlessDevice, PlaybackDevice};
use super::handle::{local_spawner, AudioController, Spawner};
use super::published::PlaybackSnapshot;
use super::track::welcome_track;
use crate::db::{load_settings, save_settings, PlayerSettings};

/// Published playback state for widgets. Read-only: widgets change playback
/// through [`AudioController`] commands.
#[derive(Clone, Copy, PartialEq)]
pub struct PlaybackSignal(Signal<PlaybackSnapshot>);

impl PlaybackSignal {
    /// Reads the snapshot and subscribes the calling component to changes.
    pub fn get(&self) -> PlaybackSnapshot {
        (self.0)()
    }
}

/// The shell's audio controller. Panics outside an [`AudioProvider`].
pub fn use_audio() -> AudioController {
    match try_use_context::<AudioController>() {
        Some(controller) => controller,
        None => panic!("use_audio() called outside of an AudioProvider"),
    }
}

/// Published playback state. Panics outside an [`AudioProvider`].
pub fn use_playback() -> PlaybackSignal {
    match try_use_context::<PlaybackSignal>() {
        Some(signal) => signal,
        None => panic!("use_playback() called outside of an AudioProvider"),
    }
}

#[cfg(target_arch = "wasm32")]
fn create_device() -> Box<dyn PlaybackDevice> {
    use super::web_device::{get_or_create_audio_element, WebAudioDevice};

    match get_or_create_audio_element() {
        Some(audio) => Box::new(WebAudioDevice::new(audio)),
        None => {
            dioxus::logger::tracing::error!("no document to attach an audio element to");
            Box::new(HeadlessDevice::default())
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn create_device() -> Box<dyn PlaybackDevice> {
    Box::new(HeadlessDevice::default())
}

/// Runs `f` after the current render, once the spawner gets to it.
fn defer(spawner: &Spawner, f: impl FnOnce() + 'static) {
    spawner(Box::pin(async move {
        #[cfg(target_arch = "wasm32")]
        gloo_timers::future::TimeoutFuture::new(0).await;
        f();
    }));
}

/// Owns the audio controller for the lifetime of the shell and provides it,
/// plus its published state, to everything rendered inside.
#[component]
pub fn AudioProvider(children: Element) -> Element {
    let settings = use_hook(load_settings);
    let spawner = use_hook(local_spawner);

    let controller = use_hook(|| {
        let controller = AudioController::new(create_device(), &settings, spawner.clone());
        controller.subscribe(settings_saver(settings.clone()));
        controller.cue(welcome_track());
        controller
    });
    let published = use_signal(|| controller.snapshot());

    {
        let controller = controller.clone();
        use_hook(move || {
            // Observers may fire while a component renders, so signal writes
            // are deferred and coalesced to the latest snapshot.
            let runtime = Runtime::current();
            let latest = Rc::new(RefCell::new(None::<PlaybackSnapshot>));
            controller.subscribe(move |snapshot| {
                let already_scheduled = latest.replace(Some(snapshot.clone())).is_some();
                if already_scheduled {
                    return;
                }
                let latest = latest.clone();
                let runtime = runtime.clone();
                let mut published = published;
                defer(&spawner, move || {
                    let _guard = RuntimeGuard::new(runtime);
                    if let Some(snapshot) = latest.take() {
                        published.set(snapshot);
                    }
                });
            });
        });
    }

    use_context_provider(|| controller.clone());
    use_context_provider(|| PlaybackSignal(published));
    use_context_provider(|| settings.clone());

    {
        let controller = controller.clone();
        use_drop(move || controller.stop());
    }

    rsx! {
        {children}
    }
}

/// Persists volume and mute whenever they change.
fn settings_saver(settings: PlayerSettings) -> impl Fn(&PlaybackSnapshot) + 'static {
    let last = Cell::new((settings.volume, settings.muted));
    let settings = RefCell::new(settings);
    move |snapshot| {
        let current = (snapshot.volume, snapshot.muted);
        if last.get() == current {
            return;
        }
        last.set(current);
        let mut settings = settings.borrow_mut();
        settings.volume = snapshot.volume;
        settings.muted = snapshot.muted;
        save_settings(&settings);
    }
}
