// Playback device binding: the single audio output the controller drives.
use std::rc::Rc;

use futures_util::future::LocalBoxFuture;

use super::error::PlaybackError;

/// Track-transition identifier. Every `play(track)` moves to a fresh
/// generation; events stamped with an older one are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Generation(u64);

impl Generation {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEventKind {
    /// The source can start playing (`canplay`).
    Ready,
    Playing,
    Paused,
    Ended,
    TimeAdvanced(f64),
    DurationKnown(f64),
    LoadError(PlaybackError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeviceEvent {
    pub generation: Generation,
    pub kind: DeviceEventKind,
}

impl DeviceEvent {
    pub fn new(generation: Generation, kind: DeviceEventKind) -> Self {
        Self { generation, kind }
    }
}

/// Callback the device uses to deliver events, in emission order.
pub type EventSink = Rc<dyn Fn(DeviceEvent)>;

/// Deferred result of a play request.
pub type PlayFuture = LocalBoxFuture<'static, Result<(), PlaybackError>>;

/// Platform audio output. All calls except `play` complete synchronously.
pub trait PlaybackDevice {
    /// Registers the sink that receives every device event.
    fn listen(&mut self, sink: EventSink);
    /// Assigns a new source; events delivered from now on carry `generation`.
    /// The stamp is read at delivery, so it does not by itself reject events
    /// queued for the old source. Those are purged by the media element's
    /// load algorithm, and the controller's phase and ticket checks cover
    /// anything that slips through.
    fn set_source(&mut self, source: &str, generation: Generation);
    fn load(&mut self);
    fn play(&mut self) -> PlayFuture;
    fn pause(&mut self);
    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, seconds: f64);
    /// `None` until metadata has loaded.
    fn duration(&self) -> Option<f64>;
    /// Volume in percent, already clamped to `[0, 100]`.
    fn set_volume(&mut self, percent: f64);
    fn set_muted(&mut self, muted: bool);
}

impl<D: PlaybackDevice + ?Sized> PlaybackDevice for Box<D> {
    fn listen(&mut self, sink: EventSink) {
        (**self).listen(sink)
    }
    fn set_source(&mut self, source: &str, generation: Generation) {
        (**self).set_source(source, generation)
    }
    fn load(&mut self) {
        (**self).load()
    }
    fn play(&mut self) -> PlayFuture {
        (**self).play()
    }
    fn pause(&mut self) {
        (**self).pause()
    }
    fn current_time(&self) -> f64 {
        (**self).current_time()
    }
    fn set_current_time(&mut self, seconds: f64) {
        (**self).set_current_time(seconds)
    }
    fn duration(&self) -> Option<f64> {
        (**self).duration()
    }
    fn set_volume(&mut self, percent: f64) {
        (**self).set_volume(percent)
    }
    fn set_muted(&mut self, muted: bool) {
        (**self).set_muted(muted)
    }
}

/// Stand-in used on targets without a browser audio element. Every load
/// fails with [`PlaybackError::NoOutput`] so the UI still shows metadata.
#[derive(Default)]
pub struct HeadlessDevice {
    sink: Option<EventSink>,
    generation: Generation,
    cursor: f64,
}

impl PlaybackDevice for HeadlessDevice {
    fn listen(&mut self, sink: EventSink) {
        self.sink = Some(sink);
    }

    fn set_source(&mut self, _source: &str, generation: Generation) {
        self.generation = generation;
        self.cursor = 0.0;
    }

    fn load(&mut self) {
        if let Some(sink) = &self.sink {
            sink(DeviceEvent::new(
                self.generation,
                DeviceEventKind::LoadError(PlaybackError::NoOutput),
            ));
        }
    }

    fn play(&mut self) -> PlayFuture {
        Box::pin(async { Err(PlaybackError::NoOutput) })
    }

    fn pause(&mut self) {}

    fn current_time(&self) -> f64 {
        self.cursor
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.cursor = seconds;
    }

    fn duration(&self) -> Option<f64> {
        None
    }

    fn set_volume(&mut self, _percent: f64) {}

    fn set_muted(&mut self, _muted: bool) {}
}
