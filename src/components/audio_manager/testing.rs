// Scripted in-memory device for controller tests.
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use futures::channel::oneshot;

use super::device::{
    DeviceEvent, DeviceEventKind, EventSink, Generation, PlayFuture, PlaybackDevice,
};
use super::error::{PlayRejection, PlaybackError};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SetSource(String),
    Load,
    Play,
    Pause,
    SetTime(f64),
    SetVolume(f64),
    SetMuted(bool),
}

#[derive(Default)]
struct Inner {
    calls: Vec<Call>,
    sink: Option<EventSink>,
    generation: Generation,
    cursor: f64,
    duration: Option<f64>,
    pending_plays: VecDeque<oneshot::Sender<Result<(), PlaybackError>>>,
    /// Emitted synchronously from inside `load`.
    on_load: Option<DeviceEventKind>,
}

/// Cloning yields a probe onto the same device.
#[derive(Clone, Default)]
pub struct MockDevice {
    inner: Rc<RefCell<Inner>>,
}

impl MockDevice {
    pub fn calls(&self) -> Vec<Call> {
        self.inner.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.borrow_mut().calls.clear();
    }

    pub fn play_calls(&self) -> usize {
        self.calls().iter().filter(|call| **call == Call::Play).count()
    }

    pub fn cursor(&self) -> f64 {
        self.inner.borrow().cursor
    }

    pub fn set_cursor(&self, seconds: f64) {
        self.inner.borrow_mut().cursor = seconds;
    }

    pub fn emit_on_load(&self, kind: DeviceEventKind) {
        self.inner.borrow_mut().on_load = Some(kind);
    }

    /// Delivers an event stamped with the current source generation.
    pub fn emit(&self, kind: DeviceEventKind) {
        let (sink, generation) = {
            let inner = self.inner.borrow();
            (inner.sink.clone(), inner.generation)
        };
        if let Some(sink) = sink {
            sink(DeviceEvent::new(generation, kind));
        }
    }

    /// Reports loaded metadata, like `durationchange`.
    pub fn set_duration(&self, seconds: f64) {
        self.inner.borrow_mut().duration = Some(seconds);
        self.emit(DeviceEventKind::DurationKnown(seconds));
    }

    /// Moves the cursor and reports it, like a `timeupdate`.
    pub fn advance_to(&self, seconds: f64) {
        self.set_cursor(seconds);
        self.emit(DeviceEventKind::TimeAdvanced(seconds));
    }

    pub fn pending_plays(&self) -> usize {
        self.inner.borrow().pending_plays.len()
    }

    /// Settles the oldest outstanding play request.
    pub fn resolve_play(&self, result: Result<(), PlaybackError>) {
        let sender = self
            .inner
            .borrow_mut()
            .pending_plays
            .pop_front()
            .expect("no play request outstanding");
        let _ = sender.send(result);
    }

    pub fn reject_play(&self) {
        self.resolve_play(Err(PlaybackError::PlayRejected {
            reason: PlayRejection::NotAllowed,
            message: "play() requires a user gesture".to_string(),
        }));
    }
}

impl PlaybackDevice for MockDevice {
    fn listen(&mut self, sink: EventSink) {
        self.inner.borrow_mut().sink = Some(sink);
    }

    fn set_source(&mut self, source: &str, generation: Generation) {
        let mut inner = self.inner.borrow_mut();
        inner.calls.push(Call::SetSource(source.to_string()));
        inner.generation = generation;
        inner.duration = None;
    }

    fn load(&mut self) {
        let on_load = {
            let mut inner = self.inner.borrow_mut();
            inner.calls.push(Call::Load);
            inner.on_load.take()
        };
        if let Some(kind) = on_load {
            self.emit(kind);
        }
    }

    fn play(&mut self) -> PlayFuture {
        let (tx, rx) = oneshot::channel();
        {
            let mut inner = self.inner.borrow_mut();
            inner.calls.push(Call::Play);
            inner.pending_plays.push_back(tx);
        }
        Box::pin(async move {
            rx.await.unwrap_or(Err(PlaybackError::PlayRejected {
                reason: PlayRejection::Aborted,
                message: "play request dropped".to_string(),
            }))
        })
    }

    fn pause(&mut self) {
        self.inner.borrow_mut().calls.push(Call::Pause);
    }

    fn current_time(&self) -> f64 {
        self.inner.borrow().cursor
    }

    fn set_current_time(&mut self, seconds: f64) {
        let mut inner = self.inner.borrow_mut();
        inner.calls.push(Call::SetTime(seconds));
        inner.cursor = seconds;
    }

    fn duration(&self) -> Option<f64> {
        self.inner.borrow().duration
    }

    fn set_volume(&mut self, percent: f64) {
        self.inner.borrow_mut().calls.push(Call::SetVolume(percent));
    }

    fn set_muted(&mut self, muted: bool) {
        self.inner.borrow_mut().calls.push(Call::SetMuted(muted));
    }
}
