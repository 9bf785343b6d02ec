//! Segment controller: the playback state machine behind [`AudioController`].
//!
//! Everything here is synchronous. The only suspension point is the device
//! play request, which is handed back to the caller as a [`PlayRequest`] and
//! later settled through [`SegmentController::complete_play`].
//!
//! [`AudioController`]: super::AudioController

use dioxus::logger::tracing::{debug, info, warn};

use super::device::{DeviceEvent, DeviceEventKind, Generation, PlayFuture, PlaybackDevice};
use super::error::PlaybackError;
use super::published::{PlaybackPhase, PlaybackSnapshot};
use super::track::Track;

/// Identifies one outstanding device play request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayTicket {
    generation: Generation,
    id: u64,
}

/// A play request the caller must drive to completion.
pub struct PlayRequest {
    pub ticket: PlayTicket,
    pub future: PlayFuture,
}

pub struct SegmentController<D: PlaybackDevice> {
    device: D,
    generation: Generation,
    state: PlaybackSnapshot,
    /// Start playback once the device reports ready.
    autoplay: bool,
    pending_play: Option<PlayTicket>,
    next_ticket: u64,
}

impl<D: PlaybackDevice> SegmentController<D> {
    pub fn new(mut device: D, volume: f64, muted: bool) -> Self {
        let volume = sanitize_volume(volume).unwrap_or(100.0);
        device.set_volume(volume);
        device.set_muted(muted);
        Self {
            device,
            generation: Generation::default(),
            state: PlaybackSnapshot {
                volume,
                muted,
                ..PlaybackSnapshot::default()
            },
            autoplay: false,
            pending_play: None,
            next_ticket: 0,
        }
    }

    pub fn snapshot(&self) -> &PlaybackSnapshot {
        &self.state
    }

    /// Switches to `track` and starts it as soon as the device is ready.
    pub fn play(&mut self, track: Track) {
        info!(title = %track.title, source = %track.source, "switching track");
        self.begin_load(track, true);
    }

    /// Assigns `track` without starting it.
    pub fn cue(&mut self, track: Track) {
        debug!(title = %track.title, "cueing track");
        self.begin_load(track, false);
    }

    fn begin_load(&mut self, track: Track, autoplay: bool) {
        // Anything still in flight for the previous track is now stale.
        self.generation = self.generation.next();
        self.pending_play = None;
        self.autoplay = autoplay;

        self.device.pause();
        self.device.set_current_time(0.0);
        self.device.set_source(&track.source, self.generation);

        self.state.current_track = Some(track);
        self.state.phase = PlaybackPhase::Loading;
        self.state.is_playing = false;
        self.state.current_time = 0.0;
        self.state.duration = 0.0;
        self.state.last_error = None;

        self.device.load();
    }

    pub fn stop(&mut self) {
        if self.state.current_track.is_none() {
            return;
        }
        debug!("stopping playback");
        self.pending_play = None;
        self.autoplay = false;
        self.device.pause();
        self.device.set_current_time(0.0);
        self.state.is_playing = false;
        self.state.current_time = 0.0;
        if self.state.phase != PlaybackPhase::Idle {
            self.state.phase = PlaybackPhase::Paused;
        }
    }

    /// Pauses when the device last confirmed playback, otherwise asks it to
    /// play from the current cursor. Never issues a second play request
    /// while one is outstanding.
    pub fn toggle_play(&mut self) -> Option<PlayRequest> {
        let track = self.state.current_track.clone()?;

        if self.state.is_playing {
            self.pause_device();
            return None;
        }
        if self.pending_play.is_some() {
            debug!("play already requested, ignoring toggle");
            return None;
        }

        match self.state.phase {
            PlaybackPhase::Loading => {
                // The ready signal will start playback.
                self.autoplay = true;
                None
            }
            PlaybackPhase::Idle => {
                // Retry after a load failure with a fresh load.
                self.play(track);
                None
            }
            PlaybackPhase::Paused | PlaybackPhase::Ended | PlaybackPhase::Playing => {
                Some(self.request_play())
            }
        }
    }

    pub fn seek(&mut self, seconds: f64) {
        if self.state.current_track.is_none() || seconds.is_nan() {
            return;
        }
        let duration = if self.state.duration > 0.0 {
            self.state.duration
        } else {
            self.device
                .duration()
                .filter(|d| d.is_finite() && *d > 0.0)
                .unwrap_or(0.0)
        };
        let target = seconds.clamp(0.0, duration);
        self.device.set_current_time(target);
        self.state.current_time = target;
    }

    pub fn skip_by(&mut self, delta: f64) {
        self.seek(self.state.current_time + delta);
    }

    pub fn set_volume(&mut self, percent: f64) {
        let Some(volume) = sanitize_volume(percent) else {
            return;
        };
        self.device.set_volume(volume);
        self.state.volume = volume;
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.device.set_muted(muted);
        self.state.muted = muted;
    }

    /// Applies one device event. Returns a play request when the event
    /// completes a load that should start playing.
    pub fn handle_event(&mut self, event: DeviceEvent) -> Option<PlayRequest> {
        if event.generation != self.generation {
            debug!(kind = ?event.kind, "discarding event from a superseded track");
            return None;
        }

        match event.kind {
            DeviceEventKind::Ready => return self.on_ready(),
            DeviceEventKind::Playing => {
                self.state.is_playing = true;
                self.state.phase = PlaybackPhase::Playing;
                self.state.last_error = None;
            }
            DeviceEventKind::Paused => {
                // Pauses while loading come from the source switch itself.
                if self.state.is_playing || self.state.phase == PlaybackPhase::Playing {
                    self.state.is_playing = false;
                    self.state.phase = PlaybackPhase::Paused;
                }
            }
            DeviceEventKind::Ended => {
                self.pending_play = None;
                self.state.is_playing = false;
                self.state.phase = PlaybackPhase::Ended;
            }
            DeviceEventKind::TimeAdvanced(reported) => self.on_time_advanced(reported),
            DeviceEventKind::DurationKnown(duration) => {
                if duration.is_finite() && duration > 0.0 {
                    self.state.duration = duration;
                }
            }
            DeviceEventKind::LoadError(error) => self.on_load_error(error),
        }
        None
    }

    /// Settles a play request. Completions for requests that were superseded
    /// by `stop`, a pause or a new track are dropped.
    pub fn complete_play(&mut self, ticket: PlayTicket, result: Result<(), PlaybackError>) {
        if self.pending_play != Some(ticket) || ticket.generation != self.generation {
            debug!("ignoring completion of a superseded play request");
            return;
        }
        self.pending_play = None;

        match result {
            Ok(()) => {
                self.state.is_playing = true;
                self.state.phase = PlaybackPhase::Playing;
                self.state.last_error = None;
            }
            Err(error) => {
                warn!(
                    title = self.current_title(),
                    error = %error,
                    "device rejected play request"
                );
                self.state.is_playing = false;
                self.state.phase = PlaybackPhase::Paused;
                self.state.last_error = Some(error);
            }
        }
    }

    fn on_ready(&mut self) -> Option<PlayRequest> {
        // A repeated ready (rebuffer after the start seek) must not seek again
        // or drop the outstanding play request.
        if self.state.phase != PlaybackPhase::Loading || self.pending_play.is_some() {
            return None;
        }
        if let Some(start) = self
            .state
            .current_track
            .as_ref()
            .and_then(Track::start_offset)
        {
            debug!(start, "seeking to segment start");
            self.device.set_current_time(start);
            self.state.current_time = start;
        }

        if !self.autoplay {
            self.state.phase = PlaybackPhase::Paused;
            return None;
        }
        self.autoplay = false;
        Some(self.request_play())
    }

    fn on_time_advanced(&mut self, reported: f64) {
        // The live cursor is authoritative: events emitted before a rewind
        // took effect must not trigger it again.
        let mut now = self.device.current_time();
        if !now.is_finite() {
            now = reported;
        }
        if now.is_finite() {
            self.state.current_time = now.max(0.0);
        }

        if !self.state.is_playing {
            return;
        }
        let Some(track) = self.state.current_track.as_ref() else {
            return;
        };
        let Some(segment) = track.segment() else {
            return;
        };
        if now < segment.end {
            return;
        }

        if track.looping {
            debug!(from = now, to = segment.start, "segment boundary, rewinding");
            self.device.set_current_time(segment.start);
            self.state.current_time = segment.start;
        } else {
            debug!(at = now, "segment boundary, pausing");
            self.pause_device();
        }
    }

    fn on_load_error(&mut self, error: PlaybackError) {
        warn!(
            title = self.current_title(),
            error = %error,
            "audio source failed to load"
        );
        self.pending_play = None;
        self.autoplay = false;
        self.state.is_playing = false;
        self.state.phase = PlaybackPhase::Idle;
        self.state.last_error = Some(error);
    }

    fn request_play(&mut self) -> PlayRequest {
        self.next_ticket += 1;
        let ticket = PlayTicket {
            generation: self.generation,
            id: self.next_ticket,
        };
        self.pending_play = Some(ticket);
        PlayRequest {
            ticket,
            future: self.device.play(),
        }
    }

    fn pause_device(&mut self) {
        self.pending_play = None;
        self.device.pause();
        self.state.is_playing = false;
        self.state.phase = PlaybackPhase::Paused;
    }

    fn current_title(&self) -> &str {
        self.state
            .current_track
            .as_ref()
            .map(|track| track.title.as_str())
            .unwrap_or("")
    }
}

/// Clamps a volume to `[0, 100]`. NaN is rejected.
fn sanitize_volume(percent: f64) -> Option<f64> {
    (!percent.is_nan()).then(|| percent.clamp(0.0, 100.0))
}
