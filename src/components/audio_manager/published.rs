// Published playback state and its observers.
use std::rc::Rc;

use super::error::PlaybackError;
use super::track::Track;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackPhase {
    #[default]
    Idle,
    Loading,
    Playing,
    Paused,
    Ended,
}

/// Read-only view of the controller handed to widgets.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSnapshot {
    pub current_track: Option<Track>,
    pub phase: PlaybackPhase,
    pub is_playing: bool,
    pub current_time: f64,
    pub duration: f64,
    pub volume: f64,
    pub muted: bool,
    pub last_error: Option<PlaybackError>,
}

impl Default for PlaybackSnapshot {
    fn default() -> Self {
        Self {
            current_track: None,
            phase: PlaybackPhase::Idle,
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            volume: 100.0,
            muted: false,
            last_error: None,
        }
    }
}

impl PlaybackSnapshot {
    /// Progress through the track in percent, 0 while the duration is unknown.
    pub fn progress_percent(&self) -> f64 {
        if self.duration > 0.0 {
            (self.current_time / self.duration * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Observer = Rc<dyn Fn(&PlaybackSnapshot)>;

/// Observer registry. Notification works on a copy of the list so observers
/// may subscribe or unsubscribe while being notified.
#[derive(Default)]
pub struct Subscribers {
    next_id: u64,
    observers: Vec<(SubscriptionId, Observer)>,
}

impl Subscribers {
    pub fn add(&mut self, observer: impl Fn(&PlaybackSnapshot) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Rc::new(observer)));
        id
    }

    pub fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    pub fn snapshot(&self) -> Vec<Observer> {
        self.observers
            .iter()
            .map(|(_, observer)| observer.clone())
            .collect()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.observers.len()
    }
}
