// Shared controller handle: owns the device, queues events, drives play
// requests and notifies observers of published state.
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use futures_util::future::LocalBoxFuture;

use super::controller::{PlayRequest, SegmentController};
use super::device::{DeviceEvent, EventSink, PlaybackDevice};
use super::published::{PlaybackSnapshot, Subscribers, SubscriptionId};
use super::track::Track;
use crate::db::PlayerSettings;

/// Runs a future to completion on the UI thread.
pub type Spawner = Rc<dyn Fn(LocalBoxFuture<'static, ()>)>;

/// Spawner for the current target.
pub fn local_spawner() -> Spawner {
    #[cfg(target_arch = "wasm32")]
    {
        Rc::new(|future| wasm_bindgen_futures::spawn_local(future))
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Rc::new(|future| {
            let _ = dioxus::core::spawn_forever(future);
        })
    }
}

struct Shared {
    core: RefCell<SegmentController<Box<dyn PlaybackDevice>>>,
    backlog: RefCell<VecDeque<DeviceEvent>>,
    subscribers: RefCell<Subscribers>,
    published: RefCell<PlaybackSnapshot>,
    publishing: Cell<bool>,
    spawner: Spawner,
}

/// The single owner of the playback device. Cloning shares the same
/// controller; widgets and pages only ever talk to the device through it.
#[derive(Clone)]
pub struct AudioController {
    shared: Rc<Shared>,
}

impl PartialEq for AudioController {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }
}

impl AudioController {
    pub fn new(
        device: impl PlaybackDevice + 'static,
        settings: &PlayerSettings,
        spawner: Spawner,
    ) -> Self {
        let shared = Rc::new_cyclic(|weak: &Weak<Shared>| {
            let mut device: Box<dyn PlaybackDevice> = Box::new(device);
            device.listen(event_sink(weak.clone()));
            let core = SegmentController::new(device, settings.volume, settings.muted);
            let published = core.snapshot().clone();
            Shared {
                core: RefCell::new(core),
                backlog: RefCell::new(VecDeque::new()),
                subscribers: RefCell::new(Subscribers::default()),
                published: RefCell::new(published),
                publishing: Cell::new(false),
                spawner,
            }
        });
        Self { shared }
    }

    /// Last published state.
    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.shared.published.borrow().clone()
    }

    pub fn subscribe(&self, observer: impl Fn(&PlaybackSnapshot) + 'static) -> SubscriptionId {
        self.shared.subscribers.borrow_mut().add(observer)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.shared.subscribers.borrow_mut().remove(id)
    }

    pub fn play(&self, track: Track) {
        self.run(|core| {
            core.play(track);
            None
        });
    }

    /// Shows `track` and assigns its source without starting playback.
    pub fn cue(&self, track: Track) {
        self.run(|core| {
            core.cue(track);
            None
        });
    }

    pub fn stop(&self) {
        self.run(|core| {
            core.stop();
            None
        });
    }

    pub fn toggle_play(&self) {
        self.run(|core| core.toggle_play());
    }

    pub fn seek(&self, seconds: f64) {
        self.run(|core| {
            core.seek(seconds);
            None
        });
    }

    pub fn skip_by(&self, delta: f64) {
        self.run(|core| {
            core.skip_by(delta);
            None
        });
    }

    pub fn set_volume(&self, percent: f64) {
        self.run(|core| {
            core.set_volume(percent);
            None
        });
    }

    pub fn set_muted(&self, muted: bool) {
        self.run(|core| {
            core.set_muted(muted);
            None
        });
    }

    /// Accepts a device event. Events that arrive while a command is running
    /// wait in the backlog and are applied in arrival order right after it.
    pub fn dispatch(&self, event: DeviceEvent) {
        self.shared.backlog.borrow_mut().push_back(event);
        self.drain();
    }

    fn run(
        &self,
        command: impl FnOnce(&mut SegmentController<Box<dyn PlaybackDevice>>) -> Option<PlayRequest>,
    ) {
        let request = {
            let mut core = self.shared.core.borrow_mut();
            command(&mut core)
        };
        if let Some(request) = request {
            self.spawn_play(request);
        }
        self.drain();
    }

    fn drain(&self) {
        loop {
            let Ok(mut core) = self.shared.core.try_borrow_mut() else {
                // The running command drains once it releases the core.
                return;
            };
            let Some(event) = self.shared.backlog.borrow_mut().pop_front() else {
                break;
            };
            let request = core.handle_event(event);
            drop(core);
            if let Some(request) = request {
                self.spawn_play(request);
            }
        }
        self.publish();
    }

    fn spawn_play(&self, request: PlayRequest) {
        let PlayRequest { ticket, future } = request;
        let weak = Rc::downgrade(&self.shared);
        (self.shared.spawner)(Box::pin(async move {
            let result = future.await;
            if let Some(shared) = weak.upgrade() {
                AudioController { shared }.run(|core| {
                    core.complete_play(ticket, result);
                    None
                });
            }
        }));
    }

    fn publish(&self) {
        if self.shared.publishing.replace(true) {
            // An observer issued a command; the outer loop picks it up.
            return;
        }
        loop {
            let snapshot = match self.shared.core.try_borrow() {
                Ok(core) => core.snapshot().clone(),
                Err(_) => break,
            };
            {
                let mut published = self.shared.published.borrow_mut();
                if *published == snapshot {
                    break;
                }
                *published = snapshot.clone();
            }
            let observers = self.shared.subscribers.borrow().snapshot();
            for observer in observers {
                observer(&snapshot);
            }
        }
        self.shared.publishing.set(false);
    }
}

fn event_sink(weak: Weak<Shared>) -> EventSink {
    Rc::new(move |event| {
        if let Some(shared) = weak.upgrade() {
            AudioController { shared }.dispatch(event);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::audio_manager::testing::{Call, MockDevice};
    use crate::components::audio_manager::track::{reward_track, welcome_track};
    use crate::components::audio_manager::device::{DeviceEventKind, HeadlessDevice};
    use crate::components::audio_manager::error::PlaybackError;
    use crate::components::audio_manager::published::PlaybackPhase;
    use futures::executor::LocalPool;
    use futures::task::LocalSpawnExt;

    struct Harness {
        pool: LocalPool,
        device: MockDevice,
        controller: AudioController,
        seen: Rc<RefCell<Vec<PlaybackSnapshot>>>,
    }

    impl Harness {
        fn new() -> Self {
            let pool = LocalPool::new();
            let spawner = pool.spawner();
            let device = MockDevice::default();
            let controller = AudioController::new(
                device.clone(),
                &PlayerSettings::default(),
                Rc::new(move |future| {
                    spawner
                        .spawn_local(future)
                        .expect("local pool accepts tasks");
                }),
            );
            let seen = Rc::new(RefCell::new(Vec::new()));
            {
                let seen = seen.clone();
                controller.subscribe(move |snapshot| seen.borrow_mut().push(snapshot.clone()));
            }
            Self {
                pool,
                device,
                controller,
                seen,
            }
        }

        fn settle(&mut self) {
            self.pool.run_until_stalled();
        }

        fn state(&self) -> PlaybackSnapshot {
            self.controller.snapshot()
        }

        /// Plays `track` through ready and a confirmed play request.
        fn start(&mut self, track: Track) {
            self.controller.play(track);
            self.device.emit(DeviceEventKind::Ready);
            self.settle();
            self.device.resolve_play(Ok(()));
            self.settle();
        }
    }

    #[test]
    fn welcome_loop_scenario() {
        let mut h = Harness::new();
        h.controller.play(welcome_track());
        h.device.clear_calls();

        h.device.emit(DeviceEventKind::Ready);
        assert_eq!(h.device.calls(), vec![Call::SetTime(20.0), Call::Play]);
        assert!(!h.state().is_playing);

        h.settle();
        h.device.resolve_play(Ok(()));
        h.settle();
        assert!(h.state().is_playing);

        h.device.advance_to(30.0);
        let state = h.state();
        assert_eq!(state.current_time, 20.0);
        assert!(state.is_playing);
        assert_eq!(h.device.cursor(), 20.0);
    }

    #[test]
    fn looping_never_publishes_a_time_past_the_boundary() {
        let mut h = Harness::new();
        h.start(welcome_track());

        for step in 0..40 {
            h.device.advance_to(h.device.cursor() + 0.25 * (step % 3 + 1) as f64);
        }
        for snapshot in h.seen.borrow().iter().filter(|s| s.is_playing) {
            assert!(snapshot.current_time >= 20.0 && snapshot.current_time < 30.0);
        }
        assert!(h.state().is_playing);
    }

    #[test]
    fn reward_stop_before_ready_scenario() {
        let mut h = Harness::new();
        h.controller.play(reward_track());
        h.controller.stop();

        h.device.emit(DeviceEventKind::Ready);
        h.settle();

        let state = h.state();
        assert!(!state.is_playing);
        assert_eq!(state.current_time, 0.0);
        assert_eq!(h.device.play_calls(), 0);
    }

    #[test]
    fn late_completion_of_superseded_track_is_ignored() {
        let mut h = Harness::new();
        h.controller.play(welcome_track());
        h.device.emit(DeviceEventKind::Ready);
        h.settle();
        assert_eq!(h.device.pending_plays(), 1);

        h.controller.play(reward_track());
        h.device.resolve_play(Ok(()));
        h.settle();

        let state = h.state();
        assert!(!state.is_playing);
        assert_eq!(state.phase, PlaybackPhase::Loading);
        assert_eq!(
            state.current_track.map(|t| t.title),
            Some("Dus Don".to_string())
        );
    }

    #[test]
    fn late_rejection_of_superseded_track_is_ignored() {
        let mut h = Harness::new();
        h.controller.play(welcome_track());
        h.device.emit(DeviceEventKind::Ready);
        h.settle();

        h.controller.play(reward_track());
        h.device.reject_play();
        h.settle();

        assert_eq!(h.state().last_error, None);
    }

    #[test]
    fn rejected_play_can_be_retried_with_toggle() {
        let mut h = Harness::new();
        h.controller.play(welcome_track());
        h.device.emit(DeviceEventKind::Ready);
        h.settle();
        h.device.reject_play();
        h.settle();

        let state = h.state();
        assert!(!state.is_playing);
        assert!(state.last_error.as_ref().is_some_and(PlaybackError::is_autoplay_block));
        assert_eq!(
            state.current_track.map(|t| t.title),
            Some("MILA TOH MAREGA".to_string())
        );

        h.controller.toggle_play();
        h.settle();
        h.device.resolve_play(Ok(()));
        h.settle();
        assert!(h.state().is_playing);
        assert_eq!(h.state().last_error, None);
    }

    #[test]
    fn double_toggle_issues_one_play_request() {
        let mut h = Harness::new();
        h.start(welcome_track());
        h.device.emit(DeviceEventKind::Paused);
        h.device.clear_calls();

        h.controller.toggle_play();
        h.controller.toggle_play();
        h.settle();

        assert_eq!(h.device.play_calls(), 1);
        assert_eq!(h.device.pending_plays(), 1);
    }

    #[test]
    fn events_emitted_during_a_command_are_applied_in_order() {
        let h = Harness::new();
        h.device.emit_on_load(DeviceEventKind::LoadError(PlaybackError::NoOutput));

        h.controller.play(reward_track());

        let state = h.state();
        assert_eq!(state.phase, PlaybackPhase::Idle);
        assert_eq!(state.last_error, Some(PlaybackError::NoOutput));
        assert_eq!(
            state.current_track.map(|t| t.title),
            Some("Dus Don".to_string())
        );
    }

    #[test]
    fn seek_publishes_clamped_time_immediately() {
        let mut h = Harness::new();
        h.start(welcome_track());
        h.device.set_duration(95.0);

        h.controller.seek(120.0);
        assert_eq!(h.state().current_time, 95.0);
        h.controller.seek(-4.0);
        assert_eq!(h.state().current_time, 0.0);
        h.controller.skip_by(5.0);
        assert_eq!(h.state().current_time, 5.0);
    }

    #[test]
    fn volume_and_mute_reach_the_device() {
        let h = Harness::new();
        h.device.clear_calls();

        h.controller.set_volume(-10.0);
        h.controller.set_muted(true);

        assert_eq!(h.state().volume, 0.0);
        assert!(h.state().muted);
        assert_eq!(
            h.device.calls(),
            vec![Call::SetVolume(0.0), Call::SetMuted(true)]
        );
    }

    #[test]
    fn observers_only_hear_about_changes() {
        let h = Harness::new();
        h.controller.set_volume(70.0);
        h.controller.set_volume(70.0);
        h.controller.stop();
        assert_eq!(h.seen.borrow().len(), 1);
    }

    #[test]
    fn observer_may_issue_commands() {
        let h = Harness::new();
        {
            let controller = h.controller.clone();
            h.controller.subscribe(move |snapshot| {
                if snapshot.volume > 80.0 {
                    controller.set_volume(80.0);
                }
            });
        }

        h.controller.set_volume(95.0);
        assert_eq!(h.state().volume, 80.0);
        assert_eq!(h.seen.borrow().last().map(|s| s.volume), Some(80.0));
    }

    #[test]
    fn unsubscribed_observer_is_not_called() {
        let h = Harness::new();
        let hits = Rc::new(Cell::new(0));
        let id = {
            let hits = hits.clone();
            h.controller.subscribe(move |_| hits.set(hits.get() + 1))
        };
        h.controller.set_volume(10.0);
        assert!(h.controller.unsubscribe(id));
        h.controller.set_volume(20.0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn dropping_the_controller_cancels_pending_completion() {
        let mut h = Harness::new();
        h.controller.play(welcome_track());
        h.device.emit(DeviceEventKind::Ready);
        h.settle();

        let device = h.device.clone();
        drop(h.controller);
        device.resolve_play(Ok(()));
        h.pool.run_until_stalled();
        // Nobody is listening any more; late events are simply dropped.
        device.emit(DeviceEventKind::Playing);
        assert_eq!(device.pending_plays(), 0);
        assert!(h.seen.borrow().iter().all(|s| !s.is_playing));
    }

    #[test]
    fn headless_device_reports_missing_output_but_keeps_metadata() {
        let pool = LocalPool::new();
        let spawner = pool.spawner();
        let controller = AudioController::new(
            HeadlessDevice::default(),
            &PlayerSettings::default(),
            Rc::new(move |future| {
                spawner
                    .spawn_local(future)
                    .expect("local pool accepts tasks");
            }),
        );

        controller.cue(welcome_track());
        let state = controller.snapshot();
        assert_eq!(state.phase, PlaybackPhase::Idle);
        assert_eq!(state.last_error, Some(PlaybackError::NoOutput));
        assert_eq!(
            state.current_track.map(|t| t.title),
            Some("MILA TOH MAREGA".to_string())
        );
        assert!(!state.is_playing);
    }
}
