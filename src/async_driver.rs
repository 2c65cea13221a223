//! Tokio host for a [`RevealSession`].
//!
//! Each scheduled timer is a spawned task sleeping on [`tokio::time::sleep`]
//! that posts its id back over a channel; cancelling a timer aborts its
//! task. Playback is dispatched to the [`MediaBackend`] inline and failures
//! are fed back as events, so a playback outcome and a timer expiry can
//! arrive in either order. An attached [`SensorHub`] is subscribed while the
//! session samples tilt.
//!
//! # Example
//!
//! ```no_run
//! use gacha_sdk::{AsyncRevealDriver, GachaSdk, HeadlessMedia, Stage};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> gacha_sdk::Result<()> {
//!     let mut sdk = GachaSdk::builder().build()?;
//!     let session = sdk.start_draw("1", 10)?.expect("valid quantity");
//!     let media = HeadlessMedia::new(sdk.assets().clone());
//!
//!     let mut driver = AsyncRevealDriver::new(session, media);
//!     driver.start();
//!     driver.dispatch(gacha_sdk::RevealEvent::Skip);
//!     driver.run_until(Stage::Result).await;
//!     Ok(())
//! }
//! ```

use std::collections::{HashMap, VecDeque};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config;
use crate::media::{MediaBackend, PlaybackError};
use crate::parallax::{InputMode, ListenerId, SensorHub};
use crate::reveal::{Effect, RevealEvent, RevealSession, Stage, TimerId};

pub struct AsyncRevealDriver<B: MediaBackend> {
    session: RevealSession,
    media: B,
    timers: HashMap<TimerId, JoinHandle<()>>,
    tx: mpsc::UnboundedSender<TimerId>,
    rx: mpsc::UnboundedReceiver<TimerId>,
    sensors: Option<Box<dyn SensorHub>>,
    listener: Option<ListenerId>,
    completed: bool,
}

impl<B: MediaBackend> AsyncRevealDriver<B> {
    /// Create a driver. Must be used from within a Tokio runtime.
    pub fn new(session: RevealSession, media: B) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            session,
            media,
            timers: HashMap::new(),
            tx,
            rx,
            sensors: None,
            listener: None,
            completed: false,
        }
    }

    /// Attach the platform's tilt sources.
    pub fn with_sensors<H: SensorHub + 'static>(mut self, hub: H) -> Self {
        self.session.set_capabilities(hub.capabilities());
        self.sensors = Some(Box::new(hub));
        self
    }

    pub fn is_listening(&self) -> bool {
        self.listener.is_some()
    }

    pub fn session(&self) -> &RevealSession {
        &self.session
    }

    pub fn media(&self) -> &B {
        &self.media
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn start(&mut self) {
        let effects = self.session.start();
        self.apply(effects);
    }

    pub fn dispatch(&mut self, event: RevealEvent) {
        let effects = self.session.handle(event);
        self.apply(effects);
    }

    /// Wait for the next timer and deliver it. Returns `false` when nothing
    /// is pending.
    pub async fn tick(&mut self) -> bool {
        if self.timers.is_empty() {
            return false;
        }
        match self.rx.recv().await {
            Some(timer) => {
                self.timers.remove(&timer);
                self.dispatch(RevealEvent::TimerFired(timer));
                true
            }
            None => false,
        }
    }

    /// Deliver timers until the session reaches `stage` and no timers remain,
    /// or nothing is left to wait for.
    pub async fn run_until(&mut self, stage: Stage) {
        loop {
            if self.session.stage() >= stage && self.timers.is_empty() {
                break;
            }
            if !self.tick().await {
                break;
            }
        }
    }

    fn spawn_timer(&mut self, timer: TimerId, after: std::time::Duration) {
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let _ = tx.send(timer);
        });
        if let Some(previous) = self.timers.insert(timer, handle) {
            previous.abort();
        }
    }

    fn cancel_timer(&mut self, timer: TimerId) {
        if let Some(handle) = self.timers.remove(&timer) {
            handle.abort();
        }
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        let mut queue: VecDeque<Effect> = effects.into();
        while let Some(effect) = queue.pop_front() {
            let followup = match effect {
                Effect::PlayVideo { src, muted } => match self.media.play_video(&src, muted) {
                    Ok(()) => None,
                    Err(PlaybackError::PolicyBlocked) => Some(RevealEvent::VideoPlayRejected),
                    Err(PlaybackError::LoadFailed) => Some(RevealEvent::VideoError),
                },
                Effect::SetMuted(muted) => {
                    self.media.set_muted(muted);
                    None
                }
                Effect::PlayAudio { cue, src, tier } => {
                    match self.media.play_audio(&src, config::CUE_VOLUME) {
                        Ok(()) => None,
                        Err(_) => Some(RevealEvent::AudioFailed { cue, tier }),
                    }
                }
                Effect::Schedule { timer, after, .. } => {
                    self.spawn_timer(timer, after);
                    None
                }
                Effect::Cancel(timer) => {
                    self.cancel_timer(timer);
                    None
                }
                Effect::StartSampling(mode) => {
                    self.start_listening(mode);
                    None
                }
                Effect::StopSampling => {
                    self.stop_listening();
                    None
                }
                Effect::Complete => {
                    self.completed = true;
                    None
                }
            };
            if let Some(event) = followup {
                queue.extend(self.session.handle(event));
            }
        }
    }

    fn start_listening(&mut self, mode: InputMode) {
        if self.listener.is_none() {
            if let Some(hub) = self.sensors.as_mut() {
                self.listener = Some(hub.subscribe(mode));
            }
        }
    }

    fn stop_listening(&mut self) {
        if let (Some(id), Some(hub)) = (self.listener.take(), self.sensors.as_mut()) {
            hub.unsubscribe(id);
        }
    }
}

impl<B: MediaBackend> Drop for AsyncRevealDriver<B> {
    fn drop(&mut self) {
        self.session.teardown();
        self.stop_listening();
        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
    }
}
