//! Synchronous host for a [`RevealSession`].
//!
//! Executes effects against a [`MediaBackend`] and a [`VirtualClock`], and
//! feeds playback failures and timer expiries back into the session. With a
//! [`SensorHub`] attached, tilt listening follows the session's sampling
//! effects.

use std::collections::VecDeque;
use std::time::Duration;

use crate::config;
use crate::media::{MediaBackend, PlaybackError};
use crate::parallax::{InputMode, ListenerId, SensorHub};
use crate::reveal::{Effect, RevealEvent, RevealSession};
use crate::scheduler::VirtualClock;

pub struct RevealDriver<B: MediaBackend> {
    session: RevealSession,
    media: B,
    clock: VirtualClock,
    sensors: Option<Box<dyn SensorHub>>,
    listener: Option<ListenerId>,
    completed: bool,
}

impl<B: MediaBackend> RevealDriver<B> {
    pub fn new(session: RevealSession, media: B) -> Self {
        Self {
            session,
            media,
            clock: VirtualClock::new(),
            sensors: None,
            listener: None,
            completed: false,
        }
    }

    /// Attach the platform's tilt sources. The session samples whichever one
    /// the hub's capabilities select.
    pub fn with_sensors<H: SensorHub + 'static>(mut self, hub: H) -> Self {
        self.session.set_capabilities(hub.capabilities());
        self.sensors = Some(Box::new(hub));
        self
    }

    /// Whether a tilt listener is currently registered.
    pub fn is_listening(&self) -> bool {
        self.listener.is_some()
    }

    pub fn session(&self) -> &RevealSession {
        &self.session
    }

    pub fn media(&self) -> &B {
        &self.media
    }

    pub fn clock(&self) -> &VirtualClock {
        &self.clock
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Whether the user has collected the cards.
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

    /// Advance virtual time, firing timers (including ones scheduled by
    /// earlier timers) as they come due.
    pub fn advance(&mut self, by: Duration) {
        let target = self.clock.now() + by;
        while let Some(timer) = self.clock.pop_due(target) {
            self.dispatch(RevealEvent::TimerFired(timer));
        }
        self.clock.settle(target);
    }

    /// Tear the session down and return it.
    pub fn finish(mut self) -> RevealSession {
        let effects = self.session.teardown();
        self.apply(effects);
        self.session.clone()
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
                        Err(e) => {
                            tracing::warn!(%src, error = %e, "audio cue failed");
                            Some(RevealEvent::AudioFailed { cue, tier })
                        }
                    }
                }
                Effect::Schedule { timer, after, .. } => {
                    self.clock.schedule(timer, after);
                    None
                }
                Effect::Cancel(timer) => {
                    self.clock.cancel(timer);
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
        if self.listener.is_some() {
            return;
        }
        if let Some(hub) = self.sensors.as_mut() {
            self.listener = Some(hub.subscribe(mode));
            tracing::debug!(?mode, "reveal tilt listener registered");
        }
    }

    fn stop_listening(&mut self) {
        if let (Some(id), Some(hub)) = (self.listener.take(), self.sensors.as_mut()) {
            hub.unsubscribe(id);
            tracing::debug!("reveal tilt listener removed");
        }
    }
}

impl<B: MediaBackend> Drop for RevealDriver<B> {
    fn drop(&mut self) {
        if !self.session.is_finished() {
            self.session.teardown();
        }
        self.stop_listening();
        self.clock.cancel_all();
    }
}
