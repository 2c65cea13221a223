//! Reveal sequence state machine.
//!
//! A pull is presented in three linear stages: an intro clip, a full-screen
//! flash, and the result screen. [`RevealSession`] is a pure reducer: it
//! consumes [`RevealEvent`]s and returns the [`Effect`]s a host must carry
//! out (play media, schedule timers, start tilt sampling). Playback outcomes
//! and timer expiries come back as events, in whatever order the platform
//! delivers them.

use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use serde::Serialize;

use crate::config;
use crate::error::{GachaError, Result};
use crate::media::{AudioCue, MediaTier};
use crate::models::{Card, CardPack};
use crate::parallax::{InputCapabilities, InputMode, Shine, Tilt, TiltSample};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Stage {
    Intro,
    Transition,
    Result,
}

/// Which intro clip is playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntroSource {
    /// The bundled default clip.
    Bundled,
    /// The pack's own clip, tried once after the bundled clip errors.
    Pack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Flash → result.
    ShowResult,
    /// Hide the flash overlay.
    ClearFlash,
    /// Play the high-rarity cue.
    Celebrate,
}

/// Work the host must perform on behalf of the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    PlayVideo {
        src: String,
        muted: bool,
    },
    SetMuted(bool),
    PlayAudio {
        cue: AudioCue,
        src: String,
        tier: MediaTier,
    },
    Schedule {
        timer: TimerId,
        kind: TimerKind,
        after: Duration,
    },
    Cancel(TimerId),
    /// Begin listening for tilt input from the given source.
    StartSampling(InputMode),
    StopSampling,
    /// The user collected the cards; hand them to the collection.
    Complete,
}

/// Input to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum RevealEvent {
    /// Video refused to start (autoplay policy).
    VideoPlayRejected,
    VideoError,
    VideoEnded,
    /// Explicit intro skip.
    Skip,
    ToggleMute,
    AudioFailed { cue: AudioCue, tier: MediaTier },
    TimerFired(TimerId),
    Tilt(TiltSample),
    OpenPreview(usize),
    ClosePreview,
    CollectAll,
}

/// Result screen arrangement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RevealLayout<'a> {
    Single { card: &'a Card },
    Grid { columns: usize, cards: &'a [Card] },
}

/// One reveal, from intro to "collect all".
#[derive(Debug, Clone)]
pub struct RevealSession {
    pack: CardPack,
    cards: Vec<Card>,
    stage: Stage,
    entered: HashSet<Stage>,
    intro_source: IntroSource,
    muted: bool,
    flash_visible: bool,
    tilt: Tilt,
    capabilities: InputCapabilities,
    preview: Option<usize>,
    timers: BTreeMap<TimerId, TimerKind>,
    next_timer: u64,
    sampling: bool,
    finished: bool,
}

impl RevealSession {
    /// Create a session for a single (1) or multi (10) pull.
    pub fn new(pack: CardPack, cards: Vec<Card>) -> Result<Self> {
        if cards.len() != 1 && cards.len() != 10 {
            return Err(GachaError::InvalidArgument(format!(
                "A reveal holds 1 or 10 cards, got {}",
                cards.len()
            )));
        }
        Ok(Self {
            pack,
            cards,
            stage: Stage::Intro,
            entered: HashSet::new(),
            intro_source: IntroSource::Bundled,
            muted: false,
            flash_visible: false,
            tilt: Tilt::FLAT,
            capabilities: InputCapabilities::default(),
            preview: None,
            timers: BTreeMap::new(),
            next_timer: 0,
            sampling: false,
            finished: false,
        })
    }

    /// Record what tilt input the platform offers. Without this the session
    /// samples the pointer.
    pub fn with_capabilities(mut self, caps: InputCapabilities) -> Self {
        self.capabilities = caps;
        self
    }

    pub fn set_capabilities(&mut self, caps: InputCapabilities) {
        self.capabilities = caps;
    }

    // -- Accessors ---------------------------------------------------------

    pub fn pack(&self) -> &CardPack {
        &self.pack
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn is_single(&self) -> bool {
        self.cards.len() == 1
    }

    pub fn has_high_rarity(&self) -> bool {
        self.cards.iter().any(|c| c.rarity.is_high())
    }

    pub fn intro_source(&self) -> IntroSource {
        self.intro_source
    }

    /// Current intro clip.
    pub fn intro_src(&self) -> &str {
        match self.intro_source {
            IntroSource::Pack => self
                .pack
                .intro_video_ref
                .as_deref()
                .unwrap_or(config::INTRO_VIDEO),
            IntroSource::Bundled => config::INTRO_VIDEO,
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn flash_visible(&self) -> bool {
        self.flash_visible
    }

    pub fn tilt(&self) -> Tilt {
        self.tilt
    }

    /// The tilt source sampled on the result screen.
    pub fn input_mode(&self) -> InputMode {
        InputMode::select(self.capabilities)
    }

    pub fn is_sampling(&self) -> bool {
        self.sampling
    }

    pub fn preview(&self) -> Option<&Card> {
        self.preview.and_then(|i| self.cards.get(i))
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn caption(&self) -> &'static str {
        if self.is_single() {
            "Single pull in progress..."
        } else {
            "Ten pull in progress..."
        }
    }

    pub fn layout(&self) -> RevealLayout<'_> {
        if self.is_single() {
            RevealLayout::Single {
                card: &self.cards[0],
            }
        } else {
            RevealLayout::Grid {
                columns: config::RESULT_GRID_COLUMNS,
                cards: &self.cards,
            }
        }
    }

    pub fn view(&self) -> RevealView<'_> {
        RevealView {
            stage: self.stage,
            caption: self.caption(),
            flash_visible: self.flash_visible,
            show_unmute_prompt: self.stage == Stage::Intro && self.muted,
            layout: (self.stage == Stage::Result).then(|| self.layout()),
            preview: self.preview(),
            transform: self.tilt.transform(),
            shine: self.tilt.shine(),
        }
    }

    // -- Reducer -----------------------------------------------------------

    /// Enter the intro stage. Calling it again is a no-op.
    pub fn start(&mut self) -> Vec<Effect> {
        if self.finished {
            return Vec::new();
        }
        self.enter(Stage::Intro)
    }

    pub fn handle(&mut self, event: RevealEvent) -> Vec<Effect> {
        if self.finished {
            tracing::debug!(?event, "reveal finished, ignoring event");
            return Vec::new();
        }

        match event {
            RevealEvent::VideoPlayRejected if self.stage == Stage::Intro => {
                if self.muted {
                    tracing::warn!(src = self.intro_src(), "intro playback failed even when muted");
                    Vec::new()
                } else {
                    tracing::warn!(src = self.intro_src(), "intro autoplay with sound blocked, retrying muted");
                    self.muted = true;
                    vec![
                        Effect::SetMuted(true),
                        Effect::PlayVideo {
                            src: self.intro_src().to_string(),
                            muted: true,
                        },
                    ]
                }
            }
            RevealEvent::VideoError if self.stage == Stage::Intro => {
                if self.intro_source == IntroSource::Bundled && self.pack.intro_video_ref.is_some() {
                    self.intro_source = IntroSource::Pack;
                    self.muted = false;
                    tracing::warn!(src = self.intro_src(), "bundled intro failed, trying pack clip");
                    vec![Effect::PlayVideo {
                        src: self.intro_src().to_string(),
                        muted: false,
                    }]
                } else {
                    tracing::warn!("no playable intro clip, skipping to flash");
                    self.enter(Stage::Transition)
                }
            }
            RevealEvent::VideoEnded | RevealEvent::Skip if self.stage == Stage::Intro => {
                self.enter(Stage::Transition)
            }
            RevealEvent::ToggleMute if self.stage == Stage::Intro => {
                self.muted = !self.muted;
                vec![Effect::SetMuted(self.muted)]
            }
            RevealEvent::AudioFailed { cue, tier } => match tier {
                MediaTier::Local => vec![Effect::PlayAudio {
                    cue,
                    src: cue.remote().to_string(),
                    tier: MediaTier::Remote,
                }],
                MediaTier::Remote => {
                    tracing::warn!(?cue, "audio cue unavailable, dropping");
                    Vec::new()
                }
            },
            RevealEvent::TimerFired(id) => self.on_timer(id),
            RevealEvent::Tilt(sample) if self.sampling && self.input_mode().accepts(&sample) => {
                if let Some(t) = Tilt::from_sample(sample, config::REVEAL_POINTER_SPAN) {
                    self.tilt = t;
                }
                Vec::new()
            }
            RevealEvent::OpenPreview(index)
                if self.stage == Stage::Result && !self.is_single() && index < self.cards.len() =>
            {
                self.preview = Some(index);
                Vec::new()
            }
            RevealEvent::ClosePreview => {
                self.preview = None;
                Vec::new()
            }
            RevealEvent::CollectAll if self.stage == Stage::Result => {
                self.finished = true;
                self.preview = None;
                let mut effects = self.release();
                effects.push(Effect::Complete);
                tracing::debug!(cards = self.cards.len(), "reveal collected");
                effects
            }
            other => {
                tracing::debug!(event = ?other, stage = ?self.stage, "event ignored in this stage");
                Vec::new()
            }
        }
    }

    /// Cancel everything still pending. Used when the host discards the
    /// session without going through "collect all".
    pub fn teardown(&mut self) -> Vec<Effect> {
        self.finished = true;
        self.release()
    }

    // -- Internals ---------------------------------------------------------

    fn release(&mut self) -> Vec<Effect> {
        let mut effects: Vec<Effect> = std::mem::take(&mut self.timers)
            .into_keys()
            .map(Effect::Cancel)
            .collect();
        if self.sampling {
            self.sampling = false;
            effects.push(Effect::StopSampling);
        }
        effects
    }

    fn schedule(&mut self, kind: TimerKind, after: Duration) -> Effect {
        self.next_timer += 1;
        let timer = TimerId(self.next_timer);
        self.timers.insert(timer, kind);
        Effect::Schedule { timer, kind, after }
    }

    fn enter(&mut self, stage: Stage) -> Vec<Effect> {
        if !self.entered.insert(stage) {
            tracing::debug!(?stage, "stage already entered");
            return Vec::new();
        }
        tracing::debug!(from = ?self.stage, to = ?stage, "reveal stage");
        self.stage = stage;

        match stage {
            Stage::Intro => vec![Effect::PlayVideo {
                src: self.intro_src().to_string(),
                muted: false,
            }],
            Stage::Transition => {
                self.flash_visible = true;
                vec![
                    Effect::PlayAudio {
                        cue: AudioCue::Reveal,
                        src: AudioCue::Reveal.local().to_string(),
                        tier: MediaTier::Local,
                    },
                    self.schedule(TimerKind::ShowResult, config::FLASH_TO_RESULT),
                    self.schedule(TimerKind::ClearFlash, config::FLASH_CLEAR),
                ]
            }
            Stage::Result => {
                self.sampling = true;
                let mut effects = vec![Effect::StartSampling(self.input_mode())];
                if self.has_high_rarity() {
                    effects.push(self.schedule(TimerKind::Celebrate, config::CELEBRATE_DELAY));
                }
                effects
            }
        }
    }

    fn on_timer(&mut self, id: TimerId) -> Vec<Effect> {
        let Some(kind) = self.timers.remove(&id) else {
            tracing::debug!(?id, "stale timer ignored");
            return Vec::new();
        };
        match kind {
            TimerKind::ShowResult => self.enter(Stage::Result),
            TimerKind::ClearFlash => {
                self.flash_visible = false;
                Vec::new()
            }
            TimerKind::Celebrate => vec![Effect::PlayAudio {
                cue: AudioCue::Celebrate,
                src: AudioCue::Celebrate.local().to_string(),
                tier: MediaTier::Local,
            }],
        }
    }
}

/// Render snapshot of a reveal.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealView<'a> {
    pub stage: Stage,
    pub caption: &'static str,
    pub flash_visible: bool,
    pub show_unmute_prompt: bool,
    pub layout: Option<RevealLayout<'a>>,
    pub preview: Option<&'a Card>,
    pub transform: String,
    pub shine: Shine,
}
