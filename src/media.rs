//! Media playback seam.
//!
//! The reveal sequence never plays media itself; it asks a [`MediaBackend`]
//! and treats every failure as recoverable. [`HeadlessMedia`] is a backend
//! that plays nothing and answers from the asset store, for hosts without a
//! real audio/video stack and for tests.

use std::fmt;

use crate::assets::AssetStore;
use crate::config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    /// Whoosh played when the flash starts.
    Reveal,
    /// Fanfare played when a pull contains SSR or UR.
    Celebrate,
}

impl AudioCue {
    pub fn local(self) -> &'static str {
        match self {
            AudioCue::Reveal => config::REVEAL_CUE_LOCAL,
            AudioCue::Celebrate => config::CELEBRATE_CUE_LOCAL,
        }
    }

    pub fn remote(self) -> &'static str {
        match self {
            AudioCue::Reveal => config::REVEAL_CUE_REMOTE,
            AudioCue::Celebrate => config::CELEBRATE_CUE_REMOTE,
        }
    }

    pub fn source(self, tier: MediaTier) -> &'static str {
        match tier {
            MediaTier::Local => self.local(),
            MediaTier::Remote => self.remote(),
        }
    }
}

/// Which source in a fallback chain is being tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaTier {
    Local,
    Remote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackError {
    /// The platform refused to start playback (autoplay policy).
    PolicyBlocked,
    /// The source could not be loaded or decoded.
    LoadFailed,
}

impl fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackError::PolicyBlocked => f.write_str("playback blocked by autoplay policy"),
            PlaybackError::LoadFailed => f.write_str("media failed to load"),
        }
    }
}

impl std::error::Error for PlaybackError {}

pub type PlaybackResult = std::result::Result<(), PlaybackError>;

/// Platform media playback.
pub trait MediaBackend {
    fn play_video(&mut self, src: &str, muted: bool) -> PlaybackResult;
    fn set_muted(&mut self, muted: bool);
    fn play_audio(&mut self, src: &str, volume: f32) -> PlaybackResult;
}

/// One call recorded by [`HeadlessMedia`].
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackRecord {
    Video { src: String, muted: bool, ok: bool },
    Muted(bool),
    Audio { src: String, ok: bool },
}

/// Backend that resolves playback against an [`AssetStore`].
///
/// A source plays if the store reports it available. Unmuted video is
/// refused unless `allow_sound_autoplay` is set.
#[derive(Debug, Clone)]
pub struct HeadlessMedia {
    assets: AssetStore,
    pub allow_sound_autoplay: bool,
    log: Vec<PlaybackRecord>,
}

impl HeadlessMedia {
    pub fn new(assets: AssetStore) -> Self {
        Self {
            assets,
            allow_sound_autoplay: true,
            log: Vec::new(),
        }
    }

    pub fn with_sound_autoplay(mut self, allow: bool) -> Self {
        self.allow_sound_autoplay = allow;
        self
    }

    pub fn log(&self) -> &[PlaybackRecord] {
        &self.log
    }

    /// Audio sources that actually started.
    pub fn played_audio(&self) -> Vec<&str> {
        self.log
            .iter()
            .filter_map(|r| match r {
                PlaybackRecord::Audio { src, ok: true } => Some(src.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl MediaBackend for HeadlessMedia {
    fn play_video(&mut self, src: &str, muted: bool) -> PlaybackResult {
        let result = if !self.assets.is_available(src) {
            Err(PlaybackError::LoadFailed)
        } else if !muted && !self.allow_sound_autoplay {
            Err(PlaybackError::PolicyBlocked)
        } else {
            Ok(())
        };
        self.log.push(PlaybackRecord::Video {
            src: src.to_string(),
            muted,
            ok: result.is_ok(),
        });
        result
    }

    fn set_muted(&mut self, muted: bool) {
        self.log.push(PlaybackRecord::Muted(muted));
    }

    fn play_audio(&mut self, src: &str, _volume: f32) -> PlaybackResult {
        let ok = self.assets.is_available(src);
        self.log.push(PlaybackRecord::Audio {
            src: src.to_string(),
            ok,
        });
        if ok {
            Ok(())
        } else {
            Err(PlaybackError::LoadFailed)
        }
    }
}
