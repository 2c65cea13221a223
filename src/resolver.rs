//! Image reference resolution with a single local-to-primary fallback.
//!
//! A resolver is created per rendered image. It first tries a local file
//! derived from the entity's local key, falls back to the primary reference
//! once on failure, and then stops: a failing fallback leaves the image
//! broken rather than looping.

use crate::assets::{AssetStore, RefKind};
use crate::blobs::BlobTable;
use crate::config;

/// Anything that can report whether an image reference loads.
pub trait ImageSource {
    fn loads(&self, url: &str) -> bool;
}

impl ImageSource for AssetStore {
    fn loads(&self, url: &str) -> bool {
        self.is_available(url)
    }
}

/// Image source for a running session: bundled assets, remote URLs and
/// imported blobs.
pub struct SessionImages<'a> {
    pub assets: &'a AssetStore,
    pub blobs: &'a BlobTable,
}

impl ImageSource for SessionImages<'_> {
    fn loads(&self, url: &str) -> bool {
        match RefKind::of(url) {
            RefKind::Blob => self.blobs.contains(url),
            _ => self.assets.is_available(url),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveState {
    Primary,
    FallenBack,
}

/// What to do after a load error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveStep {
    /// Try this URL next.
    Retry(String),
    /// Nothing left to try; show the broken-image indicator.
    Broken,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedImage {
    Loaded(String),
    Broken(String),
}

impl ResolvedImage {
    pub fn url(&self) -> &str {
        match self {
            ResolvedImage::Loaded(u) | ResolvedImage::Broken(u) => u,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, ResolvedImage::Loaded(_))
    }
}

/// Local path for a local key: a single leading `c` is stripped, so `c1`
/// and `1` both map to `/cards/1.jpg`.
pub fn local_candidate(local_key: &str) -> String {
    let file = local_key.strip_prefix('c').unwrap_or(local_key);
    format!(
        "{}/{}.{}",
        config::LOCAL_CARD_DIR,
        file,
        config::LOCAL_CARD_EXT
    )
}

#[derive(Debug, Clone)]
pub struct ImageResolver {
    primary_ref: String,
    local_key: Option<String>,
    candidate: String,
    state: ResolveState,
}

impl ImageResolver {
    pub fn new(primary_ref: impl Into<String>, local_key: Option<&str>) -> Self {
        let primary_ref = primary_ref.into();
        let local_key = local_key.filter(|k| !k.is_empty()).map(str::to_string);
        let candidate = Self::candidate_for(&primary_ref, local_key.as_deref());
        Self {
            primary_ref,
            local_key,
            candidate,
            state: ResolveState::Primary,
        }
    }

    fn candidate_for(primary_ref: &str, local_key: Option<&str>) -> String {
        if RefKind::of(primary_ref) == RefKind::Blob {
            return primary_ref.to_string();
        }
        match local_key {
            Some(key) => local_candidate(key),
            None => primary_ref.to_string(),
        }
    }

    /// The URL to render right now.
    pub fn current(&self) -> &str {
        &self.candidate
    }

    pub fn primary_ref(&self) -> &str {
        &self.primary_ref
    }

    pub fn state(&self) -> ResolveState {
        self.state
    }

    pub fn has_fallen_back(&self) -> bool {
        self.state == ResolveState::FallenBack
    }

    /// Record that the current candidate failed to load.
    ///
    /// Falls back to the primary reference at most once per input set.
    pub fn on_load_error(&mut self) -> ResolveStep {
        if self.state == ResolveState::Primary && self.candidate != self.primary_ref {
            tracing::debug!(
                failed = %self.candidate,
                fallback = %self.primary_ref,
                "local image missing, using fallback"
            );
            self.candidate = self.primary_ref.clone();
            self.state = ResolveState::FallenBack;
            ResolveStep::Retry(self.candidate.clone())
        } else {
            ResolveStep::Broken
        }
    }

    /// Replace the inputs. Recomputes the candidate and resets the fallback
    /// flag only when something actually changed; returns whether it did.
    pub fn update(&mut self, primary_ref: &str, local_key: Option<&str>) -> bool {
        let local_key = local_key.filter(|k| !k.is_empty());
        if self.primary_ref == primary_ref && self.local_key.as_deref() == local_key {
            return false;
        }
        *self = Self::new(primary_ref, local_key);
        true
    }

    /// Drive the resolver against a source until something loads or the
    /// chain is exhausted.
    pub fn resolve<S: ImageSource + ?Sized>(&mut self, source: &S) -> ResolvedImage {
        loop {
            if source.loads(&self.candidate) {
                return ResolvedImage::Loaded(self.candidate.clone());
            }
            match self.on_load_error() {
                ResolveStep::Retry(_) => continue,
                ResolveStep::Broken => return ResolvedImage::Broken(self.candidate.clone()),
            }
        }
    }
}
