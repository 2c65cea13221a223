//! Local asset store.
//!
//! Maps bundle-relative references (`/cards/1.jpg`, `/videos/draw.mp4`,
//! `/audio/reveal.mp3`) onto a directory on disk and reports whether they can
//! be loaded. A missing asset is never an error here: callers treat it as a
//! degraded outcome and move on to their fallback.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config;
use crate::error::Result;

/// Where a reference points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    /// Bundle-relative path, served from the asset root.
    Local,
    /// `http(s)://` URL.
    Remote,
    /// Session-local `blob:` handle.
    Blob,
    Unknown,
}

impl RefKind {
    pub fn of(reference: &str) -> Self {
        if reference.starts_with(config::BLOB_SCHEME) {
            RefKind::Blob
        } else if reference.starts_with("http://") || reference.starts_with("https://") {
            RefKind::Remote
        } else if reference.starts_with('/') {
            RefKind::Local
        } else {
            RefKind::Unknown
        }
    }
}

/// Best-effort access to bundled assets.
#[derive(Debug, Clone)]
pub struct AssetStore {
    /// Directory bundle-relative references are resolved against.
    pub root: PathBuf,
    /// If true, remote references are treated as unreachable.
    pub offline: bool,
}

impl AssetStore {
    /// Create an asset store.
    ///
    /// If `root` is `None`, uses the platform-appropriate default data directory.
    /// Creates the directory if it does not exist.
    pub fn new(root: Option<PathBuf>, offline: bool) -> Result<Self> {
        let dir = root.unwrap_or_else(config::default_asset_dir);
        fs::create_dir_all(&dir)?;
        Ok(Self { root: dir, offline })
    }

    /// Filesystem path for a bundle-relative reference, or `None` for
    /// anything that is not a local reference.
    pub fn local_path(&self, reference: &str) -> Option<PathBuf> {
        if RefKind::of(reference) != RefKind::Local {
            return None;
        }
        let relative = Path::new(reference.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return None;
        }
        Some(self.root.join(relative))
    }

    /// Whether a local reference exists on disk.
    pub fn has_local(&self, reference: &str) -> bool {
        self.local_path(reference)
            .map(|p| p.is_file())
            .unwrap_or(false)
    }

    /// Whether a reference can be loaded from this store.
    ///
    /// Blob references are not owned by the store and always report `false`;
    /// the session image source consults the blob table for those.
    pub fn is_available(&self, reference: &str) -> bool {
        match RefKind::of(reference) {
            RefKind::Local => self.has_local(reference),
            RefKind::Remote => !self.offline,
            RefKind::Blob | RefKind::Unknown => false,
        }
    }

    /// Write a bundled asset, creating parent directories.
    pub fn install(&self, reference: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.local_path(reference).ok_or_else(|| {
            crate::error::GachaError::InvalidArgument(format!(
                "Not a bundle-relative reference: {}",
                reference
            ))
        })?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, bytes)?;
        tracing::debug!(path = %path.display(), "installed asset");
        Ok(path)
    }

    /// Remove all installed assets and recreate the root directory.
    pub fn clear(&self) -> Result<()> {
        if self.root.exists() {
            fs::remove_dir_all(&self.root)?;
            fs::create_dir_all(&self.root)?;
        }
        Ok(())
    }
}
