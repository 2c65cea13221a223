//! Session-scoped handle table for user-imported images.
//!
//! Imported files are held in memory and addressed through opaque
//! `blob:session/<n>` references. Handles are released explicitly on
//! re-import, or all at once when the table is dropped.

use std::collections::HashMap;
use std::fmt;

use crate::config;

/// Opaque reference to an imported image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobRef(String);

impl BlobRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<BlobRef> for String {
    fn from(r: BlobRef) -> Self {
        r.0
    }
}

/// A file selected by the user for import.
#[derive(Debug, Clone)]
pub struct ImportedImage {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ImportedImage {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

#[derive(Debug)]
struct Blob {
    name: String,
    bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct BlobTable {
    next: u64,
    entries: HashMap<String, Blob>,
}

impl BlobTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an image and return its reference. References are never reused
    /// within one table, even after release.
    pub fn import(&mut self, image: ImportedImage) -> BlobRef {
        self.next += 1;
        let reference = format!("{}session/{}", config::BLOB_SCHEME, self.next);
        self.entries.insert(
            reference.clone(),
            Blob {
                name: image.name,
                bytes: image.bytes,
            },
        );
        BlobRef(reference)
    }

    pub fn get(&self, reference: &str) -> Option<&[u8]> {
        self.entries.get(reference).map(|b| b.bytes.as_slice())
    }

    /// Original file name of an imported image.
    pub fn name(&self, reference: &str) -> Option<&str> {
        self.entries.get(reference).map(|b| b.name.as_str())
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.entries.contains_key(reference)
    }

    /// Release one handle. Returns `false` if it was not live.
    pub fn release(&mut self, reference: &str) -> bool {
        self.entries.remove(reference).is_some()
    }

    pub fn release_all(&mut self) {
        if !self.entries.is_empty() {
            tracing::debug!(count = self.entries.len(), "releasing imported images");
        }
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Drop for BlobTable {
    fn drop(&mut self) {
        self.release_all();
    }
}
