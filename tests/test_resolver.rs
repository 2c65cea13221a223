//! Image resolver tests: local-first, single fallback, blob overrides.

mod common;

use std::collections::HashSet;

use gacha_sdk::resolver::{local_candidate, ImageSource, ResolveState, ResolveStep};
use gacha_sdk::{BlobTable, ImageResolver, ImportedImage, ResolvedImage};

const REMOTE: &str = "https://picsum.photos/400/711?random=10";

/// Source that loads exactly the listed URLs.
struct Only(HashSet<&'static str>);

impl ImageSource for Only {
    fn loads(&self, url: &str) -> bool {
        self.0.contains(url)
    }
}

// ---------------------------------------------------------------------------
// Candidate construction
// ---------------------------------------------------------------------------

#[test]
fn local_candidate_strips_single_leading_c() {
    assert_eq!(local_candidate("c1"), "/cards/1.jpg");
    assert_eq!(local_candidate("7"), "/cards/7.jpg");
    assert_eq!(local_candidate("cc2"), "/cards/c2.jpg");
}

#[test]
fn local_key_present_tries_local_first() {
    let r = ImageResolver::new(REMOTE, Some("c3"));
    assert_eq!(r.current(), "/cards/3.jpg");
    assert_eq!(r.state(), ResolveState::Primary);
}

#[test]
fn no_local_key_uses_primary_immediately() {
    let r = ImageResolver::new(REMOTE, None);
    assert_eq!(r.current(), REMOTE);

    let r = ImageResolver::new(REMOTE, Some(""));
    assert_eq!(r.current(), REMOTE);
}

#[test]
fn blob_primary_wins_over_local_key() {
    let r = ImageResolver::new("blob:session/1", Some("c1"));
    assert_eq!(r.current(), "blob:session/1");
}

// ---------------------------------------------------------------------------
// Fallback state machine
// ---------------------------------------------------------------------------

#[test]
fn local_failure_falls_back_once() {
    let mut r = ImageResolver::new(REMOTE, Some("c1"));
    assert_eq!(r.on_load_error(), ResolveStep::Retry(REMOTE.to_string()));
    assert_eq!(r.current(), REMOTE);
    assert!(r.has_fallen_back());

    // Fallback also failing stops the chain.
    assert_eq!(r.on_load_error(), ResolveStep::Broken);
    assert_eq!(r.current(), REMOTE);
    assert!(r.has_fallen_back());
}

#[test]
fn primary_failure_without_local_is_broken() {
    let mut r = ImageResolver::new(REMOTE, None);
    assert_eq!(r.on_load_error(), ResolveStep::Broken);
    assert!(!r.has_fallen_back());
}

#[test]
fn update_with_new_inputs_resets_fallback() {
    let mut r = ImageResolver::new(REMOTE, Some("c1"));
    r.on_load_error();
    assert!(r.has_fallen_back());

    assert!(r.update("blob:session/4", Some("c1")));
    assert_eq!(r.current(), "blob:session/4");
    assert!(!r.has_fallen_back());
}

#[test]
fn update_with_same_inputs_keeps_state() {
    let mut r = ImageResolver::new(REMOTE, Some("c1"));
    r.on_load_error();
    assert!(!r.update(REMOTE, Some("c1")));
    assert!(r.has_fallen_back());
    assert_eq!(r.current(), REMOTE);
}

// ---------------------------------------------------------------------------
// resolve()
// ---------------------------------------------------------------------------

#[test]
fn resolve_prefers_local_file() {
    let source = Only(HashSet::from(["/cards/1.jpg", REMOTE]));
    let mut r = ImageResolver::new(REMOTE, Some("c1"));
    assert_eq!(r.resolve(&source), ResolvedImage::Loaded("/cards/1.jpg".to_string()));
    assert!(!r.has_fallen_back());
}

#[test]
fn resolve_missing_local_returns_primary() {
    let source = Only(HashSet::from([REMOTE]));
    let mut r = ImageResolver::new(REMOTE, Some("c1"));
    assert_eq!(r.resolve(&source), ResolvedImage::Loaded(REMOTE.to_string()));
    assert!(r.has_fallen_back());
}

#[test]
fn resolve_everything_missing_is_broken_on_primary() {
    let source = Only(HashSet::new());
    let mut r = ImageResolver::new(REMOTE, Some("c1"));
    let resolved = r.resolve(&source);
    assert!(!resolved.is_loaded());
    assert_eq!(resolved.url(), REMOTE);
}

#[test]
fn asset_store_backs_local_lookup() {
    let (store, _tmp) = common::setup_assets(false);
    store.install("/cards/2.jpg", b"jpg").unwrap();

    let mut hit = ImageResolver::new(REMOTE, Some("c2"));
    assert_eq!(hit.resolve(&store), ResolvedImage::Loaded("/cards/2.jpg".to_string()));

    let mut miss = ImageResolver::new(REMOTE, Some("c9"));
    assert_eq!(miss.resolve(&store), ResolvedImage::Loaded(REMOTE.to_string()));
}

#[test]
fn offline_store_breaks_remote_fallback() {
    let (store, _tmp) = common::setup_assets(true);
    let mut r = ImageResolver::new(REMOTE, Some("c9"));
    assert_eq!(r.resolve(&store), ResolvedImage::Broken(REMOTE.to_string()));
}

#[test]
fn sdk_resolves_imported_blobs() {
    let (mut sdk, _tmp) = common::setup_sdk();
    sdk.import_images(vec![ImportedImage::new("a.png", vec![1, 2, 3])]);

    let card = sdk.collection().list()[0].clone();
    let resolved = sdk.resolve_card_image(&card);
    assert_eq!(resolved, ResolvedImage::Loaded(card.image_url.clone()));
    assert!(card.image_url.starts_with("blob:"));
}

#[test]
fn released_blob_is_broken() {
    let mut blobs = BlobTable::new();
    let r = blobs.import(ImportedImage::new("a.png", vec![0]));
    assert!(blobs.release(r.as_str()));
    assert!(!blobs.release(r.as_str()));
    assert!(blobs.get(r.as_str()).is_none());
}
