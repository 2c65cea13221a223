//! Catalog loading and validation tests.

use std::io::Write;

use gacha_sdk::{Catalog, Category, GachaError, Rarity};
use tempfile::NamedTempFile;

#[test]
fn embedded_catalog_loads() {
    let catalog = Catalog::embedded().unwrap();
    assert_eq!(catalog.packs.len(), 6);
    assert_eq!(catalog.collection.len(), 4);
    assert_eq!(catalog.categories[0].value, None);
    assert_eq!(catalog.packs[0].category, Category::IP);
    assert!(catalog.packs[0].is_hot);
    assert!(catalog.packs[1].is_new);
}

#[test]
fn embedded_collection_covers_declared_rarities() {
    let catalog = Catalog::embedded().unwrap();
    let rarities: Vec<Rarity> = catalog.collection.iter().map(|c| c.rarity).collect();
    assert_eq!(rarities, vec![Rarity::SSR, Rarity::SR, Rarity::UR, Rarity::R]);
    assert_eq!(catalog.collection[0].local_key(), "c1");
}

#[test]
fn from_path_reads_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"packs": [{{"id": "x", "title": "X", "coverUrl": "https://a/b.jpg", "price": 1.5,
            "category": "Dance", "tags": ["a", "b", "a"],
            "creator": {{"id": "c", "name": "C", "avatarUrl": "https://a/c.jpg"}}}}]}}"#
    )
    .unwrap();

    let catalog = Catalog::from_path(file.path()).unwrap();
    assert_eq!(catalog.packs.len(), 1);
    assert!(catalog.collection.is_empty());
    assert_eq!(catalog.packs[0].tags, vec!["a", "b"]);
    assert!(!catalog.packs[0].is_hot);
    assert_eq!(catalog.packs[0].intro_video_ref, None);
}

#[test]
fn duplicate_pack_ids_are_rejected() {
    let json = r#"{"packs": [
        {"id": "1", "title": "A", "coverUrl": "u", "price": 1, "category": "IP",
         "creator": {"id": "c", "name": "C", "avatarUrl": "a"}},
        {"id": "1", "title": "B", "coverUrl": "u", "price": 1, "category": "IP",
         "creator": {"id": "c", "name": "C", "avatarUrl": "a"}}
    ]}"#;
    let err = Catalog::from_json(json).unwrap_err();
    assert!(matches!(err, GachaError::InvalidArgument(_)));
}

#[test]
fn unknown_rarity_is_a_json_error() {
    let json = r#"{"packs": [], "collection": [
        {"id": "c1", "title": "T", "imageUrl": "u", "rarity": "N", "creator": "C"}
    ]}"#;
    let err = Catalog::from_json(json).unwrap_err();
    assert!(matches!(err, GachaError::Json(_)));
}

#[test]
fn missing_file_is_io_error() {
    let err = Catalog::from_path("/definitely/not/here/catalog.json").unwrap_err();
    assert!(matches!(err, GachaError::Io(_)));
}

#[test]
fn ten_pull_price_is_two_decimals() {
    let catalog = Catalog::embedded().unwrap();
    assert_eq!(catalog.packs[0].ten_pull_price(), "199.90");
}
