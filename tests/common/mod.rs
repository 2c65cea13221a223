//! Shared test fixtures for the gacha SDK integration tests.
//!
//! Provides a seeded SDK backed by a temporary asset directory plus small
//! builders for packs and cards.

use gacha_sdk::{AssetStore, Card, CardPack, Category, Creator, GachaSdk, Rarity};

/// Create a seeded `GachaSdk` using the embedded catalog and a temporary
/// asset directory.
///
/// Returns `(GachaSdk, tempfile::TempDir)`. The caller must keep the `TempDir`
/// alive for the duration of the test.
pub fn setup_sdk() -> (GachaSdk, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let sdk = GachaSdk::builder()
        .asset_dir(tmp_dir.path())
        .seed(7)
        .build()
        .unwrap();
    (sdk, tmp_dir)
}

/// An asset store rooted in a fresh temporary directory.
pub fn setup_assets(offline: bool) -> (AssetStore, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let store = AssetStore::new(Some(tmp_dir.path().to_path_buf()), offline).unwrap();
    (store, tmp_dir)
}

pub fn sample_pack(video: Option<&str>) -> CardPack {
    CardPack {
        id: "p1".to_string(),
        title: "Sample Pack".to_string(),
        cover_image_ref: "https://picsum.photos/400/711?random=1".to_string(),
        price: 19.99,
        category: Category::IP,
        tags: vec!["Sci-Fi".to_string()],
        description: None,
        intro_video_ref: video.map(str::to_string),
        creator: Creator {
            id: "studio".to_string(),
            name: "Studio".to_string(),
            avatar_ref: "https://picsum.photos/100/100?random=101".to_string(),
            bio: None,
        },
        is_hot: true,
        is_new: false,
    }
}

pub fn sample_card(id: &str, rarity: Rarity) -> Card {
    Card {
        instance_id: id.to_string(),
        image_id: None,
        title: format!("Card {}", id),
        image_url: format!("https://picsum.photos/400/711?random={}", id),
        rarity,
        creator_name: "Studio".to_string(),
        description: String::new(),
    }
}

/// Ten cards, all R except index `high_at` which gets `high`.
pub fn ten_cards(high_at: Option<(usize, Rarity)>) -> Vec<Card> {
    (0..10)
        .map(|i| {
            let rarity = match high_at {
                Some((idx, r)) if idx == i => r,
                _ => Rarity::R,
            };
            sample_card(&format!("n{}", i), rarity)
        })
        .collect()
}
