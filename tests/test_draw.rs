//! Pull generator tests.

mod common;

use std::collections::HashSet;

use gacha_sdk::draw::{expected_odds, roll_rarity};
use gacha_sdk::{DrawGenerator, DrawQuantity, GachaError, Rarity};

#[test]
fn quantity_accepts_only_one_and_ten() {
    assert_eq!(DrawQuantity::try_from(1).unwrap(), DrawQuantity::Single);
    assert_eq!(DrawQuantity::try_from(10).unwrap(), DrawQuantity::Multi);
    for bad in [0, 2, 5, 11, 100] {
        assert!(matches!(
            DrawQuantity::try_from(bad),
            Err(GachaError::InvalidArgument(_))
        ));
    }
}

#[test]
fn generate_returns_requested_count() {
    let pack = common::sample_pack(None);
    let mut gen = DrawGenerator::seeded(1);
    assert_eq!(gen.generate(&pack, DrawQuantity::Single, &[]).len(), 1);
    assert_eq!(gen.generate(&pack, DrawQuantity::Multi, &[]).len(), 10);
    assert_eq!(gen.generated(), 11);
}

#[test]
fn instance_ids_never_repeat_across_pulls() {
    let pack = common::sample_pack(None);
    let mut gen = DrawGenerator::seeded(2);
    let mut seen = HashSet::new();
    for _ in 0..200 {
        for card in gen.generate(&pack, DrawQuantity::Multi, &[]) {
            assert!(seen.insert(card.instance_id.clone()), "duplicate id {}", card.instance_id);
        }
    }
    assert_eq!(seen.len(), 2000);
}

#[test]
fn roll_thresholds() {
    assert_eq!(roll_rarity(0.0), Rarity::R);
    assert_eq!(roll_rarity(0.6), Rarity::R);
    assert_eq!(roll_rarity(0.600_001), Rarity::SSR);
    assert_eq!(roll_rarity(0.9), Rarity::SSR);
    assert_eq!(roll_rarity(0.900_001), Rarity::UR);
    assert_eq!(roll_rarity(0.999_999), Rarity::UR);
}

#[test]
fn rarity_distribution_converges_and_never_yields_sr() {
    let pack = common::sample_pack(None);
    let mut gen = DrawGenerator::seeded(42);
    let mut counts = [0usize; 4];
    for _ in 0..10_000 {
        for card in gen.generate(&pack, DrawQuantity::Multi, &[]) {
            counts[card.rarity as usize] += 1;
        }
    }
    let total = 100_000.0;
    assert_eq!(counts[Rarity::SR as usize], 0);

    for (rarity, expected) in expected_odds() {
        let observed = counts[rarity as usize] as f64 / total;
        assert!(
            (observed - expected).abs() < 0.01,
            "{} observed {:.4}, expected {:.2}",
            rarity,
            observed,
            expected
        );
    }
}

#[test]
fn cards_carry_bucket_image_id_and_pack_creator() {
    let pack = common::sample_pack(None);
    let mut gen = DrawGenerator::seeded(3);
    for card in gen.generate(&pack, DrawQuantity::Multi, &[]) {
        let bucket: u32 = card.image_id.as_deref().unwrap().parse().unwrap();
        assert!((1..=20).contains(&bucket));
        assert_eq!(card.creator_name, "Studio");
        assert_eq!(card.title, format!("Mystery Card #{}", bucket));
        assert!(card.image_url.starts_with("https://picsum.photos/400/711?random="));
    }
}

#[test]
fn mock_urls_are_distinct_within_a_pull() {
    let pack = common::sample_pack(None);
    let mut gen = DrawGenerator::seeded(4);
    let urls: HashSet<String> = gen
        .generate(&pack, DrawQuantity::Multi, &[])
        .into_iter()
        .map(|c| c.image_url)
        .collect();
    assert_eq!(urls.len(), 10);
}

#[test]
fn image_pool_is_used_when_present() {
    let pack = common::sample_pack(None);
    let pool = vec!["blob:session/1".to_string(), "blob:session/2".to_string()];
    let mut gen = DrawGenerator::seeded(5);
    for card in gen.generate(&pack, DrawQuantity::Multi, &pool) {
        assert!(pool.contains(&card.image_url));
        assert!(card.title.starts_with("Custom Card #"));
    }
}

#[test]
fn same_seed_same_rarities() {
    let pack = common::sample_pack(None);
    let a: Vec<Rarity> = DrawGenerator::seeded(9)
        .generate(&pack, DrawQuantity::Multi, &[])
        .into_iter()
        .map(|c| c.rarity)
        .collect();
    let b: Vec<Rarity> = DrawGenerator::seeded(9)
        .generate(&pack, DrawQuantity::Multi, &[])
        .into_iter()
        .map(|c| c.rarity)
        .collect();
    assert_eq!(a, b);
}
