//! Pull generator.
//!
//! Produces fresh card instances for a pack: a weighted rarity roll per card,
//! an image picked from the imported pool (or a distinct mock URL), and an
//! instance id that never repeats within the generator's lifetime.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::prelude::*;
use rand::rngs::StdRng;

use crate::config;
use crate::error::GachaError;
use crate::models::{Card, CardPack, Rarity};

/// The two pull sizes the storefront offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawQuantity {
    Single,
    Multi,
}

impl DrawQuantity {
    pub fn count(self) -> usize {
        match self {
            DrawQuantity::Single => 1,
            DrawQuantity::Multi => 10,
        }
    }
}

impl TryFrom<u32> for DrawQuantity {
    type Error = GachaError;

    fn try_from(n: u32) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(DrawQuantity::Single),
            10 => Ok(DrawQuantity::Multi),
            other => Err(GachaError::InvalidArgument(format!(
                "Draw quantity must be 1 or 10, got {}",
                other
            ))),
        }
    }
}

/// Map a uniform roll in `[0, 1)` to a rarity.
///
/// `r > 0.9` is UR, `r > 0.6` is SSR, everything else R. SR is never
/// produced by this table even though catalog cards may carry it.
pub fn roll_rarity(r: f64) -> Rarity {
    if r > 0.9 {
        Rarity::UR
    } else if r > 0.6 {
        Rarity::SSR
    } else {
        Rarity::R
    }
}

/// Effective per-card probabilities of [`roll_rarity`], lowest tier first.
pub fn expected_odds() -> [(Rarity, f64); 4] {
    [
        (Rarity::R, 0.6),
        (Rarity::SR, 0.0),
        (Rarity::SSR, 0.3),
        (Rarity::UR, 0.1),
    ]
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// Generates card instances for pulls.
pub struct DrawGenerator<R: Rng = StdRng> {
    rng: R,
    seq: u64,
}

impl DrawGenerator<StdRng> {
    /// Generator seeded from the thread RNG.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_rng(thread_rng()).unwrap_or_else(|_| StdRng::seed_from_u64(0)))
    }

    /// Reproducible generator.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for DrawGenerator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> DrawGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng, seq: 0 }
    }

    /// Number of cards generated so far.
    pub fn generated(&self) -> u64 {
        self.seq
    }

    /// Draw `quantity` cards from `pack`.
    ///
    /// `image_pool` is the active imported image pool; when non-empty each
    /// card picks uniformly from it.
    pub fn generate(
        &mut self,
        pack: &CardPack,
        quantity: DrawQuantity,
        image_pool: &[String],
    ) -> Vec<Card> {
        let now = unix_millis();
        let mut cards = Vec::with_capacity(quantity.count());

        for i in 0..quantity.count() {
            let image_url = if image_pool.is_empty() {
                format!("{}?random={}", config::MOCK_IMAGE_BASE, now + i as u128)
            } else {
                image_pool[self.rng.gen_range(0..image_pool.len())].clone()
            };

            let image_id = self.rng.gen_range(1..=config::IMAGE_BUCKETS).to_string();

            let title = if image_pool.is_empty() {
                format!("Mystery Card #{}", image_id)
            } else {
                format!("Custom Card #{}", self.rng.gen_range(0..100))
            };

            let rarity = roll_rarity(self.rng.gen::<f64>());

            self.seq += 1;
            cards.push(Card {
                instance_id: format!("new-{}-{}", now, self.seq),
                image_id: Some(image_id),
                title,
                image_url,
                rarity,
                creator_name: pack.creator.name.clone(),
                description: "Newly drawn card.".to_string(),
            });
        }

        tracing::info!(
            pack = %pack.id,
            count = cards.len(),
            high = cards.iter().filter(|c| c.rarity.is_high()).count(),
            "generated pull"
        );
        cards
    }
}
