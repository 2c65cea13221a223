//! Serializable render snapshots for the storefront screens.
//!
//! Views borrow from the application state and never mutate it.

use rand::Rng;
use serde::Serialize;

use crate::catalog::CategoryTab;
use crate::config;
use crate::models::{Card, CardPack, Rarity};
use crate::parallax::{SensorHub, Shine, Tilt, TiltSample, TiltSubscription};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Tab {
    #[default]
    Home,
    Explore,
    Collection,
    Profile,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Home, Tab::Explore, Tab::Collection, Tab::Profile];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::Explore => "Explore",
            Tab::Collection => "Collection",
            Tab::Profile => "Me",
        }
    }

    /// Home and Explore carry the search/scan top bar.
    pub fn shows_top_bar(self) -> bool {
        matches!(self, Tab::Home | Tab::Explore)
    }
}

// ---------------------------------------------------------------------------
// Home
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackTile<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub cover: &'a str,
    pub local_key: &'a str,
    pub price: f64,
    pub creator: &'a str,
    pub hot: bool,
    pub new: bool,
    /// At most two tags.
    pub tags: &'a [String],
}

impl<'a> PackTile<'a> {
    pub fn new(pack: &'a CardPack) -> Self {
        Self {
            id: &pack.id,
            title: &pack.title,
            cover: &pack.cover_image_ref,
            local_key: &pack.id,
            price: pack.price,
            creator: &pack.creator.name,
            hot: pack.is_hot,
            new: pack.is_new,
            tags: &pack.tags[..pack.tags.len().min(2)],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HomeView<'a> {
    pub categories: &'a [CategoryTab],
    pub packs: Vec<PackTile<'a>>,
}

impl<'a> HomeView<'a> {
    pub fn new(categories: &'a [CategoryTab], packs: &'a [CardPack]) -> Self {
        Self {
            categories,
            packs: packs.iter().map(PackTile::new).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Explore
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExploreEntry<'a> {
    /// Unique per entry even though packs repeat.
    pub entry_id: String,
    pub pack: PackTile<'a>,
    pub likes: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExploreView<'a> {
    pub entries: Vec<ExploreEntry<'a>>,
}

impl<'a> ExploreView<'a> {
    /// The catalog repeated to fill the feed. `likes` holds one count per
    /// entry; missing counts show as zero.
    pub fn new(packs: &'a [CardPack], likes: &[u32]) -> Self {
        let entries = std::iter::repeat(packs)
            .take(config::EXPLORE_REPEAT)
            .flatten()
            .enumerate()
            .map(|(idx, pack)| ExploreEntry {
                entry_id: format!("exp-{}-{}", pack.id, idx),
                pack: PackTile::new(pack),
                likes: likes.get(idx).copied().unwrap_or(0),
            })
            .collect();
        Self { entries }
    }

    /// Random like counts in `100..5100` for a feed built from `pack_count` packs.
    pub fn roll_likes<R: Rng + ?Sized>(pack_count: usize, rng: &mut R) -> Vec<u32> {
        (0..pack_count * config::EXPLORE_REPEAT)
            .map(|_| rng.gen_range(100..5100))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Pack detail
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DropRate {
    pub rarity: Rarity,
    pub percent: u8,
}

/// Drop-rate table shown on the pack page, highest tier first.
pub const DISPLAYED_DROP_RATES: [DropRate; 4] = [
    DropRate { rarity: Rarity::UR, percent: 1 },
    DropRate { rarity: Rarity::SSR, percent: 5 },
    DropRate { rarity: Rarity::SR, percent: 20 },
    DropRate { rarity: Rarity::R, percent: 74 },
];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackDetailView<'a> {
    pub pack: &'a CardPack,
    pub description: &'a str,
    pub single_price: String,
    pub ten_pull_price: String,
    pub drop_rates: &'static [DropRate],
}

impl<'a> PackDetailView<'a> {
    pub fn new(pack: &'a CardPack) -> Self {
        Self {
            pack,
            description: pack.description.as_deref().unwrap_or("No description yet."),
            single_price: format!("{:.2}", pack.price),
            ten_pull_price: pack.ten_pull_price(),
            drop_rates: &DISPLAYED_DROP_RATES,
        }
    }
}

// ---------------------------------------------------------------------------
// Collection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionView<'a> {
    pub cards: &'a [Card],
    pub total: usize,
    /// `(rarity, count)` for every tier, lowest first.
    pub by_rarity: Vec<(Rarity, usize)>,
    pub placeholders: usize,
}

impl<'a> CollectionView<'a> {
    pub fn new(cards: &'a [Card]) -> Self {
        let by_rarity = Rarity::ALL
            .iter()
            .map(|&r| (r, cards.iter().filter(|c| c.rarity == r).count()))
            .collect();
        Self {
            cards,
            total: cards.len(),
            by_rarity,
            placeholders: config::COLLECTION_PLACEHOLDERS,
        }
    }
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub collection_count: usize,
    pub imported_images: usize,
    pub menu: [&'static str; 3],
}

impl ProfileView {
    pub fn new(collection_count: usize, imported_images: usize) -> Self {
        Self {
            collection_count,
            imported_images,
            menu: ["Notifications", "Help & feedback", "Sign out"],
        }
    }
}

// ---------------------------------------------------------------------------
// Standalone card viewer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardViewerView<'a> {
    pub card: &'a Card,
    pub sparkles: bool,
    pub transform: String,
    pub shine: Shine,
}

impl<'a> CardViewerView<'a> {
    pub fn new(card: &'a Card, tilt: Tilt) -> Self {
        Self {
            card,
            sparkles: card.rarity.is_high(),
            transform: tilt.transform(),
            shine: tilt.shine(),
        }
    }
}

/// An open standalone viewer: the card plus a live tilt subscription.
///
/// Sampling uses the wider pointer span of the full-screen viewer and stops
/// when the viewer is closed or dropped.
pub struct CardViewer<'a, 'h, H: SensorHub + ?Sized> {
    card: &'a Card,
    subscription: TiltSubscription<'h, H>,
}

impl<'a, 'h, H: SensorHub + ?Sized> CardViewer<'a, 'h, H> {
    pub fn open(card: &'a Card, hub: &'h mut H) -> Self {
        Self {
            card,
            subscription: TiltSubscription::acquire(hub, config::VIEWER_POINTER_SPAN),
        }
    }

    pub fn card(&self) -> &'a Card {
        self.card
    }

    pub fn sample(&mut self, sample: TiltSample) -> Tilt {
        self.subscription.sample(sample)
    }

    pub fn view(&self) -> CardViewerView<'a> {
        CardViewerView::new(self.card, self.subscription.tilt())
    }

    pub fn close(self) {
        self.subscription.release();
    }
}
