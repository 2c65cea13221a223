//! Gacha storefront SDK for Rust.
//!
//! A headless model of a card-pack storefront: a static catalog of packs,
//! randomized pulls, a staged reveal sequence, a tilt-driven holographic card
//! effect, and image resolution that prefers bundled files and falls back to
//! remote URLs. Rendering and platform concerns (media playback, timers,
//! sensors) stay with the host: the SDK hands out snapshots and effects.
//!
//! # Quick start
//!
//! ```no_run
//! use gacha_sdk::{GachaSdk, HeadlessMedia, RevealDriver, RevealEvent};
//! use std::time::Duration;
//!
//! let mut sdk = GachaSdk::builder().build().unwrap();
//!
//! // Ten-pull from the first pack
//! let session = sdk.start_draw("1", 10).unwrap().unwrap();
//!
//! // Play the reveal headlessly
//! let mut driver = RevealDriver::new(session, HeadlessMedia::new(sdk.assets().clone()));
//! driver.start();
//! driver.dispatch(RevealEvent::Skip);
//! driver.advance(Duration::from_secs(1));
//! driver.dispatch(RevealEvent::CollectAll);
//!
//! // Merge the pull into the collection
//! sdk.complete_draw();
//! ```

pub mod assets;
#[cfg(feature = "async")]
pub mod async_driver;
pub mod blobs;
pub mod catalog;
pub mod config;
pub mod draw;
pub mod driver;
pub mod error;
pub mod media;
pub mod models;
pub mod parallax;
pub mod queries;
pub mod resolver;
pub mod reveal;
pub mod scheduler;
pub mod views;

pub use assets::AssetStore;
#[cfg(feature = "async")]
pub use async_driver::AsyncRevealDriver;
pub use blobs::{BlobRef, BlobTable, ImportedImage};
pub use catalog::Catalog;
pub use draw::{DrawGenerator, DrawQuantity};
pub use driver::RevealDriver;
pub use error::{GachaError, Result};
pub use media::{HeadlessMedia, MediaBackend};
pub use models::{Card, CardPack, Category, Creator, Rarity};
pub use resolver::{ImageResolver, ResolvedImage};
pub use reveal::{Effect, RevealEvent, RevealSession, Stage};
pub use views::Tab;

use std::fmt;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use catalog::CategoryTab;
use resolver::SessionImages;
use views::{
    CardViewerView, CollectionView, ExploreView, HomeView, PackDetailView, ProfileView,
};

// ---------------------------------------------------------------------------
// GachaSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`GachaSdk`] instance.
///
/// Use [`GachaSdk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](GachaSdkBuilder::build) to create the SDK.
#[derive(Default)]
pub struct GachaSdkBuilder {
    asset_dir: Option<PathBuf>,
    catalog_path: Option<PathBuf>,
    offline: bool,
    seed: Option<u64>,
}

impl GachaSdkBuilder {
    /// Set the directory bundle-relative assets are served from.
    ///
    /// If not set, the platform data directory is used (e.g.
    /// `~/.local/share/gacha-sdk` on Linux).
    pub fn asset_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.asset_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Load the catalog from a JSON file instead of the embedded one.
    pub fn catalog_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.catalog_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Treat remote URLs as unreachable. Defaults to `false`.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Seed every random source for reproducible sessions.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the SDK, creating the asset directory and loading the catalog.
    pub fn build(self) -> Result<GachaSdk> {
        let assets = AssetStore::new(self.asset_dir, self.offline)?;
        let catalog = match &self.catalog_path {
            Some(path) => Catalog::from_path(path)?,
            None => Catalog::embedded()?,
        };

        let (generator, mut view_rng) = match self.seed {
            Some(seed) => (
                DrawGenerator::seeded(seed),
                StdRng::seed_from_u64(seed.wrapping_add(1)),
            ),
            None => (DrawGenerator::new(), StdRng::from_entropy()),
        };
        let explore_likes = ExploreView::roll_likes(catalog.packs.len(), &mut view_rng);

        tracing::debug!(
            packs = catalog.packs.len(),
            cards = catalog.collection.len(),
            assets = %assets.root.display(),
            "storefront initialised"
        );

        Ok(GachaSdk {
            assets,
            blobs: BlobTable::new(),
            categories: catalog.categories,
            packs: catalog.packs,
            collection: catalog.collection,
            image_pool: Vec::new(),
            generator,
            explore_likes,
            tab: Tab::default(),
            selected_pack: None,
            drawing: None,
            viewing: None,
            viewer_tilt: parallax::Tilt::FLAT,
        })
    }
}

// ---------------------------------------------------------------------------
// Intents
// ---------------------------------------------------------------------------

/// Every state change the storefront accepts.
#[derive(Debug, Clone)]
pub enum Intent {
    SwitchTab(Tab),
    SelectPack(String),
    ClosePack,
    StartDraw { pack_id: String, quantity: u32 },
    CompleteDraw,
    CancelDraw,
    ViewCard(String),
    /// Latest tilt of the open card viewer.
    TiltViewer(parallax::Tilt),
    CloseCard,
    ImportImages(Vec<ImportedImage>),
}

/// What an intent produced.
#[derive(Debug)]
pub enum Outcome {
    None,
    /// A reveal the host should run; call [`GachaSdk::complete_draw`] when
    /// it emits [`Effect::Complete`], or [`GachaSdk::cancel_draw`] if the
    /// reveal is discarded.
    Draw(RevealSession),
    Imported(usize),
}

#[derive(Debug)]
struct PendingDraw {
    pack_id: String,
    cards: Vec<Card>,
}

// ---------------------------------------------------------------------------
// GachaSdk
// ---------------------------------------------------------------------------

/// The storefront application state and its single writer.
///
/// Views read through [`snapshot()`](Self::snapshot) and the query
/// accessors; everything else goes through the intent methods.
pub struct GachaSdk {
    assets: AssetStore,
    blobs: BlobTable,
    categories: Vec<CategoryTab>,
    packs: Vec<CardPack>,
    collection: Vec<Card>,
    image_pool: Vec<String>,
    generator: DrawGenerator,
    explore_likes: Vec<u32>,
    tab: Tab,
    selected_pack: Option<String>,
    drawing: Option<PendingDraw>,
    viewing: Option<String>,
    viewer_tilt: parallax::Tilt,
}

impl GachaSdk {
    /// Create a new builder for configuring the SDK.
    pub fn builder() -> GachaSdkBuilder {
        GachaSdkBuilder::default()
    }

    // -- Query accessors ---------------------------------------------------

    pub fn packs(&self) -> queries::PackQuery<'_> {
        queries::PackQuery::new(&self.packs)
    }

    /// Owned cards, newest first.
    pub fn collection(&self) -> queries::CollectionQuery<'_> {
        queries::CollectionQuery::new(&self.collection)
    }

    /// Home-screen category strip, "all" first.
    pub fn categories(&self) -> &[CategoryTab] {
        &self.categories
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    pub fn blobs(&self) -> &BlobTable {
        &self.blobs
    }

    /// The imported image pool (blob references), empty unless images were imported.
    pub fn image_pool(&self) -> &[String] {
        &self.image_pool
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn selected_pack(&self) -> Option<&CardPack> {
        self.selected_pack
            .as_deref()
            .and_then(|id| self.packs().get(id))
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing.is_some()
    }

    pub fn viewing_card(&self) -> Option<&Card> {
        self.viewing
            .as_deref()
            .and_then(|id| self.collection().get(id))
    }

    // -- Image resolution --------------------------------------------------

    /// Resolve an image against bundled assets, remote URLs and imported blobs.
    pub fn resolve_image(&self, primary_ref: &str, local_key: Option<&str>) -> ResolvedImage {
        let source = SessionImages {
            assets: &self.assets,
            blobs: &self.blobs,
        };
        ImageResolver::new(primary_ref, local_key).resolve(&source)
    }

    pub fn resolve_card_image(&self, card: &Card) -> ResolvedImage {
        self.resolve_image(&card.image_url, Some(card.local_key()))
    }

    pub fn resolve_pack_cover(&self, pack: &CardPack) -> ResolvedImage {
        self.resolve_image(&pack.cover_image_ref, Some(&pack.id))
    }

    // -- Intents -----------------------------------------------------------

    /// Dispatch an intent by value.
    pub fn apply(&mut self, intent: Intent) -> Result<Outcome> {
        match intent {
            Intent::SwitchTab(tab) => self.switch_tab(tab),
            Intent::SelectPack(id) => self.select_pack(&id)?,
            Intent::ClosePack => self.close_pack(),
            Intent::StartDraw { pack_id, quantity } => {
                return Ok(match self.start_draw(&pack_id, quantity)? {
                    Some(session) => Outcome::Draw(session),
                    None => Outcome::None,
                });
            }
            Intent::CompleteDraw => {
                self.complete_draw();
            }
            Intent::CancelDraw => {
                self.cancel_draw();
            }
            Intent::ViewCard(id) => self.view_card(&id)?,
            Intent::TiltViewer(tilt) => self.set_viewer_tilt(tilt),
            Intent::CloseCard => self.close_card(),
            Intent::ImportImages(files) => return Ok(Outcome::Imported(self.import_images(files))),
        }
        Ok(Outcome::None)
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    /// Open the detail page of a pack.
    pub fn select_pack(&mut self, id: &str) -> Result<()> {
        self.packs().require(id)?;
        self.selected_pack = Some(id.to_string());
        Ok(())
    }

    pub fn close_pack(&mut self) {
        self.selected_pack = None;
    }

    /// Pull `quantity` cards from a pack and return the reveal to run.
    ///
    /// Quantities other than 1 and 10, and a pull while another is still
    /// being revealed, are ignored (`Ok(None)`). An unknown pack id is
    /// [`GachaError::NotFound`].
    pub fn start_draw(&mut self, pack_id: &str, quantity: u32) -> Result<Option<RevealSession>> {
        let pack = self.packs().require(pack_id)?.clone();

        let quantity = match DrawQuantity::try_from(quantity) {
            Ok(q) => q,
            Err(e) => {
                tracing::debug!(error = %e, "draw ignored");
                return Ok(None);
            }
        };
        if self.drawing.is_some() {
            tracing::debug!(pack = pack_id, "draw already in progress, ignored");
            return Ok(None);
        }

        let cards = self.generator.generate(&pack, quantity, &self.image_pool);
        let session = RevealSession::new(pack, cards.clone())?;
        self.drawing = Some(PendingDraw {
            pack_id: pack_id.to_string(),
            cards,
        });
        Ok(Some(session))
    }

    /// Merge the pending pull into the collection, newest first. Returns the
    /// number of cards added.
    pub fn complete_draw(&mut self) -> usize {
        let Some(draw) = self.drawing.take() else {
            return 0;
        };
        let added = draw.cards.len();
        let mut merged = draw.cards;
        merged.append(&mut self.collection);
        self.collection = merged;
        tracing::info!(pack = %draw.pack_id, added, total = self.collection.len(), "pull collected");
        added
    }

    /// Drop the pending pull without adding its cards, e.g. when the host
    /// tears the reveal down. Returns whether a pull was pending.
    pub fn cancel_draw(&mut self) -> bool {
        match self.drawing.take() {
            Some(draw) => {
                tracing::info!(pack = %draw.pack_id, discarded = draw.cards.len(), "pull discarded");
                true
            }
            None => false,
        }
    }

    /// Open the standalone viewer for an owned card.
    pub fn view_card(&mut self, instance_id: &str) -> Result<()> {
        if self.collection().get(instance_id).is_none() {
            return Err(GachaError::NotFound(format!("Card '{}'", instance_id)));
        }
        self.viewing = Some(instance_id.to_string());
        self.viewer_tilt = parallax::Tilt::FLAT;
        Ok(())
    }

    /// Store the viewer's current tilt (from [`views::CardViewer::sample`])
    /// so snapshots render it. Ignored while no card is open.
    pub fn set_viewer_tilt(&mut self, tilt: parallax::Tilt) {
        if self.viewing.is_some() {
            self.viewer_tilt = tilt;
        }
    }

    pub fn close_card(&mut self) {
        self.viewing = None;
        self.viewer_tilt = parallax::Tilt::FLAT;
    }

    /// Replace the working image pool with user-selected files.
    ///
    /// Pack `i` gets image `i mod n` as cover and collection card `i` gets
    /// image `(i + 5) mod n`, so the same files in the same order always give
    /// the same assignment. Previously imported images are released. An empty
    /// selection does nothing. Returns the number of images imported.
    pub fn import_images(&mut self, files: Vec<ImportedImage>) -> usize {
        if files.is_empty() {
            return 0;
        }

        for old in self.image_pool.drain(..) {
            self.blobs.release(&old);
        }
        self.image_pool = files
            .into_iter()
            .map(|f| self.blobs.import(f).into())
            .collect();

        let n = self.image_pool.len();
        for (i, pack) in self.packs.iter_mut().enumerate() {
            pack.cover_image_ref = self.image_pool[i % n].clone();
        }
        for (i, card) in self.collection.iter_mut().enumerate() {
            card.image_url = self.image_pool[(i + config::COLLECTION_IMPORT_OFFSET) % n].clone();
        }

        tracing::info!(images = n, "imported custom images; catalog and collection images replaced");
        n
    }

    // -- Snapshots ---------------------------------------------------------

    pub fn home(&self) -> HomeView<'_> {
        HomeView::new(&self.categories, &self.packs)
    }

    pub fn explore(&self) -> ExploreView<'_> {
        ExploreView::new(&self.packs, &self.explore_likes)
    }

    pub fn collection_view(&self) -> CollectionView<'_> {
        CollectionView::new(&self.collection)
    }

    pub fn profile(&self) -> ProfileView {
        ProfileView::new(self.collection.len(), self.image_pool.len())
    }

    /// Everything a renderer needs for the current frame.
    pub fn snapshot(&self) -> AppSnapshot<'_> {
        let screen = match self.tab {
            Tab::Home => Screen::Home(self.home()),
            Tab::Explore => Screen::Explore(self.explore()),
            Tab::Collection => Screen::Collection(self.collection_view()),
            Tab::Profile => Screen::Profile(self.profile()),
        };
        AppSnapshot {
            tab: self.tab,
            show_top_bar: self.tab.shows_top_bar(),
            screen,
            pack_detail: if self.drawing.is_none() {
                self.selected_pack().map(PackDetailView::new)
            } else {
                None
            },
            drawing: self.drawing.is_some(),
            viewing: self
                .viewing_card()
                .map(|c| CardViewerView::new(c, self.viewer_tilt)),
        }
    }

    /// Consume the SDK and release imported images.
    pub fn close(mut self) {
        self.blobs.release_all();
    }
}

/// Main screen content for the active tab.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "tab", content = "view", rename_all = "camelCase")]
pub enum Screen<'a> {
    Home(HomeView<'a>),
    Explore(ExploreView<'a>),
    Collection(CollectionView<'a>),
    Profile(ProfileView),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSnapshot<'a> {
    pub tab: Tab,
    pub show_top_bar: bool,
    pub screen: Screen<'a>,
    /// Shown only while no pull is being revealed.
    pub pack_detail: Option<PackDetailView<'a>>,
    pub drawing: bool,
    pub viewing: Option<CardViewerView<'a>>,
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for GachaSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GachaSdk(assets={}, packs={}, collection={}, imported={}, offline={})",
            self.assets.root.display(),
            self.packs.len(),
            self.collection.len(),
            self.image_pool.len(),
            self.assets.offline
        )
    }
}
