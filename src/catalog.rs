//! Static catalog loading.
//!
//! The catalog supplies the initial pack list, the home-screen category strip
//! and the starter collection. It ships embedded in the crate and can be
//! replaced by an external JSON file with the same shape.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GachaError, Result};
use crate::models::{Card, CardPack, Category};

const EMBEDDED_CATALOG: &str = include_str!("../data/catalog.json");

/// One entry of the home-screen category strip. `value == None` is "all".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTab {
    pub label: String,
    pub value: Option<Category>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub categories: Vec<CategoryTab>,
    pub packs: Vec<CardPack>,
    #[serde(default)]
    pub collection: Vec<Card>,
}

impl Catalog {
    /// The catalog bundled with the crate.
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    /// Load a catalog file from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_json(&contents)
    }

    /// Parse and validate a catalog document.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        for pack in &mut catalog.packs {
            pack.dedup_tags();
        }
        Ok(catalog)
    }

    fn validate(&self) -> Result<()> {
        let mut pack_ids = HashSet::new();
        for pack in &self.packs {
            if pack.title.trim().is_empty() {
                return Err(GachaError::InvalidArgument(format!(
                    "Pack '{}' has an empty title",
                    pack.id
                )));
            }
            if !pack_ids.insert(pack.id.as_str()) {
                return Err(GachaError::InvalidArgument(format!(
                    "Duplicate pack id '{}'",
                    pack.id
                )));
            }
        }

        let mut card_ids = HashSet::new();
        for card in &self.collection {
            if card.title.trim().is_empty() {
                return Err(GachaError::InvalidArgument(format!(
                    "Card '{}' has an empty title",
                    card.instance_id
                )));
            }
            if !card_ids.insert(card.instance_id.as_str()) {
                return Err(GachaError::InvalidArgument(format!(
                    "Duplicate card id '{}'",
                    card.instance_id
                )));
            }
        }
        Ok(())
    }
}
