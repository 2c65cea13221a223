//! Pack catalog queries.

use crate::error::{GachaError, Result};
use crate::models::{CardPack, Category};

/// Parameters for [`PackQuery::search`].
#[derive(Debug, Clone, Default)]
pub struct SearchPacksParams {
    /// Case-insensitive substring of the title, creator name or a tag.
    pub text: Option<String>,
    pub category: Option<Category>,
    pub hot_only: bool,
    pub new_only: bool,
    pub max_price: Option<f64>,
    pub limit: Option<usize>,
}

pub struct PackQuery<'a> {
    packs: &'a [CardPack],
}

impl<'a> PackQuery<'a> {
    pub fn new(packs: &'a [CardPack]) -> Self {
        Self { packs }
    }

    pub fn get(&self, id: &str) -> Option<&'a CardPack> {
        self.packs.iter().find(|p| p.id == id)
    }

    /// Like [`get`](Self::get) but an unknown id is an error.
    pub fn require(&self, id: &str) -> Result<&'a CardPack> {
        self.get(id)
            .ok_or_else(|| GachaError::NotFound(format!("Pack '{}'", id)))
    }

    /// All packs in catalog order, optionally restricted to one category.
    pub fn list(&self, category: Option<Category>) -> Vec<&'a CardPack> {
        self.packs
            .iter()
            .filter(|p| category.map_or(true, |c| p.category == c))
            .collect()
    }

    pub fn hot(&self) -> Vec<&'a CardPack> {
        self.packs.iter().filter(|p| p.is_hot).collect()
    }

    pub fn new_arrivals(&self) -> Vec<&'a CardPack> {
        self.packs.iter().filter(|p| p.is_new).collect()
    }

    pub fn search(&self, params: &SearchPacksParams) -> Vec<&'a CardPack> {
        let needle = params.text.as_deref().map(str::to_lowercase);
        let matches = self.packs.iter().filter(|p| {
            if params.category.is_some_and(|c| p.category != c) {
                return false;
            }
            if params.hot_only && !p.is_hot {
                return false;
            }
            if params.new_only && !p.is_new {
                return false;
            }
            if params.max_price.is_some_and(|max| p.price > max) {
                return false;
            }
            match &needle {
                Some(n) => {
                    p.title.to_lowercase().contains(n)
                        || p.creator.name.to_lowercase().contains(n)
                        || p.tags.iter().any(|t| t.to_lowercase().contains(n))
                }
                None => true,
            }
        });
        match params.limit {
            Some(l) => matches.take(l).collect(),
            None => matches.collect(),
        }
    }

    pub fn count(&self) -> usize {
        self.packs.len()
    }
}
