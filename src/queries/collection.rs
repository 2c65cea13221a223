//! Owned-card queries.

use crate::models::{Card, Rarity};

pub struct CollectionQuery<'a> {
    cards: &'a [Card],
}

impl<'a> CollectionQuery<'a> {
    pub fn new(cards: &'a [Card]) -> Self {
        Self { cards }
    }

    pub fn get(&self, instance_id: &str) -> Option<&'a Card> {
        self.cards.iter().find(|c| c.instance_id == instance_id)
    }

    /// Newest first.
    pub fn list(&self) -> &'a [Card] {
        self.cards
    }

    pub fn by_rarity(&self, rarity: Rarity) -> Vec<&'a Card> {
        self.cards.iter().filter(|c| c.rarity == rarity).collect()
    }

    pub fn by_creator(&self, creator: &str) -> Vec<&'a Card> {
        self.cards
            .iter()
            .filter(|c| c.creator_name == creator)
            .collect()
    }

    pub fn count(&self) -> usize {
        self.cards.len()
    }
}
