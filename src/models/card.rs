use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GachaError;

// ---------------------------------------------------------------------------
// Rarity
// ---------------------------------------------------------------------------

/// Ordinal rarity tier, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    R,
    SR,
    SSR,
    UR,
}

impl Rarity {
    pub const ALL: [Rarity; 4] = [Rarity::R, Rarity::SR, Rarity::SSR, Rarity::UR];

    /// `true` for the tiers that get the celebratory treatment (SSR and UR).
    pub fn is_high(self) -> bool {
        matches!(self, Rarity::SSR | Rarity::UR)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rarity::R => "R",
            Rarity::SR => "SR",
            Rarity::SSR => "SSR",
            Rarity::UR => "UR",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rarity {
    type Err = GachaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "R" => Ok(Rarity::R),
            "SR" => Ok(Rarity::SR),
            "SSR" => Ok(Rarity::SSR),
            "UR" => Ok(Rarity::UR),
            other => Err(GachaError::InvalidArgument(format!(
                "Unknown rarity '{}'",
                other
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Card -- a single owned card instance
// ---------------------------------------------------------------------------

/// A drawn or catalog-seeded card.
///
/// Cards are never mutated after creation apart from the bulk image
/// replacement performed by a custom image import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(rename = "id")]
    pub instance_id: String,
    pub image_id: Option<String>,
    pub title: String,
    pub image_url: String,
    pub rarity: Rarity,
    #[serde(rename = "creator")]
    pub creator_name: String,
    #[serde(default)]
    pub description: String,
}

impl Card {
    /// Key used for the local image lookup: `image_id`, else the instance id.
    pub fn local_key(&self) -> &str {
        self.image_id.as_deref().unwrap_or(&self.instance_id)
    }
}
