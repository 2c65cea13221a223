use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Actor,
    Singer,
    Coser,
    Sports,
    Brand,
    IP,
    Streamer,
    Dance,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Actor => "Actor",
            Category::Singer => "Singer",
            Category::Coser => "Coser",
            Category::Sports => "Sports",
            Category::Brand => "Brand",
            Category::IP => "IP",
            Category::Streamer => "Streamer",
            Category::Dance => "Dance",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Creator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    pub id: String,
    pub name: String,
    #[serde(rename = "avatarUrl")]
    pub avatar_ref: String,
    pub bio: Option<String>,
}

// ---------------------------------------------------------------------------
// CardPack -- a purchasable pack in the static catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPack {
    pub id: String,
    pub title: String,
    #[serde(rename = "coverUrl")]
    pub cover_image_ref: String,
    pub price: f64,
    pub category: Category,
    #[serde(default)]
    pub tags: Vec<String>,
    pub description: Option<String>,
    #[serde(rename = "videoUrl")]
    pub intro_video_ref: Option<String>,
    pub creator: Creator,
    #[serde(default)]
    pub is_hot: bool,
    #[serde(default)]
    pub is_new: bool,
}

impl CardPack {
    /// Price of a ten-pull, formatted to two decimals.
    pub fn ten_pull_price(&self) -> String {
        format!("{:.2}", self.price * 10.0)
    }

    /// Remove duplicate tags while keeping first-seen order.
    pub(crate) fn dedup_tags(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.tags.retain(|t| seen.insert(t.clone()));
    }
}
