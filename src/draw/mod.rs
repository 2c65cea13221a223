pub mod generator;

pub use generator::{expected_odds, roll_rarity, DrawGenerator, DrawQuantity};
