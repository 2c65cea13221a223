//! Query modules for the storefront state.
//!
//! Each module provides a query struct that borrows a slice of the
//! application state and exposes read-only lookups.

pub mod collection;
pub mod packs;

pub use collection::CollectionQuery;
pub use packs::{PackQuery, SearchPacksParams};
