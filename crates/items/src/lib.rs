//! Catalog items (owner-scoped).
//!
//! Pure domain logic: validation and state changes only, no storage.

pub mod item;

pub use item::{Item, ItemChanges, ItemDraft};
