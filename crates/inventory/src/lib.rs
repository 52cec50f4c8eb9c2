//! Inventory domain module.
//!
//! This crate contains the stock rules for a single inventory record,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod record;
pub mod stock;

pub use record::InventoryRecord;
pub use stock::{DEFAULT_LOW_STOCK_THRESHOLD, LowStockPolicy};
