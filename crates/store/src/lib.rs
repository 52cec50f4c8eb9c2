//! `stockroom-store` - in-memory storage and the services built on it.
//!
//! - `store`: the Entity Store (`EntityStore` trait + `InMemoryStore`)
//! - `ledger`: Inventory Ledger (global, keyed by item)
//! - `workflow`: Order Workflow (owner-scoped, moves stock atomically)
//! - `items`, `accounts`: owner-scoped catalogue and user accounts
//! - `seed`: demo data

pub mod accounts;
pub mod items;
pub mod ledger;
pub mod seed;
pub mod store;
pub mod views;
pub mod workflow;

pub use accounts::{AccountError, AccountResult, AccountService};
pub use items::ItemService;
pub use ledger::InventoryLedger;
pub use seed::{DEMO_USERS, seed_demo_data};
pub use store::{Collection, EntityStore, InMemoryStore, Sequences, Tables};
pub use views::{OrderView, StockLevel};
pub use workflow::OrderWorkflow;
