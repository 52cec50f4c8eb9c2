//! `stockroom-core` - ids, errors and ownership rules shared by every domain crate.
//!
//! Nothing here touches storage, HTTP or the clock.

pub mod entity;
pub mod error;
pub mod id;
pub mod ownership;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{IdSequence, InventoryId, ItemId, OrderId, UserId};
pub use ownership::{Owned, ensure_owned, ensure_owned_mut, owned_by};
