//! Entity Store: the in-memory tables every service works against.
//!
//! Services never hold a lock themselves. They hand a closure to
//! [`EntityStore::read`] or [`EntityStore::transact`]; everything inside one
//! `transact` call is a single critical section, so an order and the stock it
//! moves change together or not at all.
//!
//! There is no rollback. A `transact` closure must finish validating before it
//! mutates anything.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use stockroom_auth::UserAccount;
use stockroom_core::{Entity, IdSequence, ItemId};
use stockroom_inventory::InventoryRecord;
use stockroom_items::Item;
use stockroom_orders::Order;

/// Id-keyed rows of one entity type, iterated in id order.
#[derive(Debug, Clone)]
pub struct Collection<E: Entity> {
    rows: BTreeMap<E::Id, E>,
}

impl<E: Entity> Collection<E> {
    pub fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }

    pub fn get(&self, id: E::Id) -> Option<&E> {
        self.rows.get(&id)
    }

    pub fn get_mut(&mut self, id: E::Id) -> Option<&mut E> {
        self.rows.get_mut(&id)
    }

    pub fn contains(&self, id: E::Id) -> bool {
        self.rows.contains_key(&id)
    }

    /// Insert keyed by the entity's own id, returning any row it replaced.
    pub fn insert(&mut self, entity: E) -> Option<E> {
        self.rows.insert(entity.id(), entity)
    }

    pub fn remove(&mut self, id: E::Id) -> Option<E> {
        self.rows.remove(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.rows.values()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<E: Entity> Default for Collection<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// One monotonic id sequence per collection.
#[derive(Debug, Clone, Default)]
pub struct Sequences {
    pub users: IdSequence,
    pub items: IdSequence,
    pub inventory: IdSequence,
    pub orders: IdSequence,
}

/// All collections plus their id sequences.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub users: Collection<UserAccount>,
    pub items: Collection<Item>,
    pub inventory: Collection<InventoryRecord>,
    pub orders: Collection<Order>,
    pub sequences: Sequences,
}

impl Tables {
    /// The inventory record for `item_id`, if one exists (at most one does).
    pub fn inventory_for(&self, item_id: ItemId) -> Option<&InventoryRecord> {
        self.inventory.iter().find(|r| r.item_id() == item_id)
    }

    pub fn inventory_for_mut(&mut self, item_id: ItemId) -> Option<&mut InventoryRecord> {
        let id = self.inventory_for(item_id)?.id();
        self.inventory.get_mut(id)
    }

    pub fn remove_inventory_for(&mut self, item_id: ItemId) -> Option<InventoryRecord> {
        let id = self.inventory_for(item_id)?.id();
        self.inventory.remove(id)
    }

    pub fn user_by_name(&self, username: &str) -> Option<&UserAccount> {
        self.users.iter().find(|u| u.username() == username)
    }
}

/// Access to the shared tables.
///
/// Injected into every service so tests can hand in a pre-populated store.
pub trait EntityStore: Send + Sync {
    /// Run `f` against a consistent snapshot.
    fn read<R>(&self, f: impl FnOnce(&Tables) -> R) -> R;

    /// Run `f` with exclusive access. No other read or write interleaves.
    fn transact<R>(&self, f: impl FnOnce(&mut Tables) -> R) -> R;
}

impl<S> EntityStore for Arc<S>
where
    S: EntityStore,
{
    fn read<R>(&self, f: impl FnOnce(&Tables) -> R) -> R {
        (**self).read(f)
    }

    fn transact<R>(&self, f: impl FnOnce(&mut Tables) -> R) -> R {
        (**self).transact(f)
    }
}

/// Process-lifetime store guarded by one `RwLock`.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tables(tables: Tables) -> Self {
        Self {
            tables: RwLock::new(tables),
        }
    }
}

impl EntityStore for InMemoryStore {
    fn read<R>(&self, f: impl FnOnce(&Tables) -> R) -> R {
        // A panicking writer never leaves a half-applied change behind (closures
        // validate first), so a poisoned lock is still safe to use.
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        f(&tables)
    }

    fn transact<R>(&self, f: impl FnOnce(&mut Tables) -> R) -> R {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut tables)
    }
}
