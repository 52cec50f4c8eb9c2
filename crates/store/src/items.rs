//! Owner-scoped item catalogue.

use chrono::Utc;

use stockroom_core::{DomainError, DomainResult, ItemId, UserId, ensure_owned, ensure_owned_mut, owned_by};
use stockroom_items::{Item, ItemChanges, ItemDraft};

use crate::store::EntityStore;

#[derive(Debug, Clone)]
pub struct ItemService<S> {
    store: S,
}

impl<S> ItemService<S>
where
    S: EntityStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn list(&self, owner: UserId) -> Vec<Item> {
        self.store
            .read(|tables| owned_by(tables.items.iter(), owner).cloned().collect())
    }

    pub fn get(&self, owner: UserId, item_id: ItemId) -> DomainResult<Item> {
        self.store
            .read(|tables| ensure_owned(tables.items.get(item_id), owner).cloned())
    }

    pub fn create(&self, owner: UserId, draft: ItemDraft) -> DomainResult<Item> {
        self.store.transact(|tables| {
            let id: ItemId = tables.sequences.items.allocate();
            let item = Item::create(id, owner, draft, Utc::now())?;
            tables.items.insert(item.clone());

            tracing::info!(item_id = id.get(), user_id = owner.get(), "item created");
            Ok(item)
        })
    }

    pub fn update(&self, owner: UserId, item_id: ItemId, changes: ItemChanges) -> DomainResult<Item> {
        self.store.transact(|tables| {
            let item = ensure_owned_mut(tables.items.get_mut(item_id), owner)?;
            item.apply_changes(changes, Utc::now())?;

            tracing::info!(item_id = item_id.get(), "item updated");
            Ok(item.clone())
        })
    }

    /// Delete an item together with its inventory record.
    ///
    /// Orders that reference the item are kept.
    pub fn delete(&self, owner: UserId, item_id: ItemId) -> DomainResult<Item> {
        self.store.transact(|tables| {
            ensure_owned(tables.items.get(item_id), owner)?;
            let removed = tables.items.remove(item_id);
            let inventory = tables.remove_inventory_for(item_id);

            tracing::info!(
                item_id = item_id.get(),
                inventory_removed = inventory.is_some(),
                "item deleted"
            );
            removed.ok_or(DomainError::not_found("item"))
        })
    }
}
