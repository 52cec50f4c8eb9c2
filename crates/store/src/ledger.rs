//! Inventory Ledger: stock operations keyed by item.
//!
//! Inventory is a global resource. None of these operations are owner-scoped.

use stockroom_core::{DomainError, DomainResult, Entity, ItemId};
use stockroom_inventory::{InventoryRecord, LowStockPolicy};

use crate::store::{EntityStore, Tables};
use crate::views::StockLevel;

/// Emit the low-stock signal if `before -> after` crosses the threshold.
pub(crate) fn signal_low_stock(policy: &LowStockPolicy, item_id: ItemId, before: i64, after: i64) {
    if policy.crossed(before, after) {
        tracing::warn!(
            item_id = item_id.get(),
            quantity = after,
            threshold = policy.threshold(),
            "low stock"
        );
    }
}

/// Run `op` on the record for `item_id` inside an open transaction and emit
/// the low-stock signal if it crosses the threshold.
///
/// Every stock movement, from the ledger or the order workflow, goes through
/// here.
fn update_in(
    tables: &mut Tables,
    policy: &LowStockPolicy,
    item_id: ItemId,
    op: impl FnOnce(&mut InventoryRecord) -> DomainResult<i64>,
) -> DomainResult<i64> {
    let record = tables
        .inventory_for_mut(item_id)
        .ok_or(DomainError::not_found(InventoryRecord::KIND))?;
    let before = record.quantity();
    let after = op(record)?;
    signal_low_stock(policy, item_id, before, after);
    Ok(after)
}

/// Apply `delta` to the record for `item_id`.
pub(crate) fn adjust_in(tables: &mut Tables, policy: &LowStockPolicy, item_id: ItemId, delta: i64) -> DomainResult<i64> {
    update_in(tables, policy, item_id, |record| record.adjust(delta))
}

/// Take `quantity` units out of the available pool for an order.
pub(crate) fn reserve_in(tables: &mut Tables, policy: &LowStockPolicy, item_id: ItemId, quantity: i64) -> DomainResult<i64> {
    update_in(tables, policy, item_id, |record| record.reserve(quantity))
}

/// Give `quantity` units held by an order back to the available pool.
pub(crate) fn release_in(tables: &mut Tables, policy: &LowStockPolicy, item_id: ItemId, quantity: i64) -> DomainResult<i64> {
    update_in(tables, policy, item_id, |record| record.release(quantity))
}

pub(crate) fn stock_level(tables: &Tables, policy: &LowStockPolicy, record: &InventoryRecord) -> StockLevel {
    StockLevel {
        record: record.clone(),
        item: tables.items.get(record.item_id()).cloned(),
        low_stock: policy.is_low(record.quantity()),
    }
}

#[derive(Debug, Clone)]
pub struct InventoryLedger<S> {
    store: S,
    policy: LowStockPolicy,
}

impl<S> InventoryLedger<S>
where
    S: EntityStore,
{
    pub fn new(store: S, policy: LowStockPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> LowStockPolicy {
        self.policy
    }

    /// Open a stock record for an existing item.
    pub fn create(&self, item_id: ItemId, quantity: i64) -> DomainResult<StockLevel> {
        if quantity < 0 {
            return Err(DomainError::invalid_argument("quantity cannot be negative"));
        }

        self.store.transact(|tables| {
            if !tables.items.contains(item_id) {
                return Err(DomainError::not_found("item"));
            }
            if tables.inventory_for(item_id).is_some() {
                return Err(DomainError::conflict("inventory already exists for this item"));
            }

            let record = InventoryRecord::new(tables.sequences.inventory.allocate(), item_id, quantity)?;
            let level = stock_level(tables, &self.policy, &record);
            tables.inventory.insert(record);

            tracing::info!(item_id = item_id.get(), quantity, "inventory created");
            Ok(level)
        })
    }

    /// Apply `quantity += delta`. Rejected if the result would be negative.
    pub fn adjust(&self, item_id: ItemId, delta: i64) -> DomainResult<StockLevel> {
        self.store.transact(|tables| {
            adjust_in(tables, &self.policy, item_id, delta)?;
            let record = tables
                .inventory_for(item_id)
                .ok_or(DomainError::not_found(InventoryRecord::KIND))?;
            Ok(stock_level(tables, &self.policy, record))
        })
    }

    /// Overwrite the available quantity.
    pub fn set_quantity(&self, item_id: ItemId, quantity: i64) -> DomainResult<StockLevel> {
        if quantity < 0 {
            return Err(DomainError::invalid_argument("quantity cannot be negative"));
        }

        self.store.transact(|tables| {
            let record = tables
                .inventory_for_mut(item_id)
                .ok_or(DomainError::not_found(InventoryRecord::KIND))?;
            let before = record.quantity();
            record.set_quantity(quantity)?;
            signal_low_stock(&self.policy, item_id, before, quantity);

            let record = record.clone();
            tracing::info!(item_id = item_id.get(), quantity, "inventory updated");
            Ok(stock_level(tables, &self.policy, &record))
        })
    }

    /// Delete the record for `item_id`.
    pub fn remove(&self, item_id: ItemId) -> DomainResult<InventoryRecord> {
        self.store.transact(|tables| {
            let removed = tables
                .remove_inventory_for(item_id)
                .ok_or(DomainError::not_found(InventoryRecord::KIND))?;
            tracing::info!(item_id = item_id.get(), "inventory removed");
            Ok(removed)
        })
    }

    /// Current available quantity.
    pub fn available(&self, item_id: ItemId) -> DomainResult<i64> {
        self.store.read(|tables| {
            tables
                .inventory_for(item_id)
                .map(InventoryRecord::quantity)
                .ok_or(DomainError::not_found(InventoryRecord::KIND))
        })
    }

    /// The record for `item_id`, with its item if it still exists.
    pub fn get(&self, item_id: ItemId) -> DomainResult<StockLevel> {
        self.store.read(|tables| {
            let record = tables
                .inventory_for(item_id)
                .ok_or(DomainError::not_found(InventoryRecord::KIND))?;
            Ok(stock_level(tables, &self.policy, record))
        })
    }

    /// All records whose item still exists.
    pub fn list(&self) -> Vec<StockLevel> {
        self.store.read(|tables| {
            tables
                .inventory
                .iter()
                .map(|record| stock_level(tables, &self.policy, record))
                .filter(|level| level.item.is_some())
                .collect()
        })
    }

    /// Records below the low-stock threshold.
    pub fn low_stock(&self) -> Vec<StockLevel> {
        self.list().into_iter().filter(|level| level.low_stock).collect()
    }
}
