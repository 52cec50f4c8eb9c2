use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, Entity, InventoryId, ItemId};

/// Available stock for one item.
///
/// `quantity` is what can still be ordered: every active order has already
/// been subtracted from it. There is no separate reserved pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    id: InventoryId,
    item_id: ItemId,
    quantity: i64,
}

fn ensure_non_negative(quantity: i64) -> DomainResult<()> {
    if quantity < 0 {
        return Err(DomainError::invalid_argument("quantity cannot be negative"));
    }
    Ok(())
}

impl InventoryRecord {
    pub fn new(id: InventoryId, item_id: ItemId, quantity: i64) -> DomainResult<Self> {
        ensure_non_negative(quantity)?;
        Ok(Self {
            id,
            item_id,
            quantity,
        })
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Fail with `InsufficientInventory` unless `requested` units are available.
    pub fn ensure_available(&self, requested: i64) -> DomainResult<()> {
        if requested > self.quantity {
            return Err(DomainError::insufficient(requested, self.quantity));
        }
        Ok(())
    }

    /// Apply `quantity += delta`.
    ///
    /// Restocking (positive delta) always succeeds. A negative delta that
    /// would take the record below zero is rejected and leaves it unchanged.
    pub fn adjust(&mut self, delta: i64) -> DomainResult<i64> {
        let next = self
            .quantity
            .checked_add(delta)
            .ok_or_else(|| DomainError::invalid_argument("quantity overflow"))?;
        if next < 0 {
            return Err(DomainError::invalid_argument(format!(
                "adjustment of {delta} would take quantity below zero (current: {})",
                self.quantity
            )));
        }
        self.quantity = next;
        Ok(next)
    }

    /// Take `quantity` units out of the available pool.
    pub fn reserve(&mut self, quantity: i64) -> DomainResult<i64> {
        self.ensure_available(quantity)?;
        self.adjust(-quantity)
    }

    /// Return `quantity` units to the available pool.
    pub fn release(&mut self, quantity: i64) -> DomainResult<i64> {
        ensure_non_negative(quantity)?;
        self.adjust(quantity)
    }

    /// Overwrite the available quantity.
    pub fn set_quantity(&mut self, quantity: i64) -> DomainResult<()> {
        ensure_non_negative(quantity)?;
        self.quantity = quantity;
        Ok(())
    }
}

impl Entity for InventoryRecord {
    type Id = InventoryId;
    const KIND: &'static str = "inventory record";

    fn id(&self) -> InventoryId {
        self.id
    }
}
