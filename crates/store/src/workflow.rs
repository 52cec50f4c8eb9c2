//! Order Workflow: order lifecycle against the Inventory Ledger.
//!
//! Every operation runs in one [`EntityStore::transact`] call and follows the
//! same shape:
//!
//! ```text
//! resolve order (owner-scoped)
//!   ↓
//! plan (pure: new state + stock delta, or a domain error)
//!   ↓
//! check availability
//!   ↓
//! move stock, then commit the order
//! ```
//!
//! Nothing is written until every check has passed, so a failed request leaves
//! both the order and the inventory exactly as they were.
//!
//! Each order tracks how much stock it still holds (`reserved`). Cancelling
//! returns it and zeroes it, completing consumes it, deleting returns whatever
//! is left. Stock therefore comes back at most once, whichever path runs.

use chrono::Utc;

use stockroom_core::{DomainError, DomainResult, ItemId, OrderId, UserId, ensure_owned, owned_by};
use stockroom_inventory::LowStockPolicy;
use stockroom_orders::{Order, OrderChanges};

use crate::ledger::{release_in, reserve_in};
use crate::store::{EntityStore, Tables};
use crate::views::OrderView;

fn view(tables: &Tables, order: &Order) -> OrderView {
    OrderView {
        order: order.clone(),
        item: tables.items.get(order.item_id()).cloned(),
    }
}

/// Check that `requested` units of `item_id` are available.
///
/// A missing inventory record counts as zero stock.
fn ensure_available(tables: &Tables, item_id: ItemId, requested: i64) -> DomainResult<()> {
    match tables.inventory_for(item_id) {
        Some(record) => record.ensure_available(requested),
        None => Err(DomainError::insufficient(requested, 0)),
    }
}

/// Move `delta` units for `item_id`: a negative delta reserves stock, a
/// positive one releases it. Releases to a record that no longer exists are
/// skipped.
fn move_stock(tables: &mut Tables, policy: &LowStockPolicy, order_id: OrderId, item_id: ItemId, delta: i64) -> DomainResult<()> {
    if delta == 0 {
        return Ok(());
    }
    if delta > 0 && tables.inventory_for(item_id).is_none() {
        tracing::warn!(
            order_id = order_id.get(),
            item_id = item_id.get(),
            quantity = delta,
            "inventory record missing; stock not restored"
        );
        return Ok(());
    }
    if delta < 0 {
        ensure_available(tables, item_id, -delta)?;
        reserve_in(tables, policy, item_id, -delta)?;
    } else {
        release_in(tables, policy, item_id, delta)?;
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct OrderWorkflow<S> {
    store: S,
    policy: LowStockPolicy,
}

impl<S> OrderWorkflow<S>
where
    S: EntityStore,
{
    pub fn new(store: S, policy: LowStockPolicy) -> Self {
        Self { store, policy }
    }

    /// Orders placed by `owner`, in id order.
    pub fn list(&self, owner: UserId) -> Vec<OrderView> {
        self.store.read(|tables| {
            owned_by(tables.orders.iter(), owner)
                .map(|order| view(tables, order))
                .collect()
        })
    }

    pub fn get(&self, owner: UserId, order_id: OrderId) -> DomainResult<OrderView> {
        self.store.read(|tables| {
            let order = ensure_owned(tables.orders.get(order_id), owner)?;
            Ok(view(tables, order))
        })
    }

    /// Place a pending order, taking its quantity out of available stock.
    ///
    /// Any existing item may be ordered; inventory is not owner-scoped.
    pub fn create(&self, owner: UserId, item_id: ItemId, quantity: i64) -> DomainResult<OrderView> {
        if quantity <= 0 {
            return Err(DomainError::invalid_argument("quantity must be greater than 0"));
        }

        self.store.transact(|tables| {
            if !tables.items.contains(item_id) {
                return Err(DomainError::not_found("item"));
            }
            ensure_available(tables, item_id, quantity)?;

            let order_id: OrderId = tables.sequences.orders.allocate();
            let order = Order::place(order_id, owner, item_id, quantity, Utc::now())?;
            reserve_in(tables, &self.policy, item_id, quantity)?;

            let created = view(tables, &order);
            tables.orders.insert(order);

            tracing::info!(
                order_id = order_id.get(),
                user_id = owner.get(),
                item_id = item_id.get(),
                quantity,
                "order created"
            );
            Ok(created)
        })
    }

    /// Edit quantity and/or status as one unit.
    ///
    /// Raising the quantity needs the difference in stock; lowering it returns
    /// the difference. Cancelling returns what the order still holds.
    pub fn update(&self, owner: UserId, order_id: OrderId, changes: OrderChanges) -> DomainResult<OrderView> {
        self.store.transact(|tables| {
            let order = ensure_owned(tables.orders.get(order_id), owner)?;
            let item_id = order.item_id();
            let plan = order.plan(&changes)?;
            if plan.is_noop(order) {
                return Ok(view(tables, order));
            }

            if plan.required_available > 0 {
                ensure_available(tables, item_id, plan.required_available)?;
            }
            move_stock(tables, &self.policy, order_id, item_id, plan.stock_delta)?;

            let order = tables
                .orders
                .get_mut(order_id)
                .ok_or(DomainError::not_found("order"))?;
            order.apply(&plan, Utc::now());
            let updated = order.clone();

            tracing::info!(
                order_id = order_id.get(),
                quantity = plan.quantity,
                status = %plan.status,
                stock_delta = plan.stock_delta,
                "order updated"
            );
            Ok(view(tables, &updated))
        })
    }

    /// Remove an order, returning whatever stock it still holds.
    pub fn delete(&self, owner: UserId, order_id: OrderId) -> DomainResult<OrderView> {
        self.store.transact(|tables| {
            let order = ensure_owned(tables.orders.get(order_id), owner)?;
            let item_id = order.item_id();
            let release = order.release_on_delete();

            move_stock(tables, &self.policy, order_id, item_id, release)?;

            let removed = tables
                .orders
                .remove(order_id)
                .ok_or(DomainError::not_found("order"))?;

            tracing::info!(
                order_id = order_id.get(),
                user_id = owner.get(),
                released = release,
                "order deleted"
            );
            Ok(view(tables, &removed))
        })
    }
}
