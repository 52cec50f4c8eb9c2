use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, Entity, ItemId, OrderId, Owned, UserId};

use crate::status::OrderStatus;

/// An order for a quantity of one item.
///
/// # Invariants
/// - `quantity > 0`.
/// - `reserved` is the stock currently held out of the item's available pool
///   on behalf of this order: equal to `quantity` while the order is active,
///   zero once it is completed (stock consumed) or cancelled (stock returned).
///   Stock is therefore returned at most once, whichever path releases it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: OrderId,
    owner_id: UserId,
    item_id: ItemId,
    quantity: i64,
    status: OrderStatus,
    reserved: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Requested edits to an order. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderChanges {
    pub quantity: Option<i64>,
    pub status: Option<OrderStatus>,
}

/// Outcome of validating [`OrderChanges`] against an order.
///
/// A plan is computed without touching the order; the caller applies the
/// stock movement and then [`Order::apply`] as one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderPlan {
    pub quantity: i64,
    pub status: OrderStatus,
    pub reserved: i64,
    /// Units that must be available before the plan may be applied.
    pub required_available: i64,
    /// Net change to the item's available stock.
    pub stock_delta: i64,
}

fn ensure_positive(quantity: i64) -> DomainResult<()> {
    if quantity <= 0 {
        return Err(DomainError::invalid_argument("quantity must be greater than 0"));
    }
    Ok(())
}

impl Order {
    /// Place a new pending order that reserves its full quantity.
    pub fn place(
        id: OrderId,
        owner_id: UserId,
        item_id: ItemId,
        quantity: i64,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        ensure_positive(quantity)?;
        Ok(Self {
            id,
            owner_id,
            item_id,
            quantity,
            status: OrderStatus::Pending,
            reserved: quantity,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild an order in an arbitrary status (seeding/imports).
    ///
    /// The reservation is derived from the status: active orders hold their
    /// quantity, terminal ones hold nothing.
    pub fn restore(
        id: OrderId,
        owner_id: UserId,
        item_id: ItemId,
        quantity: i64,
        status: OrderStatus,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        ensure_positive(quantity)?;
        let reserved = if status.is_terminal() { 0 } else { quantity };
        Ok(Self {
            id,
            owner_id,
            item_id,
            quantity,
            status,
            reserved,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn reserved(&self) -> i64 {
        self.reserved
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Stock to hand back if this order is deleted.
    pub fn release_on_delete(&self) -> i64 {
        self.reserved
    }

    /// Validate `changes` and compute the resulting state and stock movement.
    ///
    /// Quantity is planned before status, so `{quantity, status: cancelled}`
    /// returns the edited quantity. Re-stating the current quantity or status
    /// is a no-op rather than a transition.
    pub fn plan(&self, changes: &OrderChanges) -> DomainResult<OrderPlan> {
        let mut plan = OrderPlan {
            quantity: self.quantity,
            status: self.status,
            reserved: self.reserved,
            required_available: 0,
            stock_delta: 0,
        };

        if let Some(quantity) = changes.quantity {
            ensure_positive(quantity)?;
            if quantity != self.quantity {
                if self.status.is_terminal() {
                    return Err(DomainError::invalid_argument(format!(
                        "cannot change quantity of a {} order",
                        self.status
                    )));
                }
                let diff = quantity - self.quantity;
                plan.required_available = diff.max(0);
                plan.stock_delta -= diff;
                plan.reserved += diff;
                plan.quantity = quantity;
            }
        }

        if let Some(next) = changes.status {
            if next != self.status {
                if !self.status.can_transition_to(next) {
                    return Err(DomainError::invalid_argument(format!(
                        "cannot move order from {} to {}",
                        self.status, next
                    )));
                }
                match next {
                    OrderStatus::Cancelled => {
                        plan.stock_delta += plan.reserved;
                        plan.reserved = 0;
                    }
                    OrderStatus::Completed => plan.reserved = 0,
                    OrderStatus::Pending | OrderStatus::Processing => {}
                }
                plan.status = next;
            }
        }

        Ok(plan)
    }

    /// Commit a plan produced by [`Order::plan`] on this same order.
    pub fn apply(&mut self, plan: &OrderPlan, now: DateTime<Utc>) {
        self.quantity = plan.quantity;
        self.status = plan.status;
        self.reserved = plan.reserved;
        self.updated_at = now;
    }
}

impl OrderPlan {
    /// True when applying the plan would change nothing.
    pub fn is_noop(&self, order: &Order) -> bool {
        self.stock_delta == 0
            && self.quantity == order.quantity
            && self.status == order.status
            && self.reserved == order.reserved
    }
}

impl Entity for Order {
    type Id = OrderId;
    const KIND: &'static str = "order";

    fn id(&self) -> OrderId {
        self.id
    }
}

impl Owned for Order {
    fn owner_id(&self) -> UserId {
        self.owner_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn pending(quantity: i64) -> Order {
        Order::place(OrderId::new(1), UserId::new(1), ItemId::new(1), quantity, test_time()).unwrap()
    }

    fn quantity(q: i64) -> OrderChanges {
        OrderChanges {
            quantity: Some(q),
            status: None,
        }
    }

    fn status(s: OrderStatus) -> OrderChanges {
        OrderChanges {
            quantity: None,
            status: Some(s),
        }
    }

    fn apply(order: &mut Order, changes: OrderChanges) -> OrderPlan {
        let plan = order.plan(&changes).unwrap();
        order.apply(&plan, test_time());
        plan
    }

    #[test]
    fn place_rejects_non_positive_quantity() {
        for q in [0, -3] {
            let err = Order::place(OrderId::new(1), UserId::new(1), ItemId::new(1), q, test_time())
                .unwrap_err();
            assert_eq!(err, DomainError::invalid_argument("quantity must be greater than 0"));
        }
    }

    #[test]
    fn new_order_is_pending_and_reserves_its_quantity() {
        let order = pending(3);
        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(order.reserved(), 3);
    }

    #[test]
    fn increasing_quantity_requires_the_difference() {
        let order = pending(3);
        let plan = order.plan(&quantity(5)).unwrap();
        assert_eq!(plan.required_available, 2);
        assert_eq!(plan.stock_delta, -2);
        assert_eq!(plan.reserved, 5);
    }

    #[test]
    fn decreasing_quantity_returns_the_difference() {
        let order = pending(5);
        let plan = order.plan(&quantity(2)).unwrap();
        assert_eq!(plan.required_available, 0);
        assert_eq!(plan.stock_delta, 3);
        assert_eq!(plan.reserved, 2);
    }

    #[test]
    fn cancel_releases_reservation_once() {
        let mut order = pending(5);
        let plan = apply(&mut order, status(OrderStatus::Cancelled));
        assert_eq!(plan.stock_delta, 5);
        assert_eq!(order.reserved(), 0);

        // Re-stating cancelled is accepted but moves no stock.
        let again = order.plan(&status(OrderStatus::Cancelled)).unwrap();
        assert_eq!(again.stock_delta, 0);
        assert!(again.is_noop(&order));
        assert_eq!(order.release_on_delete(), 0);
    }

    #[test]
    fn completion_consumes_the_reservation() {
        let mut order = pending(4);
        let plan = apply(&mut order, status(OrderStatus::Completed));
        assert_eq!(plan.stock_delta, 0);
        assert_eq!(order.release_on_delete(), 0);
    }

    #[test]
    fn terminal_orders_reject_quantity_edits_and_transitions() {
        let mut order = pending(4);
        apply(&mut order, status(OrderStatus::Completed));

        match order.plan(&quantity(6)) {
            Err(DomainError::InvalidArgument(msg))
                if msg.contains("cannot change quantity of a completed order") => {}
            other => panic!("expected InvalidArgument, got {other:?}"),
        }
        assert!(order.plan(&status(OrderStatus::Cancelled)).is_err());
        // Same quantity is not an edit.
        assert!(order.plan(&quantity(4)).unwrap().is_noop(&order));
    }

    #[test]
    fn quantity_then_cancel_in_one_update_returns_edited_quantity() {
        let order = pending(3);
        let plan = order
            .plan(&OrderChanges {
                quantity: Some(5),
                status: Some(OrderStatus::Cancelled),
            })
            .unwrap();
        // +2 reserved by the edit, then all 5 released by the cancel.
        assert_eq!(plan.required_available, 2);
        assert_eq!(plan.stock_delta, 3);
        assert_eq!(plan.reserved, 0);
        assert_eq!(plan.status, OrderStatus::Cancelled);
    }

    #[test]
    fn plan_does_not_mutate_the_order() {
        let order = pending(3);
        let before = order.clone();
        let _ = order.plan(&quantity(9));
        let _ = order.plan(&status(OrderStatus::Cancelled));
        assert_eq!(order, before);
    }

    #[test]
    fn restore_derives_reservation_from_status() {
        let done = Order::restore(
            OrderId::new(2),
            UserId::new(1),
            ItemId::new(2),
            1,
            OrderStatus::Completed,
            test_time(),
        )
        .unwrap();
        assert_eq!(done.reserved(), 0);

        let open = Order::restore(
            OrderId::new(1),
            UserId::new(1),
            ItemId::new(1),
            2,
            OrderStatus::Processing,
            test_time(),
        )
        .unwrap();
        assert_eq!(open.reserved(), 2);
    }

    fn arb_changes() -> impl Strategy<Value = OrderChanges> {
        (
            prop::option::of(-2i64..20),
            prop::option::of(prop::sample::select(OrderStatus::ALL.to_vec())),
        )
            .prop_map(|(quantity, status)| OrderChanges { quantity, status })
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: across any sequence of accepted edits, the reservation is
        /// the full quantity while active and zero once terminal, and the
        /// stock handed back never exceeds what was taken.
        #[test]
        fn reservation_tracks_status(
            start in 1i64..20,
            edits in prop::collection::vec(arb_changes(), 1..30)
        ) {
            let mut order = pending(start);
            let mut taken = start;
            let mut returned = 0i64;

            for changes in edits {
                if let Ok(plan) = order.plan(&changes) {
                    if plan.stock_delta < 0 {
                        taken += -plan.stock_delta;
                    } else {
                        returned += plan.stock_delta;
                    }
                    order.apply(&plan, test_time());
                }

                prop_assert!(order.quantity() > 0);
                if order.status().is_terminal() {
                    prop_assert_eq!(order.reserved(), 0);
                } else {
                    prop_assert_eq!(order.reserved(), order.quantity());
                }
                prop_assert!(taken - returned >= order.reserved());
            }

            if order.status() != OrderStatus::Completed {
                prop_assert_eq!(taken - returned, order.reserved());
            }
        }
    }
}
