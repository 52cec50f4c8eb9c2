//! Demo data for local runs and black-box tests.

use chrono::Utc;

use stockroom_auth::{AuthError, UserAccount, hash_password};
use stockroom_core::{DomainResult, InventoryId, ItemId, OrderId, UserId};
use stockroom_inventory::InventoryRecord;
use stockroom_items::{Item, ItemDraft};
use stockroom_orders::{Order, OrderStatus};

use crate::accounts::AccountResult;
use crate::store::{EntityStore, Tables};

pub const DEMO_USERS: [(&str, &str); 2] = [("admin", "password"), ("user1", "user123")];

const DEMO_ITEMS: [(u64, u64, &str, &str); 3] = [
    (1, 1, "Laptop", "High-performance laptop for development"),
    (2, 1, "Wireless Mouse", "Ergonomic wireless mouse"),
    (3, 2, "Coffee Mug", "Ceramic coffee mug"),
];

/// (record id, item id, available quantity)
const DEMO_INVENTORY: [(u64, u64, i64); 3] = [(1, 1, 10), (2, 2, 25), (3, 3, 15)];

/// (order id, owner, item, quantity, status)
const DEMO_ORDERS: [(u64, u64, u64, i64, OrderStatus); 2] = [
    (1, 1, 1, 2, OrderStatus::Pending),
    (2, 1, 2, 1, OrderStatus::Completed),
];

/// Populate `store` with the demo users, items, inventory and orders.
///
/// Seeded ids are fed to the sequences, so later inserts continue after them.
/// Inventory quantities are the available figures, already net of the
/// pending demo order.
pub fn seed_demo_data<S: EntityStore>(store: &S, bcrypt_cost: u32) -> AccountResult<()> {
    let hashes = DEMO_USERS
        .iter()
        .map(|(_, password)| hash_password(password, bcrypt_cost))
        .collect::<Result<Vec<_>, AuthError>>()?;

    store.transact(|tables| populate(tables, &hashes))?;

    tracing::info!(
        users = DEMO_USERS.len(),
        items = DEMO_ITEMS.len(),
        orders = DEMO_ORDERS.len(),
        "demo data seeded"
    );
    Ok(())
}

fn populate(tables: &mut Tables, hashes: &[String]) -> DomainResult<()> {
    let now = Utc::now();

    for (index, ((username, _), hash)) in DEMO_USERS.iter().zip(hashes).enumerate() {
        let id = UserId::new(index as u64 + 1);
        tables.users.insert(UserAccount::new(id, *username, hash.as_str(), now));
        tables.sequences.users.observe(id);
    }

    for (id, owner, title, description) in DEMO_ITEMS {
        let id = ItemId::new(id);
        let draft = ItemDraft {
            title: title.to_string(),
            description: Some(description.to_string()),
        };
        tables.items.insert(Item::create(id, UserId::new(owner), draft, now)?);
        tables.sequences.items.observe(id);
    }

    for (id, item_id, quantity) in DEMO_INVENTORY {
        let id = InventoryId::new(id);
        tables
            .inventory
            .insert(InventoryRecord::new(id, ItemId::new(item_id), quantity)?);
        tables.sequences.inventory.observe(id);
    }

    for (id, owner, item_id, quantity, status) in DEMO_ORDERS {
        let id = OrderId::new(id);
        tables.orders.insert(Order::restore(
            id,
            UserId::new(owner),
            ItemId::new(item_id),
            quantity,
            status,
            now,
        )?);
        tables.sequences.orders.observe(id);
    }

    Ok(())
}
