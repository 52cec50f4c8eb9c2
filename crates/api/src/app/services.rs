//! Service wiring: one in-memory store shared by every service.

use std::sync::Arc;

use anyhow::Context;

use stockroom_auth::{AuthProvider, JwtAuthProvider};
use stockroom_inventory::LowStockPolicy;
use stockroom_store::{
    AccountService, InMemoryStore, InventoryLedger, ItemService, OrderWorkflow, seed_demo_data,
};

use crate::config::ApiConfig;

pub type SharedStore = Arc<InMemoryStore>;

pub struct AppServices {
    pub items: ItemService<SharedStore>,
    pub inventory: InventoryLedger<SharedStore>,
    pub orders: OrderWorkflow<SharedStore>,
    pub accounts: AccountService<SharedStore>,
    pub auth: Arc<dyn AuthProvider>,
}

impl AppServices {
    /// Wire services over `store`.
    pub fn new(store: SharedStore, auth: Arc<dyn AuthProvider>, config: &ApiConfig) -> Self {
        let policy = LowStockPolicy::new(config.low_stock_threshold);
        Self {
            items: ItemService::new(store.clone()),
            inventory: InventoryLedger::new(store.clone(), policy),
            orders: OrderWorkflow::new(store.clone(), policy),
            accounts: AccountService::new(store, config.bcrypt_cost),
            auth,
        }
    }
}

/// Build the production service graph, seeding demo data if configured.
pub fn build_services(config: &ApiConfig) -> anyhow::Result<AppServices> {
    let store: SharedStore = Arc::new(InMemoryStore::new());
    if config.seed_demo_data {
        seed_demo_data(&store, config.bcrypt_cost).context("failed to seed demo data")?;
    }

    let auth: Arc<dyn AuthProvider> = Arc::new(JwtAuthProvider::new(
        config.jwt_secret.as_bytes(),
        config.token_ttl,
    ));

    Ok(AppServices::new(store, auth, config))
}
