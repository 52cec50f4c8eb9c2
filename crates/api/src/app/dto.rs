//! Request/response bodies. Field names are camelCase on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_auth::UserAccount;
use stockroom_core::{Entity, InventoryId, ItemId, OrderId, Owned, UserId};
use stockroom_inventory::InventoryRecord;
use stockroom_items::{Item, ItemChanges, ItemDraft};
use stockroom_orders::{OrderChanges, OrderStatus};
use stockroom_store::{OrderView, StockLevel};

use crate::app::errors::ApiError;

// -------------------------
// Request DTOs
// -------------------------

/// Body of `/login` and `/register`. Missing fields are reported by the
/// account rules, not by deserialization.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl CredentialsRequest {
    pub fn into_parts(self) -> (String, String) {
        (
            self.username.unwrap_or_default(),
            self.password.unwrap_or_default(),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct ItemRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl ItemRequest {
    pub fn into_draft(self) -> ItemDraft {
        ItemDraft {
            title: self.title.unwrap_or_default(),
            description: self.description,
        }
    }

    pub fn into_changes(self) -> ItemChanges {
        ItemChanges {
            title: self.title.unwrap_or_default(),
            description: self.description,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInventoryRequest {
    pub item_id: Option<ItemId>,
    pub quantity: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateInventoryRequest {
    pub quantity: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub item_id: Option<ItemId>,
    pub quantity: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    pub quantity: Option<i64>,
    pub status: Option<String>,
}

impl UpdateOrderRequest {
    /// Parse the status string; unknown values are rejected here.
    pub fn into_changes(self) -> Result<OrderChanges, ApiError> {
        let status = self
            .status
            .map(|s| s.parse::<OrderStatus>())
            .transpose()?;
        Ok(OrderChanges {
            quantity: self.quantity,
            status,
        })
    }
}

/// Both fields of an id/quantity pair are mandatory.
pub fn require_item_and_quantity(
    item_id: Option<ItemId>,
    quantity: Option<i64>,
) -> Result<(ItemId, i64), ApiError> {
    match (item_id, quantity) {
        (Some(item_id), Some(quantity)) => Ok((item_id, quantity)),
        _ => Err(ApiError::bad_request("itemId and quantity are required")),
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
}

impl From<&UserAccount> for UserResponse {
    fn from(account: &UserAccount) -> Self {
        Self {
            id: account.id(),
            username: account.username().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: ItemId,
    pub title: String,
    pub description: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Item> for ItemResponse {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id(),
            title: item.title().to_string(),
            description: item.description().to_string(),
            user_id: item.owner_id(),
            created_at: item.created_at(),
            updated_at: item.updated_at(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ItemDeletedResponse {
    pub message: &'static str,
    pub item: ItemResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecordResponse {
    pub id: InventoryId,
    pub item_id: ItemId,
    pub quantity: i64,
}

impl From<&InventoryRecord> for InventoryRecordResponse {
    fn from(record: &InventoryRecord) -> Self {
        Self {
            id: record.id(),
            item_id: record.item_id(),
            quantity: record.quantity(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockLevelResponse {
    #[serde(flatten)]
    pub record: InventoryRecordResponse,
    pub low_stock: bool,
    pub item: Option<ItemResponse>,
}

impl From<&StockLevel> for StockLevelResponse {
    fn from(level: &StockLevel) -> Self {
        Self {
            record: InventoryRecordResponse::from(&level.record),
            low_stock: level.low_stock,
            item: level.item.as_ref().map(ItemResponse::from),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InventoryDeletedResponse {
    pub message: &'static str,
    pub inventory: InventoryRecordResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: OrderId,
    pub user_id: UserId,
    pub item_id: ItemId,
    pub quantity: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub item: Option<ItemResponse>,
}

impl From<&OrderView> for OrderResponse {
    fn from(view: &OrderView) -> Self {
        let order = &view.order;
        Self {
            id: order.id(),
            user_id: order.owner_id(),
            item_id: order.item_id(),
            quantity: order.quantity(),
            status: order.status(),
            created_at: order.created_at(),
            updated_at: order.updated_at(),
            item: view.item.as_ref().map(ItemResponse::from),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderDeletedResponse {
    pub message: &'static str,
    pub order: OrderResponse,
}
