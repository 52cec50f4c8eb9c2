use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use stockroom_core::ItemId;

use crate::app::dto::{
    self, CreateInventoryRequest, InventoryDeletedResponse, InventoryRecordResponse,
    StockLevelResponse, UpdateInventoryRequest,
};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

// Inventory is shared across users; these handlers only need a valid token.

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_inventory).post(create_inventory))
        .route("/low-stock", get(low_stock))
        .route(
            "/:item_id",
            get(get_inventory).put(update_inventory).delete(delete_inventory),
        )
}

fn levels(levels: Vec<stockroom_store::StockLevel>) -> Json<Vec<StockLevelResponse>> {
    Json(levels.iter().map(StockLevelResponse::from).collect())
}

pub async fn list_inventory(
    Extension(services): Extension<Arc<AppServices>>,
) -> Json<Vec<StockLevelResponse>> {
    levels(services.inventory.list())
}

pub async fn low_stock(
    Extension(services): Extension<Arc<AppServices>>,
) -> Json<Vec<StockLevelResponse>> {
    levels(services.inventory.low_stock())
}

pub async fn get_inventory(
    Extension(services): Extension<Arc<AppServices>>,
    Path(item_id): Path<String>,
) -> Result<Json<StockLevelResponse>, ApiError> {
    let item_id: ItemId = item_id.parse()?;
    let level = services.inventory.get(item_id)?;
    Ok(Json(StockLevelResponse::from(&level)))
}

pub async fn create_inventory(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<CreateInventoryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<StockLevelResponse>), ApiError> {
    let Json(body) = body?;
    let (item_id, quantity) = dto::require_item_and_quantity(body.item_id, body.quantity)?;
    let level = services.inventory.create(item_id, quantity)?;
    Ok((StatusCode::CREATED, Json(StockLevelResponse::from(&level))))
}

pub async fn update_inventory(
    Extension(services): Extension<Arc<AppServices>>,
    Path(item_id): Path<String>,
    body: Result<Json<UpdateInventoryRequest>, JsonRejection>,
) -> Result<Json<StockLevelResponse>, ApiError> {
    let item_id: ItemId = item_id.parse()?;
    let Json(body) = body?;
    let quantity = body
        .quantity
        .ok_or_else(|| ApiError::bad_request("quantity is required"))?;
    let level = services.inventory.set_quantity(item_id, quantity)?;
    Ok(Json(StockLevelResponse::from(&level)))
}

pub async fn delete_inventory(
    Extension(services): Extension<Arc<AppServices>>,
    Path(item_id): Path<String>,
) -> Result<Json<InventoryDeletedResponse>, ApiError> {
    let item_id: ItemId = item_id.parse()?;
    let removed = services.inventory.remove(item_id)?;
    Ok(Json(InventoryDeletedResponse {
        message: "Inventory item removed successfully",
        inventory: InventoryRecordResponse::from(&removed),
    }))
}
