use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use stockroom_core::ItemId;

use crate::app::dto::{ItemDeletedResponse, ItemRequest, ItemResponse};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::UserContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/:id", get(get_item).put(update_item).delete(delete_item))
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
) -> Json<Vec<ItemResponse>> {
    let items = services.items.list(user.user_id());
    Json(items.iter().map(ItemResponse::from).collect())
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<String>,
) -> Result<Json<ItemResponse>, ApiError> {
    let item_id: ItemId = id.parse()?;
    let item = services.items.get(user.user_id(), item_id)?;
    Ok(Json(ItemResponse::from(&item)))
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    body: Result<Json<ItemRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ItemResponse>), ApiError> {
    let Json(body) = body?;
    let item = services.items.create(user.user_id(), body.into_draft())?;
    Ok((StatusCode::CREATED, Json(ItemResponse::from(&item))))
}

pub async fn update_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<String>,
    body: Result<Json<ItemRequest>, JsonRejection>,
) -> Result<Json<ItemResponse>, ApiError> {
    let item_id: ItemId = id.parse()?;
    let Json(body) = body?;
    let item = services
        .items
        .update(user.user_id(), item_id, body.into_changes())?;
    Ok(Json(ItemResponse::from(&item)))
}

pub async fn delete_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<String>,
) -> Result<Json<ItemDeletedResponse>, ApiError> {
    let item_id: ItemId = id.parse()?;
    let item = services.items.delete(user.user_id(), item_id)?;
    Ok(Json(ItemDeletedResponse {
        message: "Item deleted successfully",
        item: ItemResponse::from(&item),
    }))
}
