use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use stockroom_core::OrderId;

use crate::app::dto::{self, CreateOrderRequest, OrderDeletedResponse, OrderResponse, UpdateOrderRequest};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::UserContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/:id", get(get_order).put(update_order).delete(delete_order))
}

pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
) -> Json<Vec<OrderResponse>> {
    let orders = services.orders.list(user.user_id());
    Json(orders.iter().map(OrderResponse::from).collect())
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id: OrderId = id.parse()?;
    let view = services.orders.get(user.user_id(), order_id)?;
    Ok(Json(OrderResponse::from(&view)))
}

pub async fn create_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    body: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let Json(body) = body?;
    let (item_id, quantity) = dto::require_item_and_quantity(body.item_id, body.quantity)?;
    let view = services.orders.create(user.user_id(), item_id, quantity)?;
    Ok((StatusCode::CREATED, Json(OrderResponse::from(&view))))
}

pub async fn update_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<String>,
    body: Result<Json<UpdateOrderRequest>, JsonRejection>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id: OrderId = id.parse()?;
    let Json(body) = body?;
    let changes = body.into_changes()?;
    let view = services.orders.update(user.user_id(), order_id, changes)?;
    Ok(Json(OrderResponse::from(&view)))
}

/// Deleting an order also returns any stock it still holds.
pub async fn delete_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<String>,
) -> Result<Json<OrderDeletedResponse>, ApiError> {
    let order_id: OrderId = id.parse()?;
    let view = services.orders.delete(user.user_id(), order_id)?;
    Ok(Json(OrderDeletedResponse {
        message: "Order cancelled successfully",
        order: OrderResponse::from(&view),
    }))
}
