use axum::{http::StatusCode, response::Response, Json};

use crate::app::dto::HealthResponse;
use crate::app::errors;

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        message: "Server is running",
    })
}

pub async fn not_found() -> Response {
    errors::json_error(StatusCode::NOT_FOUND, "not_found", "route not found")
}
