use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use stockroom_store::AccountResult;

use crate::app::dto::{CredentialsRequest, LoginResponse, MessageResponse, RegisterResponse, UserResponse};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::UserContext;

/// Run a bcrypt-bound account operation off the async workers.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> AccountResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::internal(format!("account task failed: {e}")))?
        .map_err(ApiError::from)
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(body) = body?;
    let (username, password) = body.into_parts();

    let svc = services.clone();
    let account = blocking(move || svc.accounts.login(&username, &password)).await?;
    let issued = services.auth.issue_token(&account, Utc::now())?;

    tracing::info!(username = account.username(), "login succeeded");
    Ok(Json(LoginResponse {
        message: "Login successful",
        token: issued.token,
        expires_at: issued.expires_at,
        user: UserResponse::from(&account),
    }))
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let Json(body) = body?;
    let (username, password) = body.into_parts();

    let account = blocking(move || services.accounts.register(&username, &password)).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created successfully",
            user: UserResponse::from(&account),
        }),
    ))
}

pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
) -> Json<MessageResponse> {
    services.auth.revoke(user.session_id());
    tracing::info!(username = user.username(), "logout");
    Json(MessageResponse {
        message: "Logout successful",
    })
}

pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
) -> Result<Json<UserResponse>, ApiError> {
    let account = services.accounts.me(user.user_id())?;
    Ok(Json(UserResponse::from(&account)))
}
