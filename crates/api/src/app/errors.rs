use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use stockroom_auth::AuthError;
use stockroom_core::DomainError;
use stockroom_store::AccountError;

/// Every failure a handler can return.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::Domain(DomainError::invalid_argument(msg))
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::Internal(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Domain(e) => match e {
                DomainError::InvalidArgument(_) | DomainError::InvalidId(_) => StatusCode::BAD_REQUEST,
                DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                DomainError::NotFound(_) => StatusCode::NOT_FOUND,
                DomainError::Conflict(_) => StatusCode::CONFLICT,
                DomainError::InsufficientInventory { .. } => StatusCode::BAD_REQUEST,
            },
            ApiError::Auth(e) if e.is_client_error() => StatusCode::UNAUTHORIZED,
            ApiError::Auth(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Domain(e) => e.code(),
            ApiError::Auth(e) => match e {
                AuthError::MissingToken => "missing_token",
                AuthError::InvalidToken(_) => "invalid_token",
                AuthError::Expired => "token_expired",
                AuthError::Revoked => "token_revoked",
                AuthError::InvalidCredentials => "unauthorized",
                AuthError::Hashing(_) | AuthError::Encoding(_) => "internal_error",
            },
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(value: AccountError) -> Self {
        match value {
            AccountError::Domain(e) => ApiError::Domain(e),
            AccountError::Auth(e) => ApiError::Auth(e),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        ApiError::bad_request(value.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            // Details stay in the logs.
            tracing::error!(error = %self, "request failed");
            return json_error(status, self.code(), "server error");
        }
        json_error(status, self.code(), self.to_string())
    }
}

/// `{"error": <message>, "code": <code>}` with the given status.
pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": message.into(),
            "code": code,
        })),
    )
        .into_response()
}
