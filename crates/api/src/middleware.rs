use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use stockroom_auth::{AuthError, AuthProvider};

use crate::app::errors::ApiError;
use crate::context::UserContext;

#[derive(Clone)]
pub struct AuthState {
    pub auth: Arc<dyn AuthProvider>,
}

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(req.headers())?;

    let user = state.auth.authenticate(token, Utc::now()).map_err(|e| {
        tracing::debug!(error = %e, "rejected bearer token");
        e
    })?;

    req.extensions_mut().insert(UserContext::from(user));

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?;

    let header = header
        .to_str()
        .map_err(|_| AuthError::InvalidToken("authorization header is not valid text".to_string()))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MissingToken)?
        .trim();
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }

    Ok(token)
}
