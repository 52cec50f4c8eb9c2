//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store and service construction
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request/response bodies
//! - `errors.rs`: the error type every handler returns, and its JSON shape

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use crate::config::ApiConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &ApiConfig) -> anyhow::Result<Router> {
    let services = Arc::new(services::build_services(config)?);
    Ok(router(services))
}

/// Router over an already wired service graph.
pub fn router(services: Arc<services::AppServices>) -> Router {
    let auth_state = middleware::AuthState {
        auth: services.auth.clone(),
    };

    // Protected routes: require a valid, unrevoked bearer token.
    let protected = routes::router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Router::new()
        .merge(routes::public_router())
        .merge(protected)
        .fallback(routes::system::not_found)
        .layer(ServiceBuilder::new().layer(Extension(services)))
}
