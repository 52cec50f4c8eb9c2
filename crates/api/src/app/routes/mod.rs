use axum::{
    routing::{get, post},
    Router,
};

pub mod auth;
pub mod inventory;
pub mod items;
pub mod orders;
pub mod system;

/// Endpoints reachable without a token.
pub fn public_router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
}

/// Router for all authenticated (owner-scoped) endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .nest("/items", items::router())
        .nest("/inventory", inventory::router())
        .nest("/orders", orders::router())
}
