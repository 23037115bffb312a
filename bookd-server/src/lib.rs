//! HTTP server for bookd - exposes the appointment scheduling API.

pub mod routes;
pub mod singleton;
pub mod state;
pub mod validate;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

/// Build the application router with CORS applied.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::appointments::router())
        .with_state(state)
        .layer(cors)
}
