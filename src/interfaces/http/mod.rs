//! HTTP API consumed by the dashboard.

pub mod error;
pub mod handlers;

use crate::application::system::ServiceContext;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use error::ApiError;

pub fn router(context: ServiceContext) -> Router {
    Router::new()
        .route("/data", get(handlers::get_data))
        .route("/analyze", post(handlers::analyze))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(context)
}
