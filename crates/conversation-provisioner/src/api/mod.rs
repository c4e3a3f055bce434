//! HTTP API for the provisioning service.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::logging_middleware;
pub use types::*;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use twilio_proxy_client::ProxyClient;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Twilio Proxy client
    pub proxy_client: Arc<ProxyClient>,
}

impl AppState {
    /// Create new application state.
    pub fn new(proxy_client: ProxyClient) -> Self {
        Self {
            proxy_client: Arc::new(proxy_client),
        }
    }
}

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Conversation provisioning and teardown
        .route(
            "/sms/conversations",
            post(handlers::create_conversation).delete(handlers::delete_conversations),
        )
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
