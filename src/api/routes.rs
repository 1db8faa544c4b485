use super::handlers::*;
use crate::ports::BillingPort;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router<T: BillingPort + 'static>(state: AppState<T>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/checkout", post(submit_checkout))
        .route("/api/order/lookup", post(lookup_order))
        .route("/api/order/card-on-file", post(submit_card_on_file))
        .route("/api/products", get(get_products))
        .layer(TraceLayer::new_for_http())
        // The proxy exists so the browser never talks to the gateway
        // cross-origin; the proxy itself accepts any origin.
        .layer(CorsLayer::permissive())
        .with_state(state)
}
