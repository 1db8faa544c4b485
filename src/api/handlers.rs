use crate::application::{
    CardOnFileRequest, CheckoutRequest, CheckoutService, ErrorResponse, OrderLookupRequest,
};
use crate::domain::errors::DomainError;
use crate::domain::reconcile::LookupShape;
use crate::ports::BillingPort;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;
use tracing::{error, info};

/// Shared application state.
pub struct AppState<T: BillingPort> {
    pub checkout_service: Arc<CheckoutService<T>>,
}

impl<T: BillingPort> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self {
            checkout_service: self.checkout_service.clone(),
        }
    }
}

/// Health check
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "message": "Billing gateway proxy is running"
        })),
    )
}

/// Submit a checkout cart
pub async fn submit_checkout<T: BillingPort + 'static>(
    State(state): State<AppState<T>>,
    Json(request): Json<CheckoutRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    info!(
        "Received checkout request for {} product(s)",
        request.products.len()
    );

    state
        .checkout_service
        .submit_order(request)
        .await
        .map(|response| (StatusCode::OK, Json(response)).into_response())
        .map_err(|e| {
            error!("Checkout error: {}", e);
            let status = match e {
                DomainError::ValidationError(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (
                status,
                Json(ErrorResponse::new("CHECKOUT_ERROR".to_string(), e.to_string())),
            )
        })
}

/// Look up an existing order
pub async fn lookup_order<T: BillingPort + 'static>(
    State(state): State<AppState<T>>,
    Json(request): Json<OrderLookupRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let Some(order_id) = request
        .order_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
    else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                "INVALID_REQUEST".to_string(),
                "order_id is required".to_string(),
            )),
        ));
    };

    info!("Received order lookup request: {}", order_id);

    state
        .checkout_service
        .lookup_order(order_id, LookupShape::Find)
        .await
        .map(|result| (StatusCode::OK, Json(result)).into_response())
        .map_err(|e| {
            error!("Order lookup error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("LOOKUP_ERROR".to_string(), e.to_string())),
            )
        })
}

/// Add products to an existing subscription via card on file
pub async fn submit_card_on_file<T: BillingPort + 'static>(
    State(state): State<AppState<T>>,
    Json(request): Json<CardOnFileRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let submission = request.validate().map_err(|message| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("INVALID_REQUEST".to_string(), message)),
        )
    })?;

    info!(
        "Received card on file request for order {}",
        submission.order_id
    );

    state
        .checkout_service
        .submit_card_on_file(submission)
        .await
        .map(|result| (StatusCode::OK, Json(result)).into_response())
        .map_err(|e| {
            error!("Card on file error: {}", e);
            let status = match e {
                DomainError::ValidationError(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (
                status,
                Json(ErrorResponse::new(
                    "CARD_ON_FILE_ERROR".to_string(),
                    e.to_string(),
                )),
            )
        })
}

/// List gateway products
pub async fn get_products<T: BillingPort + 'static>(
    State(state): State<AppState<T>>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    state
        .checkout_service
        .list_products()
        .await
        .map(|products| (StatusCode::OK, Json(products)).into_response())
        .map_err(|e| {
            error!("Product listing error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("PRODUCT_ERROR".to_string(), e.to_string())),
            )
        })
}
