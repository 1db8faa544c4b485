use checkout_rs::api::{self, AppState};
use checkout_rs::application::CheckoutService;
use checkout_rs::infrastructure::{BillingGatewayAdapter, CatalogConfig, GatewayConfig};
use std::sync::Arc;
use tracing::{info, warn, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    dotenvy::dotenv().ok();

    info!("Starting billing gateway proxy...");

    let gateway_config = GatewayConfig::from_env();
    if gateway_config.is_configured() {
        info!("Gateway configured at {}", gateway_config.base_url);
    } else {
        warn!("Gateway credentials not configured; checkout will run in simulated mode");
    }
    let catalog = CatalogConfig::from_env();

    let adapter = Arc::new(BillingGatewayAdapter::new(gateway_config.clone())?);
    let checkout_service = Arc::new(CheckoutService::new(adapter, gateway_config, catalog));

    let app_state = AppState { checkout_service };
    let app = api::create_router(app_state);

    let host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("SERVER_PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("{}:{}", host, port);

    info!("Server listening on {}", addr);
    info!("Available endpoints:");
    info!("  GET  /api/health - Health check");
    info!("  POST /api/checkout - Submit a checkout cart");
    info!("  POST /api/order/lookup - Look up an existing order");
    info!("  POST /api/order/card-on-file - Add products to an existing subscription");
    info!("  GET  /api/products - List gateway products");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
