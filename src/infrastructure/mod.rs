pub mod adapters;
pub mod config;

pub use adapters::BillingGatewayAdapter;
pub use config::{CatalogConfig, GatewayConfig};
