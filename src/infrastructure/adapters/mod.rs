pub mod billing_gateway_adapter;

pub use billing_gateway_adapter::BillingGatewayAdapter;
