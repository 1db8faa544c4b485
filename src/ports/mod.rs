pub mod billing_port;

pub use billing_port::{BillingPort, NewOrderRequest, OfferLine};
