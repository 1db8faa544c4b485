pub mod entities;
pub mod errors;
pub mod events;
pub mod reconcile;
pub mod value_objects;

pub use entities::{AggregateOrderResponse, CardOnFileResult, ChainState, OrderResult};
pub use errors::{DomainError, DomainResult};
pub use events::*;
pub use reconcile::{
    classify_order_response, reconcile_lookup, LookupShape, OrderLookupResult, OrderOutcome,
};
pub use value_objects::{
    detect_card_type, format_card_number, format_expiration, normalize_state,
    validate_card_details, CardType, CardValidation,
};
