pub mod checkout_service;
pub mod dto;

pub use checkout_service::CheckoutService;
pub use dto::{
    CardOnFileRequest, CardOnFileSubmission, CartProduct, CheckoutRequest, ErrorResponse,
    OrderLookupRequest, ProductSelection,
};
