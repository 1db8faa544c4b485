use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::validate_card_details;
use crate::ports::billing_port::OfferLine;
use serde::{Deserialize, Serialize};

/// Checkout form submission: a cart plus one customer/card/address
/// record. Field names match the frontend's JSON.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub products: Vec<CartProduct>,

    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,

    pub billing_address: String,
    pub billing_city: String,
    pub billing_state: String,
    pub billing_zip: String,
    #[serde(default)]
    pub billing_country: Option<String>,

    pub card_number: String,
    pub card_exp_month: String,
    pub card_exp_year: String,
    pub card_cvv: String,

    #[serde(default)]
    pub total_amount: f64,
}

impl CheckoutRequest {
    /// Every problem found before any network call; empty means valid.
    pub fn validation_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.products.is_empty() {
            errors.push("Invalid request: products array is required".to_string());
        }
        for product in &self.products {
            if parse_positive(&product.id, "product id").is_err() {
                errors.push(format!("Invalid product id: {}", product.id));
            }
        }

        errors.extend(
            validate_card_details(
                &self.card_number,
                &self.card_exp_month,
                &self.card_exp_year,
                &self.card_cvv,
            )
            .errors,
        );

        errors
    }
}

/// One product in the cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartProduct {
    pub id: String,
    pub price: f64,
    #[serde(default)]
    pub name: Option<String>,
}

/// Order lookup request body.
#[derive(Debug, Deserialize)]
pub struct OrderLookupRequest {
    pub order_id: Option<String>,
}

/// Raw card-on-file request body, as posted by the frontend.
#[derive(Debug, Deserialize)]
pub struct CardOnFileRequest {
    pub order_id: Option<String>,
    pub customer_id: Option<String>,
    #[serde(default)]
    pub products: Vec<ProductSelection>,
    #[serde(default)]
    pub new_upsell: bool,
    #[serde(default)]
    pub order_force_bill: bool,
}

impl CardOnFileRequest {
    /// Enforce the card-on-file preconditions: parent order id, a
    /// non-empty cart, and a genuine customer id. Synthesized
    /// `ORDER-<id>` placeholders from lookup are refused because the
    /// gateway cannot bill a card it never captured.
    pub fn validate(self) -> Result<CardOnFileSubmission, String> {
        let order_id = self
            .order_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| "order_id and products are required".to_string())?;
        if self.products.is_empty() {
            return Err("order_id and products are required".to_string());
        }

        let customer_id = self
            .customer_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| "customer_id is required".to_string())?;
        if customer_id.starts_with("ORDER-") {
            return Err("a real customer_id is required for card on file".to_string());
        }

        Ok(CardOnFileSubmission {
            order_id,
            customer_id,
            products: self.products,
            new_upsell: self.new_upsell,
            order_force_bill: self.order_force_bill,
        })
    }
}

/// Validated card-on-file submission.
#[derive(Debug, Clone)]
pub struct CardOnFileSubmission {
    pub order_id: String,
    pub customer_id: String,
    pub products: Vec<ProductSelection>,
    pub new_upsell: bool,
    pub order_force_bill: bool,
}

/// One additional product to add to an existing subscription. The
/// frontend sends identifiers as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductSelection {
    pub offer_id: String,
    #[serde(default)]
    pub product_id: Option<String>,
    pub billing_model_id: String,
    #[serde(default)]
    pub quantity: Option<String>,
}

impl ProductSelection {
    /// Parse into a wire offer line. Product id falls back to the offer
    /// id and quantity defaults to 1, matching the upstream contract.
    pub fn to_offer_line(&self) -> DomainResult<OfferLine> {
        let offer_id = parse_positive(&self.offer_id, "offer_id")?;
        let product_id = match &self.product_id {
            Some(id) => parse_positive(id, "product_id")?,
            None => offer_id,
        };
        let billing_model_id = parse_positive(&self.billing_model_id, "billing_model_id")?;
        let quantity = match &self.quantity {
            Some(quantity) => parse_positive(quantity, "quantity")?,
            None => 1,
        };
        Ok(OfferLine {
            offer_id,
            product_id,
            billing_model_id,
            quantity,
        })
    }
}

fn parse_positive(raw: &str, field: &str) -> DomainResult<u32> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|value| *value > 0)
        .ok_or_else(|| {
            DomainError::ValidationError(format!("{field} must be a positive integer, got {raw:?}"))
        })
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: String, message: String) -> Self {
        Self { error, message }
    }
}
