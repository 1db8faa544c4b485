use crate::domain::reconcile::OrderOutcome;
use serde::Serialize;
use serde_json::Value;

/// Result of one line-item order attempt within a cart.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResult {
    pub product_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    pub price: f64,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Raw gateway payload, kept on success for downstream inspection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
}

impl OrderResult {
    pub fn succeeded(product_id: String, price: f64, order_id: String, response: Value) -> Self {
        Self {
            product_id,
            order_id: Some(order_id),
            price,
            success: true,
            error: None,
            response: Some(response),
        }
    }

    pub fn failed(product_id: String, price: f64, error: String) -> Self {
        Self {
            product_id,
            order_id: None,
            price,
            success: false,
            error: Some(error),
            response: None,
        }
    }
}

/// Aggregate response for a whole cart submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateOrderResponse {
    /// True iff at least one line item succeeded.
    pub success: bool,
    /// The anchor order id, parent of every chained order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub orders: Vec<OrderResult>,
    pub total_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set when credentials were absent and the response was synthesized
    /// without calling the gateway.
    pub is_simulated: bool,
}

/// Result of a card-on-file submission.
#[derive(Debug, Clone, Serialize)]
pub struct CardOnFileResult {
    pub success: bool,
    pub order_id: String,
    pub message: String,
    pub data: Value,
}

/// Accumulator for sequentially chained orders.
///
/// The first successful order becomes the anchor; its customer id and
/// order id are attached to every later request in the cart so the
/// gateway treats them as upsells on the same customer. Once the anchor
/// fails there is nothing to chain onto and no further requests are
/// issued.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChainState {
    pub main_order_id: Option<String>,
    pub customer_id: Option<String>,
    pub anchor_failed: bool,
}

impl ChainState {
    /// Fold one order outcome into the chain state.
    pub fn advance(mut self, outcome: &OrderOutcome) -> Self {
        if self.main_order_id.is_none() && !self.anchor_failed {
            if outcome.success() {
                self.main_order_id = outcome.order_id.clone();
                self.customer_id = outcome.customer_id.clone();
            } else {
                self.anchor_failed = true;
            }
        }
        self
    }

    /// Customer and parent order ids for a chained request, when both
    /// were captured from the anchor.
    pub fn chain_target(&self) -> Option<(&str, &str)> {
        match (&self.customer_id, &self.main_order_id) {
            (Some(customer), Some(order)) => Some((customer, order)),
            _ => None,
        }
    }
}
