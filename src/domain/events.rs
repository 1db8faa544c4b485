use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Domain event trait.
pub trait DomainEvent {
    fn event_type(&self) -> &'static str;
    fn occurred_at(&self) -> DateTime<Utc>;
}

/// Consolidated purchase analytics event.
///
/// Emitted once per cart when the overall submission succeeds, never
/// per line item; simulated checkouts emit it too.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseCompleted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub transaction_id: String,
    pub value: f64,
    pub currency: String,
    pub product_ids: Vec<String>,
    pub simulated: bool,
}

impl DomainEvent for PurchaseCompleted {
    fn event_type(&self) -> &'static str {
        "PurchaseCompleted"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

impl PurchaseCompleted {
    pub fn new(
        transaction_id: String,
        value: f64,
        product_ids: Vec<String>,
        simulated: bool,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            transaction_id,
            value,
            currency: "USD".to_string(),
            product_ids,
            simulated,
        }
    }
}
