use crate::domain::errors::DomainResult;
use crate::domain::value_objects::CardType;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One product line inside a NewOrder request. All identifiers are
/// positive integers by the time they reach the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferLine {
    pub offer_id: u32,
    pub product_id: u32,
    pub billing_model_id: u32,
    pub quantity: u32,
}

/// Outbound NewOrder payload.
///
/// Field names follow the gateway wire format exactly, which mixes
/// camelCase and snake_case. Customer and card fields are optional
/// because card-on-file requests bill an existing customer and carry
/// neither.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderRequest {
    pub method: String,
    pub campaign_id: String,
    pub shipping_id: String,
    pub offers: Vec<OfferLine>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_zip: Option<String>,
    #[serde(rename = "billing_country", skip_serializing_if = "Option::is_none")]
    pub billing_country: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_country: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_card_number: Option<String>,
    /// 4-digit MMYY
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    #[serde(rename = "CVV", skip_serializing_if = "Option::is_none")]
    pub cvv: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_card_type: Option<CardType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,

    pub payment_type: String,
    pub tran_type: String,
    pub test_mode: String,

    // Chain markers, present only on upsell / card-on-file requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_upsell: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_order_id: Option<String>,
    #[serde(rename = "new_upsell", skip_serializing_if = "Option::is_none")]
    pub new_upsell: Option<String>,
    #[serde(rename = "order_force_bill", skip_serializing_if = "Option::is_none")]
    pub order_force_bill: Option<String>,
}

impl NewOrderRequest {
    /// Bare NewOrder skeleton; customer, card and chain fields start
    /// empty.
    pub fn new(
        campaign_id: String,
        shipping_id: String,
        offers: Vec<OfferLine>,
        test_mode: String,
    ) -> Self {
        Self {
            method: "NewOrder".to_string(),
            campaign_id,
            shipping_id,
            offers,
            email: None,
            first_name: None,
            last_name: None,
            phone: None,
            billing_first_name: None,
            billing_last_name: None,
            billing_address1: None,
            billing_city: None,
            billing_state: None,
            billing_zip: None,
            billing_country: None,
            shipping_first_name: None,
            shipping_last_name: None,
            shipping_address1: None,
            shipping_city: None,
            shipping_state: None,
            shipping_zip: None,
            shipping_country: None,
            credit_card_number: None,
            expiration_date: None,
            cvv: None,
            credit_card_type: None,
            ip_address: None,
            payment_type: "CREDITCARD".to_string(),
            tran_type: "Sale".to_string(),
            test_mode,
            customer_id: None,
            force_customer_id: None,
            is_upsell: None,
            parent_order_id: None,
            new_upsell: None,
            order_force_bill: None,
        }
    }

    /// Mark the request as an upsell against an existing customer and
    /// parent order.
    pub fn apply_chain(&mut self, customer_id: &str, parent_order_id: &str) {
        self.customer_id = Some(customer_id.to_string());
        self.force_customer_id = Some("1".to_string());
        self.is_upsell = Some("1".to_string());
        self.parent_order_id = Some(parent_order_id.to_string());
    }
}

/// Billing gateway port.
///
/// Responses stay loosely typed (`serde_json::Value`) because the
/// gateway's shapes vary between API versions; reconciliation happens
/// in the domain layer.
#[async_trait]
pub trait BillingPort: Send + Sync {
    /// Create one order (standalone, upsell, or card-on-file).
    async fn create_order(&self, request: &NewOrderRequest) -> DomainResult<Value>;

    /// Look up an order via the `order_find` endpoint.
    async fn find_order(&self, order_id: &str) -> DomainResult<Value>;

    /// Look up an order via the stricter `order_view` endpoint.
    async fn view_order(&self, order_id: &str) -> DomainResult<Value>;

    /// Fetch the gateway's product index.
    async fn list_products(&self) -> DomainResult<Value>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_field_names() {
        let mut request = NewOrderRequest::new(
            "1".to_string(),
            "2".to_string(),
            vec![OfferLine {
                offer_id: 1,
                product_id: 4,
                billing_model_id: 2,
                quantity: 1,
            }],
            "1".to_string(),
        );
        request.billing_country = Some("US".to_string());
        request.cvv = Some("123".to_string());
        request.credit_card_type = Some(CardType::Master);
        request.apply_chain("55", "100");
        request.new_upsell = Some("1".to_string());

        let value = serde_json::to_value(&request).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj["method"], "NewOrder");
        assert_eq!(obj["campaignId"], "1");
        assert_eq!(obj["shippingId"], "2");
        assert_eq!(obj["billing_country"], "US");
        assert_eq!(obj["CVV"], "123");
        assert_eq!(obj["creditCardType"], "master");
        assert_eq!(obj["customerId"], "55");
        assert_eq!(obj["forceCustomerId"], "1");
        assert_eq!(obj["isUpsell"], "1");
        assert_eq!(obj["parentOrderId"], "100");
        assert_eq!(obj["new_upsell"], "1");
        assert_eq!(obj["testMode"], "1");
        assert_eq!(obj["offers"][0]["offer_id"], 1);
        assert_eq!(obj["offers"][0]["billing_model_id"], 2);
        // Absent optionals must be omitted, not serialized as null.
        assert!(!obj.contains_key("creditCardNumber"));
        assert!(!obj.contains_key("order_force_bill"));
    }
}
