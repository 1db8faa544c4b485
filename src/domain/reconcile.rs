//! Gateway response reconciliation.
//!
//! The gateway's responses are loosely typed and change shape between
//! API versions (flat vs nested customer fields, camelCase vs
//! snake_case keys). Every value is therefore resolved through an
//! ordered list of candidate paths, tried in sequence until one yields
//! a non-empty value. The path lists are public constants so the rules
//! stay visible and testable instead of being inlined per call site.

use serde::Serialize;
use serde_json::Value;

/// Candidate paths for the order identifier.
pub const ORDER_ID_PATHS: &[&str] = &["order_id", "orderId"];

/// Candidate paths for the customer identifier, flat first, then the
/// nested customer object used by newer gateway versions.
pub const CUSTOMER_ID_PATHS: &[&str] = &[
    "customerId",
    "customer_id",
    "customer.id",
    "customer.customer_id",
];

/// Candidate paths for the customer email.
pub const EMAIL_PATHS: &[&str] = &["customer.email", "email"];

/// Candidate paths for the order total.
pub const ORDER_TOTAL_PATHS: &[&str] = &["orderTotalAmount", "order_total", "orderTotal"];

/// Candidate paths for a vendor-supplied error message.
pub const ERROR_MESSAGE_PATHS: &[&str] = &["error_message", "decline_reason"];

fn lookup_path<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = data;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    Some(current)
}

/// First non-empty string among the candidate paths. Bare numbers are
/// rendered as text because the gateway emits ids both ways.
pub fn first_string(data: &Value, paths: &[&str]) -> Option<String> {
    for path in paths {
        match lookup_path(data, path) {
            Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.clone()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

/// First parseable number among the candidate paths.
pub fn first_number(data: &Value, paths: &[&str]) -> Option<f64> {
    for path in paths {
        match lookup_path(data, path) {
            Some(Value::Number(n)) => return n.as_f64(),
            Some(Value::String(s)) => {
                if let Ok(parsed) = s.trim().parse::<f64>() {
                    return Some(parsed);
                }
            }
            _ => {}
        }
    }
    None
}

/// The gateway flags errors as either string `"1"` or numeric `1`.
fn error_flagged(data: &Value) -> bool {
    truthy_flag(data.get("error_found"))
}

fn truthy_flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::String(s)) => s == "1",
        Some(Value::Number(n)) => n.as_i64() == Some(1),
        Some(Value::Bool(b)) => *b,
        _ => false,
    }
}

/// Response code 'D' indicates a declined transaction.
fn declined(data: &Value) -> bool {
    matches!(data.get("response_code"), Some(Value::String(s)) if s == "D")
}

/// Normalized outcome of one order-creation call.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderOutcome {
    pub order_id: Option<String>,
    pub customer_id: Option<String>,
    pub error: Option<String>,
}

impl OrderOutcome {
    pub fn success(&self) -> bool {
        self.order_id.is_some() && self.error.is_none()
    }

    /// Outcome for a line item that never produced a gateway response.
    pub fn transport_failure(message: String) -> Self {
        Self {
            order_id: None,
            customer_id: None,
            error: Some(message),
        }
    }
}

/// Classify an order-creation response.
///
/// Success requires all four: an order identifier, no `error_found`
/// flag, no `error_message`, and a response code that is not 'D'.
pub fn classify_order_response(data: &Value) -> OrderOutcome {
    let order_id = first_string(data, ORDER_ID_PATHS);
    let has_error = error_flagged(data)
        || first_string(data, &["error_message"]).is_some()
        || declined(data);

    if let (Some(order_id), false) = (order_id, has_error) {
        OrderOutcome {
            customer_id: first_string(data, CUSTOMER_ID_PATHS),
            order_id: Some(order_id),
            error: None,
        }
    } else {
        OrderOutcome {
            order_id: None,
            customer_id: None,
            error: Some(failure_message(data)),
        }
    }
}

/// Best-effort human-readable failure message, drawn from whichever
/// vendor error field is present.
pub fn failure_message(data: &Value) -> String {
    first_string(data, &["error_message", "decline_reason", "gateway_response"]).unwrap_or_else(
        || {
            if declined(data) {
                "Transaction declined".to_string()
            } else {
                "Transaction failed".to_string()
            }
        },
    )
}

/// Which lookup endpoint shape a response came from. The two endpoints
/// signal existence differently, so reconciliation needs to know.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupShape {
    /// `order_find` style: any order identifier means the order exists.
    Find,
    /// `order_view` style: requires response code 100 plus an order
    /// identifier.
    View,
}

/// Existence check for a lookup response under the given shape.
pub fn order_exists(data: &Value, shape: LookupShape) -> bool {
    let has_id = first_string(data, ORDER_ID_PATHS).is_some();
    match shape {
        LookupShape::Find => has_id,
        LookupShape::View => has_id && view_code_ok(data),
    }
}

fn view_code_ok(data: &Value) -> bool {
    match data.get("response_code") {
        Some(Value::Number(n)) => n.as_i64() == Some(100),
        Some(Value::String(s)) => s == "100",
        _ => false,
    }
}

/// Normalized order lookup result returned to callers.
#[derive(Debug, Clone, Serialize)]
pub struct OrderLookupResult {
    /// True iff the order exists, even when the payment itself failed.
    pub success: bool,
    pub order_id: String,
    /// Real customer id, or a synthesized `ORDER-<id>` placeholder.
    pub customer_id: String,
    pub customer_name: String,
    pub email: String,
    pub current_products: Vec<String>,
    pub total_monthly: f64,
    pub payment_status: String,
    pub error_message: Option<String>,
    /// Distinguishes a genuine customer id from the placeholder above.
    /// Card-on-file submission must refuse to run on a placeholder.
    pub has_customer_id: bool,
    pub data: Value,
}

/// Reconcile a raw lookup response into an [`OrderLookupResult`].
pub fn reconcile_lookup(requested_order_id: &str, data: Value, shape: LookupShape) -> OrderLookupResult {
    if !order_exists(&data, shape) {
        return OrderLookupResult {
            success: false,
            order_id: requested_order_id.to_string(),
            customer_id: format!("ORDER-{requested_order_id}"),
            customer_name: "Unknown".to_string(),
            email: "Unknown".to_string(),
            current_products: Vec::new(),
            total_monthly: 0.0,
            payment_status: "NOT_FOUND".to_string(),
            error_message: Some("Order not found".to_string()),
            has_customer_id: false,
            data,
        };
    }

    let customer_id = first_string(&data, CUSTOMER_ID_PATHS);
    let order_id =
        first_string(&data, ORDER_ID_PATHS).unwrap_or_else(|| requested_order_id.to_string());

    OrderLookupResult {
        success: true,
        has_customer_id: customer_id.is_some(),
        customer_id: customer_id.unwrap_or_else(|| format!("ORDER-{requested_order_id}")),
        customer_name: customer_display_name(&data),
        email: first_string(&data, EMAIL_PATHS).unwrap_or_else(|| "Unknown".to_string()),
        current_products: product_summaries(&data),
        total_monthly: first_number(&data, ORDER_TOTAL_PATHS).unwrap_or(0.0),
        payment_status: payment_status(&data),
        error_message: first_string(&data, ERROR_MESSAGE_PATHS),
        order_id,
        data,
    }
}

fn customer_display_name(data: &Value) -> String {
    // Nested customer object first, then the flat fields older gateway
    // versions return.
    for (first, last) in [
        ("customer.first_name", "customer.last_name"),
        ("firstName", "lastName"),
    ] {
        if let (Some(f), Some(l)) = (first_string(data, &[first]), first_string(data, &[last])) {
            return format!("{f} {l}");
        }
    }
    "Unknown".to_string()
}

fn payment_status(data: &Value) -> String {
    first_string(data, &["status"]).unwrap_or_else(|| {
        if error_flagged(data) { "ERROR" } else { "SUCCESS" }.to_string()
    })
}

fn product_summaries(data: &Value) -> Vec<String> {
    let Some(products) = data.get("products").and_then(Value::as_array) else {
        return Vec::new();
    };
    products
        .iter()
        .map(|product| {
            let name = first_string(product, &["product_name", "productName"])
                .unwrap_or_else(|| "Product".to_string());
            let price = first_string(product, &["product_price", "price"])
                .unwrap_or_else(|| "0".to_string());
            let recurring = truthy_flag(product.get("is_recurring"))
                || truthy_flag(product.get("isRecurring"));
            let suffix = if recurring { "/month" } else { "" };
            format!("{name} - ${price}{suffix}")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn clean_response() -> Value {
        json!({
            "order_id": "100",
            "customer_id": "55",
            "response_code": "100"
        })
    }

    #[test]
    fn test_classify_success() {
        let outcome = classify_order_response(&clean_response());
        assert!(outcome.success());
        assert_eq!(outcome.order_id.as_deref(), Some("100"));
        assert_eq!(outcome.customer_id.as_deref(), Some("55"));
    }

    #[test]
    fn test_classify_fails_without_order_id() {
        let mut data = clean_response();
        data.as_object_mut().unwrap().remove("order_id");
        let outcome = classify_order_response(&data);
        assert!(!outcome.success());
        assert_eq!(outcome.error.as_deref(), Some("Transaction failed"));
    }

    #[test]
    fn test_classify_fails_on_error_found_string() {
        let mut data = clean_response();
        data["error_found"] = json!("1");
        assert!(!classify_order_response(&data).success());
    }

    #[test]
    fn test_classify_fails_on_error_found_numeric() {
        let mut data = clean_response();
        data["error_found"] = json!(1);
        assert!(!classify_order_response(&data).success());
    }

    #[test]
    fn test_classify_ignores_zero_error_flag() {
        let mut data = clean_response();
        data["error_found"] = json!("0");
        assert!(classify_order_response(&data).success());
    }

    #[test]
    fn test_classify_fails_on_error_message() {
        let mut data = clean_response();
        data["error_message"] = json!("Card expired");
        let outcome = classify_order_response(&data);
        assert!(!outcome.success());
        assert_eq!(outcome.error.as_deref(), Some("Card expired"));
    }

    #[test]
    fn test_classify_fails_on_decline_code() {
        let mut data = clean_response();
        data["response_code"] = json!("D");
        let outcome = classify_order_response(&data);
        assert!(!outcome.success());
        assert_eq!(outcome.error.as_deref(), Some("Transaction declined"));
    }

    #[test]
    fn test_failure_message_priority() {
        let data = json!({
            "decline_reason": "Insufficient funds",
            "gateway_response": "DO NOT HONOR"
        });
        assert_eq!(failure_message(&data), "Insufficient funds");
        let data = json!({ "gateway_response": "DO NOT HONOR" });
        assert_eq!(failure_message(&data), "DO NOT HONOR");
    }

    #[test]
    fn test_first_string_numeric_ids() {
        let data = json!({ "order_id": 100 });
        assert_eq!(first_string(&data, ORDER_ID_PATHS).as_deref(), Some("100"));
    }

    #[test]
    fn test_customer_id_path_order() {
        let data = json!({
            "customer_id": "flat",
            "customer": { "id": "nested" }
        });
        assert_eq!(
            first_string(&data, CUSTOMER_ID_PATHS).as_deref(),
            Some("flat")
        );
        let data = json!({ "customer": { "customer_id": "deep" } });
        assert_eq!(
            first_string(&data, CUSTOMER_ID_PATHS).as_deref(),
            Some("deep")
        );
    }

    #[test]
    fn test_order_exists_shapes() {
        let data = json!({ "order_id": "7" });
        assert!(order_exists(&data, LookupShape::Find));
        // View shape additionally requires response code 100.
        assert!(!order_exists(&data, LookupShape::View));

        let data = json!({ "order_id": "7", "response_code": 100 });
        assert!(order_exists(&data, LookupShape::View));
        let data = json!({ "order_id": "7", "response_code": "100" });
        assert!(order_exists(&data, LookupShape::View));
    }

    #[test]
    fn test_reconcile_not_found() {
        let result = reconcile_lookup("42", json!({ "error_found": "1" }), LookupShape::Find);
        assert!(!result.success);
        assert_eq!(result.order_id, "42");
        assert!(result.current_products.is_empty());
        assert_eq!(result.total_monthly, 0.0);
        assert!(!result.has_customer_id);
        assert_eq!(result.error_message.as_deref(), Some("Order not found"));
    }

    #[test]
    fn test_reconcile_nested_customer() {
        let data = json!({
            "order_id": "42",
            "customer": {
                "id": "900",
                "first_name": "Jane",
                "last_name": "Doe",
                "email": "jane@example.com"
            },
            "orderTotalAmount": "49.98",
            "products": [
                { "product_name": "Boost", "product_price": "29.99", "is_recurring": "1" },
                { "productName": "Setup", "price": 19.99 }
            ]
        });
        let result = reconcile_lookup("42", data, LookupShape::Find);
        assert!(result.success);
        assert!(result.has_customer_id);
        assert_eq!(result.customer_id, "900");
        assert_eq!(result.customer_name, "Jane Doe");
        assert_eq!(result.email, "jane@example.com");
        assert_eq!(
            result.current_products,
            vec!["Boost - $29.99/month", "Setup - $19.99"]
        );
        assert_eq!(result.total_monthly, 49.98);
        assert_eq!(result.payment_status, "SUCCESS");
    }

    #[test]
    fn test_reconcile_flat_shape_with_placeholder_customer() {
        let data = json!({
            "orderId": "42",
            "firstName": "John",
            "lastName": "Smith",
            "email": "john@example.com",
            "error_found": "1",
            "decline_reason": "Card declined"
        });
        let result = reconcile_lookup("42", data, LookupShape::Find);
        // The order exists even though the payment errored.
        assert!(result.success);
        assert!(!result.has_customer_id);
        assert_eq!(result.customer_id, "ORDER-42");
        assert_eq!(result.customer_name, "John Smith");
        assert_eq!(result.payment_status, "ERROR");
        assert_eq!(result.error_message.as_deref(), Some("Card declined"));
    }

    #[test]
    fn test_reconcile_unparseable_total_defaults_to_zero() {
        let data = json!({ "order_id": "42", "order_total": "not-a-number" });
        let result = reconcile_lookup("42", data, LookupShape::Find);
        assert_eq!(result.total_monthly, 0.0);
    }
}
