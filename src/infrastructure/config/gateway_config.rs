use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Billing gateway connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Gateway API base URL
    pub base_url: String,

    /// Basic auth username; absent in development
    pub username: Option<String>,

    /// Basic auth password; absent in development
    pub password: Option<String>,

    /// Per-request timeout, seconds
    pub timeout_secs: u64,

    /// Sent as the gateway's testMode flag
    pub test_mode: bool,
}

impl GatewayConfig {
    pub fn from_env() -> Arc<Self> {
        Arc::new(Self {
            base_url: std::env::var("GATEWAY_API_URL")
                .unwrap_or_else(|_| "https://billing-gateway.example.com/api/v1".to_string()),
            username: std::env::var("GATEWAY_API_USERNAME")
                .ok()
                .filter(|v| !v.is_empty()),
            password: std::env::var("GATEWAY_API_PASSWORD")
                .ok()
                .filter(|v| !v.is_empty()),
            timeout_secs: std::env::var("GATEWAY_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            test_mode: std::env::var("GATEWAY_TEST_MODE")
                .map(|v| v != "0")
                .unwrap_or(true),
        })
    }

    /// Live calls require both credentials; without them the checkout
    /// service runs in simulated mode.
    pub fn is_configured(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }

    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some((username, password)),
            _ => None,
        }
    }

    pub fn test_mode_flag(&self) -> String {
        if self.test_mode { "1" } else { "0" }.to_string()
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://billing-gateway.example.com/api/v1".to_string(),
            username: None,
            password: None,
            timeout_secs: 30,
            test_mode: true,
        }
    }
}

/// Catalog-to-billing-model mapping.
///
/// Which products bill as one-time setup fees versus recurring
/// subscriptions is a property of the merchant's catalog, so it lives
/// in configuration rather than in code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub campaign_id: String,

    /// Shipping method id; the default is the digital (no-ship) method
    pub shipping_id: String,

    pub offer_id: u32,

    pub recurring_billing_model_id: u32,

    pub onetime_billing_model_id: u32,

    /// Product ids billed once instead of on a subscription
    pub onetime_product_ids: HashSet<String>,
}

impl CatalogConfig {
    pub fn from_env() -> Arc<Self> {
        Arc::new(Self {
            campaign_id: std::env::var("CATALOG_CAMPAIGN_ID").unwrap_or_else(|_| "1".to_string()),
            shipping_id: std::env::var("CATALOG_SHIPPING_ID").unwrap_or_else(|_| "2".to_string()),
            offer_id: std::env::var("CATALOG_OFFER_ID")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
            recurring_billing_model_id: std::env::var("CATALOG_RECURRING_BILLING_MODEL_ID")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            onetime_billing_model_id: std::env::var("CATALOG_ONETIME_BILLING_MODEL_ID")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2),
            onetime_product_ids: std::env::var("CATALOG_ONETIME_PRODUCT_IDS")
                .unwrap_or_else(|_| "4".to_string())
                .split(',')
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty())
                .collect(),
        })
    }

    pub fn billing_model_for(&self, product_id: &str) -> u32 {
        if self.onetime_product_ids.contains(product_id) {
            self.onetime_billing_model_id
        } else {
            self.recurring_billing_model_id
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            campaign_id: "1".to_string(),
            shipping_id: "2".to_string(),
            offer_id: 1,
            recurring_billing_model_id: 3,
            onetime_billing_model_id: 2,
            onetime_product_ids: HashSet::from(["4".to_string()]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_configured_requires_both_credentials() {
        let mut config = GatewayConfig::default();
        assert!(!config.is_configured());
        config.username = Some("user".to_string());
        assert!(!config.is_configured());
        config.password = Some("pass".to_string());
        assert!(config.is_configured());
        assert_eq!(config.credentials(), Some(("user", "pass")));
    }

    #[test]
    fn test_billing_model_mapping() {
        let catalog = CatalogConfig::default();
        assert_eq!(catalog.billing_model_for("4"), 2);
        assert_eq!(catalog.billing_model_for("1"), 3);
        assert_eq!(catalog.billing_model_for("unknown"), 3);
    }
}
