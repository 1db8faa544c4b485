use crate::application::dto::{CardOnFileSubmission, CartProduct, CheckoutRequest};
use crate::domain::entities::{AggregateOrderResponse, CardOnFileResult, ChainState, OrderResult};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::events::{DomainEvent, PurchaseCompleted};
use crate::domain::reconcile::{
    classify_order_response, first_string, reconcile_lookup, LookupShape, OrderLookupResult,
    OrderOutcome, ERROR_MESSAGE_PATHS,
};
use crate::domain::value_objects::{
    detect_card_type, format_card_number, format_expiration, normalize_state,
};
use crate::infrastructure::config::{CatalogConfig, GatewayConfig};
use crate::ports::billing_port::{BillingPort, NewOrderRequest, OfferLine};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Checkout service: order submission, order lookup and card-on-file
/// submission against the billing gateway.
pub struct CheckoutService<T: BillingPort> {
    gateway: Arc<T>,
    gateway_config: Arc<GatewayConfig>,
    catalog: Arc<CatalogConfig>,
}

impl<T: BillingPort> CheckoutService<T> {
    pub fn new(
        gateway: Arc<T>,
        gateway_config: Arc<GatewayConfig>,
        catalog: Arc<CatalogConfig>,
    ) -> Self {
        Self {
            gateway,
            gateway_config,
            catalog,
        }
    }

    /// Submit a cart as one or more sequentially chained gateway orders.
    ///
    /// The first product becomes a standalone order; once it resolves,
    /// its customer id and order id are attached to every later request
    /// so the gateway records them as upsells on the same customer.
    /// Each call depends on the previous one's resolved ids, so the
    /// iteration is strictly sequential.
    pub async fn submit_order(
        &self,
        request: CheckoutRequest,
    ) -> DomainResult<AggregateOrderResponse> {
        info!(
            "Processing checkout for {} product(s)",
            request.products.len()
        );

        let problems = request.validation_errors();
        if !problems.is_empty() {
            return Err(DomainError::ValidationError(problems.join(", ")));
        }

        if !self.gateway_config.is_configured() {
            return Ok(self.simulated_response(&request));
        }

        let normalized_state = normalize_state(&request.billing_state);
        debug!(
            "State normalization: {:?} -> {:?}",
            request.billing_state, normalized_state
        );

        let mut chain = ChainState::default();
        let mut orders: Vec<OrderResult> = Vec::with_capacity(request.products.len());

        for product in &request.products {
            if chain.anchor_failed {
                // Chained orders need the anchor's customer id; once the
                // anchor fails the rest of the cart cannot be attempted.
                orders.push(OrderResult::failed(
                    product.id.clone(),
                    product.price,
                    "Not attempted: initial order failed".to_string(),
                ));
                continue;
            }

            let order_request = self.build_new_order(&request, product, &normalized_state, &chain)?;
            debug!("Creating order for product {}", product.id);

            let outcome = match self.gateway.create_order(&order_request).await {
                Ok(response) => {
                    let outcome = classify_order_response(&response);
                    match &outcome.error {
                        None => orders.push(OrderResult::succeeded(
                            product.id.clone(),
                            product.price,
                            outcome.order_id.clone().unwrap_or_default(),
                            response,
                        )),
                        Some(message) => {
                            warn!("Order declined for product {}: {}", product.id, message);
                            orders.push(OrderResult::failed(
                                product.id.clone(),
                                product.price,
                                message.clone(),
                            ));
                        }
                    }
                    outcome
                }
                Err(e) => {
                    error!("Order creation failed for product {}: {}", product.id, e);
                    orders.push(OrderResult::failed(
                        product.id.clone(),
                        product.price,
                        e.to_string(),
                    ));
                    OrderOutcome::transport_failure(e.to_string())
                }
            };

            chain = chain.advance(&outcome);
        }

        let successful = orders.iter().filter(|order| order.success).count();
        if successful > 0 {
            self.track_purchase(
                chain.main_order_id.as_deref().unwrap_or_default(),
                request.total_amount,
                &request.products,
                false,
            );
            Ok(AggregateOrderResponse {
                success: true,
                order_id: chain.main_order_id,
                customer_id: chain.customer_id,
                message: Some(format!("Created {successful} orders successfully")),
                orders,
                total_amount: request.total_amount,
                error: None,
                is_simulated: false,
            })
        } else {
            let first_error = orders.first().and_then(|order| order.error.clone());
            Ok(AggregateOrderResponse {
                success: false,
                order_id: None,
                customer_id: None,
                message: Some("Failed to create orders".to_string()),
                orders,
                total_amount: request.total_amount,
                error: first_error.or_else(|| Some("Unknown error".to_string())),
                is_simulated: false,
            })
        }
    }

    /// Look up an existing order and reconcile the response.
    pub async fn lookup_order(
        &self,
        order_id: &str,
        shape: LookupShape,
    ) -> DomainResult<OrderLookupResult> {
        info!("Looking up order: {}", order_id);

        let data = match shape {
            LookupShape::Find => self.gateway.find_order(order_id).await?,
            LookupShape::View => self.gateway.view_order(order_id).await?,
        };

        let result = reconcile_lookup(order_id, data, shape);
        debug!(
            "Lookup reconciled: order_id={} has_customer_id={}",
            result.order_id, result.has_customer_id
        );
        Ok(result)
    }

    /// Add products to an existing subscription using the customer's
    /// card on file. The caller has already verified the customer id is
    /// genuine.
    pub async fn submit_card_on_file(
        &self,
        submission: CardOnFileSubmission,
    ) -> DomainResult<CardOnFileResult> {
        info!(
            "Submitting card on file order against parent {}",
            submission.order_id
        );

        let offers = submission
            .products
            .iter()
            .map(|product| product.to_offer_line())
            .collect::<DomainResult<Vec<OfferLine>>>()?;

        let mut order = NewOrderRequest::new(
            self.catalog.campaign_id.clone(),
            self.catalog.shipping_id.clone(),
            offers,
            self.gateway_config.test_mode_flag(),
        );
        order.apply_chain(&submission.customer_id, &submission.order_id);
        if submission.new_upsell {
            order.new_upsell = Some("1".to_string());
        }
        if submission.order_force_bill {
            order.order_force_bill = Some("1".to_string());
        }

        let data = self.gateway.create_order(&order).await?;
        let outcome = classify_order_response(&data);
        let success = outcome.success();
        let message = if success {
            "Order updated successfully - products added to subscription".to_string()
        } else {
            first_string(&data, ERROR_MESSAGE_PATHS)
                .unwrap_or_else(|| "Failed to update order".to_string())
        };

        Ok(CardOnFileResult {
            success,
            order_id: outcome.order_id.unwrap_or(submission.order_id),
            message,
            data,
        })
    }

    /// Fetch the gateway's product index.
    pub async fn list_products(&self) -> DomainResult<Value> {
        let data = self.gateway.list_products().await?;
        let products = data
            .get("products")
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new()));
        Ok(json!({ "products": products }))
    }

    fn build_new_order(
        &self,
        request: &CheckoutRequest,
        product: &CartProduct,
        normalized_state: &str,
        chain: &ChainState,
    ) -> DomainResult<NewOrderRequest> {
        let product_id: u32 = product.id.trim().parse().map_err(|_| {
            DomainError::ValidationError(format!("Invalid product id: {}", product.id))
        })?;

        let offer = OfferLine {
            offer_id: self.catalog.offer_id,
            product_id,
            billing_model_id: self.catalog.billing_model_for(product.id.trim()),
            quantity: 1,
        };

        let country = request
            .billing_country
            .clone()
            .unwrap_or_else(|| "US".to_string());

        let mut order = NewOrderRequest::new(
            self.catalog.campaign_id.clone(),
            self.catalog.shipping_id.clone(),
            vec![offer],
            self.gateway_config.test_mode_flag(),
        );

        order.email = Some(request.email.clone());
        order.first_name = Some(request.first_name.clone());
        order.last_name = Some(request.last_name.clone());
        order.phone = Some(request.phone.clone());

        order.billing_first_name = Some(request.first_name.clone());
        order.billing_last_name = Some(request.last_name.clone());
        order.billing_address1 = Some(request.billing_address.clone());
        order.billing_city = Some(request.billing_city.clone());
        order.billing_state = Some(normalized_state.to_string());
        order.billing_zip = Some(request.billing_zip.clone());
        order.billing_country = Some(country.clone());

        // Digital products: shipping mirrors billing.
        order.shipping_first_name = Some(request.first_name.clone());
        order.shipping_last_name = Some(request.last_name.clone());
        order.shipping_address1 = Some(request.billing_address.clone());
        order.shipping_city = Some(request.billing_city.clone());
        order.shipping_state = Some(normalized_state.to_string());
        order.shipping_zip = Some(request.billing_zip.clone());
        order.shipping_country = Some(country);

        order.credit_card_number = Some(format_card_number(&request.card_number));
        order.expiration_date = Some(format_expiration(
            &request.card_exp_month,
            &request.card_exp_year,
        ));
        order.cvv = Some(request.card_cvv.clone());
        order.credit_card_type = Some(detect_card_type(&request.card_number));
        order.ip_address = Some("127.0.0.1".to_string());

        if let Some((customer_id, parent_order_id)) = chain.chain_target() {
            order.apply_chain(customer_id, parent_order_id);
        }

        Ok(order)
    }

    fn simulated_response(&self, request: &CheckoutRequest) -> AggregateOrderResponse {
        warn!("Gateway credentials not configured; returning simulated success response");

        let stamp = Utc::now().timestamp_millis();
        let order_id = format!("TEST-{stamp}");
        let customer_id = format!("TEST-CUST-{stamp}");

        let orders = request
            .products
            .iter()
            .map(|product| OrderResult {
                product_id: product.id.clone(),
                order_id: Some(order_id.clone()),
                price: product.price,
                success: true,
                error: None,
                response: None,
            })
            .collect();

        self.track_purchase(&order_id, request.total_amount, &request.products, true);

        AggregateOrderResponse {
            success: true,
            order_id: Some(order_id),
            customer_id: Some(customer_id),
            message: Some(format!(
                "Simulated order for {} product(s)",
                request.products.len()
            )),
            orders,
            total_amount: request.total_amount,
            error: None,
            is_simulated: true,
        }
    }

    /// One consolidated analytics event per successful cart.
    fn track_purchase(
        &self,
        transaction_id: &str,
        value: f64,
        products: &[CartProduct],
        simulated: bool,
    ) {
        let event = PurchaseCompleted::new(
            transaction_id.to_string(),
            value,
            products.iter().map(|product| product.id.clone()).collect(),
            simulated,
        );
        info!(
            event = event.event_type(),
            transaction_id = %event.transaction_id,
            value = event.value,
            currency = %event.currency,
            simulated = event.simulated,
            "purchase tracked"
        );
    }
}
