//! Headless checkout button: the client half of the payment delegation.
//!
//! The flow asks the storefront API to create a provider order for the cart
//! total, and after the buyer approves it asks the API to capture. All payment
//! logic stays with the provider; this only tracks a loading flag and a
//! user-facing message, and clears the cart once a capture completes.

use std::{
    future::Future,
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use serde_json::Value;
use tokio::task::JoinHandle;

use crate::dto::orders::{CartLine, CreateOrderRequest};

pub const REDIRECT_DELAY: Duration = Duration::from_secs(3);
pub const HOME_PATH: &str = "/";
pub const COMPLETED: &str = "COMPLETED";

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("a checkout request is already in flight")]
    Busy,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("storefront API answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("order response carried no id")]
    MissingOrderId,

    #[error("payment method was declined")]
    Declined,

    #[error("capture failed: {0}")]
    Capture(String),
}

/// The two storefront API calls the button makes.
pub trait OrdersApi: Send + Sync {
    fn create_order(
        &self,
        request: &CreateOrderRequest,
    ) -> impl Future<Output = Result<Value, CheckoutError>> + Send;

    fn capture_order(
        &self,
        order_id: &str,
    ) -> impl Future<Output = Result<Value, CheckoutError>> + Send;
}

/// Cart and navigation owned by the embedding storefront.
pub trait Storefront: Send + Sync + 'static {
    fn clear_cart(&self);
    fn navigate(&self, path: &str);
}

/// `OrdersApi` over HTTP against `POST /api/orders` and
/// `POST /api/orders/{orderID}/capture`.
#[derive(Debug, Clone)]
pub struct HttpOrdersApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpOrdersApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn post(&self, url: String, body: Option<&CreateOrderRequest>) -> Result<Value, CheckoutError> {
        let mut request = self.http.post(url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CheckoutError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response.json().await?)
    }
}

impl OrdersApi for HttpOrdersApi {
    async fn create_order(&self, request: &CreateOrderRequest) -> Result<Value, CheckoutError> {
        self.post(format!("{}/api/orders", self.base_url), Some(request))
            .await
    }

    async fn capture_order(&self, order_id: &str) -> Result<Value, CheckoutError> {
        self.post(
            format!("{}/api/orders/{order_id}/capture", self.base_url),
            None,
        )
        .await
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutState {
    pub loading: bool,
    pub message: Option<String>,
}

#[derive(Debug)]
pub struct CaptureOutcome {
    pub status: String,
    pub transaction_id: String,
    /// Pending cart clear and redirect, present only for a completed capture.
    pub redirect: Option<JoinHandle<()>>,
}

pub struct CheckoutFlow<A, S> {
    api: A,
    storefront: Arc<S>,
    state: Mutex<CheckoutState>,
    cart_cleared: Arc<AtomicBool>,
    redirect_delay: Duration,
}

impl<A: OrdersApi, S: Storefront> CheckoutFlow<A, S> {
    pub fn new(api: A, storefront: Arc<S>) -> Self {
        Self {
            api,
            storefront,
            state: Mutex::new(CheckoutState::default()),
            cart_cleared: Arc::new(AtomicBool::new(false)),
            redirect_delay: REDIRECT_DELAY,
        }
    }

    pub fn with_redirect_delay(mut self, delay: Duration) -> Self {
        self.redirect_delay = delay;
        self
    }

    pub fn state(&self) -> CheckoutState {
        self.lock().clone()
    }

    /// Create a provider order holding one line item priced at `cart_total`
    /// and return the provider's order id.
    pub async fn create_order(&self, cart_total: i64) -> Result<String, CheckoutError> {
        let loading = self.begin()?;
        let request = single_line_cart(cart_total);
        let result = match self.api.create_order(&request).await {
            Ok(body) => body
                .get("id")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or(CheckoutError::MissingOrderId),
            Err(err) => Err(err),
        };
        if let Err(err) = &result {
            tracing::warn!(error = %err, "order creation failed");
            self.set_message(format!("Could not initiate PayPal Checkout...{err}"));
        }
        drop(loading);
        result
    }

    /// Capture an approved order and report the transaction status.
    ///
    /// On `COMPLETED` the cart is cleared and the storefront sent home after
    /// the redirect delay. The clear happens at most once per flow.
    pub async fn approve(&self, order_id: &str) -> Result<CaptureOutcome, CheckoutError> {
        let loading = self.begin()?;
        let result = match self.api.capture_order(order_id).await {
            Ok(body) => read_capture(&body),
            Err(err) => Err(err),
        };
        drop(loading);

        let (status, transaction_id) = match result {
            Ok(pair) => pair,
            Err(err) => {
                tracing::warn!(error = %err, order_id, "capture failed");
                self.set_message(format!(
                    "Sorry, your transaction could not be processed...{err}"
                ));
                return Err(err);
            }
        };

        self.set_message(format!("Transaction {status}: {transaction_id}"));
        tracing::info!(order_id, status = %status, transaction_id = %transaction_id, "capture finished");

        let redirect = (status == COMPLETED).then(|| self.schedule_redirect());
        Ok(CaptureOutcome {
            status,
            transaction_id,
            redirect,
        })
    }

    fn schedule_redirect(&self) -> JoinHandle<()> {
        let storefront = Arc::clone(&self.storefront);
        let cleared = Arc::clone(&self.cart_cleared);
        let delay = self.redirect_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if !cleared.swap(true, Ordering::SeqCst) {
                storefront.clear_cart();
                storefront.navigate(HOME_PATH);
            }
        })
    }

    /// Set the loading flag; it is cleared when the guard drops, including
    /// when the caller abandons the call mid-flight.
    fn begin(&self) -> Result<LoadingGuard<'_>, CheckoutError> {
        let mut state = self.lock();
        if state.loading {
            return Err(CheckoutError::Busy);
        }
        state.loading = true;
        Ok(LoadingGuard { state: &self.state })
    }

    fn set_message(&self, message: String) {
        self.lock().message = Some(message);
    }

    fn lock(&self) -> MutexGuard<'_, CheckoutState> {
        lock_state(&self.state)
    }
}

struct LoadingGuard<'a> {
    state: &'a Mutex<CheckoutState>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        lock_state(self.state).loading = false;
    }
}

fn lock_state(state: &Mutex<CheckoutState>) -> MutexGuard<'_, CheckoutState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub fn single_line_cart(cart_total: i64) -> CreateOrderRequest {
    CreateOrderRequest {
        cart: vec![CartLine {
            id: "cart".to_string(),
            name: Some("Cart total".to_string()),
            price: cart_total,
            quantity: 1,
        }],
    }
}

/// Pull `(status, id)` out of `purchase_units[0].payments.captures[0]`,
/// falling back to the provider's error `details`.
pub fn read_capture(body: &Value) -> Result<(String, String), CheckoutError> {
    if let Some(detail) = body.pointer("/details/0") {
        let issue = detail.get("issue").and_then(Value::as_str).unwrap_or_default();
        if issue == "INSTRUMENT_DECLINED" {
            return Err(CheckoutError::Declined);
        }
        let description = detail
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or(issue);
        return Err(CheckoutError::Capture(format!("{issue} {description}")));
    }

    let capture = body
        .pointer("/purchase_units/0/payments/captures/0")
        .ok_or_else(|| CheckoutError::Capture("response has no capture".into()))?;
    let status = capture
        .get("status")
        .and_then(Value::as_str)
        .ok_or_else(|| CheckoutError::Capture("capture has no status".into()))?;
    let id = capture.get("id").and_then(Value::as_str).unwrap_or_default();
    Ok((status.to_string(), id.to_string()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn cart_is_a_single_line_priced_at_the_total() {
        let request = single_line_cart(8497);
        assert_eq!(request.cart.len(), 1);
        assert_eq!(request.cart[0].price, 8497);
        assert_eq!(request.cart[0].quantity, 1);
    }

    #[test]
    fn capture_status_is_read_from_first_capture() {
        let body = json!({
            "id": "5O190127TN364715T",
            "purchase_units": [{ "payments": { "captures": [{ "id": "3C679366HH908993F", "status": "COMPLETED" }] } }]
        });
        let (status, id) = read_capture(&body).unwrap();
        assert_eq!(status, "COMPLETED");
        assert_eq!(id, "3C679366HH908993F");
    }

    #[test]
    fn declined_instrument_is_distinguished() {
        let body = json!({ "details": [{ "issue": "INSTRUMENT_DECLINED" }] });
        assert!(matches!(read_capture(&body), Err(CheckoutError::Declined)));

        let body = json!({ "details": [{ "issue": "ORDER_NOT_APPROVED", "description": "Payer has not approved" }] });
        assert!(matches!(read_capture(&body), Err(CheckoutError::Capture(_))));
    }
}
