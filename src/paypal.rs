//! Thin client for the PayPal Orders v2 REST API.
//!
//! Responses are passed back as raw JSON; nothing here interprets or
//! reconciles payment state.

use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::config::PaypalConfig;

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("request to payment provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("payment provider answered {status}: {body}")]
    Provider { status: u16, body: String },
}

/// The two calls the storefront delegates to the payment provider.
pub trait PaymentGateway {
    /// Create a capture-intent order for `amount` minor units.
    fn create_order(
        &self,
        amount: i64,
    ) -> impl std::future::Future<Output = Result<Value, PaymentError>> + Send;

    fn capture_order(
        &self,
        order_id: &str,
    ) -> impl std::future::Future<Output = Result<Value, PaymentError>> + Send;
}

#[derive(Debug, Clone)]
pub struct PaypalClient {
    http: Client,
    config: PaypalConfig,
}

#[derive(Deserialize)]
struct AccessToken {
    access_token: String,
}

impl PaypalClient {
    pub fn new(config: PaypalConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    pub fn currency(&self) -> &str {
        &self.config.currency
    }

    async fn access_token(&self) -> Result<String, PaymentError> {
        let response = self
            .http
            .post(format!("{}/v1/oauth2/token", self.config.base_url))
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;
        let token: AccessToken = checked(response).await?.json().await?;
        Ok(token.access_token)
    }

    async fn post_json(&self, path: &str, body: Option<Value>) -> Result<Value, PaymentError> {
        let token = self.access_token().await?;
        let mut request = self
            .http
            .post(format!("{}{path}", self.config.base_url))
            .bearer_auth(token);
        request = match body {
            Some(body) => request.json(&body),
            None => request.header(reqwest::header::CONTENT_TYPE, "application/json"),
        };
        let response = request.send().await?;
        Ok(checked(response).await?.json().await?)
    }
}

impl PaymentGateway for PaypalClient {
    async fn create_order(&self, amount: i64) -> Result<Value, PaymentError> {
        let body = order_body(amount, &self.config.currency);
        tracing::info!(amount, currency = %self.config.currency, "creating payment order");
        self.post_json("/v2/checkout/orders", Some(body)).await
    }

    async fn capture_order(&self, order_id: &str) -> Result<Value, PaymentError> {
        tracing::info!(order_id, "capturing payment order");
        self.post_json(&format!("/v2/checkout/orders/{order_id}/capture"), None)
            .await
    }
}

async fn checked(response: reqwest::Response) -> Result<reqwest::Response, PaymentError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(PaymentError::Provider {
        status: status.as_u16(),
        body,
    })
}

/// Single purchase unit, capture intent.
pub fn order_body(amount: i64, currency: &str) -> Value {
    json!({
        "intent": "CAPTURE",
        "purchase_units": [{
            "amount": {
                "currency_code": currency,
                "value": format_amount(amount),
            }
        }]
    })
}

/// Minor units to the provider's decimal string, e.g. `12345` -> `"123.45"`.
pub fn format_amount(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_are_rendered_with_two_decimals() {
        assert_eq!(format_amount(12345), "123.45");
        assert_eq!(format_amount(5), "0.05");
        assert_eq!(format_amount(100), "1.00");
    }

    #[test]
    fn order_body_has_one_capture_unit() {
        let body = order_body(2599, "USD");
        assert_eq!(body["intent"], "CAPTURE");
        let units = body["purchase_units"].as_array().unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0]["amount"]["value"], "25.99");
        assert_eq!(units[0]["amount"]["currency_code"], "USD");
    }
}
