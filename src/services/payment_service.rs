use serde_json::Value;

use crate::{
    dto::orders::{CartLine, CreateOrderRequest},
    error::{AppError, AppResult},
    paypal::{PaymentError, PaymentGateway},
};

/// Sum of `price * quantity` over the cart, in minor units.
pub fn cart_total(cart: &[CartLine]) -> AppResult<i64> {
    if cart.is_empty() {
        return Err(AppError::BadRequest("cart is empty".into()));
    }
    let mut total: i64 = 0;
    for line in cart {
        if line.price < 0 || line.quantity == 0 {
            return Err(AppError::BadRequest(format!("invalid cart line {}", line.id)));
        }
        total = line
            .price
            .checked_mul(i64::from(line.quantity))
            .and_then(|amount| total.checked_add(amount))
            .ok_or_else(|| AppError::BadRequest("cart total overflows".into()))?;
    }
    if total <= 0 {
        return Err(AppError::BadRequest("cart total must be positive".into()));
    }
    Ok(total)
}

pub async fn create_order<G: PaymentGateway>(
    gateway: &G,
    payload: CreateOrderRequest,
) -> AppResult<Value> {
    let total = cart_total(&payload.cart)?;
    gateway.create_order(total).await.map_err(provider_error)
}

/// Provider order ids are ASCII letters, digits and dashes. Anything else
/// would change the provider URL the id is spliced into.
pub fn is_valid_order_id(order_id: &str) -> bool {
    !order_id.is_empty()
        && order_id.len() <= 64
        && order_id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

pub async fn capture_order<G: PaymentGateway>(gateway: &G, order_id: &str) -> AppResult<Value> {
    if !is_valid_order_id(order_id) {
        return Err(AppError::BadRequest("invalid order id".into()));
    }
    gateway.capture_order(order_id).await.map_err(provider_error)
}

fn provider_error(err: PaymentError) -> AppError {
    AppError::Payment(err.to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;

    #[derive(Default)]
    struct RecordingGateway {
        amounts: Mutex<Vec<i64>>,
        captured: Mutex<Vec<String>>,
        fail: bool,
    }

    impl PaymentGateway for RecordingGateway {
        async fn create_order(&self, amount: i64) -> Result<Value, PaymentError> {
            self.amounts.lock().unwrap().push(amount);
            if self.fail {
                return Err(PaymentError::Provider {
                    status: 422,
                    body: "UNPROCESSABLE_ENTITY".into(),
                });
            }
            Ok(json!({ "id": "ORDER-1", "status": "CREATED" }))
        }

        async fn capture_order(&self, order_id: &str) -> Result<Value, PaymentError> {
            self.captured.lock().unwrap().push(order_id.to_string());
            Ok(json!({
                "id": order_id,
                "purchase_units": [{ "payments": { "captures": [{ "id": "CAP-1", "status": "COMPLETED" }] } }]
            }))
        }
    }

    fn line(price: i64, quantity: u32) -> CartLine {
        CartLine {
            id: "sku".into(),
            name: None,
            price,
            quantity,
        }
    }

    #[test]
    fn total_multiplies_quantities() {
        assert_eq!(cart_total(&[line(1250, 2), line(500, 1)]).unwrap(), 3000);
    }

    #[test]
    fn empty_or_free_carts_are_rejected() {
        assert!(matches!(cart_total(&[]), Err(AppError::BadRequest(_))));
        assert!(matches!(cart_total(&[line(0, 1)]), Err(AppError::BadRequest(_))));
        assert!(matches!(cart_total(&[line(-5, 1)]), Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn create_order_forwards_total_and_provider_body() {
        let gateway = RecordingGateway::default();
        let body = create_order(
            &gateway,
            CreateOrderRequest {
                cart: vec![line(4999, 1)],
            },
        )
        .await
        .unwrap();
        assert_eq!(body["id"], "ORDER-1");
        assert_eq!(*gateway.amounts.lock().unwrap(), vec![4999]);
    }

    #[tokio::test]
    async fn provider_failure_maps_to_bad_gateway() {
        let gateway = RecordingGateway {
            fail: true,
            ..Default::default()
        };
        let err = create_order(
            &gateway,
            CreateOrderRequest {
                cart: vec![line(100, 1)],
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn capture_passes_provider_shape_through() {
        let gateway = RecordingGateway::default();
        let body = capture_order(&gateway, "ORDER-1").await.unwrap();
        assert_eq!(
            body["purchase_units"][0]["payments"]["captures"][0]["status"],
            "COMPLETED"
        );
    }

    #[tokio::test]
    async fn capture_rejects_ids_that_escape_the_order_path() {
        let gateway = RecordingGateway::default();
        for id in [
            "../../../v2/payments/authorizations/AUTH-1",
            "ORDER-1/../../refunds",
            "ORDER 1",
            "ORDER-1?x=1",
            "",
        ] {
            let err = capture_order(&gateway, id).await.unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)), "accepted {id:?}");
        }
        assert!(gateway.captured.lock().unwrap().is_empty());

        capture_order(&gateway, "5O190127TN364715T").await.unwrap();
        assert_eq!(*gateway.captured.lock().unwrap(), vec!["5O190127TN364715T"]);
    }
}
