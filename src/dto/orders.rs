use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One cart line as sent by the storefront; `price` is in minor units.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct CartLine {
    pub id: String,
    pub name: Option<String>,
    pub price: i64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateOrderRequest {
    pub cart: Vec<CartLine>,
}

fn default_quantity() -> u32 {
    1
}
