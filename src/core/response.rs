//! Response hierarchy returned by the upload and query endpoints
//!
//! Field declaration order is the wire order and is part of the published
//! contract, as is the money format: fixed-point strings with exactly two
//! fractional digits, rounded half-up.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// One customer with every order the request touched or matched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerResponse {
    pub user_id: u64,

    pub name: String,

    pub orders: Vec<OrderResponse>,
}

/// One order with its product lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResponse {
    pub order_id: u64,

    /// Order total as a 2dp fixed-point string
    pub total: String,

    /// Order date as `yyyy-MM-dd`
    pub date: String,

    pub products: Vec<ProductLineResponse>,
}

/// One product line inside an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductLineResponse {
    pub product_id: u64,

    /// Line value as a 2dp fixed-point string
    pub value: String,
}

/// Render a monetary amount with exactly two fractional digits, half-up.
pub fn format_amount(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}
