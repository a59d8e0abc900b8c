//! Persisted row types owned by the store
//!
//! Rows reference each other by plain integer ids rather than holding
//! back-pointers, so the customer → order → item → product graph stays
//! acyclic. All rows are created lazily on first reference and overwritten in
//! place on later merges; only [`Product`] is immutable after creation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A customer row
///
/// The name is overwritten by every merge that touches the customer, so the
/// last-processed file wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: u64,
    pub name: String,
}

/// An order row
///
/// Date and total are overwritten on every merge that touches the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub customer_id: u64,
    pub date: NaiveDate,
    pub total: Decimal,
}

/// A product row
///
/// Products carry no mutable attributes: created once on first reference,
/// never updated, never deleted by this subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
}

/// Composite key identifying one stored order item
pub type OrderItemKey = (u64, u64);

/// An order-item row, at most one per `(order, product)` pair
///
/// When a file carries several lines for the same pair, each successive line
/// overwrites the stored value, so the row ends at the last occurrence even
/// though the order's total summed all of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub order_id: u64,
    pub product_id: u64,
    pub value: Decimal,
}

impl OrderItem {
    /// The `(orderId, productId)` key this row is stored under.
    pub fn key(&self) -> OrderItemKey {
        (self.order_id, self.product_id)
    }
}

/// An order together with its eagerly loaded items, as returned by queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedOrder {
    pub order: Order,
    pub items: Vec<OrderItem>,
}
