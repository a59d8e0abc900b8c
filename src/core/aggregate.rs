//! In-memory aggregation of decoded lines into a customer/order hierarchy
//!
//! One [`FileAggregate`] is built per uploaded file. Ordering is part of the
//! contract: customers appear in the order their first line appears in the
//! file, orders in first-appearance order within their customer, and line
//! items in raw input order, duplicates included.

use chrono::NaiveDate;
use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::core::decoder::decode_line;
use crate::core::error::DecodeError;
use crate::core::record::LineRecord;

/// One `{productId, value}` entry, one per input line referencing the order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub product_id: u64,
    pub value: Decimal,
}

/// Accumulated state for a single order within one file
///
/// The date is fixed by whichever line establishes the order; the total adds
/// every line's value, so repeated `(order, product)` pairs are counted as
/// many times as they appear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderAggregate {
    pub date: NaiveDate,
    pub total: Decimal,
    pub items: Vec<LineItem>,
}

impl OrderAggregate {
    fn new(date: NaiveDate) -> Self {
        Self {
            date,
            total: Decimal::ZERO,
            items: Vec::new(),
        }
    }
}

/// Accumulated state for a single customer within one file
///
/// The name is fixed when the customer is first seen; later lines for the
/// same id may carry a different name, which is discarded without comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerAggregate {
    pub name: String,
    pub orders: IndexMap<u64, OrderAggregate>,
}

impl CustomerAggregate {
    fn new(name: String) -> Self {
        Self {
            name,
            orders: IndexMap::new(),
        }
    }
}

/// The full hierarchy aggregated from one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileAggregate {
    pub customers: IndexMap<u64, CustomerAggregate>,
}

impl FileAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode and aggregate a whole file.
    ///
    /// Blank and whitespace-only lines are skipped before they reach the
    /// decoder. The first line that fails to decode aborts the whole run; no
    /// partial aggregate escapes.
    pub fn from_text(text: &str) -> Result<Self, DecodeError> {
        let mut aggregate = Self::new();
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            aggregate.push(decode_line(Some(line))?);
        }
        Ok(aggregate)
    }

    /// Fold one decoded record into the hierarchy.
    ///
    /// The create-vs-update split is deliberate: a customer's name and an
    /// order's date are only ever written on the create branch.
    pub fn push(&mut self, record: LineRecord) {
        if !self.customers.contains_key(&record.customer_id) {
            self.customers.insert(
                record.customer_id,
                CustomerAggregate::new(record.customer_name.clone()),
            );
        }
        let customer = self
            .customers
            .get_mut(&record.customer_id)
            .expect("customer inserted above");

        if !customer.orders.contains_key(&record.order_id) {
            customer
                .orders
                .insert(record.order_id, OrderAggregate::new(record.date));
        }
        let order = customer
            .orders
            .get_mut(&record.order_id)
            .expect("order inserted above");

        order.items.push(LineItem {
            product_id: record.product_id,
            value: record.value,
        });
        order.total += record.value;
    }

    /// Number of distinct customers seen so far.
    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }
}
