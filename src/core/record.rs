//! Decoded representation of one legacy order line

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One decoded line of a legacy order file
///
/// A record has no identity beyond its fields; it is consumed immediately by
/// the aggregation pass. Identifiers are plain integers taken verbatim from
/// the file, the name is trimmed but otherwise kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRecord {
    /// Customer the line belongs to
    pub customer_id: u64,

    /// Customer name as written on this line (trimmed, at most 45 chars)
    pub customer_name: String,

    /// Order the line belongs to
    pub order_id: u64,

    /// Product referenced by the line
    pub product_id: u64,

    /// Monetary value of the line, two-digit scale
    pub value: Decimal,

    /// Date the line carries for its order
    pub date: NaiveDate,
}
