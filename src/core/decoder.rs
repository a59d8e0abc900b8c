//! Fixed-width decoder for legacy order lines
//!
//! Each physical line is at least 95 characters and carries six positional
//! fields:
//!
//! | chars    | field         |
//! |----------|---------------|
//! | 0..10    | customer id   |
//! | 10..55   | customer name |
//! | 55..65   | order id      |
//! | 65..75   | product id    |
//! | 75..87   | value         |
//! | 87..95   | date (yyyyMMdd) |
//!
//! Numeric fields are zero-padded on the left; names are space-padded on the
//! right. Decoding is pure: a line either becomes a [`LineRecord`] or a
//! [`DecodeError`], nothing is accumulated here.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::ops::Range;
use std::str::FromStr;

use crate::core::error::{DecodeError, MIN_LINE_LEN};
use crate::core::record::LineRecord;

const CUSTOMER_ID: Range<usize> = 0..10;
const CUSTOMER_NAME: Range<usize> = 10..55;
const ORDER_ID: Range<usize> = 55..65;
const PRODUCT_ID: Range<usize> = 65..75;
const VALUE: Range<usize> = 75..87;
const DATE: Range<usize> = 87..95;

/// Decode one legacy line into a [`LineRecord`]
///
/// `None` models an absent line and fails like any other malformed input.
/// Lines shorter than [`MIN_LINE_LEN`] characters are rejected before any
/// field is examined.
pub fn decode_line(line: Option<&str>) -> Result<LineRecord, DecodeError> {
    let line = line.ok_or(DecodeError::MissingLine)?;

    let length = line.chars().count();
    if length < MIN_LINE_LEN {
        return Err(DecodeError::TooShort { length });
    }

    Ok(LineRecord {
        customer_id: parse_id(&window(line, CUSTOMER_ID), "customerId")?,
        customer_name: window(line, CUSTOMER_NAME).trim().to_string(),
        order_id: parse_id(&window(line, ORDER_ID), "orderId")?,
        product_id: parse_id(&window(line, PRODUCT_ID), "productId")?,
        value: parse_value(&window(line, VALUE))?,
        date: parse_date(&window(line, DATE))?,
    })
}

/// Extract a field window, tolerating lines whose tail is missing.
///
/// A range that extends past the end of the line yields the shorter (possibly
/// empty) text instead of an error.
fn window(line: &str, range: Range<usize>) -> String {
    line.chars()
        .skip(range.start)
        .take(range.end - range.start)
        .collect()
}

/// Parse a zero-padded integer id field.
///
/// Surrounding whitespace and leading zeros are stripped; an empty or
/// all-zero field is the id 0.
fn parse_id(raw: &str, field: &'static str) -> Result<u64, DecodeError> {
    let cleaned = raw.trim().trim_start_matches('0');
    if cleaned.is_empty() {
        return Ok(0);
    }
    cleaned.parse::<u64>().map_err(|_| DecodeError::InvalidField {
        field,
        raw: raw.to_string(),
    })
}

/// Parse the monetary value field.
///
/// A value carrying an explicit decimal point is taken at face value
/// (`"000000512.24"` is 512.24); a bare digit run is an integer number of
/// cents (`"000000051224"` is also 512.24). Empty means exactly zero.
fn parse_value(raw: &str) -> Result<Decimal, DecodeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Decimal::ZERO);
    }

    if trimmed.contains('.') {
        if let Ok(value) = Decimal::from_str(trimmed) {
            return Ok(value);
        }
    }

    let cleaned = trimmed.trim_start_matches('0');
    if cleaned.is_empty() {
        return Ok(Decimal::ZERO);
    }
    cleaned
        .parse::<i64>()
        .map(|cents| Decimal::new(cents, 2))
        .map_err(|_| DecodeError::InvalidField {
            field: "value",
            raw: raw.to_string(),
        })
}

/// Parse the strict `yyyyMMdd` date field.
fn parse_date(raw: &str) -> Result<NaiveDate, DecodeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DecodeError::MissingField { field: "date" });
    }
    NaiveDate::parse_from_str(trimmed, "%Y%m%d").map_err(|_| DecodeError::InvalidDate {
        raw: raw.to_string(),
    })
}

/// Build a well-formed 95-character line from its logical fields.
///
/// Test helper shared by the aggregation and merge tests.
#[cfg(test)]
pub(crate) fn build_line(
    customer_id: u64,
    customer_name: &str,
    order_id: u64,
    product_id: u64,
    value: &str,
    date: &str,
) -> String {
    let name: String = customer_name.chars().take(45).collect();
    format!(
        "{:010}{:<45}{:010}{:010}{:0>12}{}",
        customer_id, name, order_id, product_id, value, date
    )
}
