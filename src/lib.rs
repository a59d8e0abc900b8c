//! # Orderfile
//!
//! A small REST service that ingests fixed-width legacy order files and
//! answers queries over the resulting customer/order/product hierarchy.
//!
//! ## Features
//!
//! - **Fixed-Width Decoder**: Strict positional decoding of legacy order
//!   lines with zero-stripped integers, decimal-or-cents money values and
//!   `yyyyMMdd` dates
//! - **Ordered Aggregation**: Per-file accumulation into a customer → order
//!   → line-item hierarchy that preserves first-appearance order
//! - **Idempotent Merge**: Find-or-create-then-overwrite upserts executed in
//!   a single all-or-nothing store transaction per file
//! - **Query Reassembly**: Lookup by order id or inclusive date range,
//!   rebuilt into the same response hierarchy the upload returns
//! - **Pluggable Storage**: The persistent engine sits behind the
//!   [`OrderStore`](core::store::OrderStore) trait; an in-memory backend
//!   ships for development and tests
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use orderfile::prelude::*;
//!
//! let aggregate = FileAggregate::from_text(file_contents)?;
//! let store = InMemoryOrderStore::new();
//! let customers = merge_file(&store, &aggregate).await?;
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Types ===
    pub use crate::core::{
        aggregate::{CustomerAggregate, FileAggregate, LineItem, OrderAggregate},
        decoder::decode_line,
        error::{ApiError, DecodeError, ErrorResponse, RequestError, StoreError},
        merge::merge_file,
        model::{Customer, FetchedOrder, Order, OrderItem, OrderItemKey, Product},
        query::{query_orders, OrderFilter},
        record::LineRecord,
        response::{format_amount, CustomerResponse, OrderResponse, ProductLineResponse},
        store::{OrderStore, OrderTx},
    };

    // === Storage ===
    pub use crate::storage::InMemoryOrderStore;

    // === Config ===
    pub use crate::config::ServerConfig;

    // === Server ===
    pub use crate::server::{build_router, AppState};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::NaiveDate;
    pub use rust_decimal::Decimal;
    pub use serde::{Deserialize, Serialize};
}
