//! HTTP handlers for file upload and order queries

use axum::extract::{Multipart, Query, State};
use axum::Json;
use std::sync::Arc;

use crate::core::aggregate::FileAggregate;
use crate::core::error::{ApiError, RequestError};
use crate::core::merge::merge_file;
use crate::core::query::{query_orders, OrderFilter};
use crate::core::response::CustomerResponse;
use crate::core::store::OrderStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn OrderStore>,
}

/// Ingest one legacy order file.
///
/// POST /upload, multipart body with a `file` field. The whole file is
/// decoded and aggregated before the store is touched, then merged in a
/// single transaction. Any decode failure rejects the entire file; nothing
/// is partially ingested.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Vec<CustomerResponse>>, ApiError> {
    let mut file_bytes = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| RequestError::Multipart(e.to_string()))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| RequestError::Multipart(e.to_string()))?;
            file_bytes = Some(bytes);
            break;
        }
    }

    let bytes = file_bytes.ok_or(RequestError::MissingFile)?;
    if bytes.is_empty() {
        return Err(RequestError::EmptyFile.into());
    }

    // Lenient UTF-8: the legacy producer wrote platform-encoded text and
    // stray bytes must not take down an otherwise decodable file.
    let text = String::from_utf8_lossy(&bytes);

    let aggregate = FileAggregate::from_text(&text).map_err(|e| {
        tracing::warn!(error = %e, "rejecting upload, file failed to decode");
        e
    })?;

    let customers = merge_file(state.store.as_ref(), &aggregate).await?;

    tracing::info!(
        customers = customers.len(),
        orders = customers.iter().map(|c| c.orders.len()).sum::<usize>(),
        "file ingested"
    );

    Ok(Json(customers))
}

/// Query persisted orders.
///
/// GET /orders?orderId=&startDate=&endDate= with all parameters optional,
/// dates as `yyyy-MM-dd`. A date range applies only when both bounds are
/// given; with no usable filter every order is returned.
pub async fn get_orders(
    State(state): State<AppState>,
    Query(filter): Query<OrderFilter>,
) -> Result<Json<Vec<CustomerResponse>>, ApiError> {
    let customers = query_orders(state.store.as_ref(), &filter).await?;
    Ok(Json(customers))
}

/// Liveness probe.
///
/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
