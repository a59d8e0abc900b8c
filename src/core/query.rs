//! Query-side reassembly of persisted orders into the response hierarchy
//!
//! Queries are read-only and run against the store's committed view; they may
//! overlap an in-flight upload and simply observe whatever that upload has
//! committed so far (nothing, until its transaction lands).

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Deserialize;

use crate::core::error::StoreError;
use crate::core::model::FetchedOrder;
use crate::core::response::{format_amount, CustomerResponse, OrderResponse, ProductLineResponse};
use crate::core::store::OrderStore;

/// Filter parameters for the orders query
///
/// All fields are optional. A date range only applies when both bounds are
/// present; a lone bound falls through to the unfiltered fetch.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderFilter {
    /// Fetch exactly this order
    pub order_id: Option<u64>,

    /// Inclusive lower bound on the order date (`yyyy-MM-dd`)
    pub start_date: Option<NaiveDate>,

    /// Inclusive upper bound on the order date (`yyyy-MM-dd`)
    pub end_date: Option<NaiveDate>,
}

/// Fetch orders matching `filter` and rebuild the customer hierarchy.
///
/// Orders are grouped by owning customer in the order the store returned
/// them; items map 1:1 into product lines. An order whose owning customer
/// row is missing is skipped rather than failing the query; an order with no
/// items yields an empty product list.
///
/// With no filter at all this fetches every order in the store. That is the
/// published behavior; callers wanting a bound must pass one.
pub async fn query_orders(
    store: &dyn OrderStore,
    filter: &OrderFilter,
) -> Result<Vec<CustomerResponse>, StoreError> {
    let fetched: Vec<FetchedOrder> = if let Some(order_id) = filter.order_id {
        store.fetch_order(order_id).await?.into_iter().collect()
    } else if let (Some(start), Some(end)) = (filter.start_date, filter.end_date) {
        store.fetch_orders_between(start, end).await?
    } else {
        tracing::debug!("unfiltered order query, fetching the whole store");
        store.fetch_all_orders().await?
    };

    let mut customers: IndexMap<u64, CustomerResponse> = IndexMap::new();

    for FetchedOrder { order, items } in fetched {
        let Some(customer) = store.find_customer(order.customer_id).await? else {
            tracing::warn!(
                order_id = order.id,
                customer_id = order.customer_id,
                "order references a missing customer, skipping"
            );
            continue;
        };

        let entry = customers
            .entry(customer.id)
            .or_insert_with(|| CustomerResponse {
                user_id: customer.id,
                name: customer.name.clone(),
                orders: Vec::new(),
            });

        entry.orders.push(OrderResponse {
            order_id: order.id,
            total: format_amount(order.total),
            date: order.date.to_string(),
            products: items
                .iter()
                .map(|item| ProductLineResponse {
                    product_id: item.product_id,
                    value: format_amount(item.value),
                })
                .collect(),
        });
    }

    Ok(customers.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{Customer, Order, OrderItem};
    use crate::core::store::{OrderStore, OrderTx};
    use crate::storage::InMemoryOrderStore;
    use rust_decimal::Decimal;

    fn date(text: &str) -> NaiveDate {
        text.parse().unwrap()
    }

    fn dec(text: &str) -> Decimal {
        text.parse().unwrap()
    }

    /// Store with customers 1 and 2, orders 10/11/12 across 2021, and one
    /// order (99) whose customer row is deliberately missing.
    async fn seeded_store() -> InMemoryOrderStore {
        let store = InMemoryOrderStore::new();
        let mut tx = store.begin().await.unwrap();

        tx.upsert_customer(Customer {
            id: 1,
            name: "Zarelli".to_string(),
        })
        .await
        .unwrap();
        tx.upsert_customer(Customer {
            id: 2,
            name: "Medeiros".to_string(),
        })
        .await
        .unwrap();

        for (order_id, customer_id, day, total) in [
            (10, 1, "2021-01-15", "5.00"),
            (11, 1, "2021-06-30", "7.50"),
            (12, 2, "2021-12-01", "2.00"),
        ] {
            tx.upsert_order(Order {
                id: order_id,
                customer_id,
                date: date(day),
                total: dec(total),
            })
            .await
            .unwrap();
            tx.upsert_item(OrderItem {
                order_id,
                product_id: 111,
                value: dec(total),
            })
            .await
            .unwrap();
        }

        // Broken reference: no customer 404 exists.
        tx.upsert_order(Order {
            id: 99,
            customer_id: 404,
            date: date("2021-06-01"),
            total: dec("1.00"),
        })
        .await
        .unwrap();

        tx.commit().await.unwrap();
        store
    }

    #[tokio::test]
    async fn query_by_order_id_returns_one_customer_with_one_order() {
        let store = seeded_store().await;
        let filter = OrderFilter {
            order_id: Some(11),
            ..Default::default()
        };

        let result = query_orders(&store, &filter).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].user_id, 1);
        assert_eq!(result[0].orders.len(), 1);
        assert_eq!(result[0].orders[0].order_id, 11);
        assert_eq!(result[0].orders[0].total, "7.50");
        assert_eq!(result[0].orders[0].products.len(), 1);
    }

    #[tokio::test]
    async fn query_by_unknown_order_id_is_empty() {
        let store = seeded_store().await;
        let filter = OrderFilter {
            order_id: Some(9999),
            ..Default::default()
        };

        let result = query_orders(&store, &filter).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn date_range_bounds_are_inclusive() {
        let store = seeded_store().await;
        let filter = OrderFilter {
            start_date: Some(date("2021-01-15")),
            end_date: Some(date("2021-06-30")),
            ..Default::default()
        };

        let result = query_orders(&store, &filter).await.unwrap();

        let order_ids: Vec<u64> = result
            .iter()
            .flat_map(|c| c.orders.iter().map(|o| o.order_id))
            .collect();
        assert_eq!(order_ids, vec![10, 11]);
    }

    #[tokio::test]
    async fn a_lone_date_bound_falls_through_to_fetch_all() {
        let store = seeded_store().await;
        let filter = OrderFilter {
            start_date: Some(date("2021-12-01")),
            ..Default::default()
        };

        let result = query_orders(&store, &filter).await.unwrap();

        let total_orders: usize = result.iter().map(|c| c.orders.len()).sum();
        assert_eq!(total_orders, 3);
    }

    #[tokio::test]
    async fn no_filter_fetches_everything_grouped_by_customer() {
        let store = seeded_store().await;

        let result = query_orders(&store, &OrderFilter::default()).await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].user_id, 1);
        assert_eq!(result[0].orders.len(), 2);
        assert_eq!(result[1].user_id, 2);
        assert_eq!(result[1].orders.len(), 1);
    }

    #[tokio::test]
    async fn orders_with_missing_customers_are_skipped() {
        let store = seeded_store().await;

        let result = query_orders(&store, &OrderFilter::default()).await.unwrap();

        assert!(result
            .iter()
            .all(|c| c.orders.iter().all(|o| o.order_id != 99)));
    }

    #[tokio::test]
    async fn an_itemless_order_yields_an_empty_product_list() {
        let store = InMemoryOrderStore::new();
        let mut tx = store.begin().await.unwrap();
        tx.upsert_customer(Customer {
            id: 1,
            name: "Zarelli".to_string(),
        })
        .await
        .unwrap();
        tx.upsert_order(Order {
            id: 10,
            customer_id: 1,
            date: date("2021-01-01"),
            total: Decimal::ZERO,
        })
        .await
        .unwrap();
        tx.commit().await.unwrap();

        let result = query_orders(&store, &OrderFilter::default()).await.unwrap();

        assert_eq!(result[0].orders[0].products.len(), 0);
        assert_eq!(result[0].orders[0].total, "0.00");
    }
}
