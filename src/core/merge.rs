//! Transactional merge of a file aggregate into the store
//!
//! Every row is handled find-or-create-then-overwrite, so re-processing the
//! same file converges to the same persisted state. The whole file is one
//! transaction: the first store failure discards every staged write.

use crate::core::aggregate::FileAggregate;
use crate::core::error::StoreError;
use crate::core::model::{Customer, Order, OrderItem, Product};
use crate::core::response::{format_amount, CustomerResponse, OrderResponse, ProductLineResponse};
use crate::core::store::{OrderStore, OrderTx};

/// Merge one aggregated file into the store and return the response
/// hierarchy for it.
///
/// Result ordering is fully deterministic given the input file: customers in
/// first-appearance order, orders in first-appearance order within their
/// customer, product lines in raw input order. The response mirrors every
/// input line, duplicates included, even though the stored item table keeps
/// at most one row per `(order, product)` pair.
pub async fn merge_file(
    store: &dyn OrderStore,
    aggregate: &FileAggregate,
) -> Result<Vec<CustomerResponse>, StoreError> {
    let mut tx = store.begin().await?;
    // A failure drops the transaction, which discards everything it staged.
    let response = apply(tx.as_mut(), aggregate).await?;
    tx.commit().await?;
    Ok(response)
}

async fn apply(
    tx: &mut dyn OrderTx,
    aggregate: &FileAggregate,
) -> Result<Vec<CustomerResponse>, StoreError> {
    let mut response = Vec::with_capacity(aggregate.customers.len());

    for (&customer_id, customer_acc) in &aggregate.customers {
        let mut customer = match tx.find_customer(customer_id).await? {
            Some(existing) => existing,
            None => Customer {
                id: customer_id,
                name: customer_acc.name.clone(),
            },
        };
        // Name is overwritten even when the row already existed: the last
        // processed file wins across uploads.
        customer.name = customer_acc.name.clone();
        tx.upsert_customer(customer).await?;

        let mut orders = Vec::with_capacity(customer_acc.orders.len());

        for (&order_id, order_acc) in &customer_acc.orders {
            let mut order = match tx.find_order(order_id).await? {
                Some(existing) => existing,
                None => Order {
                    id: order_id,
                    customer_id,
                    date: order_acc.date,
                    total: order_acc.total,
                },
            };
            order.customer_id = customer_id;
            order.date = order_acc.date;
            order.total = order_acc.total;
            tx.upsert_order(order).await?;

            let mut products = Vec::with_capacity(order_acc.items.len());

            for line in &order_acc.items {
                if tx.find_product(line.product_id).await?.is_none() {
                    tx.upsert_product(Product {
                        id: line.product_id,
                    })
                    .await?;
                }

                // Known quirk, kept on purpose: when a file repeats the same
                // (order, product) pair, the stored row converges to the LAST
                // line's value while the order total above summed EVERY line.
                let mut item = match tx.find_item((order_id, line.product_id)).await? {
                    Some(existing) => existing,
                    None => OrderItem {
                        order_id,
                        product_id: line.product_id,
                        value: line.value,
                    },
                };
                item.order_id = order_id;
                item.product_id = line.product_id;
                item.value = line.value;
                tx.upsert_item(item).await?;

                products.push(ProductLineResponse {
                    product_id: line.product_id,
                    value: format_amount(line.value),
                });
            }

            orders.push(OrderResponse {
                order_id,
                total: format_amount(order_acc.total),
                date: order_acc.date.to_string(),
                products,
            });
        }

        response.push(CustomerResponse {
            user_id: customer_id,
            name: customer_acc.name.clone(),
            orders,
        });
    }

    Ok(response)
}
