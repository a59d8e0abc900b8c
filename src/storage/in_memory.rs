//! In-memory implementation of the order store for development and tests
//!
//! Tables live behind an `Arc<RwLock<…>>`. A transaction clones the whole
//! state, stages every write on the clone, and swaps it back in on commit;
//! dropping the transaction without committing discards the clone. That
//! makes each upload all-or-nothing. Two racing transactions serialize on
//! the commit lock and the later commit wins whole (lost update, no torn
//! state), matching the accepted isolation limitation of the service.

use async_trait::async_trait;
use chrono::NaiveDate;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::core::error::StoreError;
use crate::core::model::{Customer, FetchedOrder, Order, OrderItem, OrderItemKey, Product};
use crate::core::store::{OrderStore, OrderTx};

/// All four tables. Orders and items are insertion-ordered because the
/// store's return order is observable in query responses.
#[derive(Debug, Clone, Default)]
struct Tables {
    customers: HashMap<u64, Customer>,
    orders: IndexMap<u64, Order>,
    products: HashMap<u64, Product>,
    items: IndexMap<OrderItemKey, OrderItem>,
}

impl Tables {
    fn items_for(&self, order_id: u64) -> Vec<OrderItem> {
        self.items
            .values()
            .filter(|item| item.order_id == order_id)
            .cloned()
            .collect()
    }

    fn fetch(&self, order: &Order) -> FetchedOrder {
        FetchedOrder {
            order: order.clone(),
            items: self.items_for(order.id),
        }
    }
}

/// In-memory order store
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn begin(&self) -> Result<Box<dyn OrderTx>, StoreError> {
        let staged = self.read()?.clone();
        Ok(Box::new(InMemoryTx {
            shared: Arc::clone(&self.tables),
            staged,
        }))
    }

    async fn find_customer(&self, id: u64) -> Result<Option<Customer>, StoreError> {
        Ok(self.read()?.customers.get(&id).cloned())
    }

    async fn find_product(&self, id: u64) -> Result<Option<Product>, StoreError> {
        Ok(self.read()?.products.get(&id).copied())
    }

    async fn fetch_order(&self, order_id: u64) -> Result<Option<FetchedOrder>, StoreError> {
        let tables = self.read()?;
        Ok(tables.orders.get(&order_id).map(|order| tables.fetch(order)))
    }

    async fn fetch_orders_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<FetchedOrder>, StoreError> {
        let tables = self.read()?;
        Ok(tables
            .orders
            .values()
            .filter(|order| order.date >= start && order.date <= end)
            .map(|order| tables.fetch(order))
            .collect())
    }

    async fn fetch_all_orders(&self) -> Result<Vec<FetchedOrder>, StoreError> {
        let tables = self.read()?;
        Ok(tables.orders.values().map(|order| tables.fetch(order)).collect())
    }
}

/// One open transaction: a private copy of the tables plus the handle used
/// to publish it on commit
struct InMemoryTx {
    shared: Arc<RwLock<Tables>>,
    staged: Tables,
}

#[async_trait]
impl OrderTx for InMemoryTx {
    async fn find_customer(&mut self, id: u64) -> Result<Option<Customer>, StoreError> {
        Ok(self.staged.customers.get(&id).cloned())
    }

    async fn upsert_customer(&mut self, customer: Customer) -> Result<(), StoreError> {
        self.staged.customers.insert(customer.id, customer);
        Ok(())
    }

    async fn find_order(&mut self, id: u64) -> Result<Option<Order>, StoreError> {
        Ok(self.staged.orders.get(&id).cloned())
    }

    async fn upsert_order(&mut self, order: Order) -> Result<(), StoreError> {
        self.staged.orders.insert(order.id, order);
        Ok(())
    }

    async fn find_product(&mut self, id: u64) -> Result<Option<Product>, StoreError> {
        Ok(self.staged.products.get(&id).copied())
    }

    async fn upsert_product(&mut self, product: Product) -> Result<(), StoreError> {
        self.staged.products.insert(product.id, product);
        Ok(())
    }

    async fn find_item(&mut self, key: OrderItemKey) -> Result<Option<OrderItem>, StoreError> {
        Ok(self.staged.items.get(&key).cloned())
    }

    async fn upsert_item(&mut self, item: OrderItem) -> Result<(), StoreError> {
        self.staged.items.insert(item.key(), item);
        Ok(())
    }

    async fn items_by_order(&mut self, order_id: u64) -> Result<Vec<OrderItem>, StoreError> {
        Ok(self.staged.items_for(order_id))
    }

    async fn delete_order(&mut self, order_id: u64) -> Result<(), StoreError> {
        self.staged.orders.shift_remove(&order_id);
        // Cascade: no item row may outlive its order.
        self.staged.items.retain(|key, _| key.0 != order_id);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let mut tables = self
            .shared
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        *tables = self.staged;
        Ok(())
    }
}
