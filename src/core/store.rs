//! Store traits the merge and query sides are written against
//!
//! The persistent engine is a collaborator, not part of this crate: all the
//! core needs is find-by-id and upsert-by-id for the four row kinds, inside a
//! single atomic transaction per uploaded file, plus a handful of read-side
//! fetches. Implementations decide isolation; two concurrent uploads race at
//! whatever level the backend provides.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::core::error::StoreError;
use crate::core::model::{Customer, FetchedOrder, Order, OrderItem, OrderItemKey, Product};

/// A transactional order store
///
/// Read methods observe committed state only. All writes go through a
/// transaction obtained from [`begin`](OrderStore::begin).
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Open a transaction. Writes staged inside it become visible atomically
    /// on [`commit`](OrderTx::commit); dropping the transaction without
    /// committing discards everything it staged.
    async fn begin(&self) -> Result<Box<dyn OrderTx>, StoreError>;

    /// Look up a customer row by id (committed view).
    async fn find_customer(&self, id: u64) -> Result<Option<Customer>, StoreError>;

    /// Look up a product row by id (committed view).
    async fn find_product(&self, id: u64) -> Result<Option<Product>, StoreError>;

    /// Fetch one order with its items eagerly loaded.
    async fn fetch_order(&self, order_id: u64) -> Result<Option<FetchedOrder>, StoreError>;

    /// Fetch all orders whose date falls in `[start, end]`, both inclusive,
    /// items eagerly loaded, in the store's return order.
    async fn fetch_orders_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<FetchedOrder>, StoreError>;

    /// Fetch every order in the store, items eagerly loaded.
    ///
    /// Unbounded: there is no pagination, callers own the consequences.
    async fn fetch_all_orders(&self) -> Result<Vec<FetchedOrder>, StoreError>;
}

/// One open transaction against an [`OrderStore`]
///
/// Reads inside the transaction observe its own staged writes. The
/// transaction is all-or-nothing: either [`commit`](OrderTx::commit) makes
/// every staged write visible together, or dropping the box discards them
/// all, including rows "saved" earlier in the same pass.
#[async_trait]
pub trait OrderTx: Send {
    async fn find_customer(&mut self, id: u64) -> Result<Option<Customer>, StoreError>;

    async fn upsert_customer(&mut self, customer: Customer) -> Result<(), StoreError>;

    async fn find_order(&mut self, id: u64) -> Result<Option<Order>, StoreError>;

    async fn upsert_order(&mut self, order: Order) -> Result<(), StoreError>;

    async fn find_product(&mut self, id: u64) -> Result<Option<Product>, StoreError>;

    async fn upsert_product(&mut self, product: Product) -> Result<(), StoreError>;

    async fn find_item(&mut self, key: OrderItemKey) -> Result<Option<OrderItem>, StoreError>;

    async fn upsert_item(&mut self, item: OrderItem) -> Result<(), StoreError>;

    /// All items belonging to one order, in stored order.
    async fn items_by_order(&mut self, order_id: u64) -> Result<Vec<OrderItem>, StoreError>;

    /// Delete an order and cascade to its items. Product and customer rows
    /// referenced by the order are left untouched.
    async fn delete_order(&mut self, order_id: u64) -> Result<(), StoreError>;

    /// Make every staged write visible atomically.
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}
