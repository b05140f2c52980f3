use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{OrderId, ProductId, UserId};
use domain::{Cart, Order, OrderStatus, Product, ProductUpdate};
use tokio::sync::RwLock;

use crate::{
    StoreError,
    cart::CartStore,
    error::Result,
    job::{TransitionJob, TransitionJobStore},
    order::{OrderStore, StatusUpdate},
    product::{ProductStore, StockUpdate},
};

/// Injected failures for exercising rollback paths in tests.
#[derive(Debug, Default)]
struct FailureInjection {
    order_insert: bool,
    cart_write: bool,
    decrement_for: Option<ProductId>,
}

/// In-memory implementation of every store trait.
///
/// Used for testing and as the default backend. Provides the same
/// interface as the PostgreSQL implementation; conditional mutations
/// are serialized by the per-map write locks.
#[derive(Clone, Default)]
pub struct MemoryStore {
    products: Arc<RwLock<HashMap<ProductId, Product>>>,
    carts: Arc<RwLock<HashMap<UserId, Cart>>>,
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
    jobs: Arc<RwLock<Vec<TransitionJob>>>,
    fail: Arc<Mutex<FailureInjection>>,
}

impl MemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures order inserts to fail with a backend error.
    pub fn set_fail_on_order_insert(&self, fail: bool) {
        self.fail.lock().unwrap().order_insert = fail;
    }

    /// Configures cart writes to fail with a backend error.
    pub fn set_fail_on_cart_write(&self, fail: bool) {
        self.fail.lock().unwrap().cart_write = fail;
    }

    /// Configures stock decrements of one product to fail with a
    /// backend error.
    pub fn set_fail_on_decrement(&self, product_id: Option<ProductId>) {
        self.fail.lock().unwrap().decrement_for = product_id;
    }

    /// Returns the total number of stored orders.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }

    /// Clears all data and failure injections.
    pub async fn clear(&self) {
        self.products.write().await.clear();
        self.carts.write().await.clear();
        self.orders.write().await.clear();
        self.jobs.write().await.clear();
        *self.fail.lock().unwrap() = FailureInjection::default();
    }
}

fn sorted_products(mut products: Vec<Product>) -> Vec<Product> {
    products.sort_by_key(|p| (p.created_at, p.id.as_uuid()));
    products
}

fn sorted_orders(mut orders: Vec<Order>) -> Vec<Order> {
    orders.sort_by_key(|o| (o.created_at, o.id.as_uuid()));
    orders
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn insert(&self, product: Product) -> Result<()> {
        self.products.write().await.insert(product.id, product);
        Ok(())
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Product>> {
        let products = self.products.read().await;
        Ok(sorted_products(products.values().cloned().collect()))
    }

    async fn list_active(&self) -> Result<Vec<Product>> {
        let products = self.products.read().await;
        Ok(sorted_products(
            products.values().filter(|p| p.is_active).cloned().collect(),
        ))
    }

    async fn update(&self, id: ProductId, update: ProductUpdate) -> Result<Option<Product>> {
        let mut products = self.products.write().await;
        match products.get_mut(&id) {
            Some(product) => {
                update.apply(product);
                Ok(Some(product.clone()))
            }
            None => Ok(None),
        }
    }

    async fn set_active(&self, id: ProductId, active: bool) -> Result<bool> {
        let mut products = self.products.write().await;
        match products.get_mut(&id) {
            Some(product) => {
                product.is_active = active;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove(&self, id: ProductId) -> Result<bool> {
        Ok(self.products.write().await.remove(&id).is_some())
    }

    async fn decrement_stock(&self, id: ProductId, quantity: u32) -> Result<StockUpdate> {
        if self.fail.lock().unwrap().decrement_for == Some(id) {
            return Err(StoreError::Backend("injected decrement failure".into()));
        }

        let mut products = self.products.write().await;
        let Some(product) = products.get_mut(&id) else {
            return Ok(StockUpdate::Missing);
        };

        if product.stock < quantity {
            return Ok(StockUpdate::Insufficient {
                available: product.stock,
            });
        }

        product.stock -= quantity;
        Ok(StockUpdate::Applied {
            remaining: product.stock,
        })
    }

    async fn increment_stock(&self, id: ProductId, quantity: u32) -> Result<StockUpdate> {
        let mut products = self.products.write().await;
        let Some(product) = products.get_mut(&id) else {
            return Ok(StockUpdate::Missing);
        };

        product.stock += quantity;
        Ok(StockUpdate::Applied {
            remaining: product.stock,
        })
    }
}

#[async_trait]
impl CartStore for MemoryStore {
    async fn get(&self, user_id: UserId) -> Result<Option<Cart>> {
        Ok(self.carts.read().await.get(&user_id).cloned())
    }

    async fn put(&self, cart: &Cart) -> Result<()> {
        if self.fail.lock().unwrap().cart_write {
            return Err(StoreError::Backend("injected cart write failure".into()));
        }

        self.carts.write().await.insert(cart.user_id, cart.clone());
        Ok(())
    }

    async fn remove_items(
        &self,
        user_id: UserId,
        product_ids: &[ProductId],
    ) -> Result<Option<Cart>> {
        if self.fail.lock().unwrap().cart_write {
            return Err(StoreError::Backend("injected cart write failure".into()));
        }

        let mut carts = self.carts.write().await;
        match carts.get_mut(&user_id) {
            Some(cart) => {
                cart.remove_items(product_ids);
                Ok(Some(cart.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, user_id: UserId) -> Result<bool> {
        Ok(self.carts.write().await.remove(&user_id).is_some())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn insert(&self, order: &Order) -> Result<()> {
        if self.fail.lock().unwrap().order_insert {
            return Err(StoreError::Backend("injected order insert failure".into()));
        }

        self.orders.write().await.insert(order.id, order.clone());
        Ok(())
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>> {
        let orders = self.orders.read().await;
        Ok(sorted_orders(
            orders
                .values()
                .filter(|o| o.user_id == user_id)
                .cloned()
                .collect(),
        ))
    }

    async fn list_all(&self) -> Result<Vec<Order>> {
        let orders = self.orders.read().await;
        Ok(sorted_orders(orders.values().cloned().collect()))
    }

    async fn update_status_if(
        &self,
        id: OrderId,
        expected: OrderStatus,
        next: OrderStatus,
    ) -> Result<StatusUpdate> {
        let mut orders = self.orders.write().await;
        let Some(order) = orders.get_mut(&id) else {
            return Ok(StatusUpdate::Missing);
        };

        if order.status != expected {
            return Ok(StatusUpdate::Skipped {
                actual: order.status,
            });
        }

        order.status = next;
        Ok(StatusUpdate::Applied)
    }
}

#[async_trait]
impl TransitionJobStore for MemoryStore {
    async fn enqueue(&self, job: TransitionJob) -> Result<()> {
        self.jobs.write().await.push(job);
        Ok(())
    }

    async fn claim_due(&self, now: DateTime<Utc>) -> Result<Vec<TransitionJob>> {
        let mut jobs = self.jobs.write().await;
        let mut due: Vec<TransitionJob> = Vec::new();
        jobs.retain(|job| {
            if job.is_due(now) {
                due.push(job.clone());
                false
            } else {
                true
            }
        });
        due.sort_by_key(|job| job.due_at);
        Ok(due)
    }

    async fn pending_count(&self) -> Result<usize> {
        Ok(self.jobs.read().await.len())
    }
}
