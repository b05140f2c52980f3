//! Product store trait.

use async_trait::async_trait;
use common::ProductId;
use domain::{Product, ProductUpdate};

use crate::error::Result;

/// Outcome of a conditional stock mutation.
///
/// Stock checks and decrements are a single atomic operation per
/// product, so two checkouts racing for the last units cannot both
/// succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockUpdate {
    /// The mutation was applied; `remaining` is the stock afterward.
    Applied { remaining: u32 },

    /// Not enough stock; nothing was changed.
    Insufficient { available: u32 },

    /// The product does not exist.
    Missing,
}

impl StockUpdate {
    /// Returns true if the mutation was applied.
    pub fn is_applied(&self) -> bool {
        matches!(self, StockUpdate::Applied { .. })
    }
}

/// Storage for catalog products and their stock counts.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Inserts a new product.
    async fn insert(&self, product: Product) -> Result<()>;

    /// Loads a product by ID.
    async fn get(&self, id: ProductId) -> Result<Option<Product>>;

    /// Lists all products, including archived ones.
    async fn list(&self) -> Result<Vec<Product>>;

    /// Lists only active products.
    async fn list_active(&self) -> Result<Vec<Product>>;

    /// Applies a partial update, returning the updated product.
    ///
    /// Returns `None` if the product does not exist.
    async fn update(&self, id: ProductId, update: ProductUpdate) -> Result<Option<Product>>;

    /// Archives or activates a product. Returns false if it does not exist.
    async fn set_active(&self, id: ProductId, active: bool) -> Result<bool>;

    /// Deletes a product. Returns false if it does not exist.
    async fn remove(&self, id: ProductId) -> Result<bool>;

    /// Atomically decrements stock if at least `quantity` units remain.
    async fn decrement_stock(&self, id: ProductId, quantity: u32) -> Result<StockUpdate>;

    /// Adds units back to stock (rollback and cancellation restock).
    ///
    /// Never reports `Insufficient`.
    async fn increment_stock(&self, id: ProductId, quantity: u32) -> Result<StockUpdate>;
}
