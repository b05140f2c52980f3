//! Catalog and cart service errors.

use common::{ProductId, UserId};
use domain::CartError;
use store::StoreError;
use thiserror::Error;

/// Errors raised by the catalog and cart services.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No product with the given ID exists.
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    /// The user has no cart.
    #[error("cart not found for user {0}")]
    CartNotFound(UserId),

    /// The product is not in the user's cart.
    #[error("item not in cart: {0}")]
    ItemNotFound(ProductId),

    /// Not enough stock to cover the requested quantity.
    #[error("insufficient stock for product {product_id}: {available} available, {requested} requested")]
    InsufficientStock {
        product_id: ProductId,
        available: u32,
        requested: u32,
    },

    /// A quantity of zero was requested.
    #[error("invalid quantity {quantity} for product {product_id}")]
    InvalidQuantity { product_id: ProductId, quantity: u32 },

    /// The caller lacks the admin role required for this operation.
    #[error("user {user_id} is not an admin")]
    Forbidden { user_id: UserId },

    /// The underlying store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl From<CartError> for CatalogError {
    fn from(e: CartError) -> Self {
        match e {
            CartError::ItemNotFound(product_id) => CatalogError::ItemNotFound(product_id),
            CartError::InvalidQuantity {
                product_id,
                quantity,
            } => CatalogError::InvalidQuantity {
                product_id,
                quantity,
            },
        }
    }
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
