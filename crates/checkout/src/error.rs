//! Checkout error types.

use common::{OrderId, ProductId, UserId};
use domain::OrderStatus;
use store::StoreError;
use thiserror::Error;

/// Errors that can occur during checkout and cancellation.
///
/// Validation failures (`ProductNotFound`, `InsufficientStock` before
/// any mutation, the request-shape variants) leave no trace; failures
/// during the mutation phase roll back every effect of the attempt
/// before being returned.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// A requested product does not exist.
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    /// The order does not exist.
    #[error("order not found: {0}")]
    OrderNotFound(OrderId),

    /// The user has no cart to check out.
    #[error("cart not found for user {0}")]
    CartNotFound(UserId),

    /// Checkout was requested with no items.
    #[error("checkout requires at least one item")]
    EmptyCheckout,

    /// A quantity of zero was requested.
    #[error("invalid quantity for product {0}: must be greater than zero")]
    InvalidQuantity(ProductId),

    /// Not enough stock to cover the requested quantity.
    #[error("insufficient stock for product {product_id}: {available} available, {requested} requested")]
    InsufficientStock {
        product_id: ProductId,
        available: u32,
        requested: u32,
    },

    /// The order is not in a status that permits the operation.
    #[error("order {order_id} is {status}, operation requires pending")]
    InvalidState {
        order_id: OrderId,
        status: OrderStatus,
    },

    /// The caller is neither the order's owner nor an admin.
    #[error("user {user_id} may not act on this order")]
    Forbidden { user_id: UserId },

    /// The underlying store failed to commit or roll back.
    #[error("transaction failed: {0}")]
    Transaction(#[from] StoreError),
}

/// Result type for checkout operations.
pub type Result<T> = std::result::Result<T, CheckoutError>;
