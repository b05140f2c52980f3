//! Cart store trait.

use async_trait::async_trait;
use common::{ProductId, UserId};
use domain::Cart;

use crate::error::Result;

/// Storage for user carts, one document per user.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Loads the cart owned by a user.
    async fn get(&self, user_id: UserId) -> Result<Option<Cart>>;

    /// Saves a cart, replacing any existing document for the same user.
    async fn put(&self, cart: &Cart) -> Result<()>;

    /// Removes the given products from a user's cart and recomputes its
    /// total, returning the updated cart.
    ///
    /// Returns `None` if the user has no cart. Products not present in
    /// the cart are ignored.
    async fn remove_items(
        &self,
        user_id: UserId,
        product_ids: &[ProductId],
    ) -> Result<Option<Cart>>;

    /// Deletes a user's cart. Returns false if there was none.
    async fn delete(&self, user_id: UserId) -> Result<bool>;
}
