//! Cart service.

use common::{ProductId, UserId};
use domain::{Cart, CartItem, QuantityAction};
use store::{CartStore, ProductStore};

use crate::error::{CatalogError, Result};

/// Manages user carts.
///
/// Adding an item resolves the product from the catalog, verifies
/// stock, and snapshots its name and price into the cart line. Stock is
/// only checked here, not reserved; the authoritative check-and-decrement
/// happens at checkout.
pub struct CartService<P: ProductStore, C: CartStore> {
    products: P,
    carts: C,
}

impl<P: ProductStore, C: CartStore> CartService<P, C> {
    /// Creates a new cart service over the given stores.
    pub fn new(products: P, carts: C) -> Self {
        Self { products, carts }
    }

    /// Adds products to a user's cart, creating the cart if needed.
    ///
    /// Quantities for products already in the cart are merged.
    #[tracing::instrument(skip(self, items))]
    pub async fn add_items(
        &self,
        user_id: UserId,
        items: &[(ProductId, u32)],
    ) -> Result<Cart> {
        let mut cart = self
            .carts
            .get(user_id)
            .await?
            .unwrap_or_else(|| Cart::new(user_id));

        for &(product_id, quantity) in items {
            if quantity == 0 {
                return Err(CatalogError::InvalidQuantity {
                    product_id,
                    quantity,
                });
            }

            let product = self
                .products
                .get(product_id)
                .await?
                .ok_or(CatalogError::ProductNotFound(product_id))?;

            if !product.has_stock(quantity) {
                return Err(CatalogError::InsufficientStock {
                    product_id,
                    available: product.stock,
                    requested: quantity,
                });
            }

            cart.add_item(CartItem::new(
                product_id,
                product.name,
                product.price,
                quantity,
            ));
        }

        self.carts.put(&cart).await?;
        tracing::info!(%user_id, item_count = cart.item_count(), "items added to cart");
        Ok(cart)
    }

    /// Changes the quantity of an item already in the cart.
    #[tracing::instrument(skip(self))]
    pub async fn update_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        action: QuantityAction,
    ) -> Result<Cart> {
        let mut cart = self
            .carts
            .get(user_id)
            .await?
            .ok_or(CatalogError::CartNotFound(user_id))?;

        cart.update_quantity(product_id, action)?;
        self.carts.put(&cart).await?;
        Ok(cart)
    }

    /// Removes a product from the cart.
    #[tracing::instrument(skip(self))]
    pub async fn remove_item(&self, user_id: UserId, product_id: ProductId) -> Result<Cart> {
        let mut cart = self
            .carts
            .get(user_id)
            .await?
            .ok_or(CatalogError::CartNotFound(user_id))?;

        cart.remove_item(product_id)?;
        self.carts.put(&cart).await?;
        Ok(cart)
    }

    /// Loads a user's cart.
    pub async fn get_cart(&self, user_id: UserId) -> Result<Cart> {
        self.carts
            .get(user_id)
            .await?
            .ok_or(CatalogError::CartNotFound(user_id))
    }
}
