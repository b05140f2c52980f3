//! Product catalog service.

use common::{Actor, ProductId};
use domain::{Money, Product, ProductUpdate};
use store::ProductStore;

use crate::error::{CatalogError, Result};

/// Manages the product catalog.
///
/// Mutations are admin-only; reads are open to everyone. Archiving
/// hides a product from the active listing without deleting it, so
/// existing carts and orders keep resolving.
pub struct ProductCatalog<P: ProductStore> {
    products: P,
}

impl<P: ProductStore> ProductCatalog<P> {
    /// Creates a new catalog service over the given store.
    pub fn new(products: P) -> Self {
        Self { products }
    }

    fn require_admin(actor: &Actor) -> Result<()> {
        if !actor.is_admin {
            return Err(CatalogError::Forbidden {
                user_id: actor.user_id,
            });
        }
        Ok(())
    }

    /// Adds a new product to the catalog.
    #[tracing::instrument(skip(self, name, description))]
    pub async fn create(
        &self,
        actor: &Actor,
        name: impl Into<String>,
        description: impl Into<String>,
        price: Money,
        stock: u32,
    ) -> Result<Product> {
        Self::require_admin(actor)?;

        let product = Product::new(name, description, price, stock);
        self.products.insert(product.clone()).await?;

        tracing::info!(product_id = %product.id, "product created");
        Ok(product)
    }

    /// Applies a partial update to a product.
    #[tracing::instrument(skip(self))]
    pub async fn update(
        &self,
        actor: &Actor,
        product_id: ProductId,
        update: ProductUpdate,
    ) -> Result<Product> {
        Self::require_admin(actor)?;

        self.products
            .update(product_id, update)
            .await?
            .ok_or(CatalogError::ProductNotFound(product_id))
    }

    /// Hides a product from the active listing.
    #[tracing::instrument(skip(self))]
    pub async fn archive(&self, actor: &Actor, product_id: ProductId) -> Result<()> {
        Self::require_admin(actor)?;

        if !self.products.set_active(product_id, false).await? {
            return Err(CatalogError::ProductNotFound(product_id));
        }
        Ok(())
    }

    /// Returns an archived product to the active listing.
    #[tracing::instrument(skip(self))]
    pub async fn activate(&self, actor: &Actor, product_id: ProductId) -> Result<()> {
        Self::require_admin(actor)?;

        if !self.products.set_active(product_id, true).await? {
            return Err(CatalogError::ProductNotFound(product_id));
        }
        Ok(())
    }

    /// Deletes a product from the catalog.
    #[tracing::instrument(skip(self))]
    pub async fn remove(&self, actor: &Actor, product_id: ProductId) -> Result<()> {
        Self::require_admin(actor)?;

        if !self.products.remove(product_id).await? {
            return Err(CatalogError::ProductNotFound(product_id));
        }
        Ok(())
    }

    /// Loads a single product.
    pub async fn get(&self, product_id: ProductId) -> Result<Product> {
        self.products
            .get(product_id)
            .await?
            .ok_or(CatalogError::ProductNotFound(product_id))
    }

    /// Lists all products, including archived ones.
    pub async fn list(&self) -> Result<Vec<Product>> {
        Ok(self.products.list().await?)
    }

    /// Lists only active products.
    pub async fn list_active(&self) -> Result<Vec<Product>> {
        Ok(self.products.list_active().await?)
    }
}
