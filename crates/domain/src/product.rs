//! Catalog product entity.

use chrono::{DateTime, Utc};
use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// A sellable catalog entry.
///
/// `stock` counts sellable units and is `u32` so it can never go
/// negative; all decrements go through the store's conditional
/// check-and-decrement operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,

    /// Display name.
    pub name: String,

    /// Longer description for product pages.
    pub description: String,

    /// Current unit price.
    pub price: Money,

    /// Sellable units on hand.
    pub stock: u32,

    /// Archived products stay readable but are hidden from active listings.
    pub is_active: bool,

    /// When the product was added to the catalog.
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Creates a new active product with a generated ID.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Money,
        stock: u32,
    ) -> Self {
        Self {
            id: ProductId::new(),
            name: name.into(),
            description: description.into(),
            price,
            stock,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    /// Returns true if at least `quantity` units are in stock.
    pub fn has_stock(&self, quantity: u32) -> bool {
        self.stock >= quantity
    }
}

/// A partial update to a product's catalog fields.
///
/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUpdate {
    /// New display name, if changing.
    pub name: Option<String>,

    /// New description, if changing.
    pub description: Option<String>,

    /// New unit price, if changing.
    pub price: Option<Money>,

    /// New stock level, if changing.
    pub stock: Option<u32>,
}

impl ProductUpdate {
    /// Applies the update to a product in place.
    pub fn apply(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
    }
}
