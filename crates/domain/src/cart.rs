//! Shopping cart entity.

use common::{ProductId, UserId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::Money;

/// Errors raised by cart mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The product is not in the cart.
    #[error("item not in cart: {0}")]
    ItemNotFound(ProductId),

    /// A quantity of zero is not representable in a cart.
    #[error("invalid quantity {quantity} for item {product_id}")]
    InvalidQuantity { product_id: ProductId, quantity: u32 },
}

/// How to change a cart item's quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuantityAction {
    /// Replace the quantity outright.
    Set(u32),

    /// Add one unit.
    Increment,

    /// Remove one unit, never going below one.
    Decrement,
}

/// A line item in a cart.
///
/// Name and price are snapshotted from the product at the time the item
/// was added, so the cart renders consistently even if the catalog
/// changes afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// The product this line refers to.
    pub product_id: ProductId,

    /// Product name at add time.
    pub product_name: String,

    /// Unit price at add time.
    pub unit_price: Money,

    /// Units of the product in the cart.
    pub quantity: u32,
}

impl CartItem {
    /// Creates a new cart line item.
    pub fn new(
        product_id: ProductId,
        product_name: impl Into<String>,
        unit_price: Money,
        quantity: u32,
    ) -> Self {
        Self {
            product_id,
            product_name: product_name.into(),
            unit_price,
            quantity,
        }
    }

    /// Returns the total price for this line (quantity * unit_price).
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// A user's shopping cart.
///
/// Items are kept in insertion order, one line per product. The total
/// amount is recomputed by every mutation, so it always equals the sum
/// of the current line totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    /// The owning user.
    pub user_id: UserId,

    items: Vec<CartItem>,
    total_amount: Money,
}

impl Cart {
    /// Creates an empty cart for a user.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            items: Vec::new(),
            total_amount: Money::zero(),
        }
    }

    /// Rebuilds a cart from stored line items, recomputing the total.
    pub fn from_items(user_id: UserId, items: Vec<CartItem>) -> Self {
        let mut cart = Self {
            user_id,
            items,
            total_amount: Money::zero(),
        };
        cart.recompute_total();
        cart
    }

    /// Adds an item, merging quantities if the product is already present.
    ///
    /// Merging refreshes the name/price snapshot to the incoming item's
    /// values, since they were resolved from the catalog more recently.
    pub fn add_item(&mut self, item: CartItem) {
        match self
            .items
            .iter_mut()
            .find(|existing| existing.product_id == item.product_id)
        {
            Some(existing) => {
                existing.quantity += item.quantity;
                existing.product_name = item.product_name;
                existing.unit_price = item.unit_price;
            }
            None => self.items.push(item),
        }
        self.recompute_total();
    }

    /// Changes the quantity of an item already in the cart.
    pub fn update_quantity(
        &mut self,
        product_id: ProductId,
        action: QuantityAction,
    ) -> Result<(), CartError> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.product_id == product_id)
            .ok_or(CartError::ItemNotFound(product_id))?;

        match action {
            QuantityAction::Set(quantity) => {
                if quantity == 0 {
                    return Err(CartError::InvalidQuantity {
                        product_id,
                        quantity,
                    });
                }
                item.quantity = quantity;
            }
            QuantityAction::Increment => item.quantity += 1,
            QuantityAction::Decrement => item.quantity = item.quantity.saturating_sub(1).max(1),
        }

        self.recompute_total();
        Ok(())
    }

    /// Removes a single item from the cart.
    pub fn remove_item(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let before = self.items.len();
        self.items.retain(|item| item.product_id != product_id);
        if self.items.len() == before {
            return Err(CartError::ItemNotFound(product_id));
        }
        self.recompute_total();
        Ok(())
    }

    /// Removes every item whose product is in `product_ids`.
    ///
    /// Missing products are ignored; this is the partial clearing used
    /// after checkout consumes a subset of the cart.
    pub fn remove_items(&mut self, product_ids: &[ProductId]) {
        self.items
            .retain(|item| !product_ids.contains(&item.product_id));
        self.recompute_total();
    }

    /// Returns the item for a product, if present.
    pub fn get_item(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    /// Iterates over the items in insertion order.
    pub fn items(&self) -> impl Iterator<Item = &CartItem> {
        self.items.iter()
    }

    /// Returns the number of line items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the cart has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the aggregate total, always the sum of the line totals.
    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    fn recompute_total(&mut self) {
        self.total_amount = self.items.iter().map(CartItem::line_total).sum();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product_id: ProductId, cents: i64, quantity: u32) -> CartItem {
        CartItem::new(product_id, "Widget", Money::from_cents(cents), quantity)
    }

    #[test]
    fn empty_cart_has_zero_total() {
        let cart = Cart::new(UserId::new());
        assert!(cart.is_empty());
        assert!(cart.total_amount().is_zero());
    }

    #[test]
    fn add_item_updates_total() {
        let mut cart = Cart::new(UserId::new());
        cart.add_item(item(ProductId::new(), 1000, 2));
        cart.add_item(item(ProductId::new(), 500, 1));

        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total_amount().cents(), 2500);
    }

    #[test]
    fn adding_same_product_merges_quantities() {
        let product_id = ProductId::new();
        let mut cart = Cart::new(UserId::new());
        cart.add_item(item(product_id, 1000, 2));
        cart.add_item(item(product_id, 1000, 3));

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.get_item(product_id).unwrap().quantity, 5);
        assert_eq!(cart.total_amount().cents(), 5000);
    }

    #[test]
    fn merge_refreshes_price_snapshot() {
        let product_id = ProductId::new();
        let mut cart = Cart::new(UserId::new());
        cart.add_item(item(product_id, 1000, 1));
        cart.add_item(item(product_id, 1200, 1));

        let line = cart.get_item(product_id).unwrap();
        assert_eq!(line.unit_price.cents(), 1200);
        assert_eq!(cart.total_amount().cents(), 2400);
    }

    #[test]
    fn update_quantity_set() {
        let product_id = ProductId::new();
        let mut cart = Cart::new(UserId::new());
        cart.add_item(item(product_id, 1000, 2));

        cart.update_quantity(product_id, QuantityAction::Set(5))
            .unwrap();
        assert_eq!(cart.get_item(product_id).unwrap().quantity, 5);
        assert_eq!(cart.total_amount().cents(), 5000);
    }

    #[test]
    fn update_quantity_rejects_zero() {
        let product_id = ProductId::new();
        let mut cart = Cart::new(UserId::new());
        cart.add_item(item(product_id, 1000, 2));

        let result = cart.update_quantity(product_id, QuantityAction::Set(0));
        assert_eq!(
            result,
            Err(CartError::InvalidQuantity {
                product_id,
                quantity: 0
            })
        );
    }

    #[test]
    fn decrement_floors_at_one() {
        let product_id = ProductId::new();
        let mut cart = Cart::new(UserId::new());
        cart.add_item(item(product_id, 1000, 1));

        cart.update_quantity(product_id, QuantityAction::Decrement)
            .unwrap();
        assert_eq!(cart.get_item(product_id).unwrap().quantity, 1);
    }

    #[test]
    fn increment_adds_one() {
        let product_id = ProductId::new();
        let mut cart = Cart::new(UserId::new());
        cart.add_item(item(product_id, 1000, 1));

        cart.update_quantity(product_id, QuantityAction::Increment)
            .unwrap();
        assert_eq!(cart.get_item(product_id).unwrap().quantity, 2);
    }

    #[test]
    fn update_missing_item_fails() {
        let mut cart = Cart::new(UserId::new());
        let missing = ProductId::new();
        let result = cart.update_quantity(missing, QuantityAction::Increment);
        assert_eq!(result, Err(CartError::ItemNotFound(missing)));
    }

    #[test]
    fn remove_item_updates_total() {
        let product_id = ProductId::new();
        let mut cart = Cart::new(UserId::new());
        cart.add_item(item(product_id, 1000, 2));
        cart.add_item(item(ProductId::new(), 500, 1));

        cart.remove_item(product_id).unwrap();
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_amount().cents(), 500);
    }

    #[test]
    fn remove_items_ignores_missing_products() {
        let kept = ProductId::new();
        let removed = ProductId::new();
        let mut cart = Cart::new(UserId::new());
        cart.add_item(item(kept, 1000, 1));
        cart.add_item(item(removed, 500, 2));

        cart.remove_items(&[removed, ProductId::new()]);

        assert_eq!(cart.item_count(), 1);
        assert!(cart.get_item(kept).is_some());
        assert_eq!(cart.total_amount().cents(), 1000);
    }

    #[test]
    fn from_items_recomputes_total() {
        let items = vec![
            item(ProductId::new(), 1000, 2),
            item(ProductId::new(), 300, 3),
        ];
        let cart = Cart::from_items(UserId::new(), items);
        assert_eq!(cart.total_amount().cents(), 2900);
    }
}
