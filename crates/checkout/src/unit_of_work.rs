//! Compensation tracking for a single checkout attempt.

use common::ProductId;
use domain::Cart;
use store::{CartStore, ProductStore};

/// Records the effects applied during one checkout attempt so they can
/// be undone if a later step fails.
///
/// Effects are compensated in reverse order of application: the cart
/// document is restored first, then every stock decrement is released.
/// Compensations are idempotent within the attempt — each recorded
/// effect is undone exactly once — and a compensation failure is
/// logged without masking the error that triggered the rollback.
#[derive(Debug, Default)]
pub struct CheckoutUnitOfWork {
    reserved: Vec<(ProductId, u32)>,
    saved_cart: Option<Cart>,
}

impl CheckoutUnitOfWork {
    /// Starts an empty unit of work.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successful stock decrement.
    pub fn record_reservation(&mut self, product_id: ProductId, quantity: u32) {
        self.reserved.push((product_id, quantity));
    }

    /// Snapshots the cart before it is modified.
    pub fn record_cart_snapshot(&mut self, cart: Cart) {
        self.saved_cart = Some(cart);
    }

    /// Returns the number of recorded stock reservations.
    pub fn reservation_count(&self) -> usize {
        self.reserved.len()
    }

    /// Undoes every recorded effect, consuming the unit of work.
    pub async fn roll_back<P, C>(self, products: &P, carts: &C)
    where
        P: ProductStore,
        C: CartStore,
    {
        if let Some(cart) = &self.saved_cart {
            if let Err(e) = carts.put(cart).await {
                tracing::error!(user_id = %cart.user_id, error = %e, "failed to restore cart during rollback");
            }
        }

        for (product_id, quantity) in self.reserved.iter().rev() {
            if let Err(e) = products.increment_stock(*product_id, *quantity).await {
                tracing::error!(%product_id, quantity, error = %e, "failed to release stock during rollback");
            }
        }
    }
}
