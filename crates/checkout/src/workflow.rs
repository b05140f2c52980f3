//! Checkout workflow orchestration.

use chrono::Utc;
use common::{Actor, OrderId, ProductId, UserId};
use domain::{Order, OrderItem, OrderStatus, Product};
use serde::{Deserialize, Serialize};
use store::{
    CartStore, OrderStore, ProductStore, StatusUpdate, StockUpdate, TransitionJob,
    TransitionJobStore,
};

use crate::config::CheckoutConfig;
use crate::error::{CheckoutError, Result};
use crate::unit_of_work::CheckoutUnitOfWork;

/// One requested line of a checkout: a product and how many units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutItem {
    /// The product to purchase.
    pub product_id: ProductId,

    /// Units to purchase, must be greater than zero.
    pub quantity: u32,
}

impl CheckoutItem {
    /// Creates a new checkout line.
    pub fn new(product_id: ProductId, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// Orchestrates checkout and cancellation against the stores.
///
/// Checkout validates the request against the catalog, then applies its
/// three effects — stock decrements, cart clearing, order creation — as
/// an all-or-nothing unit: any failure undoes everything the attempt
/// already did before the error is returned. After a successful commit
/// the two delayed status transitions are scheduled best-effort.
pub struct CheckoutWorkflow<P, C, O, J>
where
    P: ProductStore,
    C: CartStore,
    O: OrderStore,
    J: TransitionJobStore,
{
    products: P,
    carts: C,
    orders: O,
    jobs: J,
    config: CheckoutConfig,
}

impl<P, C, O, J> CheckoutWorkflow<P, C, O, J>
where
    P: ProductStore,
    C: CartStore,
    O: OrderStore,
    J: TransitionJobStore,
{
    /// Creates a new checkout workflow.
    pub fn new(products: P, carts: C, orders: O, jobs: J, config: CheckoutConfig) -> Self {
        Self {
            products,
            carts,
            orders,
            jobs,
            config,
        }
    }

    /// Checks out an explicit list of products for a user.
    ///
    /// On success the returned order is pending, its line items are
    /// priced at current catalog prices, matching stock has been
    /// decremented, and the purchased products have been removed from
    /// the user's cart (other cart items are kept).
    #[tracing::instrument(skip(self, items), fields(item_count = items.len()))]
    pub async fn checkout(&self, user_id: UserId, items: Vec<CheckoutItem>) -> Result<Order> {
        metrics::counter!("checkout_total").increment(1);
        let start = std::time::Instant::now();

        let result = self.run_checkout(user_id, items).await;

        metrics::histogram!("checkout_duration_seconds").record(start.elapsed().as_secs_f64());
        match &result {
            Ok(order) => {
                metrics::counter!("checkout_completed").increment(1);
                tracing::info!(order_id = %order.id, total = %order.total_amount, "checkout completed");
            }
            Err(e) => {
                metrics::counter!("checkout_failed").increment(1);
                tracing::warn!(%user_id, error = %e, "checkout failed");
            }
        }

        result
    }

    /// Checks out the user's entire cart.
    #[tracing::instrument(skip(self))]
    pub async fn checkout_cart(&self, user_id: UserId) -> Result<Order> {
        let cart = self
            .carts
            .get(user_id)
            .await?
            .ok_or(CheckoutError::CartNotFound(user_id))?;

        if cart.is_empty() {
            return Err(CheckoutError::EmptyCheckout);
        }

        let items = cart
            .items()
            .map(|item| CheckoutItem::new(item.product_id, item.quantity))
            .collect();

        self.checkout(user_id, items).await
    }

    async fn run_checkout(&self, user_id: UserId, items: Vec<CheckoutItem>) -> Result<Order> {
        if items.is_empty() {
            return Err(CheckoutError::EmptyCheckout);
        }
        for item in &items {
            if item.quantity == 0 {
                return Err(CheckoutError::InvalidQuantity(item.product_id));
            }
        }

        // Validation passes: read-only, first failure wins, nothing to
        // undo yet. Every product must resolve before any stock check
        // runs.
        let mut resolved: Vec<Product> = Vec::with_capacity(items.len());
        for item in &items {
            let product = self
                .products
                .get(item.product_id)
                .await?
                .ok_or(CheckoutError::ProductNotFound(item.product_id))?;
            resolved.push(product);
        }
        for (item, product) in items.iter().zip(&resolved) {
            if !product.has_stock(item.quantity) {
                return Err(CheckoutError::InsufficientStock {
                    product_id: item.product_id,
                    available: product.stock,
                    requested: item.quantity,
                });
            }
        }

        // Mutation phase: every applied effect is recorded so a later
        // failure can undo all of them.
        let mut uow = CheckoutUnitOfWork::new();
        if let Some(cart) = self.carts.get(user_id).await? {
            uow.record_cart_snapshot(cart);
        }

        for item in &items {
            let outcome = match self
                .products
                .decrement_stock(item.product_id, item.quantity)
                .await
            {
                Ok(outcome) => outcome,
                Err(e) => return self.fail(uow, e.into()).await,
            };

            match outcome {
                StockUpdate::Applied { .. } => {
                    uow.record_reservation(item.product_id, item.quantity);
                }
                // A concurrent checkout can win the race between our
                // validation read and this decrement.
                StockUpdate::Insufficient { available } => {
                    return self
                        .fail(
                            uow,
                            CheckoutError::InsufficientStock {
                                product_id: item.product_id,
                                available,
                                requested: item.quantity,
                            },
                        )
                        .await;
                }
                StockUpdate::Missing => {
                    return self
                        .fail(uow, CheckoutError::ProductNotFound(item.product_id))
                        .await;
                }
            }
        }

        let purchased: Vec<ProductId> = items.iter().map(|item| item.product_id).collect();
        if let Err(e) = self.carts.remove_items(user_id, &purchased).await {
            return self.fail(uow, e.into()).await;
        }

        let order_items: Vec<OrderItem> = items
            .iter()
            .zip(&resolved)
            .map(|(item, product)| {
                OrderItem::new(
                    item.product_id,
                    product.name.clone(),
                    product.price,
                    item.quantity,
                )
            })
            .collect();
        let order = Order::new(user_id, order_items);

        if let Err(e) = self.orders.insert(&order).await {
            return self.fail(uow, e.into()).await;
        }

        // Commit point reached: the delayed transitions are advisory
        // and must not fail the checkout.
        self.schedule_transitions(order.id).await;

        Ok(order)
    }

    async fn fail<T>(&self, uow: CheckoutUnitOfWork, error: CheckoutError) -> Result<T> {
        tracing::warn!(error = %error, reservations = uow.reservation_count(), "rolling back checkout attempt");
        uow.roll_back(&self.products, &self.carts).await;
        Err(error)
    }

    /// Enqueues the pending→processing and processing→shipped jobs.
    ///
    /// Best-effort: enqueue failures are logged, the order stands.
    async fn schedule_transitions(&self, order_id: OrderId) {
        let now = Utc::now();
        let transitions = [
            TransitionJob::new(
                order_id,
                OrderStatus::Pending,
                OrderStatus::Processing,
                now + self.config.processing_delay,
            ),
            TransitionJob::new(
                order_id,
                OrderStatus::Processing,
                OrderStatus::Shipped,
                now + self.config.processing_delay + self.config.shipping_delay,
            ),
        ];

        for job in transitions {
            let target = job.target;
            if let Err(e) = self.jobs.enqueue(job).await {
                tracing::error!(%order_id, %target, error = %e, "failed to schedule status transition");
            }
        }
    }

    /// Cancels a pending order and restores its stock.
    ///
    /// Only the owning user or an admin may cancel, and only while the
    /// order is still pending. The status flip is conditional, so a
    /// cancellation racing the background processing transition loses
    /// cleanly instead of resurrecting the order.
    #[tracing::instrument(skip(self))]
    pub async fn cancel(&self, actor: &Actor, order_id: OrderId) -> Result<Order> {
        let mut order = self
            .orders
            .get(order_id)
            .await?
            .ok_or(CheckoutError::OrderNotFound(order_id))?;

        if !actor.can_act_for(order.user_id) {
            return Err(CheckoutError::Forbidden {
                user_id: actor.user_id,
            });
        }

        match self
            .orders
            .update_status_if(order_id, OrderStatus::Pending, OrderStatus::Canceled)
            .await?
        {
            StatusUpdate::Applied => {}
            StatusUpdate::Skipped { actual } => {
                return Err(CheckoutError::InvalidState {
                    order_id,
                    status: actual,
                });
            }
            StatusUpdate::Missing => return Err(CheckoutError::OrderNotFound(order_id)),
        }

        for item in &order.items {
            match self
                .products
                .increment_stock(item.product_id, item.quantity)
                .await?
            {
                StockUpdate::Applied { .. } => {}
                // The product may have been removed from the catalog
                // since the purchase; there is nothing to restock.
                _ => {
                    tracing::warn!(%order_id, product_id = %item.product_id, "product missing during cancellation restock");
                }
            }
        }

        order.status = OrderStatus::Canceled;
        metrics::counter!("orders_cancelled").increment(1);
        tracing::info!(%order_id, "order cancelled");
        Ok(order)
    }

    /// Loads an order, visible to its owner and admins.
    pub async fn get_order(&self, actor: &Actor, order_id: OrderId) -> Result<Order> {
        let order = self
            .orders
            .get(order_id)
            .await?
            .ok_or(CheckoutError::OrderNotFound(order_id))?;

        if !actor.can_act_for(order.user_id) {
            return Err(CheckoutError::Forbidden {
                user_id: actor.user_id,
            });
        }

        Ok(order)
    }

    /// Lists the calling user's orders.
    pub async fn list_orders(&self, actor: &Actor) -> Result<Vec<Order>> {
        Ok(self.orders.list_for_user(actor.user_id).await?)
    }

    /// Lists every order. Admin only.
    pub async fn list_all_orders(&self, actor: &Actor) -> Result<Vec<Order>> {
        if !actor.is_admin {
            return Err(CheckoutError::Forbidden {
                user_id: actor.user_id,
            });
        }

        Ok(self.orders.list_all().await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use domain::{Cart, CartItem, Money};
    use store::MemoryStore;

    use super::*;

    fn workflow(
        store: &MemoryStore,
    ) -> CheckoutWorkflow<MemoryStore, MemoryStore, MemoryStore, MemoryStore> {
        CheckoutWorkflow::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            CheckoutConfig::immediate(),
        )
    }

    async fn seed_product(store: &MemoryStore, price_cents: i64, stock: u32) -> ProductId {
        let product = Product::new("Widget", "A widget", Money::from_cents(price_cents), stock);
        let id = product.id;
        ProductStore::insert(store, product).await.unwrap();
        id
    }

    async fn stock_of(store: &MemoryStore, id: ProductId) -> u32 {
        ProductStore::get(store, id).await.unwrap().unwrap().stock
    }

    #[tokio::test]
    async fn checkout_creates_pending_order_with_snapshot_pricing() {
        let store = MemoryStore::new();
        let widget = seed_product(&store, 1000, 5).await;
        let gadget = seed_product(&store, 2500, 3).await;
        let workflow = workflow(&store);
        let user_id = UserId::new();

        let order = workflow
            .checkout(
                user_id,
                vec![CheckoutItem::new(widget, 2), CheckoutItem::new(gadget, 1)],
            )
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.user_id, user_id);
        assert_eq!(order.total_amount.cents(), 4500);

        let line_sum: Money = order.items.iter().map(|item| item.line_total).sum();
        assert_eq!(order.total_amount, line_sum);

        assert_eq!(stock_of(&store, widget).await, 3);
        assert_eq!(stock_of(&store, gadget).await, 2);

        let stored = OrderStore::get(&store, order.id).await.unwrap().unwrap();
        assert_eq!(stored, order);
    }

    #[tokio::test]
    async fn checkout_is_immune_to_later_price_changes() {
        let store = MemoryStore::new();
        let widget = seed_product(&store, 1000, 5).await;
        let workflow = workflow(&store);

        let order = workflow
            .checkout(UserId::new(), vec![CheckoutItem::new(widget, 1)])
            .await
            .unwrap();

        store
            .update(
                widget,
                domain::ProductUpdate {
                    price: Some(Money::from_cents(9999)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let stored = OrderStore::get(&store, order.id).await.unwrap().unwrap();
        assert_eq!(stored.total_amount.cents(), 1000);
    }

    #[tokio::test]
    async fn checkout_schedules_both_transitions() {
        let store = MemoryStore::new();
        let widget = seed_product(&store, 1000, 5).await;
        let workflow = workflow(&store);

        workflow
            .checkout(UserId::new(), vec![CheckoutItem::new(widget, 1)])
            .await
            .unwrap();

        assert_eq!(store.pending_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn empty_checkout_is_rejected() {
        let store = MemoryStore::new();
        let workflow = workflow(&store);

        let result = workflow.checkout(UserId::new(), vec![]).await;
        assert!(matches!(result, Err(CheckoutError::EmptyCheckout)));
    }

    #[tokio::test]
    async fn zero_quantity_is_rejected() {
        let store = MemoryStore::new();
        let widget = seed_product(&store, 1000, 5).await;
        let workflow = workflow(&store);

        let result = workflow
            .checkout(UserId::new(), vec![CheckoutItem::new(widget, 0)])
            .await;
        assert!(matches!(result, Err(CheckoutError::InvalidQuantity(_))));
        assert_eq!(stock_of(&store, widget).await, 5);
    }

    #[tokio::test]
    async fn unknown_product_fails_with_no_effects() {
        let store = MemoryStore::new();
        let widget = seed_product(&store, 1000, 5).await;
        let missing = ProductId::new();
        let workflow = workflow(&store);

        let result = workflow
            .checkout(
                UserId::new(),
                vec![CheckoutItem::new(widget, 1), CheckoutItem::new(missing, 1)],
            )
            .await;

        assert!(matches!(
            result,
            Err(CheckoutError::ProductNotFound(id)) if id == missing
        ));
        assert_eq!(stock_of(&store, widget).await, 5);
        assert_eq!(store.order_count().await, 0);
        assert_eq!(store.pending_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn insufficient_stock_fails_with_no_effects() {
        let store = MemoryStore::new();
        let widget = seed_product(&store, 1000, 2).await;
        let workflow = workflow(&store);

        let result = workflow
            .checkout(UserId::new(), vec![CheckoutItem::new(widget, 3)])
            .await;

        assert!(matches!(
            result,
            Err(CheckoutError::InsufficientStock {
                available: 2,
                requested: 3,
                ..
            })
        ));
        assert_eq!(stock_of(&store, widget).await, 2);
        assert_eq!(store.order_count().await, 0);
    }

    #[tokio::test]
    async fn mid_flight_failure_rolls_back_earlier_decrements() {
        let store = MemoryStore::new();
        let first = seed_product(&store, 1000, 5).await;
        let second = seed_product(&store, 2000, 5).await;
        let workflow = workflow(&store);

        store.set_fail_on_decrement(Some(second));

        let result = workflow
            .checkout(
                UserId::new(),
                vec![CheckoutItem::new(first, 2), CheckoutItem::new(second, 1)],
            )
            .await;

        assert!(matches!(result, Err(CheckoutError::Transaction(_))));
        assert_eq!(stock_of(&store, first).await, 5);
        assert_eq!(stock_of(&store, second).await, 5);
        assert_eq!(store.order_count().await, 0);
        assert_eq!(store.pending_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn order_insert_failure_restores_stock_and_cart() {
        let store = MemoryStore::new();
        let widget = seed_product(&store, 1000, 5).await;
        let workflow = workflow(&store);
        let user_id = UserId::new();

        let mut cart = Cart::new(user_id);
        cart.add_item(CartItem::new(widget, "Widget", Money::from_cents(1000), 2));
        store.put(&cart).await.unwrap();

        store.set_fail_on_order_insert(true);

        let result = workflow.checkout_cart(user_id).await;

        assert!(matches!(result, Err(CheckoutError::Transaction(_))));
        assert_eq!(stock_of(&store, widget).await, 5);
        let restored = CartStore::get(&store, user_id).await.unwrap().unwrap();
        assert_eq!(restored, cart);
        assert_eq!(store.order_count().await, 0);
    }

    #[tokio::test]
    async fn checkout_cart_clears_purchased_items() {
        let store = MemoryStore::new();
        let widget = seed_product(&store, 1000, 5).await;
        let gadget = seed_product(&store, 500, 5).await;
        let workflow = workflow(&store);
        let user_id = UserId::new();

        let mut cart = Cart::new(user_id);
        cart.add_item(CartItem::new(widget, "Widget", Money::from_cents(1000), 2));
        cart.add_item(CartItem::new(gadget, "Gadget", Money::from_cents(500), 1));
        store.put(&cart).await.unwrap();

        let order = workflow.checkout_cart(user_id).await.unwrap();
        assert_eq!(order.item_count(), 2);
        assert_eq!(order.total_amount.cents(), 2500);

        let cart = CartStore::get(&store, user_id).await.unwrap().unwrap();
        assert!(cart.is_empty());
        assert!(cart.total_amount().is_zero());
    }

    #[tokio::test]
    async fn partial_checkout_keeps_other_cart_items() {
        let store = MemoryStore::new();
        let widget = seed_product(&store, 1000, 5).await;
        let gadget = seed_product(&store, 500, 5).await;
        let workflow = workflow(&store);
        let user_id = UserId::new();

        let mut cart = Cart::new(user_id);
        cart.add_item(CartItem::new(widget, "Widget", Money::from_cents(1000), 2));
        cart.add_item(CartItem::new(gadget, "Gadget", Money::from_cents(500), 1));
        store.put(&cart).await.unwrap();

        workflow
            .checkout(user_id, vec![CheckoutItem::new(widget, 2)])
            .await
            .unwrap();

        let cart = CartStore::get(&store, user_id).await.unwrap().unwrap();
        assert_eq!(cart.item_count(), 1);
        assert!(cart.get_item(gadget).is_some());
        assert_eq!(cart.total_amount().cents(), 500);
    }

    #[tokio::test]
    async fn checkout_cart_without_cart_fails() {
        let store = MemoryStore::new();
        let workflow = workflow(&store);

        let result = workflow.checkout_cart(UserId::new()).await;
        assert!(matches!(result, Err(CheckoutError::CartNotFound(_))));
    }

    #[tokio::test]
    async fn concurrent_checkouts_for_remaining_stock_admit_exactly_one() {
        let store = MemoryStore::new();
        let widget = seed_product(&store, 1000, 5).await;
        let workflow = Arc::new(workflow(&store));

        let first = {
            let workflow = Arc::clone(&workflow);
            tokio::spawn(async move {
                workflow
                    .checkout(UserId::new(), vec![CheckoutItem::new(widget, 5)])
                    .await
            })
        };
        let second = {
            let workflow = Arc::clone(&workflow);
            tokio::spawn(async move {
                workflow
                    .checkout(UserId::new(), vec![CheckoutItem::new(widget, 5)])
                    .await
            })
        };

        let results = [first.await.unwrap(), second.await.unwrap()];
        let succeeded = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(succeeded, 1);

        let loser = results.iter().find(|r| r.is_err()).unwrap();
        assert!(matches!(
            loser,
            Err(CheckoutError::InsufficientStock {
                available: 0,
                requested: 5,
                ..
            })
        ));

        assert_eq!(stock_of(&store, widget).await, 0);
        assert_eq!(store.order_count().await, 1);
    }

    #[tokio::test]
    async fn cancel_restores_stock() {
        let store = MemoryStore::new();
        let widget = seed_product(&store, 1000, 5).await;
        let workflow = workflow(&store);
        let user_id = UserId::new();

        let order = workflow
            .checkout(user_id, vec![CheckoutItem::new(widget, 3)])
            .await
            .unwrap();
        assert_eq!(stock_of(&store, widget).await, 2);

        let cancelled = workflow
            .cancel(&Actor::user(user_id), order.id)
            .await
            .unwrap();

        assert_eq!(cancelled.status, OrderStatus::Canceled);
        assert_eq!(stock_of(&store, widget).await, 5);

        let stored = OrderStore::get(&store, order.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Canceled);
    }

    #[tokio::test]
    async fn cancel_twice_fails_with_invalid_state() {
        let store = MemoryStore::new();
        let widget = seed_product(&store, 1000, 5).await;
        let workflow = workflow(&store);
        let user_id = UserId::new();
        let actor = Actor::user(user_id);

        let order = workflow
            .checkout(user_id, vec![CheckoutItem::new(widget, 2)])
            .await
            .unwrap();

        workflow.cancel(&actor, order.id).await.unwrap();
        let result = workflow.cancel(&actor, order.id).await;

        assert!(matches!(
            result,
            Err(CheckoutError::InvalidState {
                status: OrderStatus::Canceled,
                ..
            })
        ));
        // Stock was restored exactly once.
        assert_eq!(stock_of(&store, widget).await, 5);
    }

    #[tokio::test]
    async fn cancel_non_pending_order_fails() {
        let store = MemoryStore::new();
        let widget = seed_product(&store, 1000, 5).await;
        let workflow = workflow(&store);
        let user_id = UserId::new();

        let order = workflow
            .checkout(user_id, vec![CheckoutItem::new(widget, 1)])
            .await
            .unwrap();

        store
            .update_status_if(order.id, OrderStatus::Pending, OrderStatus::Processing)
            .await
            .unwrap();

        let result = workflow.cancel(&Actor::user(user_id), order.id).await;
        assert!(matches!(
            result,
            Err(CheckoutError::InvalidState {
                status: OrderStatus::Processing,
                ..
            })
        ));
        assert_eq!(stock_of(&store, widget).await, 4);
    }

    #[tokio::test]
    async fn cancel_by_stranger_is_forbidden() {
        let store = MemoryStore::new();
        let widget = seed_product(&store, 1000, 5).await;
        let workflow = workflow(&store);
        let owner = UserId::new();

        let order = workflow
            .checkout(owner, vec![CheckoutItem::new(widget, 1)])
            .await
            .unwrap();

        let result = workflow.cancel(&Actor::user(UserId::new()), order.id).await;
        assert!(matches!(result, Err(CheckoutError::Forbidden { .. })));

        // Admins may cancel on the user's behalf.
        workflow
            .cancel(&Actor::admin(UserId::new()), order.id)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn cancel_missing_order_fails() {
        let store = MemoryStore::new();
        let workflow = workflow(&store);

        let result = workflow
            .cancel(&Actor::user(UserId::new()), OrderId::new())
            .await;
        assert!(matches!(result, Err(CheckoutError::OrderNotFound(_))));
    }

    #[tokio::test]
    async fn get_order_enforces_ownership() {
        let store = MemoryStore::new();
        let widget = seed_product(&store, 1000, 5).await;
        let workflow = workflow(&store);
        let owner = UserId::new();

        let order = workflow
            .checkout(owner, vec![CheckoutItem::new(widget, 1)])
            .await
            .unwrap();

        assert!(workflow.get_order(&Actor::user(owner), order.id).await.is_ok());
        assert!(
            workflow
                .get_order(&Actor::admin(UserId::new()), order.id)
                .await
                .is_ok()
        );
        assert!(matches!(
            workflow.get_order(&Actor::user(UserId::new()), order.id).await,
            Err(CheckoutError::Forbidden { .. })
        ));
    }

    #[tokio::test]
    async fn list_orders_is_scoped_to_caller() {
        let store = MemoryStore::new();
        let widget = seed_product(&store, 1000, 10).await;
        let workflow = workflow(&store);
        let alice = UserId::new();
        let bob = UserId::new();

        workflow
            .checkout(alice, vec![CheckoutItem::new(widget, 1)])
            .await
            .unwrap();
        workflow
            .checkout(bob, vec![CheckoutItem::new(widget, 1)])
            .await
            .unwrap();

        let own = workflow.list_orders(&Actor::user(alice)).await.unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].user_id, alice);

        let all = workflow
            .list_all_orders(&Actor::admin(UserId::new()))
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        let result = workflow.list_all_orders(&Actor::user(alice)).await;
        assert!(matches!(result, Err(CheckoutError::Forbidden { .. })));
    }
}
