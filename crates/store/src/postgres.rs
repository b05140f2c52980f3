use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{OrderId, ProductId, UserId};
use domain::{Cart, CartItem, Order, OrderItem, OrderStatus, Product, ProductUpdate};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    StoreError,
    cart::CartStore,
    error::Result,
    job::{TransitionJob, TransitionJobStore},
    order::{OrderStore, StatusUpdate},
    product::{ProductStore, StockUpdate},
};

/// PostgreSQL-backed implementation of every store trait.
///
/// Stock decrements and status updates are expressed as conditional
/// `UPDATE` statements, so the database serializes racing checkouts
/// and cancellations per row.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new PostgreSQL store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_product(row: PgRow) -> Result<Product> {
        Ok(Product {
            id: ProductId::from_uuid(row.try_get::<Uuid, _>("id")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: domain::Money::from_cents(row.try_get("price_cents")?),
            stock: decode_stock(row.try_get("stock")?)?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn row_to_order(row: PgRow) -> Result<Order> {
        let items_json: serde_json::Value = row.try_get("items")?;
        let items: Vec<OrderItem> = serde_json::from_value(items_json)?;
        let status_text: String = row.try_get("status")?;
        let status = OrderStatus::parse(&status_text)
            .ok_or_else(|| StoreError::Decode(format!("unknown order status: {status_text}")))?;

        Ok(Order::from_parts(
            OrderId::from_uuid(row.try_get::<Uuid, _>("id")?),
            UserId::from_uuid(row.try_get::<Uuid, _>("user_id")?),
            items,
            status,
            row.try_get("created_at")?,
        ))
    }

    fn row_to_job(row: PgRow) -> Result<TransitionJob> {
        let expected_text: String = row.try_get("expected_status")?;
        let target_text: String = row.try_get("target_status")?;
        let expected = OrderStatus::parse(&expected_text)
            .ok_or_else(|| StoreError::Decode(format!("unknown order status: {expected_text}")))?;
        let target = OrderStatus::parse(&target_text)
            .ok_or_else(|| StoreError::Decode(format!("unknown order status: {target_text}")))?;

        Ok(TransitionJob::new(
            OrderId::from_uuid(row.try_get::<Uuid, _>("order_id")?),
            expected,
            target,
            row.try_get("due_at")?,
        ))
    }
}

fn decode_stock(stock: i64) -> Result<u32> {
    u32::try_from(stock).map_err(|_| StoreError::Decode(format!("stock out of range: {stock}")))
}

#[async_trait]
impl ProductStore for PostgresStore {
    async fn insert(&self, product: Product) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price_cents, stock, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price.cents())
        .bind(i64::from(product.stock))
        .bind(product.is_active)
        .bind(product.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>> {
        let row = sqlx::query("SELECT * FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_product).transpose()
    }

    async fn list(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query("SELECT * FROM products ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_product).collect()
    }

    async fn list_active(&self) -> Result<Vec<Product>> {
        let rows =
            sqlx::query("SELECT * FROM products WHERE is_active ORDER BY created_at, id")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(Self::row_to_product).collect()
    }

    async fn update(&self, id: ProductId, update: ProductUpdate) -> Result<Option<Product>> {
        let row = sqlx::query(
            r#"
            UPDATE products
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                price_cents = COALESCE($4, price_cents),
                stock = COALESCE($5, stock)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id.as_uuid())
        .bind(update.name)
        .bind(update.description)
        .bind(update.price.map(|p| p.cents()))
        .bind(update.stock.map(i64::from))
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_product).transpose()
    }

    async fn set_active(&self, id: ProductId, active: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE products SET is_active = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(active)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove(&self, id: ProductId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self))]
    async fn decrement_stock(&self, id: ProductId, quantity: u32) -> Result<StockUpdate> {
        // The WHERE clause makes check-and-decrement a single atomic
        // statement; the row lock serializes racing checkouts.
        let row = sqlx::query(
            r#"
            UPDATE products
            SET stock = stock - $2
            WHERE id = $1 AND stock >= $2
            RETURNING stock
            "#,
        )
        .bind(id.as_uuid())
        .bind(i64::from(quantity))
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            return Ok(StockUpdate::Applied {
                remaining: decode_stock(row.try_get("stock")?)?,
            });
        }

        let available: Option<i64> = sqlx::query_scalar("SELECT stock FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        match available {
            Some(stock) => Ok(StockUpdate::Insufficient {
                available: decode_stock(stock)?,
            }),
            None => Ok(StockUpdate::Missing),
        }
    }

    async fn increment_stock(&self, id: ProductId, quantity: u32) -> Result<StockUpdate> {
        let row = sqlx::query(
            r#"
            UPDATE products
            SET stock = stock + $2
            WHERE id = $1
            RETURNING stock
            "#,
        )
        .bind(id.as_uuid())
        .bind(i64::from(quantity))
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(StockUpdate::Applied {
                remaining: decode_stock(row.try_get("stock")?)?,
            }),
            None => Ok(StockUpdate::Missing),
        }
    }
}

#[async_trait]
impl CartStore for PostgresStore {
    async fn get(&self, user_id: UserId) -> Result<Option<Cart>> {
        let row = sqlx::query("SELECT items FROM carts WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let items_json: serde_json::Value = row.try_get("items")?;
                let items: Vec<CartItem> = serde_json::from_value(items_json)?;
                Ok(Some(Cart::from_items(user_id, items)))
            }
            None => Ok(None),
        }
    }

    async fn put(&self, cart: &Cart) -> Result<()> {
        let items: Vec<&CartItem> = cart.items().collect();
        let items_json = serde_json::to_value(&items)?;

        sqlx::query(
            r#"
            INSERT INTO carts (user_id, items, total_cents, updated_at)
            VALUES ($1, $2, $3, now())
            ON CONFLICT (user_id)
            DO UPDATE SET items = EXCLUDED.items,
                          total_cents = EXCLUDED.total_cents,
                          updated_at = now()
            "#,
        )
        .bind(cart.user_id.as_uuid())
        .bind(items_json)
        .bind(cart.total_amount().cents())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove_items(
        &self,
        user_id: UserId,
        product_ids: &[ProductId],
    ) -> Result<Option<Cart>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT items FROM carts WHERE user_id = $1 FOR UPDATE")
            .bind(user_id.as_uuid())
            .fetch_optional(&mut *tx)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items_json: serde_json::Value = row.try_get("items")?;
        let items: Vec<CartItem> = serde_json::from_value(items_json)?;
        let mut cart = Cart::from_items(user_id, items);
        cart.remove_items(product_ids);

        let items: Vec<&CartItem> = cart.items().collect();
        sqlx::query(
            "UPDATE carts SET items = $2, total_cents = $3, updated_at = now() WHERE user_id = $1",
        )
        .bind(user_id.as_uuid())
        .bind(serde_json::to_value(&items)?)
        .bind(cart.total_amount().cents())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(cart))
    }

    async fn delete(&self, user_id: UserId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM carts WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl OrderStore for PostgresStore {
    async fn insert(&self, order: &Order) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO orders (id, user_id, items, total_cents, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.user_id.as_uuid())
        .bind(serde_json::to_value(&order.items)?)
        .bind(order.total_amount.cents())
        .bind(order.status.as_str())
        .bind(order.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>> {
        let row = sqlx::query("SELECT * FROM orders WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_order).transpose()
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>> {
        let rows = sqlx::query("SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at, id")
            .bind(user_id.as_uuid())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_order).collect()
    }

    async fn list_all(&self) -> Result<Vec<Order>> {
        let rows = sqlx::query("SELECT * FROM orders ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_order).collect()
    }

    #[tracing::instrument(skip(self))]
    async fn update_status_if(
        &self,
        id: OrderId,
        expected: OrderStatus,
        next: OrderStatus,
    ) -> Result<StatusUpdate> {
        let result = sqlx::query("UPDATE orders SET status = $3 WHERE id = $1 AND status = $2")
            .bind(id.as_uuid())
            .bind(expected.as_str())
            .bind(next.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            return Ok(StatusUpdate::Applied);
        }

        let actual: Option<String> = sqlx::query_scalar("SELECT status FROM orders WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        match actual {
            Some(status_text) => {
                let actual = OrderStatus::parse(&status_text).ok_or_else(|| {
                    StoreError::Decode(format!("unknown order status: {status_text}"))
                })?;
                Ok(StatusUpdate::Skipped { actual })
            }
            None => Ok(StatusUpdate::Missing),
        }
    }
}

#[async_trait]
impl TransitionJobStore for PostgresStore {
    async fn enqueue(&self, job: TransitionJob) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO transition_jobs (order_id, expected_status, target_status, due_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(job.order_id.as_uuid())
        .bind(job.expected.as_str())
        .bind(job.target.as_str())
        .bind(job.due_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn claim_due(&self, now: DateTime<Utc>) -> Result<Vec<TransitionJob>> {
        // DELETE .. RETURNING claims atomically, so two workers never
        // process the same job.
        let rows = sqlx::query(
            r#"
            DELETE FROM transition_jobs
            WHERE due_at <= $1
            RETURNING order_id, expected_status, target_status, due_at
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        let mut jobs: Vec<TransitionJob> = rows
            .into_iter()
            .map(Self::row_to_job)
            .collect::<Result<_>>()?;
        jobs.sort_by_key(|job| job.due_at);
        Ok(jobs)
    }

    async fn pending_count(&self) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transition_jobs")
            .fetch_one(&self.pool)
            .await?;

        Ok(count as usize)
    }
}
