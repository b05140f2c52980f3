//! Persistence boundary for the storefront backend.
//!
//! Defines one trait per store — products, carts, orders, and delayed
//! transition jobs — plus an in-memory implementation for testing and a
//! PostgreSQL implementation for durable deployments. Conditional
//! mutations (stock decrement, status update) report their outcome
//! through explicit enums so domain failures stay separate from
//! backend errors.

pub mod cart;
pub mod error;
pub mod job;
pub mod memory;
pub mod order;
pub mod postgres;
pub mod product;

pub use cart::CartStore;
pub use error::{Result, StoreError};
pub use job::{TransitionJob, TransitionJobStore};
pub use memory::MemoryStore;
pub use order::{OrderStore, StatusUpdate};
pub use postgres::PostgresStore;
pub use product::{ProductStore, StockUpdate};
