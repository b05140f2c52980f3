//! Product catalog and cart services for the storefront backend.
//!
//! [`ProductCatalog`] covers admin-gated catalog management;
//! [`CartService`] keeps each user's cart consistent with the catalog
//! (price snapshots, stock-aware adds, total recomputation).

pub mod carts;
pub mod error;
pub mod products;

pub use carts::CartService;
pub use error::CatalogError;
pub use products::ProductCatalog;
