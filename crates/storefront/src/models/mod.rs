//! Domain models for the storefront.
//!
//! Row-mapped structs (`sqlx::FromRow`) double as API response bodies
//! (`serde::Serialize` with camelCase fields, matching the public JSON
//! contract).

pub mod category;
pub mod order;
pub mod product;
pub mod user;

pub use category::Category;
pub use order::{NewOrder, NewOrderLine, Order, OrderLine};
pub use product::{Product, ProductImage, ProductVariant};
pub use user::{Address, User, WishlistEntry};
