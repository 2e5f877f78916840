//! Database models
//!
//! Row shapes for the marketplace tables. Link fields are `RecordId`s
//! serialized as `"table:id"` strings at the API boundary via
//! [`serde_helpers`].

pub mod cart;
pub mod order;
pub mod product;
pub mod profile;
pub mod rejection;
pub mod serde_helpers;
pub mod store;

pub use cart::CartItem;
pub use order::{DeliveryHistory, Order, OrderEnriched, OrderItem};
pub use product::{Product, ProductCreate, ProductUpdate};
pub use profile::{Profile, ProfileCreate};
pub use rejection::OrderRejection;
pub use store::{Store, StoreCreate};
