//! Shared types for the Souk marketplace
//!
//! Domain types used by both the server and client crates: closed role and
//! category enumerations, the order lifecycle state machine, and the HTTP
//! request/response DTOs.

pub mod client;
pub mod order;
pub mod types;

// Re-exports
pub use order::{OrderStatus, TransitionActor, TransitionError};
pub use serde::{Deserialize, Serialize};
pub use types::{AppRole, PaymentStatus, ProductCategory, Timestamp};
