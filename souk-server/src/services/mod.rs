//! Service layer
//!
//! Business rules over the repositories. Services decide, repositories
//! execute; every cross-client race is settled by a conditional update
//! in the repository layer, never by service-side locking.

pub mod assignment;
pub mod checkout;
pub mod lifecycle;

pub use assignment::{AssignmentService, ClaimError, DeclineError, DeclineReceipt};
pub use checkout::{CheckoutError, CheckoutOutcome, CheckoutService};
pub use lifecycle::{LifecycleError, LifecycleService};
