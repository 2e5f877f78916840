//! Order Model
//!
//! The order row is the single shared mutable resource for assignment:
//! `courier` stays NONE until the claim operation's conditional update
//! sets it, and is never reassigned afterwards.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::order::OrderStatus;
use shared::types::PaymentStatus;
use surrealdb::RecordId;

/// Order ID type
pub type OrderId = RecordId;

/// One vendor-scoped purchase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<OrderId>,
    #[serde(with = "serde_helpers::record_id")]
    pub customer: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub store: RecordId,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub courier: Option<RecordId>,
    pub status: OrderStatus,
    /// Σ(quantity × price snapshot) at creation; never recomputed
    pub total_amount: f64,
    pub delivery_address: String,
    pub payment_status: PaymentStatus,
    pub paid_amount: f64,
    /// Fixed fee credited to the courier
    pub delivery_earning: f64,
    pub assigned_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Immutable line item, created atomically with its order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(rename = "order", with = "serde_helpers::record_id")]
    pub order: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    /// Name and price captured at order time, decoupled from later edits
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}

/// Order enriched with display fields resolved from its links
///
/// Used for courier-facing reads (available list, claim response) so the
/// UI needs no second round trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderEnriched {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<OrderId>,
    #[serde(with = "serde_helpers::record_id")]
    pub customer: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub store: RecordId,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub courier: Option<RecordId>,
    pub status: OrderStatus,
    pub total_amount: f64,
    pub delivery_address: String,
    pub payment_status: PaymentStatus,
    pub paid_amount: f64,
    pub delivery_earning: f64,
    pub assigned_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
    // Resolved display fields (NONE when the linked row is gone)
    pub store_name: Option<String>,
    pub store_address: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub courier_name: Option<String>,
}

/// Append-only audit row, one per status transition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryHistory {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(rename = "order", with = "serde_helpers::record_id")]
    pub order: RecordId,
    pub old_status: OrderStatus,
    pub new_status: OrderStatus,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub courier: Option<RecordId>,
    pub changed_at: i64,
}
