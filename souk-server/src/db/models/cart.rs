//! Cart Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Staged cart line. One row per (owner, product), enforced by a unique
/// index. `price` is the snapshot captured at add-to-cart time; checkout
/// totals use this snapshot, not the live product price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub owner: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    /// Denormalized at add time so checkout can partition without joins
    #[serde(with = "serde_helpers::record_id")]
    pub store: RecordId,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    pub created_at: i64,
    pub updated_at: i64,
}
