//! Order Rejection Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// A courier's decline of one order
///
/// Unique per (order, courier): a second decline hits the index and is
/// reported as a duplicate, so a courier cannot stack cooldown windows.
/// Expired rows are never deleted; they stop matching the read-path
/// filter once `reofferable_after` passes and remain for audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRejection {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(rename = "order", with = "serde_helpers::record_id")]
    pub order: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub courier: RecordId,
    pub reason: Option<String>,
    /// The order may be offered to this courier again after this instant
    pub reofferable_after: i64,
    pub created_at: i64,
}
