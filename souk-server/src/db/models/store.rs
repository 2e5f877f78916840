//! Store Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Store ID type
pub type StoreId = RecordId;

/// Retailer-owned store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<StoreId>,
    #[serde(with = "serde_helpers::record_id")]
    pub owner: RecordId,
    pub name: String,
    pub address: String,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
    pub created_at: i64,
}

fn default_true() -> bool {
    true
}

/// Create store payload
#[derive(Debug, Clone)]
pub struct StoreCreate {
    pub owner: String,
    pub name: String,
    pub address: String,
}
