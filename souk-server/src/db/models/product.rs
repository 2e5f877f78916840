//! Product Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::types::ProductCategory;
use surrealdb::RecordId;

/// Product ID type
pub type ProductId = RecordId;

/// Store-scoped inventory row
///
/// `stock_quantity` never goes below zero: the only mutation path is the
/// checkout reduction `stock_quantity -= qty WHERE stock_quantity >= qty`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ProductId>,
    #[serde(with = "serde_helpers::record_id")]
    pub store: RecordId,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock_quantity: i64,
    pub category: ProductCategory,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_available: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

fn default_true() -> bool {
    true
}

/// Create product payload
#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub store: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock_quantity: i64,
    pub category: ProductCategory,
}

/// Update product payload. No stock field; restocking is out of scope
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<ProductCategory>,
    pub is_available: Option<bool>,
}
