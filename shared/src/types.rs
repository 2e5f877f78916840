//! Closed enumerations for the marketplace
//!
//! Roles, product categories and payment status are closed enums at the
//! service boundary: unrecognized text is rejected during deserialization
//! instead of being stored as-is.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Timestamp type (Unix milliseconds)
pub type Timestamp = i64;

/// Raised when a role/category/status string is not a known variant
#[derive(Debug, Error)]
#[error("unrecognized {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Application role, who the authenticated user is
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppRole {
    Customer,
    Retailer,
    Courier,
}

impl AppRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Retailer => "retailer",
            Self::Courier => "courier",
        }
    }
}

impl std::str::FromStr for AppRole {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "retailer" => Ok(Self::Retailer),
            "courier" => Ok(Self::Courier),
            other => Err(UnknownVariant {
                kind: "role",
                value: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for AppRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Product category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Grocery,
    Produce,
    Bakery,
    Dairy,
    Meat,
    Beverages,
    Household,
    Electronics,
    Clothing,
    Pharmacy,
    Other,
}

/// Payment status on an order
///
/// Payment capture is simulated: checkout stamps orders as `Paid`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
}
