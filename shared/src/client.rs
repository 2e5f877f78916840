//! Client-facing DTOs shared between server and clients
//!
//! Request/response bodies for the HTTP API. Assignment endpoints use
//! camelCase field names on the wire; the rest of the API follows the
//! same convention for consistency.

use serde::{Deserialize, Serialize};

use crate::order::OrderStatus;
use crate::types::{AppRole, PaymentStatus, ProductCategory, Timestamp};

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Register request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub phone: Option<String>,
    pub role: AppRole,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login/register response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// User information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub phone: Option<String>,
    pub role: AppRole,
}

// =============================================================================
// Assignment API DTOs (POST /accept-order, POST /reject-order)
// =============================================================================

/// Accept order request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptOrderRequest {
    #[serde(rename = "orderId")]
    pub order_id: String,
}

/// Winning courier reference sent back to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignedCourier {
    pub id: String,
    pub name: String,
}

/// Accept order success response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptOrderResponse {
    #[serde(rename = "orderId")]
    pub order_id: String,
    pub status: OrderStatus,
    #[serde(rename = "assignedTo")]
    pub assigned_to: AssignedCourier,
    #[serde(rename = "assignedAt")]
    pub assigned_at: Timestamp,
    #[serde(rename = "storeName")]
    pub store_name: Option<String>,
    #[serde(rename = "storeAddress")]
    pub store_address: Option<String>,
    #[serde(rename = "customerName")]
    pub customer_name: Option<String>,
    #[serde(rename = "customerPhone")]
    pub customer_phone: Option<String>,
    #[serde(rename = "deliveryAddress")]
    pub delivery_address: String,
    #[serde(rename = "deliveryEarning")]
    pub delivery_earning: f64,
}

/// Conflict body when the order was already claimed by another courier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderAlreadyAssignedResponse {
    /// Always `"OrderAlreadyAssigned"`
    pub error: String,
    #[serde(rename = "assignedTo")]
    pub assigned_to: AssignedCourier,
    #[serde(rename = "assignedAt")]
    pub assigned_at: Timestamp,
}

/// Reject order request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectOrderRequest {
    #[serde(rename = "orderId")]
    pub order_id: String,
    pub reason: Option<String>,
}

/// Reject order response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectOrderResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "orderId")]
    pub order_id: String,
    #[serde(rename = "rejectedAt")]
    pub rejected_at: Timestamp,
    #[serde(rename = "reofferableAfter")]
    pub reofferable_after: Timestamp,
}

// =============================================================================
// Store / Product API DTOs
// =============================================================================

/// Create store request (retailer)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreCreateRequest {
    pub name: String,
    pub address: String,
}

/// Create product request (retailer)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreateRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    #[serde(rename = "stockQuantity")]
    pub stock_quantity: i64,
    pub category: ProductCategory,
}

/// Update product request. Stock is intentionally absent: stock only
/// moves through the checkout reduction, restocking is out of scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductUpdateRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<ProductCategory>,
    #[serde(rename = "isAvailable")]
    pub is_available: Option<bool>,
}

// =============================================================================
// Cart / Checkout API DTOs
// =============================================================================

/// Add item to cart request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartAddRequest {
    #[serde(rename = "productId")]
    pub product_id: String,
    pub quantity: i64,
}

/// Set cart line quantity request (0 removes the line)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartSetQuantityRequest {
    pub quantity: i64,
}

/// Checkout request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    #[serde(rename = "deliveryAddress")]
    pub delivery_address: String,
}

/// One order produced by checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutOrderSummary {
    #[serde(rename = "orderId")]
    pub order_id: String,
    #[serde(rename = "storeId")]
    pub store_id: String,
    pub status: OrderStatus,
    #[serde(rename = "paymentStatus")]
    pub payment_status: PaymentStatus,
    #[serde(rename = "totalAmount")]
    pub total_amount: f64,
    #[serde(rename = "itemCount")]
    pub item_count: usize,
}

/// One vendor group that failed checkout; groups are independent, earlier
/// successes stand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutFailure {
    #[serde(rename = "storeId")]
    pub store_id: String,
    pub error: String,
}

/// Checkout response: per-vendor outcomes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub orders: Vec<CheckoutOrderSummary>,
    pub failures: Vec<CheckoutFailure>,
}

// =============================================================================
// Order API DTOs
// =============================================================================

/// Status advance request (PUT /api/orders/{id}/status)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: OrderStatus,
}
