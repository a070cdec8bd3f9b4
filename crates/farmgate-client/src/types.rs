//! Wire types for the marketplace backend.
//!
//! Serialization structs matching the backend's JSON request and
//! response shapes. The server is authoritative for every derived field
//! (`total_price` in particular); nothing here is recomputed locally.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Marketplace product. Unvalidated products only appear in the
/// farmer's own listing, never in the public one.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    /// Stock on hand.
    pub quantity: u32,
    pub unit: String,
    pub seller_id: u64,
    #[serde(default)]
    pub peeling_available: bool,
    #[serde(default)]
    pub peeling_price: f64,
    /// Base64 JPEG, present when the farmer uploaded an image.
    #[serde(default)]
    pub image_data: Option<String>,
    #[serde(default)]
    pub validated_by_admin: bool,
    #[serde(default)]
    pub validation_date: Option<String>,
}

impl Product {
    /// A product can be bought only once an admin validated it and
    /// there is stock left.
    pub const fn purchasable(&self) -> bool {
        self.validated_by_admin && self.quantity > 0
    }
}

/// One line of the server-held cart. `total_price` is server-computed
/// after every mutation.
#[derive(Debug, Clone, Deserialize)]
pub struct CartLine {
    pub id: u64,
    pub product_id: u64,
    pub product_name: String,
    pub quantity: u32,
    pub price_per_unit: f64,
    pub total_price: f64,
    pub seller_name: String,
    pub created_at: String,
}

/// Order lifecycle. Terminal transitions happen under farmer/admin
/// action, never under customer control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

/// A placed order (one product per order; checkout fans a cart out into
/// several of these).
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    pub id: u64,
    pub product_id: u64,
    pub quantity: u32,
    pub total_price: f64,
    #[serde(default)]
    pub peeling_requested: bool,
    pub status: OrderStatus,
    pub delivery_address: String,
    pub created_at: String,
}

/// Successful login/admin-login exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_type: String,
    pub user_id: u64,
}

/// Identity record from `GET /check-auth`.
#[derive(Debug, Clone, Deserialize)]
pub struct Identity {
    pub id: u64,
    pub email: String,
    pub name: String,
    pub user_type: String,
    #[serde(default)]
    pub address: Option<String>,
}

/// Registration payload.
#[derive(Debug, Clone, Serialize)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub user_type: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Product submission (sent as multipart form fields next to the image).
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub quantity: u32,
    pub unit: String,
    pub peeling_available: bool,
    pub peeling_price: f64,
}

/// Partial product update (`PUT /products/{id}`, seller only).
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peeling_available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peeling_price: Option<f64>,
}

/// Cart line mutation (`PUT /cart/{id}`): quantity change, peeling
/// toggle, or both.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CartUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peeling_requested: Option<bool>,
}

/// Pending-products page (`GET /admin/products/pending`).
#[derive(Debug, Clone, Deserialize)]
pub struct PendingPage {
    pub products: Vec<PendingProduct>,
    pub total_pages: u32,
    pub current_page: u32,
    pub total_products: u64,
}

/// Unvalidated product as listed on the admin review page.
#[derive(Debug, Clone, Deserialize)]
pub struct PendingProduct {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    pub quantity: u32,
    pub unit: String,
    pub seller_id: u64,
    pub seller_name: String,
    #[serde(default)]
    pub peeling_available: bool,
    #[serde(default)]
    pub peeling_price: f64,
    #[serde(default)]
    pub image_data: Option<String>,
    pub created_at: String,
}

/// Admin validation acknowledgement.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationAck {
    pub message: String,
    pub product_id: u64,
    pub validation_date: String,
}

/// Account as listed on the admin user-administration page
/// (`GET /admin/users`).
#[derive(Debug, Clone, Deserialize)]
pub struct AdminUser {
    pub id: u64,
    pub email: String,
    pub name: String,
    pub user_type: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub created_at: String,
    #[serde(default = "active_default")]
    pub active: bool,
}

/// Paginated user listing (`GET /admin/users?page=N&per_page=M`).
#[derive(Debug, Clone, Deserialize)]
pub struct UsersPage {
    pub users: Vec<AdminUser>,
    pub total_pages: u32,
    pub current_page: u32,
    pub total_users: u64,
}

/// Single-user drill-down (`GET /admin/users/{id}`). The server appends
/// sales totals for farmers and spend totals for buyers; the absent
/// pair is simply missing from the body.
#[derive(Debug, Clone, Deserialize)]
pub struct UserDetails {
    pub id: u64,
    pub email: String,
    pub name: String,
    pub user_type: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub created_at: String,
    #[serde(default = "active_default")]
    pub active: bool,
    #[serde(default)]
    pub total_products: Option<u64>,
    #[serde(default)]
    pub total_sales: Option<f64>,
    #[serde(default)]
    pub total_orders: Option<u64>,
    #[serde(default)]
    pub total_spent: Option<f64>,
}

const fn active_default() -> bool {
    true
}

/// Dashboard aggregates (`GET /admin/statistics`).
#[derive(Debug, Clone, Deserialize)]
pub struct Statistics {
    pub users: UserStats,
    pub sales: SalesStats,
    #[serde(default)]
    pub top_sellers: Vec<TopSeller>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserStats {
    pub total: u64,
    pub farmers: u64,
    pub customers: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SalesStats {
    pub total_orders: u64,
    pub total_revenue: f64,
    #[serde(default)]
    pub orders_by_status: HashMap<String, u64>,
    pub monthly: MonthlyStats,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonthlyStats {
    pub revenue: f64,
    pub orders: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopSeller {
    pub name: String,
    pub total_orders: u64,
    pub total_sales: f64,
}

/// Plain acknowledgement body (`{"message": ...}`).
#[derive(Debug, Clone, Deserialize)]
pub struct Ack {
    pub message: String,
}

/// Server rejection envelope (`{"error": ...}`).
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
