use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Revenue split by order status, in minor units.
#[derive(Debug, Clone, Copy, Default, Serialize, ToSchema, FromRow, PartialEq)]
pub struct RevenueTotals {
    pub paid_total: i64,
    pub pending_total: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminStats {
    pub paid_total: i64,
    pub pending_total: i64,
    pub total_orders: i64,
    pub total_users: i64,
    pub total_medicines: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SellerStats {
    pub paid_total: i64,
    pub pending_total: i64,
    pub total_medicines: i64,
    pub units_sold: i64,
}

/// One order line joined with its order and medicine.
#[derive(Debug, Clone, Serialize, ToSchema, FromRow)]
pub struct SalesLine {
    pub order_id: Uuid,
    pub transaction_id: String,
    pub buyer_email: String,
    pub seller_email: String,
    pub medicine_id: Uuid,
    pub medicine_name: Option<String>,
    pub quantity: i32,
    pub unit_price: i64,
    pub line_total: i64,
    pub status: String,
    pub order_date: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SalesReport {
    pub items: Vec<SalesLine>,
    pub grand_total: i64,
}
