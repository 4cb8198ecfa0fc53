use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub medicine_id: Uuid,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

/// A cart row joined with the medicine it points at.
#[derive(Debug, Serialize, ToSchema, FromRow)]
pub struct CartLine {
    pub id: Uuid,
    pub medicine_id: Uuid,
    pub quantity: i32,
    pub name: String,
    pub image_url: Option<String>,
    pub company: Option<String>,
    pub seller_email: String,
    pub unit_price: i64,
    pub line_total: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartList {
    pub items: Vec<CartLine>,
    pub total: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClearCartResponse {
    pub deleted: u64,
}
