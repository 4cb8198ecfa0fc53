use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Seller,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Seller => "seller",
            Role::User => "user",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "seller" => Ok(Role::Seller),
            "user" => Ok(Role::User),
            other => Err(format!("unknown role `{other}`")),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Requested,
    Paid,
    Rejected,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Requested => "requested",
            OrderStatus::Paid => "paid",
            OrderStatus::Rejected => "rejected",
        }
    }

    /// An order is settled once; only a requested order may move.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Requested, OrderStatus::Paid)
                | (OrderStatus::Requested, OrderStatus::Rejected)
        )
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "requested" => Ok(OrderStatus::Requested),
            "paid" => Ok(OrderStatus::Paid),
            "rejected" => Ok(OrderStatus::Rejected),
            other => Err(format!("unknown order status `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BannerStatus {
    Requested,
    Added,
}

impl BannerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BannerStatus::Requested => "requested",
            BannerStatus::Added => "added",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub photo_url: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow)]
pub struct Medicine {
    pub id: Uuid,
    pub name: String,
    pub generic_name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category: String,
    pub company: Option<String>,
    pub price: i64,
    pub seller_email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub image_url: Option<String>,
    pub medicine_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow)]
pub struct CartItem {
    pub id: Uuid,
    pub customer_email: String,
    pub medicine_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow)]
pub struct Order {
    pub id: Uuid,
    pub consumer_email: String,
    pub consumer_name: Option<String>,
    pub transaction_id: String,
    pub total_amount: i64,
    pub status: String,
    pub order_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub medicine_id: Uuid,
    pub seller_email: String,
    pub quantity: i32,
    pub unit_price: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow)]
pub struct Banner {
    pub id: Uuid,
    pub medicine_id: Uuid,
    pub seller_email: String,
    pub image_url: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_parse_from_stored_text() {
        assert_eq!("seller".parse::<Role>(), Ok(Role::Seller));
        assert_eq!(Role::Admin.to_string(), "admin");
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn only_requested_orders_can_be_settled() {
        assert!(OrderStatus::Requested.can_transition_to(OrderStatus::Paid));
        assert!(OrderStatus::Requested.can_transition_to(OrderStatus::Rejected));
        assert!(!OrderStatus::Paid.can_transition_to(OrderStatus::Rejected));
        assert!(!OrderStatus::Rejected.can_transition_to(OrderStatus::Paid));
        assert!(!OrderStatus::Requested.can_transition_to(OrderStatus::Requested));
    }

    #[test]
    fn banner_status_serializes_lowercase() {
        let json = serde_json::to_string(&BannerStatus::Added).unwrap();
        assert_eq!(json, "\"added\"");
    }
}
