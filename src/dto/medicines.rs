use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Medicine;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMedicineRequest {
    pub name: String,
    pub generic_name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category: String,
    pub company: Option<String>,
    /// Unit price in minor currency units.
    pub price: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MedicineList {
    pub items: Vec<Medicine>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MedicineCount {
    pub count: i64,
}
