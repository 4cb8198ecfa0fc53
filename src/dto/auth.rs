use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Role;

#[derive(Deserialize, Debug, ToSchema)]
pub struct RegisterRequest {
    pub user: NewUser,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub photo_url: Option<String>,
    /// `user` when omitted; `admin` is rejected.
    pub role: Option<Role>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct TokenRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoleResponse {
    pub role: Role,
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Clone)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: String,
    pub exp: usize,
}
