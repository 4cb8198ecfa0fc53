use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::{catalog::UserList, orders::OrderList},
    error::AppResult,
    middleware::auth::{AuthUser, verify_admin, verify_user},
    models::User,
    response::ApiResponse,
    services::{admin_service, order_service},
    state::AppState,
};

// Both `/users/{user}` routes share the segment name; matchit rejects
// differently named parameters at the same position.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/{user}", get(list_users))
        .route("/users/{user}/{role}", patch(update_user_role))
        .route("/users/payments/{email}", get(user_payments))
}

#[utoipa::path(
    get,
    path = "/users/{user}",
    params(("user" = String, Path, description = "Email to leave out, usually the caller's")),
    responses(
        (status = 200, description = "All other users", body = ApiResponse<UserList>),
        (status = 401, description = "Caller is not an admin")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_users(
    State(state): State<AppState>,
    user: AuthUser,
    Path(email): Path<String>,
) -> AppResult<Json<ApiResponse<UserList>>> {
    verify_admin(&state, &user).await?;
    let resp = admin_service::list_users(&state, &email).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/users/{user}/{role}",
    params(
        ("user" = Uuid, Path, description = "User ID"),
        ("role" = String, Path, description = "admin, seller or user")
    ),
    responses(
        (status = 200, description = "Role updated", body = ApiResponse<User>),
        (status = 400, description = "Unknown role"),
        (status = 401, description = "Caller is not an admin"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_user_role(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, role)): Path<(Uuid, String)>,
) -> AppResult<Json<ApiResponse<User>>> {
    verify_admin(&state, &user).await?;
    let resp = admin_service::update_user_role(&state, &user, id, &role).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/users/payments/{email}",
    params(("email" = String, Path, description = "Buyer email, must be the caller")),
    responses(
        (status = 200, description = "Orders placed by the caller", body = ApiResponse<OrderList>),
        (status = 401, description = "Caller is not a user"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
pub async fn user_payments(
    State(state): State<AppState>,
    user: AuthUser,
    Path(email): Path<String>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    verify_user(&state, &user).await?;
    let resp = order_service::user_payments(&state, &user, &email).await?;
    Ok(Json(resp))
}
