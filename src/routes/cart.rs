use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, patch},
};
use uuid::Uuid;

use crate::{
    dto::cart::{AddToCartRequest, CartList, ClearCartResponse},
    error::AppResult,
    middleware::auth::AuthUser,
    models::CartItem,
    response::ApiResponse,
    routes::params::CartPatchQuery,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/carts", get(cart_list).post(add_to_cart))
        .route("/carts/{id}", patch(change_quantity).delete(remove_from_cart))
        .route("/carts/clear/{email}", delete(clear_cart))
}

#[utoipa::path(
    get,
    path = "/carts",
    responses(
        (status = 200, description = "Cart of the current user", body = ApiResponse<CartList>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn cart_list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CartList>>> {
    let resp = cart_service::list_cart(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/carts",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Add to cart, incrementing an existing row", body = ApiResponse<CartItem>),
        (status = 400, description = "Bad request"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartItem>>> {
    let resp = cart_service::add_to_cart(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/carts/{id}",
    params(
        ("id" = Uuid, Path, description = "Cart item ID"),
        CartPatchQuery
    ),
    responses(
        (status = 200, description = "Quantity changed by one", body = ApiResponse<CartItem>),
        (status = 400, description = "Quantity cannot go below 1"),
        (status = 404, description = "Cart item not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn change_quantity(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<CartPatchQuery>,
) -> AppResult<Json<ApiResponse<CartItem>>> {
    let resp = cart_service::change_quantity(&state, &user, id, query.delta()).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/carts/{id}",
    params(("id" = Uuid, Path, description = "Cart item ID")),
    responses(
        (status = 200, description = "OK", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Cart item not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = cart_service::remove_from_cart(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/carts/clear/{email}",
    params(("email" = String, Path, description = "Cart owner, must be the caller")),
    responses(
        (status = 200, description = "Cart cleared", body = ApiResponse<ClearCartResponse>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn clear_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path(email): Path<String>,
) -> AppResult<Json<ApiResponse<ClearCartResponse>>> {
    let resp = cart_service::clear_cart(&state, &user, &email).await?;
    Ok(Json(resp))
}
