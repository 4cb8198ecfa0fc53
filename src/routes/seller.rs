use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    dto::{
        catalog::BannerList,
        medicines::MedicineList,
        reports::{SalesReport, SellerStats},
    },
    error::AppResult,
    middleware::auth::{AuthUser, ensure_own_email, verify_seller},
    response::ApiResponse,
    services::{catalog_service, medicine_service, report_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/seller/stats/{email}", get(seller_stats))
        .route("/seller/medicines/{email}", get(seller_medicines))
        .route("/seller/payments/{email}", get(seller_payments))
        .route("/seller/advertisements/{email}", get(seller_advertisements))
}

/// Role gate plus the path email must belong to the caller.
async fn authorize(state: &AppState, user: &AuthUser, email: &str) -> AppResult<()> {
    verify_seller(state, user).await?;
    ensure_own_email(user, email)
}

#[utoipa::path(
    get,
    path = "/seller/stats/{email}",
    params(("email" = String, Path, description = "Seller email")),
    responses(
        (status = 200, description = "Revenue of the seller's order lines", body = ApiResponse<SellerStats>),
        (status = 401, description = "Caller is not a seller"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Seller"
)]
pub async fn seller_stats(
    State(state): State<AppState>,
    user: AuthUser,
    Path(email): Path<String>,
) -> AppResult<Json<ApiResponse<SellerStats>>> {
    authorize(&state, &user, &email).await?;
    let resp = report_service::seller_stats(&state, &user.email).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/seller/medicines/{email}",
    params(("email" = String, Path, description = "Seller email")),
    responses(
        (status = 200, description = "Medicines listed by the seller", body = ApiResponse<MedicineList>),
        (status = 401, description = "Caller is not a seller"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Seller"
)]
pub async fn seller_medicines(
    State(state): State<AppState>,
    user: AuthUser,
    Path(email): Path<String>,
) -> AppResult<Json<ApiResponse<MedicineList>>> {
    authorize(&state, &user, &email).await?;
    let resp = medicine_service::list_seller_medicines(&state, &user.email).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/seller/payments/{email}",
    params(("email" = String, Path, description = "Seller email")),
    responses(
        (status = 200, description = "Order lines sold by the seller", body = ApiResponse<SalesReport>),
        (status = 401, description = "Caller is not a seller"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Seller"
)]
pub async fn seller_payments(
    State(state): State<AppState>,
    user: AuthUser,
    Path(email): Path<String>,
) -> AppResult<Json<ApiResponse<SalesReport>>> {
    authorize(&state, &user, &email).await?;
    let resp = report_service::seller_payments(&state, &user.email).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/seller/advertisements/{email}",
    params(("email" = String, Path, description = "Seller email")),
    responses(
        (status = 200, description = "Advertisement requests of the seller", body = ApiResponse<BannerList>),
        (status = 401, description = "Caller is not a seller"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Seller"
)]
pub async fn seller_advertisements(
    State(state): State<AppState>,
    user: AuthUser,
    Path(email): Path<String>,
) -> AppResult<Json<ApiResponse<BannerList>>> {
    authorize(&state, &user, &email).await?;
    let resp = catalog_service::list_banners(&state, None, Some(&user.email)).await?;
    Ok(Json(resp))
}
