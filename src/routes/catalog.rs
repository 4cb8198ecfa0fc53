use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::catalog::{
        BannerList, CategoryList, CategoryRequest, CreateBannerRequest, UpdateBannerStatusRequest,
        UpdateCategoryRequest,
    },
    error::AppResult,
    middleware::auth::{AuthUser, verify_admin, verify_seller},
    models::{Banner, BannerStatus, Category},
    response::ApiResponse,
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            patch(update_category).delete(delete_category),
        )
        .route("/banners", get(list_banners).post(create_banner))
        .route("/banners/active", get(active_banners))
        .route("/banners/{id}", patch(update_banner_status))
}

#[utoipa::path(
    get,
    path = "/categories",
    responses(
        (status = 200, description = "Categories with medicine counts", body = ApiResponse<CategoryList>)
    ),
    tag = "Categories"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    let resp = catalog_service::list_categories(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/categories",
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category created", body = ApiResponse<Category>),
        (status = 401, description = "Caller is not an admin"),
        (status = 409, description = "Category already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn create_category(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CategoryRequest>,
) -> AppResult<Json<ApiResponse<Category>>> {
    verify_admin(&state, &user).await?;
    let resp = catalog_service::create_category(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<Category>),
        (status = 401, description = "Caller is not an admin"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Category already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn update_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> AppResult<Json<ApiResponse<Category>>> {
    verify_admin(&state, &user).await?;
    let resp = catalog_service::update_category(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse<serde_json::Value>),
        (status = 401, description = "Caller is not an admin"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    verify_admin(&state, &user).await?;
    let resp = catalog_service::delete_category(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/banners",
    responses(
        (status = 200, description = "Every advertisement request", body = ApiResponse<BannerList>),
        (status = 401, description = "Caller is not an admin")
    ),
    security(("bearer_auth" = [])),
    tag = "Banners"
)]
pub async fn list_banners(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<BannerList>>> {
    verify_admin(&state, &user).await?;
    let resp = catalog_service::list_banners(&state, None, None).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/banners/active",
    responses(
        (status = 200, description = "Banners shown on the home slider", body = ApiResponse<BannerList>)
    ),
    tag = "Banners"
)]
pub async fn active_banners(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<BannerList>>> {
    let resp = catalog_service::list_banners(&state, Some(BannerStatus::Added), None).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/banners",
    request_body = CreateBannerRequest,
    responses(
        (status = 200, description = "Advertisement requested", body = ApiResponse<Banner>),
        (status = 400, description = "Unknown medicine"),
        (status = 401, description = "Caller is not a seller"),
        (status = 403, description = "Medicine belongs to another seller")
    ),
    security(("bearer_auth" = [])),
    tag = "Banners"
)]
pub async fn create_banner(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateBannerRequest>,
) -> AppResult<Json<ApiResponse<Banner>>> {
    verify_seller(&state, &user).await?;
    let resp = catalog_service::create_banner(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/banners/{id}",
    params(("id" = Uuid, Path, description = "Banner ID")),
    request_body = UpdateBannerStatusRequest,
    responses(
        (status = 200, description = "Banner status changed", body = ApiResponse<Banner>),
        (status = 401, description = "Caller is not an admin"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Banners"
)]
pub async fn update_banner_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBannerStatusRequest>,
) -> AppResult<Json<ApiResponse<Banner>>> {
    verify_admin(&state, &user).await?;
    let resp = catalog_service::update_banner_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
