use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    dto::auth::{RegisterRequest, RoleResponse, TokenRequest, TokenResponse},
    error::AppResult,
    middleware::auth::AuthUser,
    models::User,
    response::ApiResponse,
    services::auth_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/user", post(register))
        .route("/jwt", post(issue_jwt))
        .route("/user-role/{email}", get(user_role))
}

#[utoipa::path(
    post,
    path = "/user",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = ApiResponse<User>),
        (status = 400, description = "Invalid registration"),
        (status = 409, description = "User already exists")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<User>>)> {
    let resp = auth_service::register_user(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/jwt",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Signed access token", body = ApiResponse<TokenResponse>),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn issue_jwt(
    State(state): State<AppState>,
    Json(payload): Json<TokenRequest>,
) -> AppResult<Json<ApiResponse<TokenResponse>>> {
    let resp = auth_service::issue_jwt(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/user-role/{email}",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "Stored role of the user", body = ApiResponse<RoleResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn user_role(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(email): Path<String>,
) -> AppResult<Json<ApiResponse<RoleResponse>>> {
    let resp = auth_service::get_user_role(&state, &email).await?;
    Ok(Json(resp))
}
