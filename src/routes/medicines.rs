use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::medicines::{CreateMedicineRequest, MedicineCount, MedicineList},
    error::AppResult,
    middleware::auth::{AuthUser, verify_seller},
    models::Medicine,
    response::ApiResponse,
    routes::params::MedicineQuery,
    services::medicine_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/medicines", get(list_medicines).post(create_medicine))
        .route("/medicines/{id}", get(get_medicine))
        .route("/medicines-count", get(count_medicines))
}

#[utoipa::path(
    get,
    path = "/medicines",
    params(MedicineQuery),
    responses(
        (status = 200, description = "Catalog page", body = ApiResponse<MedicineList>)
    ),
    tag = "Medicines"
)]
pub async fn list_medicines(
    State(state): State<AppState>,
    Query(query): Query<MedicineQuery>,
) -> AppResult<Json<ApiResponse<MedicineList>>> {
    let resp = medicine_service::list_medicines(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/medicines-count",
    params(MedicineQuery),
    responses(
        (status = 200, description = "Number of medicines matching the filters", body = ApiResponse<MedicineCount>)
    ),
    tag = "Medicines"
)]
pub async fn count_medicines(
    State(state): State<AppState>,
    Query(query): Query<MedicineQuery>,
) -> AppResult<Json<ApiResponse<MedicineCount>>> {
    let resp = medicine_service::count_medicines(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/medicines/{id}",
    params(("id" = Uuid, Path, description = "Medicine ID")),
    responses(
        (status = 200, description = "Medicine", body = ApiResponse<Medicine>),
        (status = 404, description = "Not Found")
    ),
    tag = "Medicines"
)]
pub async fn get_medicine(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Medicine>>> {
    let resp = medicine_service::get_medicine(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/medicines",
    request_body = CreateMedicineRequest,
    responses(
        (status = 200, description = "Medicine created", body = ApiResponse<Medicine>),
        (status = 400, description = "Invalid medicine"),
        (status = 401, description = "Caller is not a seller")
    ),
    security(("bearer_auth" = [])),
    tag = "Medicines"
)]
pub async fn create_medicine(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateMedicineRequest>,
) -> AppResult<Json<ApiResponse<Medicine>>> {
    verify_seller(&state, &user).await?;
    let resp = medicine_service::create_medicine(&state, &user, payload).await?;
    Ok(Json(resp))
}
