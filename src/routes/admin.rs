use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::{
        orders::{OrderList, UpdatePaymentStatusRequest},
        reports::{AdminStats, SalesReport},
    },
    error::AppResult,
    middleware::auth::{AuthUser, verify_admin},
    models::Order,
    response::ApiResponse,
    routes::params::{PaymentListQuery, SalesReportQuery},
    services::{order_service, report_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin-stats", get(admin_stats))
        .route("/payments", get(list_payments))
        .route("/payments/{id}", patch(update_payment_status))
        .route("/sales-report", get(sales_report))
}

#[utoipa::path(
    get,
    path = "/admin-stats",
    responses(
        (status = 200, description = "Revenue and entity counts", body = ApiResponse<AdminStats>),
        (status = 401, description = "Caller is not an admin")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn admin_stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<AdminStats>>> {
    verify_admin(&state, &user).await?;
    let resp = report_service::admin_stats(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/payments",
    params(PaymentListQuery),
    responses(
        (status = 200, description = "All orders", body = ApiResponse<OrderList>),
        (status = 401, description = "Caller is not an admin")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_payments(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<PaymentListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    verify_admin(&state, &user).await?;
    let resp = order_service::list_payments(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/payments/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdatePaymentStatusRequest,
    responses(
        (status = 200, description = "Order settled", body = ApiResponse<Order>),
        (status = 400, description = "Order is not in requested state"),
        (status = 401, description = "Caller is not an admin"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_payment_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePaymentStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    verify_admin(&state, &user).await?;
    let resp = order_service::update_payment_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/sales-report",
    params(SalesReportQuery),
    responses(
        (status = 200, description = "Sales lines and grand total", body = ApiResponse<SalesReport>),
        (status = 401, description = "Caller is not an admin")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn sales_report(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<SalesReportQuery>,
) -> AppResult<Json<ApiResponse<SalesReport>>> {
    verify_admin(&state, &user).await?;
    let resp = report_service::sales_report(&state, query).await?;
    Ok(Json(resp))
}
