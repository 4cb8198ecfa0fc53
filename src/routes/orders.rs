use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    dto::orders::{Invoice, OrderWithItems, PaymentIntentResponse, PlaceOrderRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", post(place_order))
        .route("/invoice/{invoice_id}", get(get_invoice))
        .route("/create-payment-intent", post(create_payment_intent))
}

#[utoipa::path(
    post,
    path = "/orders",
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, description = "Order placed with status requested", body = ApiResponse<OrderWithItems>),
        (status = 400, description = "Empty order or unknown medicine"),
        (status = 409, description = "Transaction already used")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn place_order(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<PlaceOrderRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<OrderWithItems>>)> {
    let resp = order_service::place_order(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/invoice/{invoice_id}",
    params(("invoice_id" = String, Path, description = "Transaction id of the order")),
    responses(
        (status = 200, description = "Invoice lines, empty when the transaction is unknown", body = ApiResponse<Invoice>)
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn get_invoice(
    State(state): State<AppState>,
    user: AuthUser,
    Path(invoice_id): Path<String>,
) -> AppResult<Json<ApiResponse<Invoice>>> {
    let resp = order_service::get_invoice(&state, &user, &invoice_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/create-payment-intent",
    responses(
        (status = 200, description = "Stripe PaymentIntent for the cart total", body = ApiResponse<PaymentIntentResponse>),
        (status = 400, description = "Cart is empty"),
        (status = 502, description = "Payment provider error"),
        (status = 503, description = "Payment provider not configured")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn create_payment_intent(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<PaymentIntentResponse>>> {
    let resp = order_service::create_payment_intent(&state, &user).await?;
    Ok(Json(resp))
}
