use std::collections::{BTreeMap, HashMap};

use uuid::Uuid;

use crate::{
    audit,
    dto::orders::{
        Invoice, InvoiceLine, OrderList, OrderWithItems, PaymentIntentResponse, PlaceOrderRequest,
        UpdatePaymentStatusRequest,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_own_email},
    models::{Order, OrderItem, OrderStatus},
    response::{ApiResponse, Meta},
    routes::params::PaymentListQuery,
    services::cart_service,
    state::AppState,
};

const ORDER_COLUMNS: &str =
    "id, consumer_email, consumer_name, transaction_id, total_amount, status, order_date";

#[derive(sqlx::FromRow)]
struct PricedMedicine {
    id: Uuid,
    price: i64,
    seller_email: String,
}

/// Repeated lines for one medicine collapse into a single line.
pub fn merge_lines(items: &[(Uuid, i32)]) -> AppResult<BTreeMap<Uuid, i32>> {
    let mut merged = BTreeMap::new();
    for (medicine_id, quantity) in items {
        if *quantity <= 0 {
            return Err(AppError::BadRequest(
                "quantity must be greater than 0".into(),
            ));
        }
        let entry = merged.entry(*medicine_id).or_insert(0i32);
        *entry = entry
            .checked_add(*quantity)
            .ok_or_else(|| AppError::BadRequest("quantity is too large".into()))?;
    }
    Ok(merged)
}

/// Σ unit_price × quantity, rejecting totals that do not fit in `i64`.
pub fn order_total(lines: impl IntoIterator<Item = (i64, i32)>) -> AppResult<i64> {
    let too_large = || AppError::BadRequest("order total is too large".into());
    lines.into_iter().try_fold(0i64, |total, (price, quantity)| {
        price
            .checked_mul(i64::from(quantity))
            .and_then(|line| total.checked_add(line))
            .ok_or_else(too_large)
    })
}

pub async fn place_order(
    state: &AppState,
    user: &AuthUser,
    payload: PlaceOrderRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let transaction_id = payload.transaction_id.trim().to_string();
    if transaction_id.is_empty() {
        return Err(AppError::BadRequest("transaction_id is required".into()));
    }
    if payload.items.is_empty() {
        return Err(AppError::BadRequest("order has no items".into()));
    }

    let pairs: Vec<(Uuid, i32)> = payload
        .items
        .iter()
        .map(|line| (line.medicine_id, line.quantity))
        .collect();
    let lines = merge_lines(&pairs)?;
    let ids: Vec<Uuid> = lines.keys().copied().collect();

    let mut tx = state.pool.begin().await?;

    let priced: HashMap<Uuid, PricedMedicine> = sqlx::query_as::<_, PricedMedicine>(
        "SELECT id, price, seller_email FROM medicines WHERE id = ANY($1)",
    )
    .bind(&ids)
    .fetch_all(&mut *tx)
    .await?
    .into_iter()
    .map(|row| (row.id, row))
    .collect();

    if let Some(missing) = ids.iter().find(|id| !priced.contains_key(id)) {
        return Err(AppError::BadRequest(format!("medicine {missing} not found")));
    }

    let total_amount = order_total(
        lines
            .iter()
            .map(|(id, quantity)| (priced[id].price, *quantity)),
    )?;

    let order = sqlx::query_as::<_, Order>(&format!(
        r#"
        INSERT INTO orders (id, consumer_email, consumer_name, transaction_id, total_amount, status)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {ORDER_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(user.email.as_str())
    .bind(payload.consumer_name)
    .bind(transaction_id.as_str())
    .bind(total_amount)
    .bind(OrderStatus::Requested.as_str())
    .fetch_one(&mut *tx)
    .await
    .map_err(|err| match err.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("order for this transaction already exists".into())
        }
        _ => AppError::DbError(err),
    })?;

    let mut items = Vec::with_capacity(lines.len());
    for (medicine_id, quantity) in &lines {
        let medicine = &priced[medicine_id];
        let item = sqlx::query_as::<_, OrderItem>(
            r#"
            INSERT INTO order_items (id, order_id, medicine_id, seller_email, quantity, unit_price)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, order_id, medicine_id, seller_email, quantity, unit_price
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(order.id)
        .bind(medicine_id)
        .bind(medicine.seller_email.as_str())
        .bind(quantity)
        .bind(medicine.price)
        .fetch_one(&mut *tx)
        .await?;
        items.push(item);
    }

    tx.commit().await?;

    tracing::info!(order_id = %order.id, total = order.total_amount, "order placed");
    audit::record(
        &state.pool,
        &user.email,
        "order_place",
        "orders",
        serde_json::json!({ "order_id": order.id, "transaction_id": order.transaction_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order placed",
        OrderWithItems { order, items },
        Some(Meta::empty()),
    ))
}

/// Lines of the caller's order paid with `transaction_id`; empty when unknown.
pub async fn get_invoice(
    state: &AppState,
    user: &AuthUser,
    transaction_id: &str,
) -> AppResult<ApiResponse<Invoice>> {
    let items = sqlx::query_as::<_, InvoiceLine>(
        r#"
        SELECT o.transaction_id, o.order_date, o.status, o.consumer_email,
               oi.medicine_id, m.name AS medicine_name, oi.seller_email,
               oi.quantity, oi.unit_price,
               (oi.unit_price * oi.quantity)::BIGINT AS line_total
        FROM orders o
        JOIN order_items oi ON oi.order_id = o.id
        LEFT JOIN medicines m ON m.id = oi.medicine_id
        WHERE o.transaction_id = $1 AND o.consumer_email = $2
        ORDER BY m.name
        "#,
    )
    .bind(transaction_id)
    .bind(user.email.as_str())
    .fetch_all(&state.pool)
    .await?;

    let total = items.iter().map(|line| line.line_total).sum();
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Invoice", Invoice { items, total }, Some(meta)))
}

pub async fn create_payment_intent(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<PaymentIntentResponse>> {
    if !state.payments.is_configured() {
        return Err(AppError::PaymentUnavailable);
    }

    let amount = cart_service::cart_total(state, &user.email).await?;
    if amount <= 0 {
        return Err(AppError::BadRequest("cart is empty".into()));
    }

    let intent = state
        .payments
        .create_payment_intent(amount, &state.config.payment_currency, Some(&user.email))
        .await?;

    tracing::info!(intent_id = %intent.id, amount, "payment intent created");

    Ok(ApiResponse::success(
        "Payment intent created",
        PaymentIntentResponse {
            client_secret: intent.client_secret,
            amount: intent.amount,
            currency: intent.currency,
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_payments(
    state: &AppState,
    query: PaymentListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let status = query.status.map(|s| s.as_str());

    let items = sqlx::query_as::<_, Order>(&format!(
        r#"
        SELECT {ORDER_COLUMNS}
        FROM orders
        WHERE ($1::TEXT IS NULL OR status = $1)
        ORDER BY order_date DESC
        LIMIT $2 OFFSET $3
        "#
    ))
    .bind(status)
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    let (total,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM orders WHERE ($1::TEXT IS NULL OR status = $1)")
            .bind(status)
            .fetch_one(&state.pool)
            .await?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Payments", OrderList { items }, Some(meta)))
}

pub async fn update_payment_status(
    state: &AppState,
    admin: &AuthUser,
    id: Uuid,
    payload: UpdatePaymentStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    let mut tx = state.pool.begin().await?;

    let current: Option<(String,)> =
        sqlx::query_as("SELECT status FROM orders WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
    let (current,) = current.ok_or(AppError::NotFound)?;
    let current = current
        .parse::<OrderStatus>()
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;

    if !current.can_transition_to(payload.status) {
        return Err(AppError::BadRequest(format!(
            "cannot move order from {} to {}",
            current.as_str(),
            payload.status.as_str()
        )));
    }

    let order = sqlx::query_as::<_, Order>(&format!(
        "UPDATE orders SET status = $2 WHERE id = $1 RETURNING {ORDER_COLUMNS}"
    ))
    .bind(id)
    .bind(payload.status.as_str())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    audit::record(
        &state.pool,
        &admin.email,
        "payment_status_update",
        "orders",
        serde_json::json!({ "order_id": order.id, "status": order.status }),
    )
    .await;

    Ok(ApiResponse::success(
        "Payment updated",
        order,
        Some(Meta::empty()),
    ))
}

pub async fn user_payments(
    state: &AppState,
    user: &AuthUser,
    email: &str,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_own_email(user, email)?;

    let items = sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE consumer_email = $1 ORDER BY order_date DESC"
    ))
    .bind(user.email.as_str())
    .fetch_all(&state.pool)
    .await?;

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Payments", OrderList { items }, Some(meta)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_medicines_are_merged() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let merged = merge_lines(&[(a, 2), (b, 1), (a, 3)]).unwrap();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[&a], 5);
        assert_eq!(merged[&b], 1);
    }

    #[test]
    fn order_total_sums_lines() {
        assert_eq!(order_total([(1250, 2), (800, 3)]).unwrap(), 4900);
        assert_eq!(order_total(std::iter::empty()).unwrap(), 0);
    }

    #[test]
    fn overflowing_order_total_is_rejected() {
        let price = i64::MAX / 2 + 1;
        assert!(matches!(
            order_total([(price, 2)]),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            order_total([(i64::MAX, 1), (1, 1)]),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn non_positive_quantity_is_rejected() {
        let a = Uuid::new_v4();
        assert!(matches!(
            merge_lines(&[(a, 0)]),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            merge_lines(&[(a, -4)]),
            Err(AppError::BadRequest(_))
        ));
    }
}
