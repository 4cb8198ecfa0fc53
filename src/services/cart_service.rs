use uuid::Uuid;

use crate::{
    audit,
    dto::cart::{AddToCartRequest, CartLine, CartList, ClearCartResponse},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_own_email},
    models::CartItem,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartList>> {
    let items = sqlx::query_as::<_, CartLine>(
        r#"
        SELECT c.id, c.medicine_id, c.quantity, c.created_at,
               m.name, m.image_url, m.company, m.seller_email,
               m.price AS unit_price,
               (m.price * c.quantity)::BIGINT AS line_total
        FROM carts c
        JOIN medicines m ON m.id = c.medicine_id
        WHERE c.customer_email = $1
        ORDER BY c.created_at DESC
        "#,
    )
    .bind(user.email.as_str())
    .fetch_all(&state.pool)
    .await?;

    let total = items.iter().map(|line| line.line_total).sum();
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("OK", CartList { items, total }, Some(meta)))
}

/// Adds `quantity` to the caller's row for this medicine, creating it if needed.
pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartItem>> {
    if payload.quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        ));
    }

    let medicine_exist: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM medicines WHERE id = $1")
        .bind(payload.medicine_id)
        .fetch_optional(&state.pool)
        .await?;
    if medicine_exist.is_none() {
        return Err(AppError::BadRequest("medicine not found".to_string()));
    }

    let cart_item = sqlx::query_as::<_, CartItem>(
        r#"
        INSERT INTO carts (id, customer_email, medicine_id, quantity)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (customer_email, medicine_id)
        DO UPDATE SET quantity = carts.quantity + EXCLUDED.quantity
        RETURNING id, customer_email, medicine_id, quantity, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.email.as_str())
    .bind(payload.medicine_id)
    .bind(payload.quantity)
    .fetch_one(&state.pool)
    .await?;

    audit::record(
        &state.pool,
        &user.email,
        "cart_add",
        "carts",
        serde_json::json!({ "medicine_id": payload.medicine_id, "quantity": payload.quantity }),
    )
    .await;

    Ok(ApiResponse::success("OK", cart_item, None))
}

/// Relative update by `delta`; the row is left untouched if it would drop below one.
pub async fn change_quantity(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    delta: i32,
) -> AppResult<ApiResponse<CartItem>> {
    let updated = sqlx::query_as::<_, CartItem>(
        r#"
        UPDATE carts
        SET quantity = quantity + $3
        WHERE id = $1 AND customer_email = $2 AND quantity + $3 >= 1
        RETURNING id, customer_email, medicine_id, quantity, created_at
        "#,
    )
    .bind(id)
    .bind(user.email.as_str())
    .bind(delta)
    .fetch_optional(&state.pool)
    .await?;

    match updated {
        Some(item) => Ok(ApiResponse::success("Quantity updated", item, None)),
        None => {
            let exists: Option<(Uuid,)> =
                sqlx::query_as("SELECT id FROM carts WHERE id = $1 AND customer_email = $2")
                    .bind(id)
                    .bind(user.email.as_str())
                    .fetch_optional(&state.pool)
                    .await?;
            match exists {
                Some(_) => Err(AppError::BadRequest(
                    "quantity cannot go below 1".to_string(),
                )),
                None => Err(AppError::NotFound),
            }
        }
    }
}

pub async fn remove_from_cart(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM carts WHERE id = $1 AND customer_email = $2")
        .bind(id)
        .bind(user.email.as_str())
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        &user.email,
        "cart_remove",
        "carts",
        serde_json::json!({ "cart_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Removed from cart",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn clear_cart(
    state: &AppState,
    user: &AuthUser,
    email: &str,
) -> AppResult<ApiResponse<ClearCartResponse>> {
    ensure_own_email(user, email)?;

    let result = sqlx::query("DELETE FROM carts WHERE customer_email = $1")
        .bind(user.email.as_str())
        .execute(&state.pool)
        .await?;

    audit::record(
        &state.pool,
        &user.email,
        "cart_clear",
        "carts",
        serde_json::json!({ "deleted": result.rows_affected() }),
    )
    .await;

    Ok(ApiResponse::success(
        "Cart cleared",
        ClearCartResponse {
            deleted: result.rows_affected(),
        },
        Some(Meta::empty()),
    ))
}

/// Sum of `price * quantity` over the caller's cart.
pub async fn cart_total(state: &AppState, email: &str) -> AppResult<i64> {
    let (total,): (i64,) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(m.price * c.quantity), 0)::BIGINT
        FROM carts c
        JOIN medicines m ON m.id = c.medicine_id
        WHERE c.customer_email = $1
        "#,
    )
    .bind(email)
    .fetch_one(&state.pool)
    .await?;
    Ok(total)
}
