//! Sales aggregation. Every total here is `SUM(unit_price * quantity)` over
//! `order_items` joined to their order; Postgres widens the sum to NUMERIC,
//! so each aggregate is cast back to BIGINT.

use chrono::{DateTime, Utc};

use crate::{
    dto::reports::{AdminStats, RevenueTotals, SalesLine, SalesReport, SellerStats},
    error::AppResult,
    models::OrderStatus,
    response::{ApiResponse, Meta},
    routes::params::SalesReportQuery,
    state::AppState,
};

#[derive(Debug, Default, Clone)]
pub struct SalesFilter<'a> {
    pub status: Option<OrderStatus>,
    pub seller_email: Option<&'a str>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

pub async fn revenue_totals(
    state: &AppState,
    seller_email: Option<&str>,
) -> AppResult<RevenueTotals> {
    let totals = sqlx::query_as::<_, RevenueTotals>(
        r#"
        SELECT
            COALESCE(SUM(oi.unit_price * oi.quantity) FILTER (WHERE o.status = 'paid'), 0)::BIGINT
                AS paid_total,
            COALESCE(SUM(oi.unit_price * oi.quantity) FILTER (WHERE o.status = 'requested'), 0)::BIGINT
                AS pending_total
        FROM order_items oi
        JOIN orders o ON o.id = oi.order_id
        WHERE ($1::TEXT IS NULL OR oi.seller_email = $1)
        "#,
    )
    .bind(seller_email)
    .fetch_one(&state.pool)
    .await?;
    Ok(totals)
}

pub async fn sales_lines(state: &AppState, filter: &SalesFilter<'_>) -> AppResult<Vec<SalesLine>> {
    let lines = sqlx::query_as::<_, SalesLine>(
        r#"
        SELECT o.id AS order_id, o.transaction_id, o.consumer_email AS buyer_email,
               oi.seller_email, oi.medicine_id, m.name AS medicine_name,
               oi.quantity, oi.unit_price,
               (oi.unit_price * oi.quantity)::BIGINT AS line_total,
               o.status, o.order_date
        FROM order_items oi
        JOIN orders o ON o.id = oi.order_id
        LEFT JOIN medicines m ON m.id = oi.medicine_id
        WHERE ($1::TEXT IS NULL OR o.status = $1)
          AND ($2::TEXT IS NULL OR oi.seller_email = $2)
          AND ($3::TIMESTAMPTZ IS NULL OR o.order_date >= $3)
          AND ($4::TIMESTAMPTZ IS NULL OR o.order_date < $4)
        ORDER BY o.order_date DESC, oi.id
        "#,
    )
    .bind(filter.status.map(|s| s.as_str()))
    .bind(filter.seller_email)
    .bind(filter.from)
    .bind(filter.to)
    .fetch_all(&state.pool)
    .await?;
    Ok(lines)
}

pub async fn admin_stats(state: &AppState) -> AppResult<ApiResponse<AdminStats>> {
    let totals = revenue_totals(state, None).await?;

    let (total_orders, total_users, total_medicines): (i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT (SELECT COUNT(*) FROM orders),
               (SELECT COUNT(*) FROM users),
               (SELECT COUNT(*) FROM medicines)
        "#,
    )
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::success(
        "Admin stats",
        AdminStats {
            paid_total: totals.paid_total,
            pending_total: totals.pending_total,
            total_orders,
            total_users,
            total_medicines,
        },
        Some(Meta::empty()),
    ))
}

pub async fn sales_report(
    state: &AppState,
    query: SalesReportQuery,
) -> AppResult<ApiResponse<SalesReport>> {
    let filter = SalesFilter {
        status: query.status,
        seller_email: None,
        from: query.from,
        to: query.to,
    };
    let items = sales_lines(state, &filter).await?;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success(
        "Sales report",
        into_report(items),
        Some(meta),
    ))
}

pub async fn seller_stats(
    state: &AppState,
    seller_email: &str,
) -> AppResult<ApiResponse<SellerStats>> {
    let totals = revenue_totals(state, Some(seller_email)).await?;

    let (total_medicines, units_sold): (i64, i64) = sqlx::query_as(
        r#"
        SELECT (SELECT COUNT(*) FROM medicines WHERE seller_email = $1),
               (SELECT COALESCE(SUM(oi.quantity), 0)::BIGINT
                FROM order_items oi
                JOIN orders o ON o.id = oi.order_id
                WHERE oi.seller_email = $1 AND o.status = 'paid')
        "#,
    )
    .bind(seller_email)
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::success(
        "Seller stats",
        SellerStats {
            paid_total: totals.paid_total,
            pending_total: totals.pending_total,
            total_medicines,
            units_sold,
        },
        Some(Meta::empty()),
    ))
}

pub async fn seller_payments(
    state: &AppState,
    seller_email: &str,
) -> AppResult<ApiResponse<SalesReport>> {
    let filter = SalesFilter {
        seller_email: Some(seller_email),
        ..Default::default()
    };
    let items = sales_lines(state, &filter).await?;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success(
        "Seller payments",
        into_report(items),
        Some(meta),
    ))
}

pub fn into_report(items: Vec<SalesLine>) -> SalesReport {
    let grand_total = items.iter().map(|line| line.line_total).sum();
    SalesReport { items, grand_total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn line(unit_price: i64, quantity: i32) -> SalesLine {
        SalesLine {
            order_id: Uuid::new_v4(),
            transaction_id: "pi_test".into(),
            buyer_email: "buyer@example.com".into(),
            seller_email: "seller@example.com".into(),
            medicine_id: Uuid::new_v4(),
            medicine_name: Some("Napa".into()),
            quantity,
            unit_price,
            line_total: unit_price * i64::from(quantity),
            status: "paid".into(),
            order_date: Utc::now(),
        }
    }

    #[test]
    fn grand_total_is_sum_of_line_totals() {
        let report = into_report(vec![line(250, 2), line(1000, 1), line(75, 4)]);
        assert_eq!(report.grand_total, 500 + 1000 + 300);
        assert_eq!(report.items.len(), 3);
    }

    #[test]
    fn empty_report_totals_zero() {
        assert_eq!(into_report(Vec::new()).grand_total, 0);
    }
}
