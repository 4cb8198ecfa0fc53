use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveValue::NotSet, ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::medicines::{CreateMedicineRequest, MedicineCount, MedicineList},
    entity::medicines::{ActiveModel, Column, Entity as Medicines, Model as MedicineModel},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Medicine,
    response::{ApiResponse, Meta},
    routes::params::{MedicineQuery, MedicineSort},
    state::AppState,
};

/// Escapes `%`, `_` and `\` so user input matches literally under `ILIKE`.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Upper bound on a unit price in minor units.
pub const MAX_PRICE: i64 = 1_000_000_000;

fn filtered(query: &MedicineQuery) -> Select<Medicines> {
    let mut condition = Condition::all();

    if let Some(search) = query.search_term() {
        let pattern = format!("%{}%", escape_like(search));
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::GenericName).ilike(pattern.clone()))
                .add(Expr::col(Column::Company).ilike(pattern.clone()))
                .add(Expr::col(Column::Category).ilike(pattern)),
        );
    }

    if let Some(category) = query.category_name() {
        condition = condition.add(
            Expr::expr(Func::lower(Expr::col(Column::Category)))
                .eq(Func::lower(Expr::val(category.to_string()))),
        );
    }

    Medicines::find().filter(condition)
}

pub async fn list_medicines(
    state: &AppState,
    query: MedicineQuery,
) -> AppResult<ApiResponse<MedicineList>> {
    let (page, limit, offset) = query.pagination().normalize();

    let finder = match query.sort.unwrap_or_default() {
        MedicineSort::Newest => filtered(&query).order_by_desc(Column::CreatedAt),
        MedicineSort::PriceAsc => filtered(&query).order_by_asc(Column::Price),
        MedicineSort::PriceDesc => filtered(&query).order_by_desc(Column::Price),
        MedicineSort::Name => filtered(&query).order_by_asc(Column::Name),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(medicine_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Medicines",
        MedicineList { items },
        Some(meta),
    ))
}

pub async fn count_medicines(
    state: &AppState,
    query: MedicineQuery,
) -> AppResult<ApiResponse<MedicineCount>> {
    let count = filtered(&query).count(&state.orm).await? as i64;
    Ok(ApiResponse::ok(MedicineCount { count }))
}

pub async fn get_medicine(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Medicine>> {
    let medicine = Medicines::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(medicine_from_entity)
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Medicine", medicine, None))
}

pub async fn list_seller_medicines(
    state: &AppState,
    seller_email: &str,
) -> AppResult<ApiResponse<MedicineList>> {
    let items: Vec<Medicine> = Medicines::find()
        .filter(Column::SellerEmail.eq(seller_email))
        .order_by_desc(Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(medicine_from_entity)
        .collect();

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success(
        "Seller medicines",
        MedicineList { items },
        Some(meta),
    ))
}

pub async fn create_medicine(
    state: &AppState,
    seller: &AuthUser,
    payload: CreateMedicineRequest,
) -> AppResult<ApiResponse<Medicine>> {
    let name = payload.name.trim().to_string();
    let category = payload.category.trim().to_string();
    if name.is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }
    if category.is_empty() {
        return Err(AppError::BadRequest("category is required".into()));
    }
    if payload.price < 0 {
        return Err(AppError::BadRequest("price cannot be negative".into()));
    }
    if payload.price > MAX_PRICE {
        return Err(AppError::BadRequest(format!(
            "price cannot exceed {MAX_PRICE}"
        )));
    }

    let medicine = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        generic_name: Set(payload.generic_name),
        description: Set(payload.description),
        image_url: Set(payload.image_url),
        category: Set(category),
        company: Set(payload.company),
        price: Set(payload.price),
        seller_email: Set(seller.email.clone()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        &seller.email,
        "medicine_create",
        "medicines",
        serde_json::json!({ "medicine_id": medicine.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Medicine created",
        medicine_from_entity(medicine),
        Some(Meta::empty()),
    ))
}

pub(crate) fn medicine_from_entity(model: MedicineModel) -> Medicine {
    Medicine {
        id: model.id,
        name: model.name,
        generic_name: model.generic_name,
        description: model.description,
        image_url: model.image_url,
        category: model.category,
        company: model.company,
        price: model.price,
        seller_email: model.seller_email,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("napa"), "napa");
        assert_eq!(escape_like("vitamin_c"), "vitamin\\_c");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like(r"a\b"), r"a\\b");
    }
}
