use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::catalog::{
        BannerList, CategoryList, CategoryRequest, CreateBannerRequest, UpdateBannerStatusRequest,
        UpdateCategoryRequest,
    },
    entity::{
        banners::{
            ActiveModel as BannerActive, Column as BannerCol, Entity as Banners,
            Model as BannerModel,
        },
        categories::{ActiveModel as CategoryActive, Entity as Categories, Model as CategoryModel},
        medicines::Entity as Medicines,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Banner, BannerStatus, Category},
    response::{ApiResponse, Meta},
    state::AppState,
};

fn name_taken(err: sea_orm::DbErr) -> AppError {
    match err.sql_err() {
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict("category already exists".into())
        }
        _ => AppError::OrmError(err),
    }
}

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let items = sqlx::query_as::<_, Category>(
        r#"
        SELECT c.id, c.name, c.image_url, c.created_at,
               COUNT(m.id)::BIGINT AS medicine_count
        FROM categories c
        LEFT JOIN medicines m ON lower(m.category) = lower(c.name)
        GROUP BY c.id
        ORDER BY c.name
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success(
        "Categories",
        CategoryList { items },
        Some(meta),
    ))
}

pub async fn create_category(
    state: &AppState,
    admin: &AuthUser,
    payload: CategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }

    let category = CategoryActive {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        image_url: Set(payload.image_url),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await
    .map_err(name_taken)?;

    audit::record(
        &state.pool,
        &admin.email,
        "category_create",
        "categories",
        serde_json::json!({ "category_id": category.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Category created",
        category_from_entity(category, 0),
        Some(Meta::empty()),
    ))
}

pub async fn update_category(
    state: &AppState,
    admin: &AuthUser,
    id: Uuid,
    payload: UpdateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    let existing = Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: CategoryActive = existing.into();
    if let Some(name) = payload.name.map(|n| n.trim().to_string()) {
        if name.is_empty() {
            return Err(AppError::BadRequest("name cannot be empty".into()));
        }
        active.name = Set(name);
    }
    if let Some(image_url) = payload.image_url {
        active.image_url = Set(Some(image_url));
    }
    let category = active.update(&state.orm).await.map_err(name_taken)?;

    audit::record(
        &state.pool,
        &admin.email,
        "category_update",
        "categories",
        serde_json::json!({ "category_id": category.id }),
    )
    .await;

    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM medicines WHERE lower(category) = lower($1)")
            .bind(category.name.as_str())
            .fetch_one(&state.pool)
            .await?;

    Ok(ApiResponse::success(
        "Category updated",
        category_from_entity(category, count),
        Some(Meta::empty()),
    ))
}

pub async fn delete_category(
    state: &AppState,
    admin: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Categories::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        &admin.email,
        "category_delete",
        "categories",
        serde_json::json!({ "category_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Sellers may only advertise their own medicines.
pub async fn create_banner(
    state: &AppState,
    seller: &AuthUser,
    payload: CreateBannerRequest,
) -> AppResult<ApiResponse<Banner>> {
    if payload.image_url.trim().is_empty() {
        return Err(AppError::BadRequest("image_url is required".into()));
    }

    let medicine = Medicines::find_by_id(payload.medicine_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::BadRequest("medicine not found".into()))?;
    if !medicine.seller_email.eq_ignore_ascii_case(&seller.email) {
        return Err(AppError::Forbidden);
    }

    let banner = BannerActive {
        id: Set(Uuid::new_v4()),
        medicine_id: Set(medicine.id),
        seller_email: Set(seller.email.clone()),
        image_url: Set(payload.image_url),
        description: Set(payload.description),
        status: Set(BannerStatus::Requested.as_str().to_string()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        &seller.email,
        "banner_request",
        "banners",
        serde_json::json!({ "banner_id": banner.id, "medicine_id": banner.medicine_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Advertisement requested",
        banner_from_entity(banner),
        Some(Meta::empty()),
    ))
}

pub async fn list_banners(
    state: &AppState,
    status: Option<BannerStatus>,
    seller_email: Option<&str>,
) -> AppResult<ApiResponse<BannerList>> {
    let mut finder = Banners::find();
    if let Some(status) = status {
        finder = finder.filter(BannerCol::Status.eq(status.as_str()));
    }
    if let Some(email) = seller_email {
        finder = finder.filter(BannerCol::SellerEmail.eq(email));
    }

    let items: Vec<Banner> = finder
        .order_by_desc(BannerCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(banner_from_entity)
        .collect();

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Banners", BannerList { items }, Some(meta)))
}

pub async fn update_banner_status(
    state: &AppState,
    admin: &AuthUser,
    id: Uuid,
    payload: UpdateBannerStatusRequest,
) -> AppResult<ApiResponse<Banner>> {
    let existing = Banners::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: BannerActive = existing.into();
    active.status = Set(payload.status.as_str().to_string());
    let banner = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        &admin.email,
        "banner_status_update",
        "banners",
        serde_json::json!({ "banner_id": banner.id, "status": banner.status }),
    )
    .await;

    Ok(ApiResponse::success(
        "Banner updated",
        banner_from_entity(banner),
        Some(Meta::empty()),
    ))
}

fn category_from_entity(model: CategoryModel, medicine_count: i64) -> Category {
    Category {
        id: model.id,
        name: model.name,
        image_url: model.image_url,
        medicine_count,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn banner_from_entity(model: BannerModel) -> Banner {
    Banner {
        id: model.id,
        medicine_id: model.medicine_id,
        seller_email: model.seller_email,
        image_url: model.image_url,
        description: model.description,
        status: model.status,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
