use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    audit,
    dto::catalog::UserList,
    entity::users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Role, User},
    response::{ApiResponse, Meta},
    services::auth_service::normalize_email,
    state::AppState,
};

/// Every account except `exclude_email`, newest first.
pub async fn list_users(
    state: &AppState,
    exclude_email: &str,
) -> AppResult<ApiResponse<UserList>> {
    let items: Vec<User> = Users::find()
        .filter(UserCol::Email.ne(normalize_email(exclude_email)))
        .order_by_desc(UserCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(user_from_entity)
        .collect();

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Users", UserList { items }, Some(meta)))
}

pub async fn update_user_role(
    state: &AppState,
    admin: &AuthUser,
    id: Uuid,
    role: &str,
) -> AppResult<ApiResponse<User>> {
    let role = role.parse::<Role>().map_err(AppError::BadRequest)?;
    if id == admin.user_id && role != Role::Admin {
        return Err(AppError::BadRequest("admins cannot demote themselves".into()));
    }

    let existing = Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let previous = existing.role.clone();
    let mut active: UserActive = existing.into();
    active.role = Set(role.as_str().to_string());
    let user = active.update(&state.orm).await?;

    tracing::info!(user_id = %user.id, from = %previous, to = %user.role, "role changed");
    audit::record(
        &state.pool,
        &admin.email,
        "user_role_update",
        "users",
        serde_json::json!({ "user_id": user.id, "from": previous, "to": user.role }),
    )
    .await;

    Ok(ApiResponse::success(
        "Role updated",
        user_from_entity(user),
        Some(Meta::empty()),
    ))
}

fn user_from_entity(model: UserModel) -> User {
    User {
        id: model.id,
        email: model.email,
        name: model.name,
        photo_url: model.photo_url,
        role: model.role,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
