use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;
use uuid::Uuid;

use crate::{
    audit,
    dto::auth::{NewUser, RegisterRequest, RoleResponse, TokenRequest, TokenResponse},
    error::{AppError, AppResult},
    middleware::auth::issue_token,
    models::{Role, User},
    response::{ApiResponse, Meta},
    state::AppState,
};

#[derive(sqlx::FromRow)]
struct CredentialRow {
    id: Uuid,
    email: String,
    password_hash: String,
    role: String,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<User>> {
    let NewUser {
        email,
        password,
        name,
        photo_url,
        role,
    } = payload.user;

    let email = normalize_email(&email);
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::BadRequest("a valid email is required".into()));
    }
    if password.len() < 6 {
        return Err(AppError::BadRequest(
            "password must be at least 6 characters".into(),
        ));
    }
    let role = role.unwrap_or(Role::User);
    if role == Role::Admin {
        return Err(AppError::BadRequest("cannot self-register as admin".into()));
    }

    let password_hash = hash_password(&password)?;

    // The unique index on email makes this a single atomic check-and-insert.
    let user: Option<User> = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, name, photo_url, password_hash, role)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (email) DO NOTHING
        RETURNING id, email, name, photo_url, role, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email.as_str())
    .bind(name)
    .bind(photo_url)
    .bind(password_hash)
    .bind(role.as_str())
    .fetch_optional(&state.pool)
    .await?;

    let user = user.ok_or_else(|| AppError::Conflict("user already exists".into()))?;

    audit::record(
        &state.pool,
        &user.email,
        "user_register",
        "users",
        serde_json::json!({ "user_id": user.id, "role": user.role }),
    )
    .await;

    Ok(ApiResponse::success("User created", user, None))
}

pub async fn issue_jwt(
    state: &AppState,
    payload: TokenRequest,
) -> AppResult<ApiResponse<TokenResponse>> {
    let email = normalize_email(&payload.email);
    let user = sqlx::query_as::<_, CredentialRow>(
        "SELECT id, email, password_hash, role FROM users WHERE email = $1",
    )
    .bind(email.as_str())
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AppError::Unauthorized)?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    if Argon2::default()
        .verify_password(payload.password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::Unauthorized);
    }

    let token = issue_token(
        &state.config.jwt_secret,
        user.id,
        &user.email,
        &user.role,
        state.config.jwt_expires_hours,
    )?;

    tracing::debug!(email = %user.email, "token issued");

    Ok(ApiResponse::success(
        "Token issued",
        TokenResponse { token },
        Some(Meta::empty()),
    ))
}

pub async fn get_user_role(state: &AppState, email: &str) -> AppResult<ApiResponse<RoleResponse>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT role FROM users WHERE email = $1")
        .bind(normalize_email(email))
        .fetch_optional(&state.pool)
        .await?;

    let (role,) = row.ok_or(AppError::NotFound)?;
    let role = role
        .parse::<Role>()
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;

    Ok(ApiResponse::ok(RoleResponse { role }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_are_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  Jane.Doe@Example.COM "), "jane.doe@example.com");
    }

    #[test]
    fn hashed_password_verifies() {
        let hash = hash_password("hunter22").unwrap();
        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(
            Argon2::default()
                .verify_password(b"hunter22", &parsed)
                .is_ok()
        );
        assert!(
            Argon2::default()
                .verify_password(b"wrong", &parsed)
                .is_err()
        );
    }
}
