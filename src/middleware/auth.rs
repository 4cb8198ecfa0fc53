use axum::{extract::FromRequestParts, http::header};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::{
    dto::auth::Claims,
    error::{AppError, AppResult},
    models::Role,
    state::AppState,
};

/// Caller identity decoded from the bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: String,
}

pub fn issue_token(
    secret: &str,
    user_id: Uuid,
    email: &str,
    role: &str,
    expires_hours: i64,
) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(expires_hours))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role: role.to_string(),
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub fn decode_token(secret: &str, token: &str) -> AppResult<AuthUser> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized)?;

    let user_id = Uuid::parse_str(&decoded.claims.sub).map_err(|_| AppError::Unauthorized)?;

    Ok(AuthUser {
        user_id,
        email: decoded.claims.email,
        role: decoded.claims.role,
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_str = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AppError::Unauthorized)?;

        decode_token(&state.config.jwt_secret, token)
    }
}

/// Look up the caller's stored role; the token claim is not trusted here.
pub async fn stored_role(state: &AppState, user: &AuthUser) -> AppResult<Option<Role>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT role FROM users WHERE id = $1")
        .bind(user.user_id)
        .fetch_optional(&state.pool)
        .await?;

    Ok(row.and_then(|(role,)| role.parse::<Role>().ok()))
}

pub async fn verify_role(state: &AppState, user: &AuthUser, required: Role) -> AppResult<()> {
    match stored_role(state, user).await? {
        Some(role) if role == required => Ok(()),
        other => {
            tracing::debug!(
                email = %user.email,
                required = %required,
                stored = ?other,
                "role gate rejected caller"
            );
            Err(AppError::Unauthorized)
        }
    }
}

pub async fn verify_admin(state: &AppState, user: &AuthUser) -> AppResult<()> {
    verify_role(state, user, Role::Admin).await
}

pub async fn verify_seller(state: &AppState, user: &AuthUser) -> AppResult<()> {
    verify_role(state, user, Role::Seller).await
}

pub async fn verify_user(state: &AppState, user: &AuthUser) -> AppResult<()> {
    verify_role(state, user, Role::User).await
}

/// Routes keyed by an email path segment only serve the caller's own data.
pub fn ensure_own_email(user: &AuthUser, email: &str) -> AppResult<()> {
    if !user.email.eq_ignore_ascii_case(email) {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn issued_token_decodes_to_same_identity() {
        let id = Uuid::new_v4();
        let token = issue_token(SECRET, id, "seller@example.com", "seller", 1).unwrap();
        let user = decode_token(SECRET, &token).unwrap();
        assert_eq!(user.user_id, id);
        assert_eq!(user.email, "seller@example.com");
        assert_eq!(user.role, "seller");
    }

    #[test]
    fn token_signed_with_other_secret_is_unauthorized() {
        let token = issue_token("other", Uuid::new_v4(), "a@b.c", "user", 1).unwrap();
        assert!(matches!(
            decode_token(SECRET, &token),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn expired_token_is_unauthorized() {
        let token = issue_token(SECRET, Uuid::new_v4(), "a@b.c", "user", -2).unwrap();
        assert!(matches!(
            decode_token(SECRET, &token),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn own_email_check_ignores_case() {
        let user = AuthUser {
            user_id: Uuid::new_v4(),
            email: "Buyer@Example.com".into(),
            role: "user".into(),
        };
        assert!(ensure_own_email(&user, "buyer@example.com").is_ok());
        assert!(matches!(
            ensure_own_email(&user, "other@example.com"),
            Err(AppError::Forbidden)
        ));
    }
}
