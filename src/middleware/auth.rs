use axum::{extract::FromRequestParts, http::header, http::request::Parts};
use jsonwebtoken::{DecodingKey, Validation, decode};
use sea_orm::EntityTrait;
use uuid::Uuid;

use crate::{
    dto::auth::Claims,
    entity::{Users, sea_orm_active_enums::Role},
    error::AppError,
    state::AppState,
};

/// Caller identified by a valid bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: Role,
}

/// Caller whose stored role is [`Role::Admin`].
///
/// The role is read from the database on every request; the role claim in the
/// token is not trusted for authorization.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub user_id: Uuid,
}

pub fn ensure_role(role: Option<Role>, required: Role) -> Result<(), AppError> {
    match role {
        Some(role) if role == required => Ok(()),
        _ => Err(AppError::Forbidden),
    }
}

pub fn ensure_admin(role: Option<Role>) -> Result<(), AppError> {
    ensure_role(role, Role::Admin)
}

pub fn decode_token(token: &str, secret: &str) -> Result<AuthUser, AppError> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

    let user_id = Uuid::parse_str(&decoded.claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid user id in token".into()))?;

    Ok(AuthUser {
        user_id,
        role: decoded.claims.role,
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid Authorization header".into()))?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".into()))?
            .trim();

        decode_token(token, &state.jwt_secret)
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        let role = Users::find_by_id(user.user_id)
            .one(state.orm.as_ref())
            .await
            .map_err(|err| {
                tracing::error!(error = %err, user_id = %user.user_id, "role lookup failed");
                AppError::Internal(anyhow::anyhow!("role lookup failed"))
            })?
            .map(|u| u.role);

        if let Err(err) = ensure_admin(role) {
            tracing::warn!(user_id = %user.user_id, "admin route rejected");
            return Err(err);
        }

        Ok(AdminUser {
            user_id: user.user_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_role_passes_gate() {
        assert!(ensure_admin(Some(Role::Admin)).is_ok());
    }

    #[test]
    fn customer_and_unknown_users_are_forbidden() {
        assert!(matches!(
            ensure_admin(Some(Role::Customer)),
            Err(AppError::Forbidden)
        ));
        assert!(matches!(ensure_admin(None), Err(AppError::Forbidden)));
    }

    #[test]
    fn garbage_token_is_unauthorized() {
        assert!(matches!(
            decode_token("not-a-jwt", "secret"),
            Err(AppError::Unauthorized(_))
        ));
    }
}
