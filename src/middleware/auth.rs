use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::modules::auth::model::Claims;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::verify_token;

/// Extractor that validates the bearer token and provides the authenticated
/// user's claims. Claims carry identity only; role and permission checks
/// always go back to the store so they see administrative changes
/// immediately, not at next login.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Get the user ID as UUID
    pub fn user_id(&self) -> Result<uuid::Uuid, AppError> {
        uuid::Uuid::parse_str(&self.0.sub)
            .map_err(|_| AppError::unauthorized(anyhow::anyhow!("Invalid user ID in token")))
    }

    /// Get the user's email
    pub fn email(&self) -> &str {
        &self.0.email
    }
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
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError::unauthorized(anyhow::anyhow!("Missing authorization header"))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::unauthorized(anyhow::anyhow!("Invalid authorization header format"))
        })?;

        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

/// Helper macro to create permission check extractors for the catalog's
/// permissions. The check queries the store on every request.
#[macro_export]
macro_rules! require_permission {
    ($name:ident, $permission:literal) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = $crate::utils::errors::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user =
                    $crate::middleware::auth::AuthUser::from_request_parts(parts, state).await?;
                let user_id = auth_user.user_id()?;

                let allowed = $crate::modules::roles::service::user_has_permission(
                    &state.db,
                    user_id,
                    $permission,
                )
                .await?;

                if !allowed {
                    return Err($crate::utils::errors::AppError::forbidden(anyhow::anyhow!(
                        "Access denied. Missing required permission: {}",
                        $permission
                    )));
                }

                Ok($name(auth_user))
            }
        }
    };
}

// Pre-defined permission extractors for the catalog

require_permission!(RequireRolesManage, "roles.manage");

require_permission!(RequirePersonasView, "personas.view");
require_permission!(RequirePersonasCreate, "personas.create");
require_permission!(RequirePersonasEdit, "personas.edit");
require_permission!(RequirePersonasDelete, "personas.delete");

require_permission!(RequireSystemView, "system.view");

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn create_test_claims(sub: String) -> Claims {
        Claims {
            sub,
            email: "test@example.com".to_string(),
            exp: 9999999999,
            iat: 1234567890,
        }
    }

    #[test]
    fn test_user_id_parses_valid_uuid() {
        let user_id = Uuid::new_v4();
        let auth_user = AuthUser(create_test_claims(user_id.to_string()));

        assert_eq!(auth_user.user_id().unwrap(), user_id);
    }

    #[test]
    fn test_user_id_rejects_garbage_sub() {
        let auth_user = AuthUser(create_test_claims("not-a-uuid".to_string()));

        assert!(auth_user.user_id().is_err());
    }

    #[test]
    fn test_email_accessor() {
        let auth_user = AuthUser(create_test_claims(Uuid::new_v4().to_string()));

        assert_eq!(auth_user.email(), "test@example.com");
    }
}
