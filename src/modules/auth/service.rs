use sqlx::SqlitePool;
use tracing::instrument;
use uuid::Uuid;

use crate::config::jwt::JwtConfig;
use crate::modules::roles::service as roles_service;
use crate::utils::errors::AppError;
use crate::utils::jwt::create_access_token;
use crate::utils::password::verify_password;

use super::model::{AuthUserData, LoginRequest, LoginResponse};

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, dto, jwt_config), fields(user.email = %dto.email))]
    pub async fn login_user(
        db: &SqlitePool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        #[derive(sqlx::FromRow)]
        struct UserWithPassword {
            id: Uuid,
            name: String,
            username: Option<String>,
            email: String,
            password: String,
        }

        let user = sqlx::query_as::<_, UserWithPassword>(
            "SELECT id, name, username, email, password FROM users WHERE email = $1",
        )
        .bind(&dto.email)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::unauthorized(anyhow::anyhow!("Invalid email or password")))?;

        let is_valid = verify_password(&dto.password, &user.password)?;

        if !is_valid {
            return Err(AppError::unauthorized(anyhow::anyhow!(
                "Invalid email or password"
            )));
        }

        let access_token = create_access_token(user.id, &user.email, jwt_config)?;
        let user = Self::user_payload(db, user.id, user.name, user.username, user.email).await?;

        Ok(LoginResponse { access_token, user })
    }

    /// Returns the identity payload for an already-authenticated user.
    #[instrument(skip(db))]
    pub async fn current_user(db: &SqlitePool, user_id: Uuid) -> Result<AuthUserData, AppError> {
        #[derive(sqlx::FromRow)]
        struct UserRow {
            id: Uuid,
            name: String,
            username: Option<String>,
            email: String,
        }

        let user = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, username, email FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::unauthorized(anyhow::anyhow!("Account no longer exists")))?;

        Self::user_payload(db, user.id, user.name, user.username, user.email).await
    }

    // The token only identifies the user. Roles and permissions are read
    // from the store every time this payload is built.
    async fn user_payload(
        db: &SqlitePool,
        id: Uuid,
        name: String,
        username: Option<String>,
        email: String,
    ) -> Result<AuthUserData, AppError> {
        let roles = roles_service::get_user_roles(db, id).await?;
        let permissions = roles_service::get_user_permissions(db, id).await?;
        let username = username.unwrap_or_else(|| name.clone());

        Ok(AuthUserData {
            id,
            name,
            username,
            email,
            roles,
            permissions,
        })
    }
}
