use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Permission {
    pub id: Uuid,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Role as the API exposes it: the row plus its permission names, whether the
/// name is in the protected set, and how many users currently hold it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoleWithPermissions {
    #[serde(flatten)]
    pub role: Role,
    pub permissions: Vec<String>,
    pub is_protected: bool,
    pub users_count: i64,
}

// DTOs

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePermissionDto {
    #[validate(length(
        min = 2,
        max = 50,
        message = "Name must be between 2 and 50 characters"
    ))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePermissionDto {
    #[validate(length(
        min = 2,
        max = 50,
        message = "Name must be between 2 and 50 characters"
    ))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRoleDto {
    #[validate(length(
        min = 2,
        max = 50,
        message = "Name must be between 2 and 50 characters"
    ))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRoleDto {
    #[validate(length(
        min = 2,
        max = 50,
        message = "Name must be between 2 and 50 characters"
    ))]
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GrantPermissionDto {
    pub permission: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SyncPermissionsDto {
    pub permissions: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignRoleDto {
    pub role: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserRolesResponse {
    pub user_id: Uuid,
    pub roles: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserPermissionsResponse {
    pub user_id: Uuid,
    pub permissions: Vec<String>,
}
