//! User data models and DTOs.
//!
//! # Core Types
//!
//! - [`User`] - Base account entity from the database (password column is
//!   never selected into this struct)
//! - [`UserWithRoles`] - User with the names of their assigned roles
//!
//! # Request DTOs
//!
//! - [`CreateUserDto`] - Create a new account
//! - [`ChangePasswordDto`] - Change own password
//! - [`UserFilterParams`] - Query parameters for filtering users

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A user account.
///
/// Accounts carry identity only. What a user may do is derived entirely
/// from their assigned roles at evaluation time.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub username: Option<String>,
    pub email: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for creating a new account.
///
/// Roles are not set here. Assignment goes through the user-role
/// endpoints so the same invariants apply everywhere.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 255))]
    pub username: Option<String>,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
}

/// User with the names of their assigned roles.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserWithRoles {
    #[serde(flatten)]
    pub user: User,
    pub roles: Vec<String>,
}

/// Query parameters for filtering users.
///
/// All filters are optional and can be combined.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UserFilterParams {
    pub name: Option<String>,
    pub email: Option<String>,
    /// Filter by assigned role name
    pub role: Option<String>,
    #[serde(flatten)]
    pub pagination: crate::utils::pagination::PaginationParams,
}

/// Paginated response containing users with their role names.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedUsersResponse {
    pub data: Vec<UserWithRoles>,
    pub meta: crate::utils::pagination::PaginationMeta,
}

/// DTO for changing the caller's own password.
///
/// Requires the current password for verification before
/// allowing the password change.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordDto {
    #[validate(length(min = 1))]
    #[serde(alias = "old_password")]
    pub current_password: String,
    #[validate(length(min = 8))]
    #[schema(example = "newPassword123")]
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json;

    #[test]
    fn test_create_user_dto_deserialize() {
        let json = r#"{"name":"Jane Smith","email":"jane@test.com","password":"password123"}"#;
        let dto: CreateUserDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.name, "Jane Smith");
        assert_eq!(dto.email, "jane@test.com");
        assert_eq!(dto.password, "password123");
        assert!(dto.username.is_none());
    }

    #[test]
    fn test_create_user_dto_validation() {
        let dto = CreateUserDto {
            name: "Jane".to_string(),
            username: None,
            email: "not-an-email".to_string(),
            password: "password123".to_string(),
        };
        assert!(dto.validate().is_err());

        let dto_short_password = CreateUserDto {
            name: "Jane".to_string(),
            username: None,
            email: "jane@test.com".to_string(),
            password: "short".to_string(),
        };
        assert!(dto_short_password.validate().is_err());
    }

    #[test]
    fn test_change_password_dto_validation() {
        let dto = ChangePasswordDto {
            current_password: "currentPass".to_string(),
            new_password: "newPassword123".to_string(),
        };
        assert!(dto.validate().is_ok());

        let dto_short = ChangePasswordDto {
            current_password: "current".to_string(),
            new_password: "short".to_string(),
        };
        assert!(dto_short.validate().is_err());

        let dto_empty_current = ChangePasswordDto {
            current_password: "".to_string(),
            new_password: "validPassword123".to_string(),
        };
        assert!(dto_empty_current.validate().is_err());
    }

    #[test]
    fn test_change_password_dto_accepts_old_password_alias() {
        let json = r#"{"old_password":"current","new_password":"newPassword123"}"#;
        let dto: ChangePasswordDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.current_password, "current");
    }

    #[test]
    fn test_user_with_roles_serializes_flat() {
        let user = User {
            id: Uuid::new_v4(),
            name: "John Doe".to_string(),
            username: Some("jdoe".to_string()),
            email: "john@example.com".to_string(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let with_roles = UserWithRoles {
            user,
            roles: vec!["Operador".to_string()],
        };

        let value = serde_json::to_value(&with_roles).unwrap();
        assert_eq!(value["email"], "john@example.com");
        assert_eq!(value["roles"][0], "Operador");
        assert!(value.get("user").is_none());
    }
}
