use std::fmt;

use axum::http::StatusCode;
use thiserror::Error;

use crate::utils::errors::AppError;

/// Entity kind an access-control error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Permission,
    Role,
    User,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Permission => write!(f, "Permission"),
            Entity::Role => write!(f, "Role"),
            Entity::User => write!(f, "User"),
        }
    }
}

/// Outcome of an access-control operation that was refused.
///
/// Every mutating operation in the roles service validates existence,
/// uniqueness, protection and referential integrity before touching the
/// store; when a check fails, the operation applies nothing and returns the
/// variant naming the violated rule. Callers receive exactly one kind per
/// failure, never a logged-and-swallowed condition.
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("{entity} {name:?} does not exist")]
    NotFound { entity: Entity, name: String },

    #[error("{entity} {name:?} already exists")]
    DuplicateName { entity: Entity, name: String },

    #[error("role {role:?} already has permission {permission:?}")]
    AlreadyGranted { role: String, permission: String },

    #[error("role {role:?} does not have permission {permission:?}")]
    NotGranted { role: String, permission: String },

    #[error("user already has role {role:?}")]
    AlreadyAssigned { role: String },

    #[error("user does not have role {role:?}")]
    NotAssigned { role: String },

    #[error("role {role:?} is protected and cannot be modified")]
    Protected { role: String },

    #[error("permission {permission:?} is assigned to {roles} role(s) and cannot be deleted")]
    InUse { permission: String, roles: i64 },

    #[error("role {role:?} is assigned to {users} user(s) and cannot be deleted")]
    HasUsers { role: String, users: i64 },

    #[error("cannot remove the user's last administrator role")]
    LastAdminRole,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<AccessError> for AppError {
    fn from(err: AccessError) -> Self {
        let status = match &err {
            AccessError::NotFound { .. } => StatusCode::NOT_FOUND,
            AccessError::Protected { .. } | AccessError::LastAdminRole => StatusCode::FORBIDDEN,
            AccessError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AccessError::DuplicateName { .. }
            | AccessError::AlreadyGranted { .. }
            | AccessError::NotGranted { .. }
            | AccessError::AlreadyAssigned { .. }
            | AccessError::NotAssigned { .. }
            | AccessError::InUse { .. }
            | AccessError::HasUsers { .. } => StatusCode::CONFLICT,
        };

        AppError::new(status, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let err = AccessError::NotFound {
            entity: Entity::Role,
            name: "Operador".to_string(),
        };
        let app_err = AppError::from(err);
        assert_eq!(app_err.status, StatusCode::NOT_FOUND);
        assert!(app_err.error.to_string().contains("Operador"));
    }

    #[test]
    fn test_protection_violations_map_to_403() {
        let protected = AccessError::Protected {
            role: "Administrador".to_string(),
        };
        assert_eq!(AppError::from(protected).status, StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::from(AccessError::LastAdminRole).status,
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_state_conflicts_map_to_409() {
        let cases = vec![
            AccessError::DuplicateName {
                entity: Entity::Permission,
                name: "personas.view".to_string(),
            },
            AccessError::AlreadyGranted {
                role: "Operador".to_string(),
                permission: "personas.view".to_string(),
            },
            AccessError::NotGranted {
                role: "Operador".to_string(),
                permission: "personas.view".to_string(),
            },
            AccessError::AlreadyAssigned {
                role: "Operador".to_string(),
            },
            AccessError::NotAssigned {
                role: "Operador".to_string(),
            },
            AccessError::InUse {
                permission: "personas.view".to_string(),
                roles: 2,
            },
            AccessError::HasUsers {
                role: "Operador".to_string(),
                users: 3,
            },
        ];

        for err in cases {
            assert_eq!(AppError::from(err).status, StatusCode::CONFLICT);
        }
    }

    #[test]
    fn test_counts_appear_in_messages() {
        let in_use = AccessError::InUse {
            permission: "personas.view".to_string(),
            roles: 2,
        };
        assert!(in_use.to_string().contains("2 role(s)"));

        let has_users = AccessError::HasUsers {
            role: "Operador".to_string(),
            users: 5,
        };
        assert!(has_users.to_string().contains("5 user(s)"));
    }
}
