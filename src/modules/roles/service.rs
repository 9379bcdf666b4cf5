//! Role and permission services: the permission registry, the role registry,
//! and the user-role evaluator.
//!
//! Every mutating operation runs its validation and its writes inside a
//! single transaction, so the uniqueness and referential-integrity rules hold
//! even under concurrent administrators. Reads go straight to the pool.
//! Permission checks are recomputed from the store on every call; nothing is
//! cached.

use sqlx::SqlitePool;
use tracing::instrument;
use uuid::Uuid;

use crate::config::access::AccessConfig;

use super::error::{AccessError, Entity};
use super::model::{Permission, Role, RoleWithPermissions};

// ============ Permission Registry ============

#[instrument(skip(db))]
pub async fn get_all_permissions(db: &SqlitePool) -> Result<Vec<Permission>, AccessError> {
    let permissions = sqlx::query_as::<_, Permission>(
        "SELECT id, name, created_at, updated_at FROM permissions ORDER BY name",
    )
    .fetch_all(db)
    .await?;

    Ok(permissions)
}

#[instrument(skip(db))]
pub async fn create_permission(db: &SqlitePool, name: &str) -> Result<Permission, AccessError> {
    let mut tx = db.begin().await?;

    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM permissions WHERE name = $1)")
            .bind(name)
            .fetch_one(&mut *tx)
            .await?;

    if exists {
        return Err(AccessError::DuplicateName {
            entity: Entity::Permission,
            name: name.to_string(),
        });
    }

    let now = chrono::Utc::now();
    let permission = Permission {
        id: Uuid::new_v4(),
        name: name.to_string(),
        created_at: now,
        updated_at: now,
    };

    sqlx::query("INSERT INTO permissions (id, name, created_at, updated_at) VALUES ($1, $2, $3, $4)")
        .bind(permission.id)
        .bind(&permission.name)
        .bind(permission.created_at)
        .bind(permission.updated_at)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(permission)
}

#[instrument(skip(db))]
pub async fn update_permission(
    db: &SqlitePool,
    id: Uuid,
    new_name: &str,
) -> Result<Permission, AccessError> {
    let mut tx = db.begin().await?;

    let mut permission = sqlx::query_as::<_, Permission>(
        "SELECT id, name, created_at, updated_at FROM permissions WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AccessError::NotFound {
        entity: Entity::Permission,
        name: id.to_string(),
    })?;

    // Renaming a permission to its current name is allowed as a no-op.
    let taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM permissions WHERE name = $1 AND id <> $2)",
    )
    .bind(new_name)
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    if taken {
        return Err(AccessError::DuplicateName {
            entity: Entity::Permission,
            name: new_name.to_string(),
        });
    }

    let now = chrono::Utc::now();
    sqlx::query("UPDATE permissions SET name = $1, updated_at = $2 WHERE id = $3")
        .bind(new_name)
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    permission.name = new_name.to_string();
    permission.updated_at = now;

    Ok(permission)
}

#[instrument(skip(db))]
pub async fn delete_permission(db: &SqlitePool, id: Uuid) -> Result<(), AccessError> {
    let mut tx = db.begin().await?;

    let permission = sqlx::query_as::<_, Permission>(
        "SELECT id, name, created_at, updated_at FROM permissions WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AccessError::NotFound {
        entity: Entity::Permission,
        name: id.to_string(),
    })?;

    let roles =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM role_permissions WHERE permission_id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

    if roles > 0 {
        return Err(AccessError::InUse {
            permission: permission.name,
            roles,
        });
    }

    sqlx::query("DELETE FROM permissions WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(())
}

// ============ Role Registry ============

#[instrument(skip(db, access))]
pub async fn get_roles(
    db: &SqlitePool,
    access: &AccessConfig,
) -> Result<Vec<RoleWithPermissions>, AccessError> {
    let roles =
        sqlx::query_as::<_, Role>("SELECT id, name, created_at, updated_at FROM roles ORDER BY name")
            .fetch_all(db)
            .await?;

    let mut details = Vec::with_capacity(roles.len());
    for role in roles {
        details.push(role_details(db, access, role).await?);
    }

    Ok(details)
}

#[instrument(skip(db, access))]
pub async fn get_role_by_id(
    db: &SqlitePool,
    access: &AccessConfig,
    id: Uuid,
) -> Result<RoleWithPermissions, AccessError> {
    let role = find_role(db, id).await?;
    role_details(db, access, role).await
}

#[instrument(skip(db))]
pub async fn find_role_by_name(db: &SqlitePool, name: &str) -> Result<Option<Role>, AccessError> {
    let role = sqlx::query_as::<_, Role>(
        "SELECT id, name, created_at, updated_at FROM roles WHERE name = $1",
    )
    .bind(name)
    .fetch_optional(db)
    .await?;

    Ok(role)
}

#[instrument(skip(db, access))]
pub async fn create_role(
    db: &SqlitePool,
    access: &AccessConfig,
    name: &str,
) -> Result<RoleWithPermissions, AccessError> {
    let mut tx = db.begin().await?;

    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM roles WHERE name = $1)")
        .bind(name)
        .fetch_one(&mut *tx)
        .await?;

    if exists {
        return Err(AccessError::DuplicateName {
            entity: Entity::Role,
            name: name.to_string(),
        });
    }

    let now = chrono::Utc::now();
    let role = Role {
        id: Uuid::new_v4(),
        name: name.to_string(),
        created_at: now,
        updated_at: now,
    };

    sqlx::query("INSERT INTO roles (id, name, created_at, updated_at) VALUES ($1, $2, $3, $4)")
        .bind(role.id)
        .bind(&role.name)
        .bind(role.created_at)
        .bind(role.updated_at)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    let is_protected = access.is_protected(&role.name);

    Ok(RoleWithPermissions {
        role,
        permissions: vec![],
        is_protected,
        users_count: 0,
    })
}

#[instrument(skip(db, access))]
pub async fn update_role(
    db: &SqlitePool,
    access: &AccessConfig,
    id: Uuid,
    new_name: &str,
) -> Result<RoleWithPermissions, AccessError> {
    let mut tx = db.begin().await?;

    let role = sqlx::query_as::<_, Role>(
        "SELECT id, name, created_at, updated_at FROM roles WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AccessError::NotFound {
        entity: Entity::Role,
        name: id.to_string(),
    })?;

    if access.is_protected(&role.name) {
        return Err(AccessError::Protected { role: role.name });
    }

    let taken =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM roles WHERE name = $1 AND id <> $2)")
            .bind(new_name)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

    if taken {
        return Err(AccessError::DuplicateName {
            entity: Entity::Role,
            name: new_name.to_string(),
        });
    }

    let now = chrono::Utc::now();
    sqlx::query("UPDATE roles SET name = $1, updated_at = $2 WHERE id = $3")
        .bind(new_name)
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    let updated = Role {
        name: new_name.to_string(),
        updated_at: now,
        ..role
    };

    role_details(db, access, updated).await
}

#[instrument(skip(db, access))]
pub async fn delete_role(
    db: &SqlitePool,
    access: &AccessConfig,
    id: Uuid,
) -> Result<(), AccessError> {
    let mut tx = db.begin().await?;

    let role = sqlx::query_as::<_, Role>(
        "SELECT id, name, created_at, updated_at FROM roles WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AccessError::NotFound {
        entity: Entity::Role,
        name: id.to_string(),
    })?;

    if access.is_protected(&role.name) {
        return Err(AccessError::Protected { role: role.name });
    }

    let users = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM user_roles WHERE role_id = $1")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

    if users > 0 {
        return Err(AccessError::HasUsers {
            role: role.name,
            users,
        });
    }

    sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM roles WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(())
}

// ============ Role Permissions ============

#[instrument(skip(db))]
pub async fn get_role_permissions(db: &SqlitePool, role_id: Uuid) -> Result<Vec<String>, AccessError> {
    let names = sqlx::query_scalar::<_, String>(
        r#"SELECT p.name
        FROM permissions p
        INNER JOIN role_permissions rp ON p.id = rp.permission_id
        WHERE rp.role_id = $1
        ORDER BY p.name"#,
    )
    .bind(role_id)
    .fetch_all(db)
    .await?;

    Ok(names)
}

#[instrument(skip(db, access))]
pub async fn grant_permission_to_role(
    db: &SqlitePool,
    access: &AccessConfig,
    role_id: Uuid,
    permission_name: &str,
) -> Result<RoleWithPermissions, AccessError> {
    let mut tx = db.begin().await?;

    let role = sqlx::query_as::<_, Role>(
        "SELECT id, name, created_at, updated_at FROM roles WHERE id = $1",
    )
    .bind(role_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AccessError::NotFound {
        entity: Entity::Role,
        name: role_id.to_string(),
    })?;

    let permission = sqlx::query_as::<_, Permission>(
        "SELECT id, name, created_at, updated_at FROM permissions WHERE name = $1",
    )
    .bind(permission_name)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AccessError::NotFound {
        entity: Entity::Permission,
        name: permission_name.to_string(),
    })?;

    let granted = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM role_permissions WHERE role_id = $1 AND permission_id = $2)",
    )
    .bind(role.id)
    .bind(permission.id)
    .fetch_one(&mut *tx)
    .await?;

    if granted {
        return Err(AccessError::AlreadyGranted {
            role: role.name,
            permission: permission.name,
        });
    }

    sqlx::query("INSERT INTO role_permissions (role_id, permission_id, created_at) VALUES ($1, $2, $3)")
        .bind(role.id)
        .bind(permission.id)
        .bind(chrono::Utc::now())
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    role_details(db, access, role).await
}

#[instrument(skip(db, access))]
pub async fn remove_permission_from_role(
    db: &SqlitePool,
    access: &AccessConfig,
    role_id: Uuid,
    permission_name: &str,
) -> Result<RoleWithPermissions, AccessError> {
    let mut tx = db.begin().await?;

    let role = sqlx::query_as::<_, Role>(
        "SELECT id, name, created_at, updated_at FROM roles WHERE id = $1",
    )
    .bind(role_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AccessError::NotFound {
        entity: Entity::Role,
        name: role_id.to_string(),
    })?;

    let permission = sqlx::query_as::<_, Permission>(
        "SELECT id, name, created_at, updated_at FROM permissions WHERE name = $1",
    )
    .bind(permission_name)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AccessError::NotFound {
        entity: Entity::Permission,
        name: permission_name.to_string(),
    })?;

    let granted = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM role_permissions WHERE role_id = $1 AND permission_id = $2)",
    )
    .bind(role.id)
    .bind(permission.id)
    .fetch_one(&mut *tx)
    .await?;

    if !granted {
        return Err(AccessError::NotGranted {
            role: role.name,
            permission: permission.name,
        });
    }

    sqlx::query("DELETE FROM role_permissions WHERE role_id = $1 AND permission_id = $2")
        .bind(role.id)
        .bind(permission.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    role_details(db, access, role).await
}

/// Replaces the role's entire permission set in one transaction. Used for
/// bulk role provisioning; any unknown permission name aborts the whole
/// replacement before the old set is touched.
#[instrument(skip(db, access))]
pub async fn sync_role_permissions(
    db: &SqlitePool,
    access: &AccessConfig,
    role_id: Uuid,
    permission_names: &[String],
) -> Result<RoleWithPermissions, AccessError> {
    let mut tx = db.begin().await?;

    let role = sqlx::query_as::<_, Role>(
        "SELECT id, name, created_at, updated_at FROM roles WHERE id = $1",
    )
    .bind(role_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AccessError::NotFound {
        entity: Entity::Role,
        name: role_id.to_string(),
    })?;

    let mut permission_ids = Vec::with_capacity(permission_names.len());
    for name in permission_names {
        let id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM permissions WHERE name = $1")
            .bind(name)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AccessError::NotFound {
                entity: Entity::Permission,
                name: name.clone(),
            })?;
        permission_ids.push(id);
    }

    sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
        .bind(role.id)
        .execute(&mut *tx)
        .await?;

    let now = chrono::Utc::now();
    for permission_id in permission_ids {
        sqlx::query(
            r#"INSERT INTO role_permissions (role_id, permission_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (role_id, permission_id) DO NOTHING"#,
        )
        .bind(role.id)
        .bind(permission_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    role_details(db, access, role).await
}

// ============ User Role Assignment ============

#[instrument(skip(db))]
pub async fn assign_role_to_user(
    db: &SqlitePool,
    user_id: Uuid,
    role_name: &str,
) -> Result<Vec<String>, AccessError> {
    let mut tx = db.begin().await?;

    ensure_user_exists(&mut tx, user_id).await?;

    let role = sqlx::query_as::<_, Role>(
        "SELECT id, name, created_at, updated_at FROM roles WHERE name = $1",
    )
    .bind(role_name)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AccessError::NotFound {
        entity: Entity::Role,
        name: role_name.to_string(),
    })?;

    let assigned = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM user_roles WHERE user_id = $1 AND role_id = $2)",
    )
    .bind(user_id)
    .bind(role.id)
    .fetch_one(&mut *tx)
    .await?;

    if assigned {
        return Err(AccessError::AlreadyAssigned { role: role.name });
    }

    sqlx::query("INSERT INTO user_roles (user_id, role_id, created_at) VALUES ($1, $2, $3)")
        .bind(user_id)
        .bind(role.id)
        .bind(chrono::Utc::now())
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    get_user_roles(db, user_id).await
}

#[instrument(skip(db, access))]
pub async fn remove_role_from_user(
    db: &SqlitePool,
    access: &AccessConfig,
    user_id: Uuid,
    role_name: &str,
) -> Result<Vec<String>, AccessError> {
    let mut tx = db.begin().await?;

    ensure_user_exists(&mut tx, user_id).await?;

    let role = sqlx::query_as::<_, Role>(
        "SELECT id, name, created_at, updated_at FROM roles WHERE name = $1",
    )
    .bind(role_name)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AccessError::NotFound {
        entity: Entity::Role,
        name: role_name.to_string(),
    })?;

    let assigned = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM user_roles WHERE user_id = $1 AND role_id = $2)",
    )
    .bind(user_id)
    .bind(role.id)
    .fetch_one(&mut *tx)
    .await?;

    if !assigned {
        return Err(AccessError::NotAssigned { role: role.name });
    }

    // A user whose only role is the designated administrator role keeps it.
    // The guard is deliberately narrow: it fires for that exact role name and
    // a role count of one, nothing broader.
    if access.is_admin_role(&role.name) {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM user_roles WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

        if count == 1 {
            return Err(AccessError::LastAdminRole);
        }
    }

    sqlx::query("DELETE FROM user_roles WHERE user_id = $1 AND role_id = $2")
        .bind(user_id)
        .bind(role.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    get_user_roles(db, user_id).await
}

#[instrument(skip(db))]
pub async fn get_user_roles(db: &SqlitePool, user_id: Uuid) -> Result<Vec<String>, AccessError> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
        .bind(user_id)
        .fetch_one(db)
        .await?;

    if !exists {
        return Err(AccessError::NotFound {
            entity: Entity::User,
            name: user_id.to_string(),
        });
    }

    let roles = sqlx::query_scalar::<_, String>(
        r#"SELECT r.name
        FROM roles r
        INNER JOIN user_roles ur ON r.id = ur.role_id
        WHERE ur.user_id = $1
        ORDER BY r.name"#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;

    Ok(roles)
}

// ============ Permission Checks ============

#[instrument(skip(db))]
pub async fn user_has_permission(
    db: &SqlitePool,
    user_id: Uuid,
    permission_name: &str,
) -> Result<bool, AccessError> {
    let result = sqlx::query_scalar::<_, bool>(
        r#"SELECT EXISTS(
            SELECT 1 FROM user_roles ur
            INNER JOIN role_permissions rp ON ur.role_id = rp.role_id
            INNER JOIN permissions p ON rp.permission_id = p.id
            WHERE ur.user_id = $1 AND p.name = $2
        )"#,
    )
    .bind(user_id)
    .bind(permission_name)
    .fetch_one(db)
    .await?;

    Ok(result)
}

#[instrument(skip(db))]
pub async fn get_user_permissions(
    db: &SqlitePool,
    user_id: Uuid,
) -> Result<Vec<String>, AccessError> {
    let permissions = sqlx::query_scalar::<_, String>(
        r#"SELECT DISTINCT p.name
        FROM permissions p
        INNER JOIN role_permissions rp ON p.id = rp.permission_id
        INNER JOIN user_roles ur ON rp.role_id = ur.role_id
        WHERE ur.user_id = $1
        ORDER BY p.name"#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;

    Ok(permissions)
}

// ============ Internal helpers ============

async fn find_role(db: &SqlitePool, id: Uuid) -> Result<Role, AccessError> {
    sqlx::query_as::<_, Role>("SELECT id, name, created_at, updated_at FROM roles WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AccessError::NotFound {
            entity: Entity::Role,
            name: id.to_string(),
        })
}

async fn ensure_user_exists(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    user_id: Uuid,
) -> Result<(), AccessError> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
        .bind(user_id)
        .fetch_one(&mut **tx)
        .await?;

    if !exists {
        return Err(AccessError::NotFound {
            entity: Entity::User,
            name: user_id.to_string(),
        });
    }

    Ok(())
}

async fn role_details(
    db: &SqlitePool,
    access: &AccessConfig,
    role: Role,
) -> Result<RoleWithPermissions, AccessError> {
    let permissions = get_role_permissions(db, role.id).await?;

    let users_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM user_roles WHERE role_id = $1")
        .bind(role.id)
        .fetch_one(db)
        .await?;

    let is_protected = access.is_protected(&role.name);

    Ok(RoleWithPermissions {
        role,
        permissions,
        is_protected,
        users_count,
    })
}
