//! Administrative commands backing the `expediente-cli` binary.

pub mod seeder;

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::config::access::AccessConfig;
use crate::modules::roles::AccessError;
use crate::modules::roles::service as roles_service;
use crate::utils::password::hash_password;

/// Creates an account holding the designated administrator role.
///
/// The role is created on first use and granted every permission in the
/// registry, so a fresh database ends up with a fully-privileged account.
pub async fn create_admin(
    db: &SqlitePool,
    access: &AccessConfig,
    name: &str,
    email: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let hashed_password =
        hash_password(password).map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let now = chrono::Utc::now();
    let result = sqlx::query(
        "INSERT INTO users (id, name, username, email, password, created_at, updated_at)
         VALUES ($1, $2, NULL, $3, $4, $5, $6)
         ON CONFLICT (email) DO NOTHING",
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(email)
    .bind(&hashed_password)
    .bind(now)
    .bind(now)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err("User with this email already exists".into());
    }

    let user_id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE email = $1")
        .bind(email)
        .fetch_one(db)
        .await?;

    for permission in seeder::PERMISSION_CATALOG {
        seeder::ensure_permission(db, permission).await?;
    }

    let role = seeder::ensure_role(db, access, &access.admin_role).await?;
    let all_permissions: Vec<String> = roles_service::get_all_permissions(db)
        .await?
        .into_iter()
        .map(|p| p.name)
        .collect();
    roles_service::sync_role_permissions(db, access, role.id, &all_permissions).await?;

    match roles_service::assign_role_to_user(db, user_id, &role.name).await {
        Ok(_) | Err(AccessError::AlreadyAssigned { .. }) => Ok(()),
        Err(e) => Err(e.into()),
    }
}
