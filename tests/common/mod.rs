use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use expediente::cli::seeder::seed_database;
use expediente::config::access::AccessConfig;
use expediente::utils::password::hash_password;

/// Access policy the integration suite runs with. It mirrors a seeded
/// deployment of the stock Spanish catalog, where "Administrador" is the
/// designated administrator role.
pub fn test_access_config() -> AccessConfig {
    AccessConfig {
        protected_roles: vec![
            "admin".to_string(),
            "super-admin".to_string(),
            "super administrador".to_string(),
            "administrador".to_string(),
        ],
        admin_role: "Administrador".to_string(),
    }
}

/// Provisions the stock catalog: the nine permissions, the four roles with
/// their grants, the four test accounts, and the sample roster.
pub async fn seed(pool: &SqlitePool) {
    seed_database(pool, &test_access_config()).await.unwrap();
}

#[allow(dead_code)]
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub password: String,
}

/// Creates a user directly in the store and hands each listed role to them.
/// The roles must already exist (see [`seed`]).
#[allow(dead_code)]
pub async fn create_test_user(
    pool: &SqlitePool,
    email: &str,
    password: &str,
    roles: &[&str],
) -> TestUser {
    let hashed = hash_password(password).unwrap();
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query(
        r#"INSERT INTO users (id, name, username, email, password, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)"#,
    )
    .bind(id)
    .bind("Test User")
    .bind(Option::<String>::None)
    .bind(email)
    .bind(&hashed)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .unwrap();

    for role in roles {
        assign_test_role(pool, id, role).await;
    }

    TestUser {
        id,
        email: email.to_string(),
        password: password.to_string(),
    }
}

#[allow(dead_code)]
pub async fn assign_test_role(pool: &SqlitePool, user_id: Uuid, role: &str) {
    let role_id = role_id_by_name(pool, role).await;

    sqlx::query(
        r#"INSERT INTO user_roles (user_id, role_id, created_at)
        VALUES ($1, $2, $3)
        ON CONFLICT DO NOTHING"#,
    )
    .bind(user_id)
    .bind(role_id)
    .bind(Utc::now())
    .execute(pool)
    .await
    .unwrap();
}

#[allow(dead_code)]
pub async fn user_id_by_email(pool: &SqlitePool, email: &str) -> Uuid {
    sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
        .bind(email)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[allow(dead_code)]
pub async fn role_id_by_name(pool: &SqlitePool, name: &str) -> Uuid {
    sqlx::query_scalar("SELECT id FROM roles WHERE name = $1")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[allow(dead_code)]
pub async fn permission_id_by_name(pool: &SqlitePool, name: &str) -> Uuid {
    sqlx::query_scalar("SELECT id FROM permissions WHERE name = $1")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[allow(dead_code)]
pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}
