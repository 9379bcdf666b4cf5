//! Idempotent provisioning of the deployment catalog.
//!
//! Everything here is first-or-create: the nine permissions, the four roles
//! with their fixed permission sets, one test account per role, and a small
//! sample roster. Re-running `seed` converges on the same state.

use bcrypt::hash;
use sqlx::SqlitePool;
use std::time::Instant;
use uuid::Uuid;

use crate::config::access::AccessConfig;
use crate::modules::roles::AccessError;
use crate::modules::roles::model::Role;
use crate::modules::roles::service as roles_service;

/// The full permission catalog.
pub const PERMISSION_CATALOG: [&str; 9] = [
    "system.view",
    "personas.view",
    "personas.create",
    "personas.edit",
    "personas.delete",
    "expedients.view",
    "expedients.create",
    "backups.manage",
    "roles.manage",
];

/// Roles and the exact permission set each one holds.
pub const ROLE_CATALOG: [(&str, &[&str]); 4] = [
    (
        "Observador",
        &["system.view", "personas.view", "expedients.view"],
    ),
    (
        "Operador",
        &[
            "system.view",
            "personas.view",
            "personas.create",
            "expedients.view",
            "expedients.create",
        ],
    ),
    (
        "Supervisor",
        &[
            "system.view",
            "personas.view",
            "personas.create",
            "personas.delete",
            "expedients.view",
            "expedients.create",
        ],
    ),
    ("Administrador", &PERMISSION_CATALOG),
];

/// One test account per role: (display name, email, role).
pub const TEST_USERS: [(&str, &str, &str); 4] = [
    ("Usuario Observador", "observador@test.com", "Observador"),
    ("Usuario Operador", "operador@test.com", "Operador"),
    ("Usuario Supervisor", "supervisor@test.com", "Supervisor"),
    ("Usuario Administrador", "admin@test.com", "Administrador"),
];

/// Every seeded test account uses this password.
pub const TEST_PASSWORD: &str = "password123";

/// Sample roster rows: (nombres, apellidos, cedula, fecha_nacimiento,
/// telefono, rango_militar).
const SAMPLE_PERSONAS: [(&str, &str, &str, &str, &str, Option<&str>); 3] = [
    (
        "Carlos Eduardo",
        "Mendoza Rivas",
        "V-15678234",
        "1988-03-12",
        "0414-5551234",
        Some("Sargento Mayor de Segunda"),
    ),
    (
        "María Gabriela",
        "Torres Medina",
        "V-18234567",
        "1992-11-05",
        "0424-5559876",
        Some("Sargento Primero"),
    ),
    (
        "José Rafael",
        "Blanco Paredes",
        "E-82345671",
        "1979-07-28",
        "0241-5554321",
        None,
    ),
];

/// Seeds permissions, roles, test users, and the sample roster.
///
/// Catalog writes go through the registry services so their invariants apply
/// here too. The test-user bcrypt hash uses a low cost; these accounts share
/// a published password and exist for exploration only.
pub async fn seed_database(
    db: &SqlitePool,
    access: &AccessConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();

    println!("🌱 Seeding access-control catalog...");

    for name in PERMISSION_CATALOG {
        ensure_permission(db, name).await?;
    }
    println!("   ✓ {} permissions in place", PERMISSION_CATALOG.len());

    for (role_name, permissions) in ROLE_CATALOG {
        let role = ensure_role(db, access, role_name).await?;
        let names: Vec<String> = permissions.iter().map(|p| p.to_string()).collect();
        roles_service::sync_role_permissions(db, access, role.id, &names).await?;
        println!("   ✓ {} holds {} permissions", role_name, names.len());
    }

    println!("\n👤 Seeding test users...");
    let password_hash = hash(TEST_PASSWORD, 4)?;

    for (name, email, role_name) in TEST_USERS {
        upsert_test_user(db, name, email, &password_hash, role_name).await?;
        println!("   ✓ {} ({})", email, role_name);
    }

    println!("\n📋 Seeding sample roster...");
    let mut created = 0;
    for (nombres, apellidos, cedula, fecha, telefono, rango) in SAMPLE_PERSONAS {
        if ensure_persona(db, nombres, apellidos, cedula, fecha, telefono, rango).await? {
            created += 1;
        }
    }
    println!(
        "   ✓ {} personas created ({} already present)",
        created,
        SAMPLE_PERSONAS.len() - created
    );

    println!("\n✅ Seeding complete in {:?}", start_time.elapsed());
    println!("📝 Password for all test users: {}", TEST_PASSWORD);

    Ok(())
}

/// Removes the seeded test users and sample roster. Roles and permissions
/// stay in place.
pub async fn clear_seeded_data(db: &SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded data...");

    let mut tx = db.begin().await?;

    sqlx::query(
        "DELETE FROM user_roles WHERE user_id IN \
         (SELECT id FROM users WHERE email LIKE '%@test.com')",
    )
    .execute(&mut *tx)
    .await?;

    let users_deleted = sqlx::query("DELETE FROM users WHERE email LIKE '%@test.com'")
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let mut personas_deleted = 0;
    for (_, _, cedula, _, _, _) in SAMPLE_PERSONAS {
        personas_deleted += sqlx::query("DELETE FROM personas WHERE cedula = $1")
            .bind(cedula)
            .execute(&mut *tx)
            .await?
            .rows_affected();
    }

    tx.commit().await?;

    println!(
        "   ✓ Deleted {} users and {} personas in {:?}",
        users_deleted,
        personas_deleted,
        start_time.elapsed()
    );
    println!("✅ Seeded data cleared successfully!");

    Ok(())
}

/// Creates the permission if the registry does not already hold it.
pub async fn ensure_permission(
    db: &SqlitePool,
    name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    match roles_service::create_permission(db, name).await {
        Ok(_) => Ok(()),
        Err(AccessError::DuplicateName { .. }) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Finds the role by name, creating it when missing.
pub async fn ensure_role(
    db: &SqlitePool,
    access: &AccessConfig,
    name: &str,
) -> Result<Role, Box<dyn std::error::Error>> {
    if let Some(role) = roles_service::find_role_by_name(db, name).await? {
        return Ok(role);
    }

    let details = roles_service::create_role(db, access, name).await?;
    Ok(details.role)
}

// Test accounts hold exactly their designated role, even across re-seeds
// where an operator has assigned extras in between.
async fn upsert_test_user(
    db: &SqlitePool,
    name: &str,
    email: &str,
    password_hash: &str,
    role_name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let now = chrono::Utc::now();

    sqlx::query(
        "INSERT INTO users (id, name, username, email, password, created_at, updated_at)
         VALUES ($1, $2, NULL, $3, $4, $5, $6)
         ON CONFLICT (email) DO UPDATE SET
             name = excluded.name,
             password = excluded.password,
             updated_at = excluded.updated_at",
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(now)
    .bind(now)
    .execute(db)
    .await?;

    let user_id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE email = $1")
        .bind(email)
        .fetch_one(db)
        .await?;

    sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
        .bind(user_id)
        .execute(db)
        .await?;

    roles_service::assign_role_to_user(db, user_id, role_name).await?;

    Ok(())
}

/// Inserts the persona unless a live row already carries the cedula.
/// Returns whether a row was created.
async fn ensure_persona(
    db: &SqlitePool,
    nombres: &str,
    apellidos: &str,
    cedula: &str,
    fecha_nacimiento: &str,
    telefono: &str,
    rango_militar: Option<&str>,
) -> Result<bool, Box<dyn std::error::Error>> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM personas WHERE cedula = $1 AND deleted_at IS NULL)",
    )
    .bind(cedula)
    .fetch_one(db)
    .await?;

    if exists {
        return Ok(false);
    }

    let fecha = chrono::NaiveDate::parse_from_str(fecha_nacimiento, "%Y-%m-%d")?;
    let now = chrono::Utc::now();

    sqlx::query(
        "INSERT INTO personas (id, nombres, apellidos, cedula, fecha_nacimiento, direccion, \
         telefono, rango_militar, activo, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, NULL, $6, $7, TRUE, $8, $9)",
    )
    .bind(Uuid::new_v4())
    .bind(nombres)
    .bind(apellidos)
    .bind(cedula)
    .bind(fecha)
    .bind(telefono)
    .bind(rango_militar)
    .bind(now)
    .bind(now)
    .execute(db)
    .await?;

    Ok(true)
}
