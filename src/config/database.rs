//! Database configuration and connection pool initialization.
//!
//! This module handles SQLite database connection pool setup using SQLx.
//! The database file path is read from the `DATABASE_PATH` environment
//! variable and the file is created on first start if it does not exist.
//!
//! # Environment Variables
//!
//! - `DATABASE_PATH`: path to the SQLite database file
//!   (default: `storage/database.sqlite`)
//!
//! # Migrations
//!
//! Schema migrations are embedded into the binary from the `migrations/`
//! directory and applied on startup, so a fresh deployment needs no
//! external migration step.
//!
//! # Panics
//!
//! The [`init_db_pool`] function will panic if:
//!
//! - The database file (or its parent directory) cannot be created
//! - A pending migration fails to apply

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::env;
use std::path::Path;
use std::time::Duration;

/// Initializes the SQLite connection pool and applies pending migrations.
///
/// The returned [`SqlitePool`] is cheaply cloneable and should be placed in
/// the application state for use in request handlers. This function should
/// be called once during startup.
///
/// # Panics
///
/// Panics if the database cannot be opened or a migration fails. Both are
/// unrecoverable at startup.
pub async fn init_db_pool() -> SqlitePool {
    let database_path =
        env::var("DATABASE_PATH").unwrap_or_else(|_| "storage/database.sqlite".to_string());

    if let Some(parent) = Path::new(&database_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).expect("Failed to create database directory");
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(&database_path)
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    pool
}
