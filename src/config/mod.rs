//! Configuration modules for the Expediente API.
//!
//! This module contains all configuration-related types and utilities
//! for the application. Each submodule handles a specific aspect of
//! configuration, typically loaded from environment variables.
//!
//! # Modules
//!
//! - [`access`]: Access-control policy (protected role names, administrator role)
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`database`]: SQLite database connection pool initialization
//! - [`jwt`]: JWT authentication configuration
//! - [`server`]: HTTP listener host and port
//!
//! # Environment Variables
//!
//! Most configuration is loaded from environment variables. See each
//! submodule for specific variable names and their defaults.
//!
//! # Example
//!
//! ```ignore
//! use crate::config::jwt::JwtConfig;
//! use crate::config::database::init_db_pool;
//!
//! // Load JWT config from environment
//! let jwt_config = JwtConfig::from_env();
//!
//! // Initialize database pool
//! let db = init_db_pool().await;
//! ```

pub mod access;
pub mod cors;
pub mod database;
pub mod jwt;
pub mod server;
