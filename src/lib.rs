//! # Expediente API
//!
//! A REST API built with Rust, Axum, and SQLite that implements a
//! role-based access control system for administering personnel records
//! (personas), user accounts, roles, and permissions.
//!
//! ## Overview
//!
//! Expediente provides a complete backend for personnel records administration
//! with features including:
//!
//! - **Authentication**: JWT-based authentication with stateless access tokens
//! - **Role-Based Access Control**: Roles as named permission bundles, users
//!   holding any number of roles
//! - **Permission Registry**: A managed catalog of dot-namespaced permission
//!   names (`personas.view`, `roles.manage`, ...)
//! - **Personnel Records**: CRUD over personas with soft deletion and
//!   aggregate statistics
//! - **User Management**: Account creation, listing with filters, and
//!   password changes
//!
//! ## Architecture
//!
//! The codebase follows a modular architecture inspired by NestJS:
//!
//! ```text
//! src/
//! ├── cli/              # CLI commands (create-admin, seed)
//! ├── config/           # Configuration modules (JWT, database, CORS, access policy)
//! ├── middleware/       # Auth middleware and extractors
//! ├── modules/          # Feature modules
//! │   ├── auth/        # Authentication (login, current user)
//! │   ├── users/       # User account management
//! │   ├── roles/       # Role and permission registries, user-role assignment
//! │   └── personas/    # Personnel records
//! └── utils/           # Shared utilities
//! ```
//!
//! Each feature module follows a consistent structure:
//!
//! - `mod.rs`: Module exports
//! - `controller.rs`: HTTP handlers (routes)
//! - `service.rs`: Business logic
//! - `model.rs`: Data models, DTOs, database structs
//! - `router.rs`: Axum router configuration
//!
//! ## Access Model
//!
//! Authorization is resolved per request from the database, never from token
//! claims. A user's effective permissions are the union of the permissions
//! granted to every role the user holds.
//!
//! ```text
//! User ──< user_roles >── Role ──< role_permissions >── Permission
//! ```
//!
//! Two policy knobs are deployment configuration:
//!
//! | Setting | Default | Effect |
//! |---------|---------|--------|
//! | `PROTECTED_ROLES` | `admin,super-admin,super administrador,administrador` | Roles that can never be renamed or deleted (case-insensitive) |
//! | `ADMIN_ROLE` | `admin` | Role whose last membership a user cannot drop (exact match) |
//!
//! ## Authentication
//!
//! The API uses JWT tokens for authentication:
//!
//! - **Access Token**: Short-lived token (default: 1 hour) for API authentication
//!
//! Tokens only identify the user (ID and email). Roles and permissions are
//! read live from the store whenever an authorization decision is made, so a
//! grant or revocation takes effect on the very next request.
//!
//! ## Quick Start
//!
//! ### Environment Variables
//!
//! ```bash
//! DATABASE_PATH=storage/database.sqlite
//! JWT_SECRET=your-secure-secret-key
//! JWT_ACCESS_EXPIRY=3600
//! ALLOWED_ORIGINS=http://localhost:5173
//! PROTECTED_ROLES=admin,super-admin,super administrador,administrador
//! ADMIN_ROLE=admin
//! HOST=0.0.0.0
//! PORT=3000
//! LOG_DIR=storage/logs
//! ```
//!
//! ### Creating an Administrator
//!
//! ```bash
//! cargo run --bin expediente-cli -- create-admin
//! ```
//!
//! ### Seeding Reference Data
//!
//! The seeder provisions the permission catalog, the four stock roles, and a
//! set of test accounts:
//!
//! ```bash
//! cargo run --bin expediente-cli -- seed
//! ```
//!
//! ### API Documentation
//!
//! When the server is running, API documentation is available at:
//!
//! - Swagger UI: `http://localhost:3000/swagger-ui`
//! - Scalar: `http://localhost:3000/scalar`
//!
//! ## Modules
//!
//! - [`cli`]: Command-line interface utilities
//! - [`config`]: Application configuration
//! - [`docs`]: OpenAPI documentation setup
//! - [`logging`]: Tracing and logging
//! - [`middleware`]: Authentication and authorization middleware
//! - [`modules`]: Feature modules (auth, users, roles, personas)
//! - [`router`]: Main application router
//! - [`state`]: Shared application state
//! - [`utils`]: Shared utilities (errors, JWT, password hashing)
//! - [`validator`]: Request validation utilities
//!
//! ## Security Considerations
//!
//! - Passwords are hashed using bcrypt
//! - JWT secrets should be cryptographically random
//! - Permission checks always reflect the current database state
//! - Protected roles cannot be renamed or deleted through the API
//! - A user's last administrator role cannot be removed

pub mod cli;
pub mod config;
pub mod docs;
pub mod logging;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod utils;
pub mod validator;
