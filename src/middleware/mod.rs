//! Middleware modules for request processing.
//!
//! This module contains middleware and extractors for handling cross-cutting
//! concerns like authentication and permission-based access control.
//!
//! # Authentication Flow
//!
//! 1. Client sends request with `Authorization: Bearer <token>` header
//! 2. `AuthUser` extractor validates the JWT and extracts claims
//! 3. Permission extractors ask the store whether the user holds the
//!    required permission through any of their roles
//! 4. Handler executes if all checks pass
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::{AuthUser, RequirePersonasCreate};
//!
//! // Basic authentication (any valid token)
//! async fn me(auth_user: AuthUser) -> impl IntoResponse {
//!     let user_id = auth_user.user_id()?;
//!     // ...
//! }
//!
//! // Permission-based access control
//! async fn create_persona(
//!     RequirePersonasCreate(auth_user): RequirePersonasCreate,
//! ) -> impl IntoResponse {
//!     // Only executes if user holds "personas.create"
//! }
//! ```

pub mod auth;
