//! Token minting and verification.
//!
//! Tokens identify the user and nothing else. Authorization data is read
//! from the store per request, so a token stays valid across role and
//! permission changes without carrying stale claims.

use anyhow::anyhow;
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::config::jwt::JwtConfig;
use crate::modules::auth::model::Claims;
use crate::utils::errors::AppError;

/// Signs an access token for the given user.
pub fn create_access_token(
    user_id: Uuid,
    email: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let issued_at = Utc::now().timestamp() as usize;
    let expires_at = issued_at + jwt_config.access_token_expiry as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp: expires_at,
        iat: issued_at,
    };

    let key = EncodingKey::from_secret(jwt_config.secret.as_bytes());

    encode(&Header::default(), &claims, &key)
        .map_err(|e| AppError::internal(anyhow!("Failed to create token: {}", e)))
}

/// Decodes and validates a token, returning its claims.
///
/// Signature and expiry failures collapse into one 401 so a caller cannot
/// distinguish a forged token from an expired one.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    let key = DecodingKey::from_secret(jwt_config.secret.as_bytes());

    decode::<Claims>(token, &key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|_| AppError::unauthorized(anyhow!("Invalid or expired token")))
}
