use std::env;

/// Default access token lifetime in seconds (1 hour).
const DEFAULT_ACCESS_EXPIRY: i64 = 3600;

/// Token signing settings.
///
/// Tokens are short-lived and carry identity only, so there is no refresh
/// flow to configure. `JWT_ACCESS_EXPIRY` is in seconds.
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let secret = env::var("JWT_SECRET")
            .unwrap_or_else(|_| "your-secret-key-change-in-production".to_string());

        let access_token_expiry = env::var("JWT_ACCESS_EXPIRY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_ACCESS_EXPIRY);

        Self {
            secret,
            access_token_expiry,
        }
    }
}
