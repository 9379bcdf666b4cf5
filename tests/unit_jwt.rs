use chrono::Utc;
use expediente::config::jwt::JwtConfig;
use expediente::modules::auth::model::Claims;
use expediente::utils::jwt::{create_access_token, verify_token};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

fn test_config() -> JwtConfig {
    JwtConfig {
        secret: "unit-test-signing-secret".to_string(),
        access_token_expiry: 3600,
    }
}

#[test]
fn test_token_roundtrip() {
    let config = test_config();
    let user_id = Uuid::new_v4();

    let token = create_access_token(user_id, "operador@test.com", &config).unwrap();
    assert!(!token.is_empty());

    let claims = verify_token(&token, &config).unwrap();
    assert_eq!(claims.sub, user_id.to_string());
    assert_eq!(claims.email, "operador@test.com");
}

#[test]
fn test_claims_carry_identity_only() {
    // The token payload holds sub, email, exp, and iat. Roles and
    // permissions never ride in the token, so a revocation needs no
    // token rotation.
    let claims = Claims {
        sub: Uuid::new_v4().to_string(),
        email: "operador@test.com".to_string(),
        exp: 2000,
        iat: 1000,
    };

    let value = serde_json::to_value(&claims).unwrap();
    let fields = value.as_object().unwrap();

    assert_eq!(fields.len(), 4);
    assert!(fields.contains_key("sub"));
    assert!(fields.contains_key("email"));
    assert!(fields.contains_key("exp"));
    assert!(fields.contains_key("iat"));
    assert!(!fields.contains_key("role"));
    assert!(!fields.contains_key("permissions"));
}

#[test]
fn test_expiry_matches_config() {
    let config = test_config();

    let token = create_access_token(Uuid::new_v4(), "operador@test.com", &config).unwrap();
    let claims = verify_token(&token, &config).unwrap();

    assert_eq!(
        claims.exp - claims.iat,
        config.access_token_expiry as usize
    );
}

#[test]
fn test_expired_token_rejected() {
    let config = test_config();
    let now = Utc::now().timestamp() as usize;

    let stale = Claims {
        sub: Uuid::new_v4().to_string(),
        email: "operador@test.com".to_string(),
        exp: now - 7200,
        iat: now - 10800,
    };
    let token = encode(
        &Header::default(),
        &stale,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .unwrap();

    assert!(verify_token(&token, &config).is_err());
}

#[test]
fn test_wrong_secret_rejected() {
    let config = test_config();
    let token = create_access_token(Uuid::new_v4(), "operador@test.com", &config).unwrap();

    let other = JwtConfig {
        secret: "a-different-signing-secret".to_string(),
        access_token_expiry: 3600,
    };

    assert!(verify_token(&token, &other).is_err());
}

#[test]
fn test_garbage_tokens_rejected() {
    let config = test_config();
    let garbage = [
        "",
        "invalid.token.here",
        "not.enough",
        "too.many.parts.here.extra",
        "!!!.invalid.chars",
        "header.payload.",
        ".payload.signature",
    ];

    for token in garbage {
        assert!(verify_token(token, &config).is_err(), "accepted {token:?}");
    }
}

#[test]
fn test_email_survives_roundtrip_verbatim() {
    let config = test_config();
    let email = "maría.torres+registro@test.co.ve";

    let token = create_access_token(Uuid::new_v4(), email, &config).unwrap();
    let claims = verify_token(&token, &config).unwrap();

    assert_eq!(claims.email, email);
}

#[test]
fn test_distinct_users_get_distinct_tokens() {
    let config = test_config();
    let first_id = Uuid::new_v4();
    let second_id = Uuid::new_v4();

    let first = create_access_token(first_id, "observador@test.com", &config).unwrap();
    let second = create_access_token(second_id, "supervisor@test.com", &config).unwrap();

    assert_ne!(first, second);
    assert_eq!(verify_token(&first, &config).unwrap().sub, first_id.to_string());
    assert_eq!(verify_token(&second, &config).unwrap().sub, second_id.to_string());
}
