mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use expediente::config::cors::CorsConfig;
use expediente::config::jwt::JwtConfig;
use expediente::router::init_router;
use expediente::state::AppState;
use http_body_util::BodyExt;
use serde_json::json;
use sqlx::SqlitePool;
use tower::ServiceExt;
use uuid::Uuid;

async fn setup_test_app(pool: SqlitePool) -> axum::Router {
    dotenvy::dotenv().ok();
    let state = AppState {
        db: pool.clone(),
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        access_config: common::test_access_config(),
    };
    init_router(state)
}

async fn get_auth_token(app: axum::Router, email: &str, password: &str) -> String {
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "email": email,
                "password": password
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap_or_else(|_| {
        panic!(
            "Failed to parse login response. Status: {}, Body: {:?}",
            status,
            String::from_utf8_lossy(&body)
        )
    });
    body["access_token"]
        .as_str()
        .unwrap_or_else(|| {
            panic!(
                "No access_token in response. Status: {}, Body: {}",
                status, body
            )
        })
        .to_string()
}

async fn persona_id_by_cedula(pool: &SqlitePool, cedula: &str) -> Uuid {
    sqlx::query_scalar("SELECT id FROM personas WHERE cedula = $1 AND deleted_at IS NULL")
        .bind(cedula)
        .fetch_one(pool)
        .await
        .unwrap()
}

// ============ Listing and Search Tests ============

#[sqlx::test(migrations = "./migrations")]
async fn test_get_personas(pool: SqlitePool) {
    common::seed(&pool).await;

    // Observador holds personas.view, which is all listing needs
    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, "observador@test.com", "password123").await;

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("GET")
        .uri("/api/personas")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
    assert_eq!(body["meta"]["total"], 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_search_personas(pool: SqlitePool) {
    common::seed(&pool).await;

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, "observador@test.com", "password123").await;

    // Cedula match
    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("GET")
        .uri("/api/personas?search=V-15678234")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let personas = body["data"].as_array().unwrap();
    assert_eq!(personas.len(), 1);
    assert_eq!(personas[0]["nombres"], "Carlos Eduardo");

    // Partial apellido match
    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("GET")
        .uri("/api/personas?search=Blanco")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let personas = body["data"].as_array().unwrap();
    assert_eq!(personas.len(), 1);
    assert_eq!(personas[0]["cedula"], "E-82345671");

    // No match
    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("GET")
        .uri("/api/personas?search=Zzzz")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
    assert_eq!(body["meta"]["total"], 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_persona_by_id(pool: SqlitePool) {
    common::seed(&pool).await;

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, "observador@test.com", "password123").await;

    let persona_id = persona_id_by_cedula(&pool, "V-18234567").await;

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("GET")
        .uri(format!("/api/personas/{}", persona_id))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["nombres"], "María Gabriela");
    assert_eq!(body["apellidos"], "Torres Medina");
    assert_eq!(body["activo"], true);

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("GET")
        .uri(format!("/api/personas/{}", Uuid::new_v4()))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============ Create Tests ============

#[sqlx::test(migrations = "./migrations")]
async fn test_create_persona(pool: SqlitePool) {
    common::seed(&pool).await;

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, "operador@test.com", "password123").await;

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/personas")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(
            serde_json::to_string(&json!({
                "nombres": "Ana Lucía",
                "apellidos": "Fernández Castro",
                "cedula": "V-20112233",
                "fecha_nacimiento": "1995-02-18",
                "telefono": "0412-5550987",
                "rango_militar": "Cabo Primero"
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["cedula"], "V-20112233");
    // New records always start active
    assert_eq!(body["activo"], true);
    assert!(body["direccion"].is_null());

    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM personas WHERE cedula = 'V-20112233' AND deleted_at IS NULL)",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert!(exists);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_persona_duplicate_cedula(pool: SqlitePool) {
    common::seed(&pool).await;

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, "operador@test.com", "password123").await;

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/personas")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(
            serde_json::to_string(&json!({
                "nombres": "Otro",
                "apellidos": "Registro",
                "cedula": "V-15678234",
                "fecha_nacimiento": "1990-01-01",
                "telefono": "0414-5550000"
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        body["error"],
        "A persona with cedula V-15678234 already exists"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_persona_validation(pool: SqlitePool) {
    common::seed(&pool).await;

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, "operador@test.com", "password123").await;

    // Empty nombres
    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/personas")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(
            serde_json::to_string(&json!({
                "nombres": "",
                "apellidos": "Fernández",
                "cedula": "V-20112233",
                "fecha_nacimiento": "1995-02-18",
                "telefono": "0412-5550987"
            }))
            .unwrap(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Cedula over the length cap
    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/personas")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(
            serde_json::to_string(&json!({
                "nombres": "Ana",
                "apellidos": "Fernández",
                "cedula": "V-1234567890123456",
                "fecha_nacimiento": "1995-02-18",
                "telefono": "0412-5550987"
            }))
            .unwrap(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Unparseable date is a malformed body
    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/personas")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(
            serde_json::to_string(&json!({
                "nombres": "Ana",
                "apellidos": "Fernández",
                "cedula": "V-20112233",
                "fecha_nacimiento": "not-a-date",
                "telefono": "0412-5550987"
            }))
            .unwrap(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_persona_forbidden_for_observador(pool: SqlitePool) {
    common::seed(&pool).await;

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, "observador@test.com", "password123").await;

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/personas")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(
            serde_json::to_string(&json!({
                "nombres": "Ana",
                "apellidos": "Fernández",
                "cedula": "V-20112233",
                "fecha_nacimiento": "1995-02-18",
                "telefono": "0412-5550987"
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ============ Update Tests ============

#[sqlx::test(migrations = "./migrations")]
async fn test_update_persona(pool: SqlitePool) {
    common::seed(&pool).await;

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, "admin@test.com", "password123").await;

    let persona_id = persona_id_by_cedula(&pool, "V-15678234").await;

    // activo omitted, so the stored value is kept
    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("PUT")
        .uri(format!("/api/personas/{}", persona_id))
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(
            serde_json::to_string(&json!({
                "nombres": "Carlos Eduardo",
                "apellidos": "Mendoza Rivas",
                "cedula": "V-15678234",
                "fecha_nacimiento": "1988-03-12",
                "telefono": "0414-5559999",
                "rango_militar": "Sargento Ayudante"
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["telefono"], "0414-5559999");
    assert_eq!(body["rango_militar"], "Sargento Ayudante");
    assert_eq!(body["activo"], true);

    // Explicit activo flips the flag
    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("PUT")
        .uri(format!("/api/personas/{}", persona_id))
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(
            serde_json::to_string(&json!({
                "nombres": "Carlos Eduardo",
                "apellidos": "Mendoza Rivas",
                "cedula": "V-15678234",
                "fecha_nacimiento": "1988-03-12",
                "telefono": "0414-5559999",
                "activo": false
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["activo"], false);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_persona_duplicate_cedula(pool: SqlitePool) {
    common::seed(&pool).await;

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, "admin@test.com", "password123").await;

    let persona_id = persona_id_by_cedula(&pool, "V-15678234").await;

    // Taking another live record's cedula is refused
    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("PUT")
        .uri(format!("/api/personas/{}", persona_id))
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(
            serde_json::to_string(&json!({
                "nombres": "Carlos Eduardo",
                "apellidos": "Mendoza Rivas",
                "cedula": "V-18234567",
                "fecha_nacimiento": "1988-03-12",
                "telefono": "0414-5551234"
            }))
            .unwrap(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Keeping its own cedula is not a collision
    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("PUT")
        .uri(format!("/api/personas/{}", persona_id))
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(
            serde_json::to_string(&json!({
                "nombres": "Carlos Eduardo",
                "apellidos": "Mendoza Rivas",
                "cedula": "V-15678234",
                "fecha_nacimiento": "1988-03-12",
                "telefono": "0414-5551234"
            }))
            .unwrap(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_persona_forbidden_for_operador(pool: SqlitePool) {
    common::seed(&pool).await;

    // Operador can create records but not edit them
    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, "operador@test.com", "password123").await;

    let persona_id = persona_id_by_cedula(&pool, "V-15678234").await;

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("PUT")
        .uri(format!("/api/personas/{}", persona_id))
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(
            serde_json::to_string(&json!({
                "nombres": "Carlos Eduardo",
                "apellidos": "Mendoza Rivas",
                "cedula": "V-15678234",
                "fecha_nacimiento": "1988-03-12",
                "telefono": "0414-5551234"
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ============ Delete Tests ============

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_persona_is_soft(pool: SqlitePool) {
    common::seed(&pool).await;

    // Supervisor holds personas.delete
    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, "supervisor@test.com", "password123").await;

    let persona_id = persona_id_by_cedula(&pool, "E-82345671").await;

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/personas/{}", persona_id))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Gone from the listing
    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("GET")
        .uri("/api/personas")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("GET")
        .uri(format!("/api/personas/{}", persona_id))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The row itself survives with deleted_at set
    let deleted_at: Option<String> =
        sqlx::query_scalar("SELECT deleted_at FROM personas WHERE id = $1")
            .bind(persona_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(deleted_at.is_some());

    // The cedula is free for a new record
    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/personas")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(
            serde_json::to_string(&json!({
                "nombres": "José Rafael",
                "apellidos": "Blanco Paredes",
                "cedula": "E-82345671",
                "fecha_nacimiento": "1979-07-28",
                "telefono": "0241-5554321"
            }))
            .unwrap(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_persona_not_found(pool: SqlitePool) {
    common::seed(&pool).await;

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, "supervisor@test.com", "password123").await;

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/personas/{}", Uuid::new_v4()))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_persona_forbidden_for_operador(pool: SqlitePool) {
    common::seed(&pool).await;

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, "operador@test.com", "password123").await;

    let persona_id = persona_id_by_cedula(&pool, "E-82345671").await;

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/personas/{}", persona_id))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ============ Estadisticas Tests ============

#[sqlx::test(migrations = "./migrations")]
async fn test_estadisticas(pool: SqlitePool) {
    common::seed(&pool).await;

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, "observador@test.com", "password123").await;

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("GET")
        .uri("/api/personas/estadisticas")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["total"], 3);
    assert_eq!(body["activas"], 3);
    assert_eq!(body["inactivas"], 0);
    assert_eq!(body["porcentaje_activas"], 100.0);

    // Flip one record inactive and the shares move
    let app = setup_test_app(pool.clone()).await;
    let admin_token = get_auth_token(app, "admin@test.com", "password123").await;

    let persona_id = persona_id_by_cedula(&pool, "V-18234567").await;
    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("PUT")
        .uri(format!("/api/personas/{}", persona_id))
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", admin_token))
        .body(Body::from(
            serde_json::to_string(&json!({
                "nombres": "María Gabriela",
                "apellidos": "Torres Medina",
                "cedula": "V-18234567",
                "fecha_nacimiento": "1992-11-05",
                "telefono": "0424-5559876",
                "activo": false
            }))
            .unwrap(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("GET")
        .uri("/api/personas/estadisticas")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["total"], 3);
    assert_eq!(body["activas"], 2);
    assert_eq!(body["inactivas"], 1);
    assert_eq!(body["porcentaje_activas"], 66.67);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_estadisticas_empty_roster(pool: SqlitePool) {
    common::seed(&pool).await;

    // Delete the seeded roster, then the division-by-zero guard shows
    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, "admin@test.com", "password123").await;

    for cedula in ["V-15678234", "V-18234567", "E-82345671"] {
        let persona_id = persona_id_by_cedula(&pool, cedula).await;
        let app = setup_test_app(pool.clone()).await;
        let request = Request::builder()
            .method("DELETE")
            .uri(format!("/api/personas/{}", persona_id))
            .header("authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("GET")
        .uri("/api/personas/estadisticas")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["total"], 0);
    assert_eq!(body["activas"], 0);
    assert_eq!(body["porcentaje_activas"], 0.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unauthorized_access_to_personas(pool: SqlitePool) {
    common::seed(&pool).await;

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("GET")
        .uri("/api/personas")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
