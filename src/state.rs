use sqlx::SqlitePool;

use crate::config::access::AccessConfig;
use crate::config::cors::CorsConfig;
use crate::config::database::init_db_pool;
use crate::config::jwt::JwtConfig;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: SqlitePool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub access_config: AccessConfig,
}

pub async fn init_app_state() -> AppState {
    AppState {
        db: init_db_pool().await,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        access_config: AccessConfig::from_env(),
    }
}
