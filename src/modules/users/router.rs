use crate::modules::users::controller::{change_password, create_user, get_user_by_id, get_users};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, put},
};

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_users).post(create_user))
        .route("/me/password", put(change_password))
        .route("/{id}", get(get_user_by_id))
}
