use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

use super::controller::{
    assign_role_to_user, create_permission, create_role, delete_permission, delete_role,
    get_permissions, get_role_by_id, get_role_permissions, get_roles, get_user_permissions,
    get_user_roles, grant_permission, remove_role_from_user, revoke_permission, sync_permissions,
    update_permission, update_role,
};

pub fn init_roles_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_role).get(get_roles))
        .route(
            "/{id}",
            get(get_role_by_id).put(update_role).delete(delete_role),
        )
        .route(
            "/{id}/permissions",
            get(get_role_permissions)
                .post(grant_permission)
                .put(sync_permissions),
        )
        .route("/{id}/permissions/{permission}", delete(revoke_permission))
}

pub fn init_permissions_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_permissions).post(create_permission))
        .route("/{id}", put(update_permission).delete(delete_permission))
}

pub fn init_user_roles_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_user_roles).post(assign_role_to_user))
        .route("/{role}", delete(remove_role_from_user))
}

pub fn init_user_permissions_router() -> Router<AppState> {
    Router::new().route("/", get(get_user_permissions))
}
