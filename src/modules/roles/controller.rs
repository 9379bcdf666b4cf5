use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::middleware::auth::RequireRolesManage;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{
    AssignRoleDto, CreatePermissionDto, CreateRoleDto, GrantPermissionDto, Permission,
    RoleWithPermissions, SyncPermissionsDto, UpdatePermissionDto, UpdateRoleDto,
    UserPermissionsResponse, UserRolesResponse,
};
use super::service;

// ============ Permission Endpoints ============

#[utoipa::path(
    get,
    path = "/api/permissions",
    responses(
        (status = 200, description = "Full permission catalog ordered by name", body = Vec<Permission>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Permissions",
    security(("bearer_auth" = []))
)]
pub async fn get_permissions(
    State(state): State<AppState>,
    RequireRolesManage(_auth_user): RequireRolesManage,
) -> Result<Json<Vec<Permission>>, AppError> {
    let permissions = service::get_all_permissions(&state.db).await?;
    Ok(Json(permissions))
}

#[utoipa::path(
    post,
    path = "/api/permissions",
    request_body = CreatePermissionDto,
    responses(
        (status = 201, description = "Permission created", body = Permission),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "A permission with this name already exists"),
        (status = 422, description = "Validation error")
    ),
    tag = "Permissions",
    security(("bearer_auth" = []))
)]
pub async fn create_permission(
    State(state): State<AppState>,
    RequireRolesManage(_auth_user): RequireRolesManage,
    ValidatedJson(dto): ValidatedJson<CreatePermissionDto>,
) -> Result<(StatusCode, Json<Permission>), AppError> {
    let permission = service::create_permission(&state.db, &dto.name).await?;
    Ok((StatusCode::CREATED, Json(permission)))
}

#[utoipa::path(
    put,
    path = "/api/permissions/{id}",
    params(("id" = Uuid, Path, description = "Permission ID")),
    request_body = UpdatePermissionDto,
    responses(
        (status = 200, description = "Permission renamed", body = Permission),
        (status = 404, description = "Permission not found"),
        (status = 409, description = "A permission with this name already exists")
    ),
    tag = "Permissions",
    security(("bearer_auth" = []))
)]
pub async fn update_permission(
    State(state): State<AppState>,
    RequireRolesManage(_auth_user): RequireRolesManage,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdatePermissionDto>,
) -> Result<Json<Permission>, AppError> {
    let permission = service::update_permission(&state.db, id, &dto.name).await?;
    Ok(Json(permission))
}

#[utoipa::path(
    delete,
    path = "/api/permissions/{id}",
    params(("id" = Uuid, Path, description = "Permission ID")),
    responses(
        (status = 204, description = "Permission deleted"),
        (status = 404, description = "Permission not found"),
        (status = 409, description = "Permission is still referenced by one or more roles")
    ),
    tag = "Permissions",
    security(("bearer_auth" = []))
)]
pub async fn delete_permission(
    State(state): State<AppState>,
    RequireRolesManage(_auth_user): RequireRolesManage,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    service::delete_permission(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============ Role Endpoints ============

#[utoipa::path(
    get,
    path = "/api/roles",
    responses(
        (status = 200, description = "All roles with their permissions", body = Vec<RoleWithPermissions>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn get_roles(
    State(state): State<AppState>,
    RequireRolesManage(_auth_user): RequireRolesManage,
) -> Result<Json<Vec<RoleWithPermissions>>, AppError> {
    let roles = service::get_roles(&state.db, &state.access_config).await?;
    Ok(Json(roles))
}

#[utoipa::path(
    get,
    path = "/api/roles/{id}",
    params(("id" = Uuid, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Role details", body = RoleWithPermissions),
        (status = 404, description = "Role not found")
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn get_role_by_id(
    State(state): State<AppState>,
    RequireRolesManage(_auth_user): RequireRolesManage,
    Path(id): Path<Uuid>,
) -> Result<Json<RoleWithPermissions>, AppError> {
    let role = service::get_role_by_id(&state.db, &state.access_config, id).await?;
    Ok(Json(role))
}

#[utoipa::path(
    post,
    path = "/api/roles",
    request_body = CreateRoleDto,
    responses(
        (status = 201, description = "Role created with an empty permission set", body = RoleWithPermissions),
        (status = 409, description = "A role with this name already exists"),
        (status = 422, description = "Validation error")
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn create_role(
    State(state): State<AppState>,
    RequireRolesManage(_auth_user): RequireRolesManage,
    ValidatedJson(dto): ValidatedJson<CreateRoleDto>,
) -> Result<(StatusCode, Json<RoleWithPermissions>), AppError> {
    let role = service::create_role(&state.db, &state.access_config, &dto.name).await?;
    Ok((StatusCode::CREATED, Json(role)))
}

#[utoipa::path(
    put,
    path = "/api/roles/{id}",
    params(("id" = Uuid, Path, description = "Role ID")),
    request_body = UpdateRoleDto,
    responses(
        (status = 200, description = "Role renamed", body = RoleWithPermissions),
        (status = 403, description = "Role is protected"),
        (status = 404, description = "Role not found"),
        (status = 409, description = "A role with this name already exists")
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn update_role(
    State(state): State<AppState>,
    RequireRolesManage(_auth_user): RequireRolesManage,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateRoleDto>,
) -> Result<Json<RoleWithPermissions>, AppError> {
    let role = service::update_role(&state.db, &state.access_config, id, &dto.name).await?;
    Ok(Json(role))
}

#[utoipa::path(
    delete,
    path = "/api/roles/{id}",
    params(("id" = Uuid, Path, description = "Role ID")),
    responses(
        (status = 204, description = "Role deleted"),
        (status = 403, description = "Role is protected"),
        (status = 404, description = "Role not found"),
        (status = 409, description = "Role is still assigned to one or more users")
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn delete_role(
    State(state): State<AppState>,
    RequireRolesManage(_auth_user): RequireRolesManage,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    service::delete_role(&state.db, &state.access_config, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============ Role Permission Endpoints ============

#[utoipa::path(
    get,
    path = "/api/roles/{id}/permissions",
    params(("id" = Uuid, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Permission names granted to the role", body = Vec<String>),
        (status = 404, description = "Role not found")
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn get_role_permissions(
    State(state): State<AppState>,
    RequireRolesManage(_auth_user): RequireRolesManage,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<String>>, AppError> {
    // Resolve the role first so an unknown id is a 404, not an empty list.
    let role = service::get_role_by_id(&state.db, &state.access_config, id).await?;
    Ok(Json(role.permissions))
}

#[utoipa::path(
    post,
    path = "/api/roles/{id}/permissions",
    params(("id" = Uuid, Path, description = "Role ID")),
    request_body = GrantPermissionDto,
    responses(
        (status = 200, description = "Permission granted", body = RoleWithPermissions),
        (status = 404, description = "Role or permission not found"),
        (status = 409, description = "Role already has this permission")
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn grant_permission(
    State(state): State<AppState>,
    RequireRolesManage(_auth_user): RequireRolesManage,
    Path(id): Path<Uuid>,
    Json(dto): Json<GrantPermissionDto>,
) -> Result<Json<RoleWithPermissions>, AppError> {
    let role =
        service::grant_permission_to_role(&state.db, &state.access_config, id, &dto.permission)
            .await?;
    Ok(Json(role))
}

#[utoipa::path(
    delete,
    path = "/api/roles/{id}/permissions/{permission}",
    params(
        ("id" = Uuid, Path, description = "Role ID"),
        ("permission" = String, Path, description = "Permission name")
    ),
    responses(
        (status = 200, description = "Permission revoked", body = RoleWithPermissions),
        (status = 404, description = "Role or permission not found"),
        (status = 409, description = "Role does not have this permission")
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn revoke_permission(
    State(state): State<AppState>,
    RequireRolesManage(_auth_user): RequireRolesManage,
    Path((role_id, permission)): Path<(Uuid, String)>,
) -> Result<Json<RoleWithPermissions>, AppError> {
    let role =
        service::remove_permission_from_role(&state.db, &state.access_config, role_id, &permission)
            .await?;
    Ok(Json(role))
}

#[utoipa::path(
    put,
    path = "/api/roles/{id}/permissions",
    params(("id" = Uuid, Path, description = "Role ID")),
    request_body = SyncPermissionsDto,
    responses(
        (status = 200, description = "Permission set replaced", body = RoleWithPermissions),
        (status = 404, description = "Role or one of the permissions not found")
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn sync_permissions(
    State(state): State<AppState>,
    RequireRolesManage(_auth_user): RequireRolesManage,
    Path(id): Path<Uuid>,
    Json(dto): Json<SyncPermissionsDto>,
) -> Result<Json<RoleWithPermissions>, AppError> {
    let role =
        service::sync_role_permissions(&state.db, &state.access_config, id, &dto.permissions)
            .await?;
    Ok(Json(role))
}

// ============ User Role Endpoints ============

#[utoipa::path(
    get,
    path = "/api/users/{id}/roles",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Role names held by the user", body = UserRolesResponse),
        (status = 404, description = "User not found")
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn get_user_roles(
    State(state): State<AppState>,
    RequireRolesManage(_auth_user): RequireRolesManage,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserRolesResponse>, AppError> {
    let roles = service::get_user_roles(&state.db, user_id).await?;
    Ok(Json(UserRolesResponse { user_id, roles }))
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/roles",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = AssignRoleDto,
    responses(
        (status = 200, description = "Role assigned", body = UserRolesResponse),
        (status = 404, description = "User or role not found"),
        (status = 409, description = "User already has this role")
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn assign_role_to_user(
    State(state): State<AppState>,
    RequireRolesManage(_auth_user): RequireRolesManage,
    Path(user_id): Path<Uuid>,
    Json(dto): Json<AssignRoleDto>,
) -> Result<Json<UserRolesResponse>, AppError> {
    let roles = service::assign_role_to_user(&state.db, user_id, &dto.role).await?;
    Ok(Json(UserRolesResponse { user_id, roles }))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}/roles/{role}",
    params(
        ("id" = Uuid, Path, description = "User ID"),
        ("role" = String, Path, description = "Role name")
    ),
    responses(
        (status = 200, description = "Role removed", body = UserRolesResponse),
        (status = 403, description = "Cannot remove the user's last administrator role"),
        (status = 404, description = "User or role not found"),
        (status = 409, description = "User does not have this role")
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn remove_role_from_user(
    State(state): State<AppState>,
    RequireRolesManage(_auth_user): RequireRolesManage,
    Path((user_id, role)): Path<(Uuid, String)>,
) -> Result<Json<UserRolesResponse>, AppError> {
    let roles =
        service::remove_role_from_user(&state.db, &state.access_config, user_id, &role).await?;
    Ok(Json(UserRolesResponse { user_id, roles }))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}/permissions",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Effective permissions across all of the user's roles", body = UserPermissionsResponse),
        (status = 404, description = "User not found")
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn get_user_permissions(
    State(state): State<AppState>,
    RequireRolesManage(_auth_user): RequireRolesManage,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserPermissionsResponse>, AppError> {
    // 404 for unknown users, then the de-duplicated union.
    service::get_user_roles(&state.db, user_id).await?;
    let permissions = service::get_user_permissions(&state.db, user_id).await?;
    Ok(Json(UserPermissionsResponse {
        user_id,
        permissions,
    }))
}
