use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{AuthUserData, LoginRequest, LoginResponse, MessageResponse};
use crate::modules::personas::model::{
    CreatePersonaDto, PaginatedPersonasResponse, Persona, PersonaFilterParams, PersonaStats,
    UpdatePersonaDto,
};
use crate::modules::roles::model::{
    AssignRoleDto, CreatePermissionDto, CreateRoleDto, GrantPermissionDto, Permission, Role,
    RoleWithPermissions, SyncPermissionsDto, UpdatePermissionDto, UpdateRoleDto,
    UserPermissionsResponse, UserRolesResponse,
};
use crate::modules::users::model::{
    ChangePasswordDto, CreateUserDto, PaginatedUsersResponse, User, UserFilterParams,
    UserWithRoles,
};
use crate::utils::pagination::{PaginationMeta, PaginationParams};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::me,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_user_by_id,
        crate::modules::users::controller::change_password,
        crate::modules::roles::controller::get_permissions,
        crate::modules::roles::controller::create_permission,
        crate::modules::roles::controller::update_permission,
        crate::modules::roles::controller::delete_permission,
        crate::modules::roles::controller::get_roles,
        crate::modules::roles::controller::get_role_by_id,
        crate::modules::roles::controller::create_role,
        crate::modules::roles::controller::update_role,
        crate::modules::roles::controller::delete_role,
        crate::modules::roles::controller::get_role_permissions,
        crate::modules::roles::controller::grant_permission,
        crate::modules::roles::controller::revoke_permission,
        crate::modules::roles::controller::sync_permissions,
        crate::modules::roles::controller::get_user_roles,
        crate::modules::roles::controller::assign_role_to_user,
        crate::modules::roles::controller::remove_role_from_user,
        crate::modules::roles::controller::get_user_permissions,
        crate::modules::personas::controller::get_personas,
        crate::modules::personas::controller::estadisticas,
        crate::modules::personas::controller::get_persona_by_id,
        crate::modules::personas::controller::create_persona,
        crate::modules::personas::controller::update_persona,
        crate::modules::personas::controller::delete_persona,
    ),
    components(
        schemas(
            User,
            CreateUserDto,
            UserWithRoles,
            ChangePasswordDto,
            UserFilterParams,
            PaginatedUsersResponse,
            LoginRequest,
            LoginResponse,
            AuthUserData,
            MessageResponse,
            ErrorResponse,
            Permission,
            Role,
            RoleWithPermissions,
            CreatePermissionDto,
            UpdatePermissionDto,
            CreateRoleDto,
            UpdateRoleDto,
            GrantPermissionDto,
            SyncPermissionsDto,
            AssignRoleDto,
            UserRolesResponse,
            UserPermissionsResponse,
            Persona,
            CreatePersonaDto,
            UpdatePersonaDto,
            PersonaStats,
            PersonaFilterParams,
            PaginatedPersonasResponse,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login and current-user endpoints"),
        (name = "Users", description = "User account management"),
        (name = "Roles", description = "Role registry and user-role assignment"),
        (name = "Permissions", description = "Permission registry"),
        (name = "Personas", description = "Personnel records")
    ),
    info(
        title = "Expediente API",
        version = "0.1.0",
        description = "A personnel records administration API built with Rust, Axum, and SQLite featuring JWT-based authentication and role-based access control.",
        contact(
            name = "API Support",
            email = "support@expediente.dev"
        ),
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
