use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::{
    RequirePersonasCreate, RequirePersonasDelete, RequirePersonasEdit, RequirePersonasView,
};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::personas::model::{
    CreatePersonaDto, PaginatedPersonasResponse, Persona, PersonaFilterParams, PersonaStats,
    UpdatePersonaDto,
};
use crate::modules::personas::service::PersonaService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// List personas, excluding soft-deleted records
#[utoipa::path(
    get,
    path = "/api/personas",
    params(
        ("search" = Option<String>, Query, description = "Partial match against nombres, apellidos, or cedula"),
        ("page" = Option<i64>, Query, description = "Page number (1-based)"),
        ("limit" = Option<i64>, Query, description = "Results per page")
    ),
    responses(
        (status = 200, description = "Paginated list of personas", body = PaginatedPersonasResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires personas.view")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Personas"
)]
#[instrument(skip(state, filters))]
pub async fn get_personas(
    State(state): State<AppState>,
    RequirePersonasView(_auth_user): RequirePersonasView,
    Query(filters): Query<PersonaFilterParams>,
) -> Result<Json<PaginatedPersonasResponse>, AppError> {
    let personas = PersonaService::get_personas(&state.db, filters).await?;
    Ok(Json(personas))
}

/// Roster statistics over non-deleted records
#[utoipa::path(
    get,
    path = "/api/personas/estadisticas",
    responses(
        (status = 200, description = "Roster statistics", body = PersonaStats),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires personas.view")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Personas"
)]
#[instrument(skip(state))]
pub async fn estadisticas(
    State(state): State<AppState>,
    RequirePersonasView(_auth_user): RequirePersonasView,
) -> Result<Json<PersonaStats>, AppError> {
    let stats = PersonaService::estadisticas(&state.db).await?;
    Ok(Json(stats))
}

/// Get one persona
#[utoipa::path(
    get,
    path = "/api/personas/{id}",
    params(
        ("id" = Uuid, Path, description = "Persona ID")
    ),
    responses(
        (status = 200, description = "Persona details", body = Persona),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires personas.view"),
        (status = 404, description = "Persona not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Personas"
)]
#[instrument(skip(state))]
pub async fn get_persona_by_id(
    State(state): State<AppState>,
    RequirePersonasView(_auth_user): RequirePersonasView,
    Path(id): Path<Uuid>,
) -> Result<Json<Persona>, AppError> {
    let persona = PersonaService::get_persona_by_id(&state.db, id).await?;
    Ok(Json(persona))
}

/// Create a persona
#[utoipa::path(
    post,
    path = "/api/personas",
    request_body = CreatePersonaDto,
    responses(
        (status = 201, description = "Persona created successfully", body = Persona),
        (status = 400, description = "Bad request - validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires personas.create"),
        (status = 409, description = "Cedula already registered", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Personas"
)]
#[instrument(skip(state, dto))]
pub async fn create_persona(
    State(state): State<AppState>,
    RequirePersonasCreate(_auth_user): RequirePersonasCreate,
    ValidatedJson(dto): ValidatedJson<CreatePersonaDto>,
) -> Result<(StatusCode, Json<Persona>), AppError> {
    let persona = PersonaService::create_persona(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(persona)))
}

/// Update a persona
#[utoipa::path(
    put,
    path = "/api/personas/{id}",
    params(
        ("id" = Uuid, Path, description = "Persona ID")
    ),
    request_body = UpdatePersonaDto,
    responses(
        (status = 200, description = "Persona updated successfully", body = Persona),
        (status = 400, description = "Bad request - validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires personas.edit"),
        (status = 404, description = "Persona not found", body = ErrorResponse),
        (status = 409, description = "Cedula already registered", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Personas"
)]
#[instrument(skip(state, dto))]
pub async fn update_persona(
    State(state): State<AppState>,
    RequirePersonasEdit(_auth_user): RequirePersonasEdit,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdatePersonaDto>,
) -> Result<Json<Persona>, AppError> {
    let persona = PersonaService::update_persona(&state.db, id, dto).await?;
    Ok(Json(persona))
}

/// Soft-delete a persona
#[utoipa::path(
    delete,
    path = "/api/personas/{id}",
    params(
        ("id" = Uuid, Path, description = "Persona ID")
    ),
    responses(
        (status = 204, description = "Persona deleted successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires personas.delete"),
        (status = 404, description = "Persona not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Personas"
)]
#[instrument(skip(state))]
pub async fn delete_persona(
    State(state): State<AppState>,
    RequirePersonasDelete(_auth_user): RequirePersonasDelete,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    PersonaService::delete_persona(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
