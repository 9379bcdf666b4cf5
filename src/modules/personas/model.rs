//! Persona data models and DTOs.
//!
//! Domain nouns stay in Spanish because that is what the records hold:
//! `cedula` (national id), `rango_militar`, and so on.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A personnel record.
///
/// Rows are soft-deleted. Every service query filters `deleted_at IS NULL`,
/// so a deleted record never leaves the store through this module.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Persona {
    pub id: Uuid,
    pub nombres: String,
    pub apellidos: String,
    pub cedula: String,
    pub fecha_nacimiento: chrono::NaiveDate,
    pub direccion: Option<String>,
    pub telefono: String,
    pub rango_militar: Option<String>,
    pub activo: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for creating a persona. New records always start active.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreatePersonaDto {
    #[validate(length(min = 1, max = 180))]
    pub nombres: String,
    #[validate(length(min = 1, max = 180))]
    pub apellidos: String,
    #[validate(length(min = 1, max = 15))]
    pub cedula: String,
    #[schema(example = "1990-07-15")]
    pub fecha_nacimiento: chrono::NaiveDate,
    #[validate(length(max = 255))]
    pub direccion: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub telefono: String,
    #[validate(length(max = 100))]
    pub rango_militar: Option<String>,
}

/// DTO for updating a persona.
///
/// `activo` is optional; when omitted the stored value is kept.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpdatePersonaDto {
    #[validate(length(min = 1, max = 180))]
    pub nombres: String,
    #[validate(length(min = 1, max = 180))]
    pub apellidos: String,
    #[validate(length(min = 1, max = 15))]
    pub cedula: String,
    #[schema(example = "1990-07-15")]
    pub fecha_nacimiento: chrono::NaiveDate,
    #[validate(length(max = 255))]
    pub direccion: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub telefono: String,
    #[validate(length(max = 100))]
    pub rango_militar: Option<String>,
    #[serde(default)]
    pub activo: Option<bool>,
}

/// Query parameters for filtering personas.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PersonaFilterParams {
    /// Partial match against nombres, apellidos, or cedula
    pub search: Option<String>,
    #[serde(flatten)]
    pub pagination: crate::utils::pagination::PaginationParams,
}

/// Paginated response containing personas.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedPersonasResponse {
    pub data: Vec<Persona>,
    pub meta: crate::utils::pagination::PaginationMeta,
}

/// Roster counts over non-deleted records.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PersonaStats {
    pub total: i64,
    pub activas: i64,
    pub inactivas: i64,
    /// Share of active records, rounded to two decimals. Zero when the
    /// roster is empty.
    pub porcentaje_activas: f64,
}
