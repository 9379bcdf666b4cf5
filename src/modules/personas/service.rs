use sqlx::SqlitePool;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::modules::personas::model::{
    CreatePersonaDto, PaginatedPersonasResponse, Persona, PersonaFilterParams, PersonaStats,
    UpdatePersonaDto,
};
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationMeta;

const PERSONA_COLUMNS: &str = "id, nombres, apellidos, cedula, fecha_nacimiento, direccion, \
                               telefono, rango_militar, activo, created_at, updated_at";

pub struct PersonaService;

impl PersonaService {
    #[instrument(skip(db, filters), fields(db.operation = "SELECT", db.table = "personas"))]
    pub async fn get_personas(
        db: &SqlitePool,
        filters: PersonaFilterParams,
    ) -> Result<PaginatedPersonasResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        debug!(
            limit = %limit,
            offset = %offset,
            filter.search = ?filters.search,
            "Fetching personas with pagination"
        );

        let mut count_query = String::from("SELECT COUNT(*) FROM personas WHERE deleted_at IS NULL");
        let mut where_clause = String::new();
        let mut params = Vec::new();

        if let Some(search) = &filters.search {
            let pattern = format!("%{}%", search);
            params.push(pattern.clone());
            params.push(pattern.clone());
            params.push(pattern);
            where_clause.push_str(&format!(
                " AND (nombres LIKE ${} OR apellidos LIKE ${} OR cedula LIKE ${})",
                params.len() - 2,
                params.len() - 1,
                params.len()
            ));
        }

        count_query.push_str(&where_clause);

        let mut count_sql = sqlx::query_scalar::<_, i64>(&count_query);
        for param in &params {
            count_sql = count_sql.bind(param);
        }
        let total = count_sql.fetch_one(db).await?;

        let mut data_query = format!(
            "SELECT {} FROM personas WHERE deleted_at IS NULL",
            PERSONA_COLUMNS
        );
        data_query.push_str(&where_clause);
        data_query.push_str(" ORDER BY created_at DESC");
        data_query.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset));

        let mut data_sql = sqlx::query_as::<_, Persona>(&data_query);
        for param in params {
            data_sql = data_sql.bind(param);
        }
        let personas = data_sql.fetch_all(db).await?;

        Ok(PaginatedPersonasResponse {
            data: personas,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_persona_by_id(db: &SqlitePool, id: Uuid) -> Result<Persona, AppError> {
        let persona = sqlx::query_as::<_, Persona>(&format!(
            "SELECT {} FROM personas WHERE id = $1 AND deleted_at IS NULL",
            PERSONA_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Persona with id {} not found", id)))?;

        Ok(persona)
    }

    /// Creates a persona. New records always start active.
    #[instrument(skip(db, dto), fields(persona.cedula = %dto.cedula))]
    pub async fn create_persona(
        db: &SqlitePool,
        dto: CreatePersonaDto,
    ) -> Result<Persona, AppError> {
        let mut tx = db.begin().await?;

        // Uniqueness only applies to live rows. A deleted record keeps its
        // cedula without blocking a new one.
        let cedula_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM personas WHERE cedula = $1 AND deleted_at IS NULL)",
        )
        .bind(&dto.cedula)
        .fetch_one(&mut *tx)
        .await?;

        if cedula_taken {
            return Err(AppError::conflict(anyhow::anyhow!(
                "A persona with cedula {} already exists",
                dto.cedula
            )));
        }

        let now = chrono::Utc::now();
        let persona = Persona {
            id: Uuid::new_v4(),
            nombres: dto.nombres,
            apellidos: dto.apellidos,
            cedula: dto.cedula,
            fecha_nacimiento: dto.fecha_nacimiento,
            direccion: dto.direccion,
            telefono: dto.telefono,
            rango_militar: dto.rango_militar,
            activo: true,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO personas (id, nombres, apellidos, cedula, fecha_nacimiento, direccion, \
             telefono, rango_militar, activo, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(persona.id)
        .bind(&persona.nombres)
        .bind(&persona.apellidos)
        .bind(&persona.cedula)
        .bind(persona.fecha_nacimiento)
        .bind(&persona.direccion)
        .bind(&persona.telefono)
        .bind(&persona.rango_militar)
        .bind(persona.activo)
        .bind(persona.created_at)
        .bind(persona.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::conflict(anyhow::anyhow!(
                        "A persona with cedula {} already exists",
                        persona.cedula
                    ));
                }
            }
            AppError::from(e)
        })?;

        tx.commit().await?;

        Ok(persona)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_persona(
        db: &SqlitePool,
        id: Uuid,
        dto: UpdatePersonaDto,
    ) -> Result<Persona, AppError> {
        let mut tx = db.begin().await?;

        let persona = sqlx::query_as::<_, Persona>(&format!(
            "SELECT {} FROM personas WHERE id = $1 AND deleted_at IS NULL",
            PERSONA_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Persona with id {} not found", id)))?;

        let cedula_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM personas \
             WHERE cedula = $1 AND deleted_at IS NULL AND id <> $2)",
        )
        .bind(&dto.cedula)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if cedula_taken {
            return Err(AppError::conflict(anyhow::anyhow!(
                "A persona with cedula {} already exists",
                dto.cedula
            )));
        }

        let updated = Persona {
            nombres: dto.nombres,
            apellidos: dto.apellidos,
            cedula: dto.cedula,
            fecha_nacimiento: dto.fecha_nacimiento,
            direccion: dto.direccion,
            telefono: dto.telefono,
            rango_militar: dto.rango_militar,
            activo: dto.activo.unwrap_or(persona.activo),
            updated_at: chrono::Utc::now(),
            ..persona
        };

        sqlx::query(
            "UPDATE personas SET nombres = $1, apellidos = $2, cedula = $3, \
             fecha_nacimiento = $4, direccion = $5, telefono = $6, rango_militar = $7, \
             activo = $8, updated_at = $9 WHERE id = $10",
        )
        .bind(&updated.nombres)
        .bind(&updated.apellidos)
        .bind(&updated.cedula)
        .bind(updated.fecha_nacimiento)
        .bind(&updated.direccion)
        .bind(&updated.telefono)
        .bind(&updated.rango_militar)
        .bind(updated.activo)
        .bind(updated.updated_at)
        .bind(updated.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(updated)
    }

    /// Soft-deletes a persona. The row stays in the store with its
    /// `deleted_at` set and disappears from every query in this module.
    #[instrument(skip(db))]
    pub async fn delete_persona(db: &SqlitePool, id: Uuid) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM personas WHERE id = $1 AND deleted_at IS NULL)",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if !exists {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Persona with id {} not found",
                id
            )));
        }

        let now = chrono::Utc::now();
        sqlx::query("UPDATE personas SET deleted_at = $1, updated_at = $2 WHERE id = $3")
            .bind(now)
            .bind(now)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn estadisticas(db: &SqlitePool) -> Result<PersonaStats, AppError> {
        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM personas WHERE deleted_at IS NULL")
                .fetch_one(db)
                .await?;

        let activas = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM personas WHERE deleted_at IS NULL AND activo = 1",
        )
        .fetch_one(db)
        .await?;

        let inactivas = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM personas WHERE deleted_at IS NULL AND activo = 0",
        )
        .fetch_one(db)
        .await?;

        let porcentaje_activas = if total > 0 {
            let pct = (activas as f64 / total as f64) * 100.0;
            (pct * 100.0).round() / 100.0
        } else {
            0.0
        };

        Ok(PersonaStats {
            total,
            activas,
            inactivas,
            porcentaje_activas,
        })
    }
}
