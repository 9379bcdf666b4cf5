use sqlx::SqlitePool;
use tracing::{debug, error, instrument};
use uuid::Uuid;

use crate::modules::users::model::{
    ChangePasswordDto, CreateUserDto, PaginatedUsersResponse, User, UserFilterParams,
    UserWithRoles,
};
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationMeta;
use crate::utils::password::{hash_password, verify_password};

const USER_COLUMNS: &str = "id, name, username, email, created_at, updated_at";

pub struct UserService;

impl UserService {
    /// Creates an account with a hashed password and no roles.
    ///
    /// Role assignment is a separate operation so the same checks run no
    /// matter where an assignment comes from.
    #[instrument(skip(db, dto), fields(user.email = %dto.email))]
    pub async fn create_user(db: &SqlitePool, dto: CreateUserDto) -> Result<User, AppError> {
        let mut tx = db.begin().await?;

        let email_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)",
        )
        .bind(&dto.email)
        .fetch_one(&mut *tx)
        .await?;

        if email_taken {
            return Err(AppError::conflict(anyhow::anyhow!(
                "A user with this email already exists"
            )));
        }

        let hashed_password = hash_password(&dto.password)?;
        let now = chrono::Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: dto.name,
            username: dto.username,
            email: dto.email,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO users (id, name, username, email, password, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&hashed_password)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::conflict(anyhow::anyhow!(
                        "A user with this email already exists"
                    ));
                }
            }
            AppError::from(e)
        })?;

        tx.commit().await?;

        Ok(user)
    }

    #[instrument(skip(db, filters), fields(db.operation = "SELECT", db.table = "users"))]
    pub async fn get_users(
        db: &SqlitePool,
        filters: UserFilterParams,
    ) -> Result<PaginatedUsersResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        debug!(
            limit = %limit,
            offset = %offset,
            filter.name = ?filters.name,
            filter.email = ?filters.email,
            filter.role = ?filters.role,
            "Fetching users with pagination"
        );

        let mut count_query = String::from("SELECT COUNT(*) FROM users u WHERE 1=1");
        let mut where_clause = String::new();
        let mut params = Vec::new();

        if let Some(name) = &filters.name {
            params.push(format!("%{}%", name));
            where_clause.push_str(&format!(" AND u.name LIKE ${}", params.len()));
        }

        if let Some(email) = &filters.email {
            params.push(format!("%{}%", email));
            where_clause.push_str(&format!(" AND u.email LIKE ${}", params.len()));
        }

        if let Some(role) = &filters.role {
            params.push(role.clone());
            where_clause.push_str(&format!(
                " AND EXISTS (SELECT 1 FROM user_roles ur \
                 JOIN roles r ON r.id = ur.role_id \
                 WHERE ur.user_id = u.id AND r.name = ${})",
                params.len()
            ));
        }

        count_query.push_str(&where_clause);

        let mut count_sql = sqlx::query_scalar::<_, i64>(&count_query);
        for param in &params {
            count_sql = count_sql.bind(param);
        }
        let total = count_sql.fetch_one(db).await.map_err(|e| {
            error!(error = %e, "Database error counting users");
            AppError::from(e)
        })?;

        let mut data_query = format!("SELECT {} FROM users u WHERE 1=1", USER_COLUMNS);
        data_query.push_str(&where_clause);
        data_query.push_str(" ORDER BY u.created_at DESC");
        data_query.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset));

        let mut data_sql = sqlx::query_as::<_, User>(&data_query);
        for param in params {
            data_sql = data_sql.bind(param);
        }
        let users = data_sql.fetch_all(db).await.map_err(|e| {
            error!(error = %e, "Database error fetching users");
            AppError::from(e)
        })?;

        let mut data = Vec::with_capacity(users.len());
        for user in users {
            let roles = Self::role_names(db, user.id).await?;
            data.push(UserWithRoles { user, roles });
        }

        debug!(total = %total, returned = %data.len(), "Users fetched successfully");

        Ok(PaginatedUsersResponse {
            data,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_user_by_id(db: &SqlitePool, id: Uuid) -> Result<UserWithRoles, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User with id {} not found", id)))?;

        let roles = Self::role_names(db, user.id).await?;

        Ok(UserWithRoles { user, roles })
    }

    /// Changes the caller's password after verifying the current one.
    #[instrument(skip(db, dto))]
    pub async fn change_password(
        db: &SqlitePool,
        user_id: Uuid,
        dto: ChangePasswordDto,
    ) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        let current_hash =
            sqlx::query_scalar::<_, String>("SELECT password FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| {
                    AppError::not_found(anyhow::anyhow!("User with id {} not found", user_id))
                })?;

        if !verify_password(&dto.current_password, &current_hash)? {
            return Err(AppError::unauthorized(anyhow::anyhow!(
                "Current password is incorrect"
            )));
        }

        let new_hash = hash_password(&dto.new_password)?;

        sqlx::query("UPDATE users SET password = $1, updated_at = $2 WHERE id = $3")
            .bind(&new_hash)
            .bind(chrono::Utc::now())
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn role_names(db: &SqlitePool, user_id: Uuid) -> Result<Vec<String>, AppError> {
        let roles = sqlx::query_scalar::<_, String>(
            "SELECT r.name FROM roles r
             JOIN user_roles ur ON ur.role_id = r.id
             WHERE ur.user_id = $1
             ORDER BY r.name",
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;

        Ok(roles)
    }
}
