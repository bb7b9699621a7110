// ============================================================================
// Study Infrastructure - PostgreSQL User Repository
// File: crates/study-infrastructure/src/database/postgres/user_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;
use tracing::{info, error};
use chrono::{DateTime, Utc};

use study_core::domain::{Image, Role, User};
use study_core::error::DomainError;
use study_core::repositories::UserRepository;
use study_shared::types::AuditFields;

use super::db_error;

const SELECT_USER: &str = r#"
    SELECT
        u.id, u.email, u.phone, u.full_name, u.password,
        u.enabled, u.role, u.image_id,
        i.name AS image_name, i.url AS image_url, i.storage_id AS image_storage_id,
        u.created_at, u.created_by, u.updated_at, u.updated_by
    FROM users u
    LEFT JOIN images i ON i.id = u.image_id
"#;

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(&self, clause: &str, value: &str) -> Result<Option<User>, DomainError> {
        let sql = format!("{SELECT_USER} WHERE {clause}");
        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("finding user", e))?;

        row.map(User::try_from).transpose()
    }

    async fn insert_image(tx: &mut Transaction<'_, Postgres>, image: &Image) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO images (id, name, url, storage_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO NOTHING
            "#
        )
        .bind(image.id)
        .bind(&image.name)
        .bind(&image.url)
        .bind(&image.storage_id)
        .execute(&mut **tx)
        .await
        .map_err(|e| db_error("inserting image", e))?;
        Ok(())
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    phone: String,
    full_name: String,
    password: String,
    enabled: bool,
    role: i16,
    image_id: Option<Uuid>,
    image_name: Option<String>,
    image_url: Option<String>,
    image_storage_id: Option<String>,
    created_at: DateTime<Utc>,
    created_by: Option<Uuid>,
    updated_at: Option<DateTime<Utc>>,
    updated_by: Option<Uuid>,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::from_code(row.role as i32).ok_or_else(|| {
            error!("User {} has unknown role code {}", row.id, row.role);
            DomainError::DatabaseError(format!("unknown role code {}", row.role))
        })?;

        let avatar = match (row.image_id, row.image_name, row.image_url, row.image_storage_id) {
            (Some(id), Some(name), Some(url), Some(storage_id)) => Some(Image { id, name, url, storage_id }),
            _ => None,
        };

        Ok(User {
            id: row.id,
            email: row.email,
            phone: row.phone,
            full_name: row.full_name,
            password: row.password,
            enabled: row.enabled,
            role,
            avatar,
            audit: AuditFields {
                created_at: row.created_at,
                created_by: row.created_by,
                updated_at: row.updated_at,
                updated_by: row.updated_by,
            },
        })
    }
}

/// Business conflict behind a unique constraint or index of `users`
fn unique_conflict(user: &User, constraint: Option<&str>) -> Option<DomainError> {
    match constraint? {
        "users_email_key" | "users_email_lower_idx" => Some(DomainError::EmailAlreadyExists(user.email.clone())),
        "users_phone_key" => Some(DomainError::PhoneAlreadyExists(user.phone.clone())),
        _ => None,
    }
}

/// Unique violations surface as the matching business conflict
fn map_write_error(user: &User, e: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            if let Some(conflict) = unique_conflict(user, db.constraint()) {
                return conflict;
            }
        }
    }
    db_error("writing user", e)
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, DomainError> {
        let sql = format!("{SELECT_USER} WHERE u.id = $1");
        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("finding user by id", e))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.fetch_one_where("LOWER(u.email) = LOWER($1)", email).await
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, DomainError> {
        self.fetch_one_where("u.phone = $1", phone).await
    }

    async fn find_by_role(&self, role: Role) -> Result<Vec<User>, DomainError> {
        let sql = format!("{SELECT_USER} WHERE u.role = $1 ORDER BY u.created_at");
        let rows: Vec<UserRow> = sqlx::query_as(&sql)
            .bind(role.code())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("listing users by role", e))?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn create(&self, user: &User) -> Result<User, DomainError> {
        info!("Creating user {}", user.id);

        let mut tx = self.pool.begin().await.map_err(|e| db_error("opening transaction", e))?;

        if let Some(avatar) = &user.avatar {
            Self::insert_image(&mut tx, avatar).await?;
        }

        sqlx::query(
            r#"
            INSERT INTO users (
                id, email, phone, full_name, password,
                enabled, role, image_id,
                created_at, created_by, updated_at, updated_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.full_name)
        .bind(&user.password)
        .bind(user.enabled)
        .bind(user.role.code())
        .bind(user.avatar.as_ref().map(|a| a.id))
        .bind(user.audit.created_at)
        .bind(user.audit.created_by)
        .bind(user.audit.updated_at)
        .bind(user.audit.updated_by)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_write_error(user, e))?;

        tx.commit().await.map_err(|e| db_error("committing user", e))?;

        info!("User created successfully: {}", user.id);
        Ok(user.clone())
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| db_error("opening transaction", e))?;

        let previous_image: Option<Option<Uuid>> = sqlx::query_scalar(
            "SELECT image_id FROM users WHERE id = $1 FOR UPDATE"
        )
        .bind(user.id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| db_error("locking user", e))?;

        let previous_image = previous_image.ok_or(DomainError::UserNotFound)?;
        let new_image = user.avatar.as_ref().map(|a| a.id);

        if let Some(avatar) = &user.avatar {
            Self::insert_image(&mut tx, avatar).await?;
        }

        sqlx::query(
            r#"
            UPDATE users
            SET
                email = $2,
                phone = $3,
                full_name = $4,
                password = $5,
                enabled = $6,
                role = $7,
                image_id = $8,
                updated_at = $9,
                updated_by = $10
            WHERE id = $1
            "#
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.full_name)
        .bind(&user.password)
        .bind(user.enabled)
        .bind(user.role.code())
        .bind(new_image)
        .bind(user.audit.updated_at)
        .bind(user.audit.updated_by)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_write_error(user, e))?;

        if let Some(old) = previous_image.filter(|old| Some(*old) != new_image) {
            sqlx::query("DELETE FROM images WHERE id = $1")
                .bind(old)
                .execute(&mut *tx)
                .await
                .map_err(|e| db_error("removing replaced image", e))?;
        }

        tx.commit().await.map_err(|e| db_error("committing user", e))?;
        Ok(user.clone())
    }
}
