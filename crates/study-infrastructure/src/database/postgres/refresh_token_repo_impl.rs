//! PostgreSQL refresh token repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use study_core::domain::RefreshToken;
use study_core::error::DomainError;
use study_core::repositories::RefreshTokenRepository;

use super::db_error;

pub struct PgRefreshTokenRepository {
    pool: PgPool,
}

impl PgRefreshTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RefreshTokenRow {
    id: Uuid,
    token: String,
    user_id: Uuid,
    expiry_date: DateTime<Utc>,
}

impl From<RefreshTokenRow> for RefreshToken {
    fn from(row: RefreshTokenRow) -> Self {
        RefreshToken {
            id: row.id,
            token: row.token,
            user_id: row.user_id,
            expiry_date: row.expiry_date,
        }
    }
}

#[async_trait]
impl RefreshTokenRepository for PgRefreshTokenRepository {
    async fn create(&self, token: &RefreshToken) -> Result<RefreshToken, DomainError> {
        let row: RefreshTokenRow = sqlx::query_as(
            r#"
            INSERT INTO refresh_tokens (id, token, user_id, expiry_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, token, user_id, expiry_date
            "#
        )
        .bind(token.id)
        .bind(&token.token)
        .bind(token.user_id)
        .bind(token.expiry_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("creating refresh token", e))?;

        Ok(row.into())
    }

    async fn replace_for_user(&self, token: &RefreshToken) -> Result<RefreshToken, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| db_error("opening transaction", e))?;

        // Concurrent logins of the same user queue up on the user row
        sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(token.user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("locking user", e))?;

        sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1")
            .bind(token.user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("deleting refresh tokens of user", e))?;

        let row: RefreshTokenRow = sqlx::query_as(
            r#"
            INSERT INTO refresh_tokens (id, token, user_id, expiry_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, token, user_id, expiry_date
            "#
        )
        .bind(token.id)
        .bind(&token.token)
        .bind(token.user_id)
        .bind(token.expiry_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| db_error("creating refresh token", e))?;

        tx.commit().await.map_err(|e| db_error("committing refresh token", e))?;
        Ok(row.into())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, DomainError> {
        let row: Option<RefreshTokenRow> = sqlx::query_as(
            "SELECT id, token, user_id, expiry_date FROM refresh_tokens WHERE token = $1"
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding refresh token", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn delete(&self, id: &Uuid) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM refresh_tokens WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("deleting refresh token", e))?;
        Ok(())
    }

    async fn delete_by_user(&self, user_id: &Uuid) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("deleting refresh tokens of user", e))?;
        Ok(result.rows_affected())
    }
}
