//! PostgreSQL password reset code repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use study_core::domain::ForgotPassword;
use study_core::error::DomainError;
use study_core::repositories::ForgotPasswordRepository;

use super::db_error;

pub struct PgForgotPasswordRepository {
    pool: PgPool,
}

impl PgForgotPasswordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ForgotPasswordRow {
    id: Uuid,
    otp: i32,
    user_id: Uuid,
    expiration_time: DateTime<Utc>,
}

impl From<ForgotPasswordRow> for ForgotPassword {
    fn from(row: ForgotPasswordRow) -> Self {
        ForgotPassword {
            id: row.id,
            otp: row.otp,
            user_id: row.user_id,
            expiration_time: row.expiration_time,
        }
    }
}

#[async_trait]
impl ForgotPasswordRepository for PgForgotPasswordRepository {
    async fn create(&self, code: &ForgotPassword) -> Result<ForgotPassword, DomainError> {
        let row: ForgotPasswordRow = sqlx::query_as(
            r#"
            INSERT INTO forgot_passwords (id, otp, user_id, expiration_time)
            VALUES ($1, $2, $3, $4)
            RETURNING id, otp, user_id, expiration_time
            "#
        )
        .bind(code.id)
        .bind(code.otp)
        .bind(code.user_id)
        .bind(code.expiration_time)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("creating reset code", e))?;

        Ok(row.into())
    }

    async fn find_by_otp_and_user(&self, otp: i32, user_id: &Uuid) -> Result<Option<ForgotPassword>, DomainError> {
        let row: Option<ForgotPasswordRow> = sqlx::query_as(
            r#"
            SELECT id, otp, user_id, expiration_time
            FROM forgot_passwords
            WHERE otp = $1 AND user_id = $2
            "#
        )
        .bind(otp)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding reset code", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn delete(&self, id: &Uuid) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM forgot_passwords WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("deleting reset code", e))?;
        Ok(())
    }

    async fn delete_by_user(&self, user_id: &Uuid) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM forgot_passwords WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("deleting reset codes of user", e))?;
        Ok(result.rows_affected())
    }
}
