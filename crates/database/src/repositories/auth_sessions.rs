use crate::error::Result;
use sqlx::PgPool;
use tickethub_models::{AuthSession, NewAuthSession};

#[derive(Clone)]
pub struct AuthSessionRepository {
    pool: PgPool,
}

impl AuthSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a refresh-token session
    pub async fn create(&self, new_session: &NewAuthSession) -> Result<AuthSession> {
        let session = sqlx::query_as::<_, AuthSession>(
            r#"
            INSERT INTO auth_sessions (user_id, refresh_token_hash, expires_at)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(new_session.user_id)
        .bind(&new_session.refresh_token_hash)
        .bind(new_session.expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(session)
    }

    /// Find a live session by refresh token hash
    pub async fn find_by_refresh_token(&self, refresh_token_hash: &str) -> Result<Option<AuthSession>> {
        let session = sqlx::query_as::<_, AuthSession>(
            r#"
            SELECT * FROM auth_sessions
            WHERE refresh_token_hash = $1 AND expires_at > NOW()
            "#,
        )
        .bind(refresh_token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// Delete a session by refresh token hash (sign-out)
    pub async fn delete_by_refresh_token(&self, refresh_token_hash: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM auth_sessions WHERE refresh_token_hash = $1")
            .bind(refresh_token_hash)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
