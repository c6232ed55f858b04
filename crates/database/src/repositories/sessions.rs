use crate::error::Result;
use sqlx::PgPool;
use tickethub_models::{NewSession, PublicSession, Session, SessionStatus, SessionWithTemplate};
use uuid::Uuid;

#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Schedule a session from a template
    pub async fn create(&self, new_session: &NewSession) -> Result<Session> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (template_id, session_date, status)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(new_session.template_id)
        .bind(new_session.session_date)
        .bind(&new_session.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(session)
    }

    /// List an organisation's sessions with their template details.
    /// Organisation scope goes through the owning template.
    pub async fn list_by_organization(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<SessionWithTemplate>> {
        let sessions = sqlx::query_as::<_, SessionWithTemplate>(
            r#"
            SELECT
                s.id,
                s.session_date,
                s.status,
                t.id AS template_id,
                t.name AS template_name,
                t.ticket_type,
                t.start_time,
                t.tickets_per_period,
                t.number_of_periods
            FROM sessions s
            INNER JOIN templates t ON s.template_id = t.id
            WHERE t.organization_id = $1
            ORDER BY s.session_date ASC
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sessions)
    }

    /// Public listing: active sessions across all organisations, with
    /// embedded template and organisation details
    pub async fn list_public_active(&self) -> Result<Vec<PublicSession>> {
        let sessions = sqlx::query_as::<_, PublicSession>(
            r#"
            SELECT
                s.id,
                s.session_date,
                s.status,
                t.name AS template_name,
                t.ticket_type,
                t.start_time,
                t.tickets_per_period,
                t.number_of_periods,
                o.id AS organization_id,
                o.name AS organization_name,
                o.city,
                o.state,
                o.country
            FROM sessions s
            INNER JOIN templates t ON s.template_id = t.id
            INNER JOIN organizations o ON t.organization_id = o.id
            WHERE s.status = $1
            ORDER BY s.session_date ASC
            "#,
        )
        .bind(SessionStatus::Active)
        .fetch_all(&self.pool)
        .await?;

        Ok(sessions)
    }

    /// Delete a session, scoped through its template's organisation
    pub async fn delete_scoped(&self, id: Uuid, organization_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM sessions
            WHERE id = $1
              AND template_id IN (SELECT id FROM templates WHERE organization_id = $2)
            "#,
        )
        .bind(id)
        .bind(organization_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
