use crate::error::Result;
use sqlx::PgPool;
use tickethub_models::{Invitation, NewInvitation};
use uuid::Uuid;

#[derive(Clone)]
pub struct InvitationRepository {
    pool: PgPool,
}

impl InvitationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an invitation. The raw token never reaches the store.
    pub async fn create(&self, new_invitation: &NewInvitation) -> Result<Invitation> {
        let invitation = sqlx::query_as::<_, Invitation>(
            r#"
            INSERT INTO invitations (organization_id, email, role, token_hash, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, organization_id, email, role, expires_at, created_at
            "#,
        )
        .bind(new_invitation.organization_id)
        .bind(&new_invitation.email)
        .bind(&new_invitation.role)
        .bind(&new_invitation.token_hash)
        .bind(new_invitation.expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(invitation)
    }

    /// Look up a live invitation by token hash. Expired invitations are
    /// indistinguishable from missing ones.
    pub async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Invitation>> {
        let invitation = sqlx::query_as::<_, Invitation>(
            r#"
            SELECT id, organization_id, email, role, expires_at, created_at
            FROM invitations
            WHERE token_hash = $1 AND expires_at > NOW()
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invitation)
    }

    /// List pending invitations for an organisation
    pub async fn list_by_organization(&self, organization_id: Uuid) -> Result<Vec<Invitation>> {
        let invitations = sqlx::query_as::<_, Invitation>(
            r#"
            SELECT id, organization_id, email, role, expires_at, created_at
            FROM invitations
            WHERE organization_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(invitations)
    }

    /// Delete an invitation (consumption on acceptance)
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM invitations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete an invitation scoped to an organisation (revocation)
    pub async fn delete_scoped(&self, id: Uuid, organization_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM invitations
            WHERE id = $1 AND organization_id = $2
            "#,
        )
        .bind(id)
        .bind(organization_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
