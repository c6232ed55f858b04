use crate::error::Result;
use sqlx::PgPool;
use tickethub_models::{Membership, MembershipWithProfile, NewMembership};
use uuid::Uuid;

#[derive(Clone)]
pub struct MembershipRepository {
    pool: PgPool,
}

impl MembershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Link a user to an organisation
    pub async fn add(&self, request: &NewMembership) -> Result<Membership> {
        let member = sqlx::query_as::<_, Membership>(
            r#"
            INSERT INTO memberships (user_id, organization_id, role)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, organization_id, role, joined_at
            "#,
        )
        .bind(request.user_id)
        .bind(request.organization_id)
        .bind(&request.role)
        .fetch_one(&self.pool)
        .await?;

        Ok(member)
    }

    /// Remove a user from an organisation
    pub async fn remove(&self, user_id: Uuid, organization_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM memberships
            WHERE user_id = $1 AND organization_id = $2
            "#,
        )
        .bind(user_id)
        .bind(organization_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Get a specific membership
    pub async fn get(&self, user_id: Uuid, organization_id: Uuid) -> Result<Option<Membership>> {
        let member = sqlx::query_as::<_, Membership>(
            r#"
            SELECT id, user_id, organization_id, role, joined_at
            FROM memberships
            WHERE user_id = $1 AND organization_id = $2
            "#,
        )
        .bind(user_id)
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(member)
    }

    /// Check if user is a member of an organisation
    pub async fn is_member(&self, user_id: Uuid, organization_id: Uuid) -> Result<bool> {
        let exists: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM memberships
                WHERE user_id = $1 AND organization_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.0)
    }

    /// Check if user has a specific role in an organisation
    pub async fn has_role(&self, user_id: Uuid, organization_id: Uuid, role: &str) -> Result<bool> {
        let exists: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM memberships
                WHERE user_id = $1 AND organization_id = $2 AND role = $3
            )
            "#,
        )
        .bind(user_id)
        .bind(organization_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.0)
    }

    /// List all memberships for a user, oldest first.
    /// The ordering is what makes "first membership" deterministic for
    /// default organisation selection.
    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Membership>> {
        let members = sqlx::query_as::<_, Membership>(
            r#"
            SELECT id, user_id, organization_id, role, joined_at
            FROM memberships
            WHERE user_id = $1
            ORDER BY joined_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    /// List all members of an organisation with their profiles
    pub async fn list_by_organization_with_profiles(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<MembershipWithProfile>> {
        let members = sqlx::query_as::<_, MembershipWithProfile>(
            r#"
            SELECT
                m.id,
                m.user_id,
                m.organization_id,
                m.role,
                m.joined_at,
                p.email,
                p.full_name
            FROM memberships m
            INNER JOIN profiles p ON m.user_id = p.id
            WHERE m.organization_id = $1
            ORDER BY m.joined_at ASC
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    /// Get admin count for an organisation
    pub async fn count_admins(&self, organization_id: Uuid) -> Result<i64> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM memberships
            WHERE organization_id = $1 AND role = 'admin'
            "#,
        )
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }
}
