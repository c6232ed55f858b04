use crate::error::{DatabaseError, Result};
use sqlx::PgPool;
use tickethub_models::{NewOrganization, Organization};
use uuid::Uuid;

#[derive(Clone)]
pub struct OrganizationRepository {
    pool: PgPool,
}

impl OrganizationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new organisation
    pub async fn create(&self, new_org: &NewOrganization) -> Result<Organization> {
        let org = sqlx::query_as::<_, Organization>(
            r#"
            INSERT INTO organizations (name, email, city, state, country, website)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&new_org.name)
        .bind(&new_org.email)
        .bind(&new_org.city)
        .bind(&new_org.state)
        .bind(&new_org.country)
        .bind(&new_org.website)
        .fetch_one(&self.pool)
        .await?;

        Ok(org)
    }

    /// Find organisation by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Organization> {
        let org = sqlx::query_as::<_, Organization>("SELECT * FROM organizations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Organization", &id.to_string()))?;

        Ok(org)
    }
}
