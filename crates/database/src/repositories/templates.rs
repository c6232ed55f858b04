use crate::error::Result;
use sqlx::PgPool;
use tickethub_models::{NewTemplate, Template};
use uuid::Uuid;

#[derive(Clone)]
pub struct TemplateRepository {
    pool: PgPool,
}

impl TemplateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a template owned by an organisation
    pub async fn create(&self, organization_id: Uuid, new_template: &NewTemplate) -> Result<Template> {
        let template = sqlx::query_as::<_, Template>(
            r#"
            INSERT INTO templates
                (organization_id, name, ticket_type, start_time,
                 tickets_per_period, number_of_periods, additional_info)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(organization_id)
        .bind(&new_template.name)
        .bind(&new_template.ticket_type)
        .bind(new_template.start_time)
        .bind(new_template.tickets_per_period)
        .bind(new_template.number_of_periods)
        .bind(&new_template.additional_info)
        .fetch_one(&self.pool)
        .await?;

        Ok(template)
    }

    /// List all templates owned by an organisation
    pub async fn list_by_organization(&self, organization_id: Uuid) -> Result<Vec<Template>> {
        let templates = sqlx::query_as::<_, Template>(
            r#"
            SELECT * FROM templates
            WHERE organization_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(templates)
    }

    /// Find a template by id
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Template>> {
        let template = sqlx::query_as::<_, Template>("SELECT * FROM templates WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(template)
    }

    /// Delete a template and every session scheduled from it, in one
    /// transaction. Returns false (and changes nothing) when the template
    /// does not belong to the organisation.
    pub async fn delete_cascade(&self, id: Uuid, organization_id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM sessions WHERE template_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query(
            r#"
            DELETE FROM templates
            WHERE id = $1 AND organization_id = $2
            "#,
        )
        .bind(id)
        .bind(organization_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }
}
