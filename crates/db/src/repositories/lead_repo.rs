//! Repository for the `leads` table.

use sqlx::PgPool;
use xeetrack_core::types::DbId;

use crate::models::lead::{CreateLead, Lead, LeadPipeline, UpdateLead};

const COLUMNS: &str = "id, name, contact_info, estimated_amount, notes, created_at, updated_at";

/// Provides CRUD operations for leads. Leads are hard-deleted.
pub struct LeadRepo;

impl LeadRepo {
    pub async fn create(pool: &PgPool, input: &CreateLead) -> Result<Lead, sqlx::Error> {
        let query = format!(
            "INSERT INTO leads (name, contact_info, estimated_amount, notes)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(&input.name)
            .bind(&input.contact_info)
            .bind(input.estimated_amount)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Lead>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM leads WHERE id = $1");
        sqlx::query_as::<_, Lead>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Lead>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM leads ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Lead>(&query).fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLead,
    ) -> Result<Option<Lead>, sqlx::Error> {
        let query = format!(
            "UPDATE leads SET
                name = COALESCE($2, name),
                contact_info = COALESCE($3, contact_info),
                estimated_amount = COALESCE($4, estimated_amount),
                notes = COALESCE($5, notes)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.contact_info)
            .bind(input.estimated_amount)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a lead. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM leads WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count, sum and mean of estimated amounts across all leads.
    pub async fn pipeline(pool: &PgPool) -> Result<LeadPipeline, sqlx::Error> {
        sqlx::query_as::<_, LeadPipeline>(
            "SELECT COUNT(*) AS lead_count,
                    COALESCE(SUM(estimated_amount), 0)::DOUBLE PRECISION AS total_amount,
                    COALESCE(AVG(estimated_amount), 0)::DOUBLE PRECISION AS average_amount
             FROM leads",
        )
        .fetch_one(pool)
        .await
    }
}
