//! Repository for the `stages` table.
//!
//! Stages are created alongside their project (see
//! [`ProjectRepo::create`](super::ProjectRepo::create)); there is no insert
//! or delete here.

use sqlx::PgPool;
use xeetrack_core::status::ApprovalStatus;
use xeetrack_core::types::DbId;

use crate::models::stage::{Stage, UpdateStage};

const COLUMNS: &str = "id, project_id, name, sort_order, notes, progress_percentage, \
                       approval_status, created_at, updated_at";

pub struct StageRepo;

impl StageRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Stage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stages WHERE id = $1");
        sqlx::query_as::<_, Stage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Stages of a project in template order.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Stage>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM stages WHERE project_id = $1 ORDER BY sort_order");
        sqlx::query_as::<_, Stage>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateStage,
    ) -> Result<Option<Stage>, sqlx::Error> {
        let query = format!(
            "UPDATE stages SET
                notes = COALESCE($2, notes),
                progress_percentage = COALESCE($3, progress_percentage)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Stage>(&query)
            .bind(id)
            .bind(&input.notes)
            .bind(input.progress_percentage)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_approval(
        pool: &PgPool,
        id: DbId,
        status: ApprovalStatus,
    ) -> Result<Option<Stage>, sqlx::Error> {
        let query = format!(
            "UPDATE stages SET approval_status = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Stage>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }
}
