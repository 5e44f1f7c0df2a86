//! Repository for the `projects` table.

use sqlx::PgPool;
use xeetrack_core::stages::stage_template;
use xeetrack_core::status::{Priority, ProjectStatus};
use xeetrack_core::types::DbId;

use crate::models::project::{CreateProject, Project, UpdateProject};

/// Column list shared across queries, qualified for the client join.
const COLUMNS: &str = "p.id, p.title, p.description, p.client_id, c.full_name AS client_name, \
                       p.assigned_employees, p.deadline, p.status, p.priority, \
                       p.progress_percentage, p.created_at, p.updated_at";

const FROM_JOINED: &str = "projects p LEFT JOIN profiles c ON c.id = p.client_id";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project together with its five template stages.
    ///
    /// Both inserts run in one transaction, so a project never exists
    /// without its stages.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let (id,): (DbId,) = sqlx::query_as(
            "INSERT INTO projects
                (title, description, client_id, assigned_employees, deadline, status, priority)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id",
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.client_id)
        .bind(&input.assigned_employees)
        .bind(input.deadline)
        .bind(input.status.unwrap_or(ProjectStatus::Active).as_str())
        .bind(input.priority.unwrap_or_default().as_str())
        .fetch_one(&mut *tx)
        .await?;

        for (name, sort_order) in stage_template() {
            sqlx::query("INSERT INTO stages (project_id, name, sort_order) VALUES ($1, $2, $3)")
                .bind(id)
                .bind(name)
                .bind(sort_order)
                .execute(&mut *tx)
                .await?;
        }

        let query = format!("SELECT {COLUMNS} FROM {FROM_JOINED} WHERE p.id = $1");
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(project)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM_JOINED} WHERE p.id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all projects, most recently created first.
    ///
    /// Visibility is applied by the caller; this returns every row.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM {FROM_JOINED} ORDER BY p.created_at DESC, p.id DESC");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "WITH p AS (
                UPDATE projects SET
                    title = COALESCE($2, title),
                    description = COALESCE($3, description),
                    assigned_employees = COALESCE($4, assigned_employees),
                    deadline = COALESCE($5, deadline),
                    status = COALESCE($6, status),
                    priority = COALESCE($7, priority),
                    progress_percentage = COALESCE($8, progress_percentage)
                WHERE id = $1
                RETURNING *
             )
             SELECT {COLUMNS} FROM p LEFT JOIN profiles c ON c.id = p.client_id"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.assigned_employees)
            .bind(input.deadline)
            .bind(input.status.map(ProjectStatus::as_str))
            .bind(input.priority.map(Priority::as_str))
            .bind(input.progress_percentage)
            .fetch_optional(pool)
            .await
    }
}
