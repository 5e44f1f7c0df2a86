//! Repositories for `comment_tasks` and `global_comments`.

use sqlx::PgPool;
use xeetrack_core::status::WorkStatus;
use xeetrack_core::types::DbId;

use crate::models::comment::{CommentTask, CreateCommentTask, CreateGlobalComment, GlobalComment};

const TASK_COLUMNS: &str = "id, project_id, stage_id, text, added_by, author_name, author_role, \
                            status, assigned_to, deadline, created_at, updated_at";

const GLOBAL_COLUMNS: &str =
    "id, project_id, text, added_by, author_name, author_role, created_at";

pub struct CommentTaskRepo;

impl CommentTaskRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateCommentTask,
    ) -> Result<CommentTask, sqlx::Error> {
        let query = format!(
            "INSERT INTO comment_tasks
                (project_id, stage_id, text, added_by, author_name, author_role,
                 status, assigned_to, deadline)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {TASK_COLUMNS}"
        );
        sqlx::query_as::<_, CommentTask>(&query)
            .bind(input.project_id)
            .bind(input.stage_id)
            .bind(&input.text)
            .bind(input.added_by)
            .bind(&input.author_name)
            .bind(input.author_role.as_str())
            .bind(input.status.as_str())
            .bind(input.assigned_to)
            .bind(input.deadline)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CommentTask>, sqlx::Error> {
        let query = format!("SELECT {TASK_COLUMNS} FROM comment_tasks WHERE id = $1");
        sqlx::query_as::<_, CommentTask>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Comment-tasks of a project, newest first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<CommentTask>, sqlx::Error> {
        let query = format!(
            "SELECT {TASK_COLUMNS} FROM comment_tasks
             WHERE project_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, CommentTask>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Every comment-task, newest first. Visibility is applied by the caller.
    pub async fn list(pool: &PgPool) -> Result<Vec<CommentTask>, sqlx::Error> {
        let query =
            format!("SELECT {TASK_COLUMNS} FROM comment_tasks ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, CommentTask>(&query).fetch_all(pool).await
    }

    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: WorkStatus,
    ) -> Result<Option<CommentTask>, sqlx::Error> {
        let query = format!(
            "UPDATE comment_tasks SET status = $2 WHERE id = $1 RETURNING {TASK_COLUMNS}"
        );
        sqlx::query_as::<_, CommentTask>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }
}

pub struct GlobalCommentRepo;

impl GlobalCommentRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateGlobalComment,
    ) -> Result<GlobalComment, sqlx::Error> {
        let query = format!(
            "INSERT INTO global_comments (project_id, text, added_by, author_name, author_role)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {GLOBAL_COLUMNS}"
        );
        sqlx::query_as::<_, GlobalComment>(&query)
            .bind(input.project_id)
            .bind(&input.text)
            .bind(input.added_by)
            .bind(&input.author_name)
            .bind(input.author_role.as_str())
            .fetch_one(pool)
            .await
    }

    /// Discussion of a project in posting order.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<GlobalComment>, sqlx::Error> {
        let query = format!(
            "SELECT {GLOBAL_COLUMNS} FROM global_comments
             WHERE project_id = $1
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, GlobalComment>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }
}
