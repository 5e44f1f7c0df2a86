//! Repositories for brochures, their pages and page comments.

use sqlx::types::Json;
use sqlx::PgPool;
use xeetrack_core::brochure::{PageContent, PageLock};
use xeetrack_core::status::{ApprovalStatus, BrochureStatus};
use xeetrack_core::types::DbId;

use crate::models::brochure::{BrochurePage, BrochureProject, CreatePageComment, PageComment};

const BROCHURE_COLUMNS: &str =
    "b.id, b.client_id, c.full_name AS client_name, b.status, b.created_at, b.updated_at";

const BROCHURE_FROM: &str = "brochure_projects b LEFT JOIN profiles c ON c.id = b.client_id";

const PAGE_COLUMNS: &str = "id, brochure_id, page_number, approval_status, is_locked, locked_by, \
                            locked_by_name, locked_at, content, version, created_at, updated_at";

const COMMENT_COLUMNS: &str = "id, page_id, text, added_by, author_name, author_role, \
                               marked_done, action_type, created_at";

// ---------------------------------------------------------------------------
// Brochure projects
// ---------------------------------------------------------------------------

pub struct BrochureRepo;

impl BrochureRepo {
    /// Start a draft brochure for a client. Pages are added separately.
    pub async fn create(pool: &PgPool, client_id: DbId) -> Result<BrochureProject, sqlx::Error> {
        let query = format!(
            "WITH b AS (
                INSERT INTO brochure_projects (client_id) VALUES ($1) RETURNING *
             )
             SELECT {BROCHURE_COLUMNS} FROM b LEFT JOIN profiles c ON c.id = b.client_id"
        );
        sqlx::query_as::<_, BrochureProject>(&query)
            .bind(client_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<BrochureProject>, sqlx::Error> {
        let query = format!("SELECT {BROCHURE_COLUMNS} FROM {BROCHURE_FROM} WHERE b.id = $1");
        sqlx::query_as::<_, BrochureProject>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Every brochure, most recently updated first.
    pub async fn list(pool: &PgPool) -> Result<Vec<BrochureProject>, sqlx::Error> {
        let query = format!(
            "SELECT {BROCHURE_COLUMNS} FROM {BROCHURE_FROM} ORDER BY b.updated_at DESC, b.id DESC"
        );
        sqlx::query_as::<_, BrochureProject>(&query)
            .fetch_all(pool)
            .await
    }

    /// Brochures awaiting or under design work.
    pub async fn list_for_review(pool: &PgPool) -> Result<Vec<BrochureProject>, sqlx::Error> {
        let query = format!(
            "SELECT {BROCHURE_COLUMNS} FROM {BROCHURE_FROM}
             WHERE b.status IN ('ready_for_design', 'in_design')
             ORDER BY b.updated_at DESC, b.id DESC"
        );
        sqlx::query_as::<_, BrochureProject>(&query)
            .fetch_all(pool)
            .await
    }

    /// Move a brochure from `from` to `to`.
    ///
    /// Returns `None` when the brochure does not exist or is no longer in
    /// `from`, so concurrent transitions cannot both succeed.
    pub async fn transition(
        pool: &PgPool,
        id: DbId,
        from: BrochureStatus,
        to: BrochureStatus,
    ) -> Result<Option<BrochureProject>, sqlx::Error> {
        let query = format!(
            "WITH b AS (
                UPDATE brochure_projects SET status = $3
                WHERE id = $1 AND status = $2
                RETURNING *
             )
             SELECT {BROCHURE_COLUMNS} FROM b LEFT JOIN profiles c ON c.id = b.client_id"
        );
        sqlx::query_as::<_, BrochureProject>(&query)
            .bind(id)
            .bind(from.as_str())
            .bind(to.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Bump `updated_at` after page activity.
    pub async fn touch(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE brochure_projects SET updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

pub struct BrochurePageRepo;

impl BrochurePageRepo {
    /// Insert an empty page. A taken page number violates
    /// `uq_brochure_pages_number`.
    pub async fn create(
        pool: &PgPool,
        brochure_id: DbId,
        page_number: i32,
        content: &PageContent,
    ) -> Result<BrochurePage, sqlx::Error> {
        let query = format!(
            "INSERT INTO brochure_pages (brochure_id, page_number, content)
             VALUES ($1, $2, $3)
             RETURNING {PAGE_COLUMNS}"
        );
        sqlx::query_as::<_, BrochurePage>(&query)
            .bind(brochure_id)
            .bind(page_number)
            .bind(Json(content))
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<BrochurePage>, sqlx::Error> {
        let query = format!("SELECT {PAGE_COLUMNS} FROM brochure_pages WHERE id = $1");
        sqlx::query_as::<_, BrochurePage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_number(
        pool: &PgPool,
        brochure_id: DbId,
        page_number: i32,
    ) -> Result<Option<BrochurePage>, sqlx::Error> {
        let query = format!(
            "SELECT {PAGE_COLUMNS} FROM brochure_pages WHERE brochure_id = $1 AND page_number = $2"
        );
        sqlx::query_as::<_, BrochurePage>(&query)
            .bind(brochure_id)
            .bind(page_number)
            .fetch_optional(pool)
            .await
    }

    /// Pages of a brochure in page order.
    pub async fn list_by_brochure(
        pool: &PgPool,
        brochure_id: DbId,
    ) -> Result<Vec<BrochurePage>, sqlx::Error> {
        let query = format!(
            "SELECT {PAGE_COLUMNS} FROM brochure_pages WHERE brochure_id = $1 ORDER BY page_number"
        );
        sqlx::query_as::<_, BrochurePage>(&query)
            .bind(brochure_id)
            .fetch_all(pool)
            .await
    }

    /// Create or overwrite a page's content, bumping its version.
    ///
    /// The write only lands on an existing page when
    /// - `expected_version` is `None` or equals the stored version, and
    /// - the page is unlocked or `bypass_lock` is set.
    ///
    /// Returns `None` when either guard refused the write.
    pub async fn save_content(
        pool: &PgPool,
        brochure_id: DbId,
        page_number: i32,
        content: &PageContent,
        expected_version: Option<i32>,
        bypass_lock: bool,
    ) -> Result<Option<BrochurePage>, sqlx::Error> {
        let query = format!(
            "INSERT INTO brochure_pages (brochure_id, page_number, content)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_brochure_pages_number DO UPDATE
                SET content = EXCLUDED.content,
                    version = brochure_pages.version + 1
                WHERE ($4::INTEGER IS NULL OR brochure_pages.version = $4)
                  AND (NOT brochure_pages.is_locked OR $5)
             RETURNING {PAGE_COLUMNS}"
        );
        sqlx::query_as::<_, BrochurePage>(&query)
            .bind(brochure_id)
            .bind(page_number)
            .bind(Json(content))
            .bind(expected_version)
            .bind(bypass_lock)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite the lock columns. Approval status is left untouched.
    pub async fn set_lock(
        pool: &PgPool,
        id: DbId,
        lock: &PageLock,
    ) -> Result<Option<BrochurePage>, sqlx::Error> {
        let query = format!(
            "UPDATE brochure_pages SET
                is_locked = $2,
                locked_by = $3,
                locked_by_name = $4,
                locked_at = $5
             WHERE id = $1
             RETURNING {PAGE_COLUMNS}"
        );
        sqlx::query_as::<_, BrochurePage>(&query)
            .bind(id)
            .bind(lock.is_locked)
            .bind(lock.locked_by)
            .bind(&lock.locked_by_name)
            .bind(lock.locked_at)
            .fetch_optional(pool)
            .await
    }

    /// Move a page's approval status from `from` to `to` and append the audit
    /// comment, atomically.
    ///
    /// Returns `None` (and writes nothing) when the page is not in `from`.
    pub async fn transition_approval(
        pool: &PgPool,
        id: DbId,
        from: ApprovalStatus,
        to: ApprovalStatus,
        audit: &CreatePageComment,
    ) -> Result<Option<(BrochurePage, PageComment)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE brochure_pages SET approval_status = $3
             WHERE id = $1 AND approval_status = $2
             RETURNING {PAGE_COLUMNS}"
        );
        let page = sqlx::query_as::<_, BrochurePage>(&query)
            .bind(id)
            .bind(from.as_str())
            .bind(to.as_str())
            .fetch_optional(&mut *tx)
            .await?;

        let Some(page) = page else {
            tx.rollback().await?;
            return Ok(None);
        };

        let comment = PageCommentRepo::insert(&mut *tx, audit).await?;
        tx.commit().await?;
        Ok(Some((page, comment)))
    }
}

// ---------------------------------------------------------------------------
// Page comments
// ---------------------------------------------------------------------------

pub struct PageCommentRepo;

impl PageCommentRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreatePageComment,
    ) -> Result<PageComment, sqlx::Error> {
        Self::insert(pool, input).await
    }

    async fn insert<'e, E>(executor: E, input: &CreatePageComment) -> Result<PageComment, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO page_comments
                (page_id, text, added_by, author_name, author_role, action_type)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COMMENT_COLUMNS}"
        );
        sqlx::query_as::<_, PageComment>(&query)
            .bind(input.page_id)
            .bind(&input.text)
            .bind(input.added_by)
            .bind(&input.author_name)
            .bind(input.author_role.as_str())
            .bind(input.action_type.as_str())
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PageComment>, sqlx::Error> {
        let query = format!("SELECT {COMMENT_COLUMNS} FROM page_comments WHERE id = $1");
        sqlx::query_as::<_, PageComment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Comments on a page, oldest first.
    pub async fn list_by_page(
        pool: &PgPool,
        page_id: DbId,
    ) -> Result<Vec<PageComment>, sqlx::Error> {
        let query = format!(
            "SELECT {COMMENT_COLUMNS} FROM page_comments
             WHERE page_id = $1
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, PageComment>(&query)
            .bind(page_id)
            .fetch_all(pool)
            .await
    }

    /// Comments on every page of a brochure, oldest first.
    pub async fn list_by_brochure(
        pool: &PgPool,
        brochure_id: DbId,
    ) -> Result<Vec<PageComment>, sqlx::Error> {
        let query = format!(
            "SELECT {COMMENT_COLUMNS} FROM page_comments
             WHERE page_id IN (SELECT id FROM brochure_pages WHERE brochure_id = $1)
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, PageComment>(&query)
            .bind(brochure_id)
            .fetch_all(pool)
            .await
    }

    pub async fn mark_done(pool: &PgPool, id: DbId) -> Result<Option<PageComment>, sqlx::Error> {
        let query = format!(
            "UPDATE page_comments SET marked_done = true WHERE id = $1 RETURNING {COMMENT_COLUMNS}"
        );
        sqlx::query_as::<_, PageComment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
