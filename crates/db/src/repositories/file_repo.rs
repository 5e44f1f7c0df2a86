//! Repositories for file metadata and download history.

use sqlx::PgPool;
use xeetrack_core::status::FileCategory;
use xeetrack_core::types::{Actor, DbId};

use crate::models::file::{CreateFile, DownloadHistoryEntry, FileSearch, ProjectFile, UpdateFile};

const COLUMNS: &str = "id, project_id, stage_id, filename, file_url, uploaded_by, uploader_name, \
                       size_bytes, file_type, category, description, tags, download_count, \
                       last_downloaded_at, last_downloaded_by, is_archived, created_at, updated_at";

const HISTORY_COLUMNS: &str = "h.id, h.file_id, f.project_id, h.downloaded_by, h.downloader_name, \
                               h.file_name, h.file_size, h.downloaded_at";

/// Escape `%`, `_` and `\` so user input matches literally inside `ILIKE`.
fn like_pattern(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len() + 2);
    escaped.push('%');
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

/// Provides CRUD and search over file metadata. Files are archived, never deleted.
pub struct FileRepo;

impl FileRepo {
    pub async fn create(pool: &PgPool, input: &CreateFile) -> Result<ProjectFile, sqlx::Error> {
        let query = format!(
            "INSERT INTO files
                (project_id, stage_id, filename, file_url, uploaded_by, uploader_name,
                 size_bytes, file_type, category, description, tags)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectFile>(&query)
            .bind(input.project_id)
            .bind(input.stage_id)
            .bind(&input.filename)
            .bind(&input.file_url)
            .bind(input.uploaded_by)
            .bind(&input.uploader_name)
            .bind(input.size_bytes)
            .bind(&input.file_type)
            .bind(input.category.as_str())
            .bind(&input.description)
            .bind(&input.tags)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ProjectFile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM files WHERE id = $1");
        sqlx::query_as::<_, ProjectFile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_many(pool: &PgPool, ids: &[DbId]) -> Result<Vec<ProjectFile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM files WHERE id = ANY($1) ORDER BY id");
        sqlx::query_as::<_, ProjectFile>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Filter files, newest first. Archived files are excluded unless asked for.
    pub async fn search(pool: &PgPool, filter: &FileSearch) -> Result<Vec<ProjectFile>, sqlx::Error> {
        let pattern = filter
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(like_pattern);
        let query = format!(
            "SELECT {COLUMNS} FROM files
             WHERE ($1::TEXT IS NULL
                    OR filename ILIKE $1
                    OR COALESCE(description, '') ILIKE $1
                    OR EXISTS (SELECT 1 FROM unnest(tags) AS t(tag) WHERE t.tag ILIKE $1))
               AND ($2::TEXT IS NULL OR category = $2)
               AND ($3::TEXT IS NULL OR lower(file_type) = lower($3))
               AND ($4::BIGINT IS NULL OR project_id = $4)
               AND ($5 OR NOT is_archived)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, ProjectFile>(&query)
            .bind(pattern)
            .bind(filter.category.map(FileCategory::as_str))
            .bind(&filter.file_type)
            .bind(filter.project_id)
            .bind(filter.include_archived)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateFile,
    ) -> Result<Option<ProjectFile>, sqlx::Error> {
        let query = format!(
            "UPDATE files SET
                filename = COALESCE($2, filename),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                tags = COALESCE($5, tags),
                stage_id = COALESCE($6, stage_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectFile>(&query)
            .bind(id)
            .bind(&input.filename)
            .bind(&input.description)
            .bind(input.category.map(FileCategory::as_str))
            .bind(&input.tags)
            .bind(input.stage_id)
            .fetch_optional(pool)
            .await
    }

    /// Set or clear the archived flag.
    pub async fn set_archived(
        pool: &PgPool,
        id: DbId,
        archived: bool,
    ) -> Result<Option<ProjectFile>, sqlx::Error> {
        let query =
            format!("UPDATE files SET is_archived = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, ProjectFile>(&query)
            .bind(id)
            .bind(archived)
            .fetch_optional(pool)
            .await
    }

    /// Count a download and record who took it, atomically.
    pub async fn record_download(
        pool: &PgPool,
        id: DbId,
        actor: &Actor,
    ) -> Result<Option<ProjectFile>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE files SET
                download_count = download_count + 1,
                last_downloaded_at = NOW(),
                last_downloaded_by = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let file = sqlx::query_as::<_, ProjectFile>(&query)
            .bind(id)
            .bind(actor.id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(file) = file else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query(
            "INSERT INTO download_history
                (file_id, downloaded_by, downloader_name, file_name, file_size)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(file.id)
        .bind(actor.id)
        .bind(&actor.name)
        .bind(&file.filename)
        .bind(file.size_bytes)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(file))
    }
}

pub struct DownloadHistoryRepo;

impl DownloadHistoryRepo {
    /// Every download, newest first. Visibility is applied by the caller.
    pub async fn list(pool: &PgPool) -> Result<Vec<DownloadHistoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {HISTORY_COLUMNS}
             FROM download_history h JOIN files f ON f.id = h.file_id
             ORDER BY h.downloaded_at DESC, h.id DESC"
        );
        sqlx::query_as::<_, DownloadHistoryEntry>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_file(
        pool: &PgPool,
        file_id: DbId,
    ) -> Result<Vec<DownloadHistoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {HISTORY_COLUMNS}
             FROM download_history h JOIN files f ON f.id = h.file_id
             WHERE h.file_id = $1
             ORDER BY h.downloaded_at DESC, h.id DESC"
        );
        sqlx::query_as::<_, DownloadHistoryEntry>(&query)
            .bind(file_id)
            .fetch_all(pool)
            .await
    }
}
