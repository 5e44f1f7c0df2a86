//! File metadata and download history models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use xeetrack_core::status::FileCategory;
use xeetrack_core::types::{DbId, Timestamp};

/// A row from the `files` table. The binary lives at `file_url`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectFile {
    pub id: DbId,
    pub project_id: DbId,
    pub stage_id: Option<DbId>,
    pub filename: String,
    pub file_url: String,
    pub uploaded_by: DbId,
    pub uploader_name: String,
    pub size_bytes: i64,
    pub file_type: String,
    #[sqlx(try_from = "String")]
    pub category: FileCategory,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub download_count: i32,
    pub last_downloaded_at: Option<Timestamp>,
    pub last_downloaded_by: Option<DbId>,
    pub is_archived: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateFile {
    pub project_id: DbId,
    pub stage_id: Option<DbId>,
    pub filename: String,
    pub file_url: String,
    pub uploaded_by: DbId,
    pub uploader_name: String,
    pub size_bytes: i64,
    pub file_type: String,
    pub category: FileCategory,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateFile {
    pub filename: Option<String>,
    pub description: Option<String>,
    pub category: Option<FileCategory>,
    pub tags: Option<Vec<String>>,
    pub stage_id: Option<DbId>,
}

/// Search filters. `None` fields do not constrain the result.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileSearch {
    /// Case-insensitive substring over filename, description and tags.
    pub q: Option<String>,
    pub category: Option<FileCategory>,
    pub file_type: Option<String>,
    pub project_id: Option<DbId>,
    #[serde(default)]
    pub include_archived: bool,
}

/// A download record joined with the file's project.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DownloadHistoryEntry {
    pub id: DbId,
    pub file_id: DbId,
    pub project_id: DbId,
    pub downloaded_by: DbId,
    pub downloader_name: String,
    pub file_name: String,
    pub file_size: i64,
    pub downloaded_at: Timestamp,
}
