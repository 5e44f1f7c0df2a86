//! Handlers for the document center: file metadata, downloads and history.
//!
//! Binaries are stored elsewhere; rows here carry the URL and metadata.
//! Files inherit their project's visibility. Download history is hidden from
//! clients.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;
use xeetrack_core::error::CoreError;
use xeetrack_core::files::{clean_tags, file_type_from_name, format_file_size, parse_tags};
use xeetrack_core::roles::Role;
use xeetrack_core::status::FileCategory;
use xeetrack_core::types::{Actor, DbId};
use xeetrack_core::visibility::{can_view_download_history, VisibleProjects};
use xeetrack_db::models::file::{
    CreateFile, DownloadHistoryEntry, FileSearch, ProjectFile, UpdateFile,
};
use xeetrack_db::models::project::Project;
use xeetrack_db::repositories::{DownloadHistoryRepo, FileRepo, ProjectRepo, StageRepo};
use xeetrack_db::DbPool;
use xeetrack_events::{ChangeEvent, ChangeTable};

use crate::error::{AppError, AppResult};
use crate::handlers::projects::find_visible_project;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireManager, RequireStaff};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Tags as a list, or as the comma-separated text the upload form sends.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagsInput {
    List(Vec<String>),
    Text(String),
}

impl TagsInput {
    fn into_tags(self) -> Vec<String> {
        match self {
            TagsInput::List(tags) => clean_tags(&tags),
            TagsInput::Text(raw) => clean_tags(&parse_tags(&raw)),
        }
    }
}

/// Request body for `POST /projects/{id}/files`.
#[derive(Debug, Deserialize, Validate)]
pub struct UploadFileRequest {
    #[validate(length(min = 1, max = 255, message = "Filename is required"))]
    pub filename: String,
    #[validate(length(min = 1, message = "File URL is required"))]
    pub file_url: String,
    #[validate(range(min = 0, message = "File size cannot be negative"))]
    pub size_bytes: i64,
    pub stage_id: Option<DbId>,
    #[serde(default)]
    pub category: FileCategory,
    pub description: Option<String>,
    pub tags: Option<TagsInput>,
}

/// Request body for `PUT /files/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateFileRequest {
    pub filename: Option<String>,
    pub description: Option<String>,
    pub category: Option<FileCategory>,
    pub tags: Option<TagsInput>,
    pub stage_id: Option<DbId>,
}

/// Request body for `POST /files/download`.
#[derive(Debug, Deserialize)]
pub struct BulkDownloadRequest {
    pub file_ids: Vec<DbId>,
}

/// A file row with its size formatted for display.
#[derive(Debug, Serialize)]
pub struct FileResponse {
    #[serde(flatten)]
    pub file: ProjectFile,
    pub size_display: String,
}

impl From<ProjectFile> for FileResponse {
    fn from(file: ProjectFile) -> Self {
        let size_display = format_file_size(file.size_bytes);
        Self { file, size_display }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_visible_file(
    state: &AppState,
    actor: &Actor,
    id: DbId,
) -> AppResult<(ProjectFile, Project)> {
    let file = FileRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("File", id))?;
    let project = find_visible_project(&state.pool, actor, file.project_id).await?;
    Ok((file, project))
}

async fn ensure_stage_in_project(pool: &DbPool, stage_id: DbId, project_id: DbId) -> AppResult<()> {
    let stage = StageRepo::find_by_id(pool, stage_id)
        .await?
        .ok_or_else(|| AppError::not_found("Stage", stage_id))?;
    if stage.project_id != project_id {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Stage {stage_id} does not belong to project {project_id}"
        ))));
    }
    Ok(())
}

async fn visible_projects(state: &AppState, actor: &Actor) -> AppResult<VisibleProjects> {
    let projects = ProjectRepo::list(&state.pool).await?;
    Ok(VisibleProjects::compute(actor, &projects))
}

async fn record_download(state: &AppState, actor: &Actor, file: &ProjectFile) -> AppResult<ProjectFile> {
    let updated = FileRepo::record_download(&state.pool, file.id, actor)
        .await?
        .ok_or_else(|| AppError::not_found("File", file.id))?;

    tracing::info!(
        file_id = file.id,
        actor_id = actor.id,
        download_count = updated.download_count,
        "File downloaded"
    );
    state.publish(
        ChangeEvent::updated(ChangeTable::Files, file.id)
            .in_project(file.project_id)
            .by(actor.id),
    );
    state.publish(
        ChangeEvent::inserted(ChangeTable::DownloadHistory, file.id)
            .in_project(file.project_id)
            .by(actor.id),
    );
    Ok(updated)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/projects/{id}/files
///
/// Registers an uploaded file. The type is taken from the filename extension.
pub async fn upload(
    State(state): State<AppState>,
    RequireStaff(auth): RequireStaff,
    Path(project_id): Path<DbId>,
    Json(input): Json<UploadFileRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<FileResponse>>)> {
    input.validate()?;
    let actor = auth.actor();
    find_visible_project(&state.pool, &actor, project_id).await?;
    if let Some(stage_id) = input.stage_id {
        ensure_stage_in_project(&state.pool, stage_id, project_id).await?;
    }

    let filename = input.filename.trim().to_string();
    let file = FileRepo::create(
        &state.pool,
        &CreateFile {
            project_id,
            stage_id: input.stage_id,
            file_type: file_type_from_name(&filename),
            filename,
            file_url: input.file_url,
            uploaded_by: actor.id,
            uploader_name: actor.name.clone(),
            size_bytes: input.size_bytes,
            category: input.category,
            description: input.description,
            tags: input.tags.map(TagsInput::into_tags).unwrap_or_default(),
        },
    )
    .await?;

    tracing::info!(file_id = file.id, project_id, size_bytes = file.size_bytes, "File registered");
    state.publish(
        ChangeEvent::inserted(ChangeTable::Files, file.id)
            .in_project(project_id)
            .by(actor.id),
    );
    Ok((StatusCode::CREATED, Json(DataResponse::new(file.into()))))
}

/// GET /api/v1/files?q=&category=&file_type=&project_id=&include_archived=
pub async fn search(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(filter): Query<FileSearch>,
) -> AppResult<Json<DataResponse<Vec<FileResponse>>>> {
    let actor = auth.actor();
    let visible = visible_projects(&state, &actor).await?;
    let files = visible
        .retain(FileRepo::search(&state.pool, &filter).await?, |f| f.project_id)
        .into_iter()
        .map(FileResponse::from)
        .collect();
    Ok(Json(DataResponse::new(files)))
}

/// GET /api/v1/projects/{id}/files
pub async fn list_by_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
    Query(mut filter): Query<FileSearch>,
) -> AppResult<Json<DataResponse<Vec<FileResponse>>>> {
    find_visible_project(&state.pool, &auth.actor(), project_id).await?;
    filter.project_id = Some(project_id);
    let files = FileRepo::search(&state.pool, &filter)
        .await?
        .into_iter()
        .map(FileResponse::from)
        .collect();
    Ok(Json(DataResponse::new(files)))
}

/// GET /api/v1/files/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<FileResponse>>> {
    let (file, _) = find_visible_file(&state, &auth.actor(), id).await?;
    Ok(Json(DataResponse::new(file.into())))
}

/// PUT /api/v1/files/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireManager(auth): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateFileRequest>,
) -> AppResult<Json<DataResponse<FileResponse>>> {
    let actor = auth.actor();
    let (file, _) = find_visible_file(&state, &actor, id).await?;

    let filename = match input.filename.as_deref().map(str::trim) {
        Some("") => return Err(AppError::Core(CoreError::validation("Filename is required"))),
        other => other.map(str::to_string),
    };
    if let Some(stage_id) = input.stage_id {
        ensure_stage_in_project(&state.pool, stage_id, file.project_id).await?;
    }

    let update = UpdateFile {
        filename,
        description: input.description,
        category: input.category,
        tags: input.tags.map(TagsInput::into_tags),
        stage_id: input.stage_id,
    };
    let file = FileRepo::update(&state.pool, id, &update)
        .await?
        .ok_or_else(|| AppError::not_found("File", id))?;

    state.publish(
        ChangeEvent::updated(ChangeTable::Files, id)
            .in_project(file.project_id)
            .by(actor.id),
    );
    Ok(Json(DataResponse::new(file.into())))
}

/// POST /api/v1/files/{id}/archive
pub async fn archive(
    State(state): State<AppState>,
    RequireManager(auth): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<FileResponse>>> {
    set_archived(&state, &auth, id, true).await
}

/// POST /api/v1/files/{id}/restore
pub async fn restore(
    State(state): State<AppState>,
    RequireManager(auth): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<FileResponse>>> {
    set_archived(&state, &auth, id, false).await
}

async fn set_archived(
    state: &AppState,
    auth: &AuthUser,
    id: DbId,
    archived: bool,
) -> AppResult<Json<DataResponse<FileResponse>>> {
    let file = FileRepo::set_archived(&state.pool, id, archived)
        .await?
        .ok_or_else(|| AppError::not_found("File", id))?;

    tracing::info!(file_id = id, archived, actor_id = auth.user_id, "File archive flag changed");
    state.publish(
        ChangeEvent::updated(ChangeTable::Files, id)
            .in_project(file.project_id)
            .by(auth.user_id),
    );
    Ok(Json(DataResponse::new(file.into())))
}

/// POST /api/v1/files/{id}/download
///
/// Counts the download, records it in the history and returns the file with
/// its URL.
pub async fn download(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<FileResponse>>> {
    let actor = auth.actor();
    let (file, _) = find_visible_file(&state, &actor, id).await?;
    let file = record_download(&state, &actor, &file).await?;
    Ok(Json(DataResponse::new(file.into())))
}

/// POST /api/v1/files/download
///
/// All-or-nothing visibility check, then one history entry per file.
pub async fn bulk_download(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<BulkDownloadRequest>,
) -> AppResult<Json<DataResponse<Vec<FileResponse>>>> {
    let actor = auth.actor();
    let mut ids = input.file_ids;
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Err(AppError::Core(CoreError::validation("Select at least one file")));
    }

    let files = FileRepo::find_many(&state.pool, &ids).await?;
    if let Some(missing) = ids.iter().find(|id| !files.iter().any(|f| f.id == **id)) {
        return Err(AppError::not_found("File", *missing));
    }

    let visible = visible_projects(&state, &actor).await?;
    if files.iter().any(|f| !visible.contains(f.project_id)) {
        return Err(AppError::Core(CoreError::forbidden(
            "You do not have access to every selected file",
        )));
    }

    let mut downloaded = Vec::with_capacity(files.len());
    for file in &files {
        downloaded.push(record_download(&state, &actor, file).await?.into());
    }
    Ok(Json(DataResponse::new(downloaded)))
}

/// GET /api/v1/download-history
///
/// Managers see every download; employees see downloads on their projects.
pub async fn history(
    State(state): State<AppState>,
    RequireStaff(auth): RequireStaff,
) -> AppResult<Json<DataResponse<Vec<DownloadHistoryEntry>>>> {
    let actor = auth.actor();
    let entries = DownloadHistoryRepo::list(&state.pool).await?;
    let entries = if actor.role == Role::Manager {
        entries
    } else {
        visible_projects(&state, &actor)
            .await?
            .retain(entries, |e| e.project_id)
    };
    Ok(Json(DataResponse::new(entries)))
}

/// GET /api/v1/files/{id}/history
pub async fn history_by_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<DownloadHistoryEntry>>>> {
    let actor = auth.actor();
    let (_, project) = find_visible_file(&state, &actor, id).await?;
    if !can_view_download_history(&actor, &project) {
        return Err(AppError::Core(CoreError::forbidden(
            "Download history is not available to clients",
        )));
    }
    let entries = DownloadHistoryRepo::list_by_file(&state.pool, id).await?;
    Ok(Json(DataResponse::new(entries)))
}
