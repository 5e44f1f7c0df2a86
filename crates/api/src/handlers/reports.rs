//! Downloadable brochure feedback report.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use chrono::Utc;
use xeetrack_core::report::{report_filename, FeedbackReport, ReportComment, ReportPage};
use xeetrack_core::types::DbId;
use xeetrack_db::repositories::{BrochurePageRepo, PageCommentRepo};

use crate::error::AppResult;
use crate::handlers::brochures::find_visible_brochure;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Display name used when the brochure's client has no profile name.
const FALLBACK_CLIENT_NAME: &str = "Client";

/// GET /api/v1/brochures/{id}/report
///
/// Plain text served as an attachment.
pub async fn download(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(brochure_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let brochure = find_visible_brochure(&state.pool, &auth.actor(), brochure_id).await?;
    let pages = BrochurePageRepo::list_by_brochure(&state.pool, brochure_id).await?;

    let mut comments_by_page: HashMap<DbId, Vec<ReportComment>> = HashMap::new();
    for c in PageCommentRepo::list_by_brochure(&state.pool, brochure_id).await? {
        comments_by_page.entry(c.page_id).or_default().push(ReportComment {
            text: c.text,
            author_name: c.author_name,
            author_role: c.author_role,
            marked_done: c.marked_done,
            created_at: c.created_at,
        });
    }

    let report_pages = pages
        .into_iter()
        .map(|p| ReportPage {
            page_number: p.page_number,
            approval_status: p.approval_status,
            updated_at: p.updated_at,
            comments: comments_by_page.remove(&p.id).unwrap_or_default(),
        })
        .collect();

    let client_name = brochure
        .client_name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(FALLBACK_CLIENT_NAME);
    let report = FeedbackReport::build(
        client_name,
        brochure.status,
        brochure.created_at,
        brochure.updated_at,
        report_pages,
    );

    let now = Utc::now();
    let body = report.render_text(now);
    let disposition = format!("attachment; filename=\"{}\"", report_filename(now));

    tracing::info!(
        brochure_id,
        actor_id = auth.user_id,
        sections = report.sections.len(),
        "Feedback report generated"
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}
