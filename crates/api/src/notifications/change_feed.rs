//! Forwards [`ChangeEvent`]s from the bus to WebSocket subscribers.
//!
//! Frames carry only `{table, action, id, ...}`; clients reload the affected
//! collection through the regular endpoints. Delivery still follows the
//! visibility rules: a project-scoped event only reaches connections that
//! can see the project, a brochure-scoped one only those that can see the
//! brochure, and tables a role may not read at all (leads, download history,
//! profiles, page comments) are never announced to it.

use std::sync::Arc;

use axum::extract::ws::Message;
use tokio::sync::broadcast;
use xeetrack_core::roles::Role;
use xeetrack_core::status::BrochureStatus;
use xeetrack_core::types::{Actor, DbId};
use xeetrack_core::visibility::{can_view_brochure, can_view_project};
use xeetrack_db::models::project::Project;
use xeetrack_db::repositories::{BrochureRepo, ProjectRepo};
use xeetrack_db::DbPool;
use xeetrack_events::{ChangeEvent, ChangeTable};

use crate::ws::{WsConnection, WsManager};

pub struct ChangeFeed {
    pool: DbPool,
    ws_manager: Arc<WsManager>,
}

/// Which roles hear about changes to `table` at all.
fn audience(table: ChangeTable) -> fn(Role) -> bool {
    match table {
        ChangeTable::Leads => |r| r == Role::Manager,
        ChangeTable::DownloadHistory | ChangeTable::Profiles | ChangeTable::PageComments => {
            Role::is_staff
        }
        _ => |_| true,
    }
}

/// The row an event is scoped to, loaded once per event.
#[derive(Debug)]
enum Scope {
    Unscoped,
    Project(Project),
    Brochure { client_id: DbId, status: BrochureStatus },
    /// The scoping row is gone or could not be read; only managers hear it.
    Unresolved,
}

impl Scope {
    fn admits(&self, actor: &Actor) -> bool {
        match self {
            Scope::Unscoped => true,
            Scope::Project(project) => can_view_project(actor, project),
            Scope::Brochure { client_id, status } => can_view_brochure(actor, *client_id, *status),
            Scope::Unresolved => actor.role == Role::Manager,
        }
    }
}

fn deliverable(table: ChangeTable, scope: &Scope, actor: &Actor) -> bool {
    audience(table)(actor.role) && scope.admits(actor)
}

impl ChangeFeed {
    pub fn new(pool: DbPool, ws_manager: Arc<WsManager>) -> Self {
        Self { pool, ws_manager }
    }

    /// Run until the bus is dropped.
    pub async fn run(self, mut receiver: broadcast::Receiver<ChangeEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => self.forward(&event).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Change feed lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, change feed shutting down");
                    break;
                }
            }
        }
    }

    async fn scope_of(&self, event: &ChangeEvent) -> Scope {
        let loaded = if let Some(project_id) = event.project_id {
            ProjectRepo::find_by_id(&self.pool, project_id)
                .await
                .map(|p| p.map(Scope::Project))
        } else if let Some(brochure_id) = event.brochure_id {
            BrochureRepo::find_by_id(&self.pool, brochure_id)
                .await
                .map(|b| {
                    b.map(|b| Scope::Brochure {
                        client_id: b.client_id,
                        status: b.status,
                    })
                })
        } else {
            return Scope::Unscoped;
        };

        match loaded {
            Ok(Some(scope)) => scope,
            Ok(None) => Scope::Unresolved,
            Err(e) => {
                tracing::warn!(table = ?event.table, id = event.id, error = %e, "Change scope lookup failed");
                Scope::Unresolved
            }
        }
    }

    async fn forward(&self, event: &ChangeEvent) {
        let payload = match serde_json::to_string(event) {
            Ok(p) => p,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize change event");
                return;
            }
        };
        let scope = self.scope_of(event).await;
        let sent = self
            .ws_manager
            .send_where(
                |conn: &WsConnection| {
                    let actor = Actor::new(conn.user_id, String::new(), conn.role);
                    deliverable(event.table, &scope, &actor)
                },
                Message::Text(payload.into()),
            )
            .await;
        tracing::trace!(table = ?event.table, id = event.id, sent, "Change forwarded");
    }
}
