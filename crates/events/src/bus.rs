//! In-process change bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`ChangeEvent`]s. It is
//! shared via `Arc<EventBus>` across the application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use xeetrack_core::types::DbId;

// ---------------------------------------------------------------------------
// ChangeEvent
// ---------------------------------------------------------------------------

/// The collection a change touched. Serialized with the table name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeTable {
    Profiles,
    Projects,
    Stages,
    CommentTasks,
    GlobalComments,
    Tasks,
    BrochureProjects,
    BrochurePages,
    PageComments,
    Files,
    DownloadHistory,
    Leads,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAction {
    Insert,
    Update,
    Delete,
}

/// One row-level change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: ChangeTable,
    pub action: ChangeAction,
    /// Primary key of the changed row.
    pub id: DbId,
    /// Owning project, for project-scoped rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<DbId>,
    /// Owning brochure, for brochure-scoped rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brochure_id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<DbId>,
    pub timestamp: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn new(table: ChangeTable, action: ChangeAction, id: DbId) -> Self {
        Self {
            table,
            action,
            id,
            project_id: None,
            brochure_id: None,
            actor_id: None,
            timestamp: Utc::now(),
        }
    }

    pub fn inserted(table: ChangeTable, id: DbId) -> Self {
        Self::new(table, ChangeAction::Insert, id)
    }

    pub fn updated(table: ChangeTable, id: DbId) -> Self {
        Self::new(table, ChangeAction::Update, id)
    }

    pub fn deleted(table: ChangeTable, id: DbId) -> Self {
        Self::new(table, ChangeAction::Delete, id)
    }

    pub fn in_project(mut self, project_id: DbId) -> Self {
        self.project_id = Some(project_id);
        self
    }

    pub fn in_brochure(mut self, brochure_id: DbId) -> Self {
        self.brochure_id = Some(brochure_id);
        self
    }

    pub fn by(mut self, actor_id: DbId) -> Self {
        self.actor_id = Some(actor_id);
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out bus.
///
/// # Usage
///
/// ```rust
/// use xeetrack_events::bus::{ChangeEvent, ChangeTable, EventBus};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(ChangeEvent::inserted(ChangeTable::Projects, 1));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<ChangeEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a change to all current subscribers.
    ///
    /// With no subscribers the event is dropped.
    pub fn publish(&self, event: ChangeEvent) {
        // SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
