//! Debounced brochure page autosave.
//!
//! The editor sends a draft on every keystroke pause. Drafts are keyed by
//! `(brochure_id, page_number)`; each submit takes a fresh generation and
//! schedules a write after the debounce window. A scheduled write only runs
//! if its generation is still the latest, so a burst of drafts produces one
//! write carrying the last one.
//!
//! An explicit save discards the page's waiting draft. A draft also
//! carries the page version it was queued against, so one that is already
//! being written when a save lands is refused instead of overwriting it.
//! Drafts still waiting when the process stops are dropped.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use xeetrack_core::brochure::PageContent;
use xeetrack_core::types::{Actor, DbId};
use xeetrack_db::repositories::{BrochurePageRepo, BrochureRepo};
use xeetrack_db::DbPool;
use xeetrack_events::{ChangeEvent, ChangeTable, EventBus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DraftKey {
    pub brochure_id: DbId,
    pub page_number: i32,
}

/// Content waiting to be written, with the author whose permissions were
/// checked when it was submitted.
#[derive(Debug, Clone)]
pub struct Draft {
    pub actor: Actor,
    pub content: PageContent,
    /// Version of the page when the draft was queued; `None` if the page
    /// did not exist yet.
    pub base_version: Option<i32>,
}

#[derive(Debug, thiserror::Error)]
pub enum DraftWriteError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("page {page_number} of brochure {brochure_id} was locked or changed since the draft was queued")]
    Refused { brochure_id: DbId, page_number: i32 },
}

/// Where flushed drafts go.
#[async_trait]
pub trait DraftSink: Send + Sync + 'static {
    async fn write(&self, key: DraftKey, draft: Draft) -> Result<(), DraftWriteError>;
}

struct Slot {
    generation: u64,
    draft: Draft,
}

pub struct Autosaver {
    sink: Arc<dyn DraftSink>,
    debounce: Duration,
    pending: Arc<Mutex<HashMap<DraftKey, Slot>>>,
    // Shared across keys so a slot recreated after a discard never reuses
    // a generation an older timer is still waiting on.
    next_generation: AtomicU64,
}

impl Autosaver {
    pub fn new(sink: Arc<dyn DraftSink>, debounce: Duration) -> Self {
        Self {
            sink,
            debounce,
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_generation: AtomicU64::new(1),
        }
    }

    /// Queue a draft, replacing any earlier draft for the same page.
    pub async fn submit(&self, key: DraftKey, draft: Draft) {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        self.pending
            .lock()
            .await
            .insert(key, Slot { generation, draft });

        let pending = Arc::clone(&self.pending);
        let sink = Arc::clone(&self.sink);
        let debounce = self.debounce;
        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;

            let draft = {
                let mut pending = pending.lock().await;
                match pending.get(&key) {
                    Some(slot) if slot.generation == generation => {
                        pending.remove(&key).map(|s| s.draft)
                    }
                    // Superseded by a newer draft, or discarded by a save.
                    _ => None,
                }
            };

            if let Some(draft) = draft {
                let actor_id = draft.actor.id;
                match sink.write(key, draft).await {
                    Ok(()) => tracing::debug!(
                        brochure_id = key.brochure_id,
                        page_number = key.page_number,
                        actor_id,
                        "Autosave flushed"
                    ),
                    Err(e) => tracing::warn!(
                        brochure_id = key.brochure_id,
                        page_number = key.page_number,
                        actor_id,
                        error = %e,
                        "Autosave write failed"
                    ),
                }
            }
        });
    }

    /// Drop the waiting draft for a page, if any. Its scheduled write then
    /// finds no slot and does nothing.
    pub async fn discard(&self, key: &DraftKey) -> bool {
        self.pending.lock().await.remove(key).is_some()
    }

    /// Number of pages with a draft waiting for its window to close.
    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }
}

/// Writes drafts to `brochure_pages` and announces them on the bus.
///
/// Staff drafts bypass page locks; a client draft that arrives after a lock
/// was taken is refused by the save guard, as is any draft whose page moved
/// past its base version.
pub struct PgDraftSink {
    pool: DbPool,
    event_bus: Arc<EventBus>,
}

impl PgDraftSink {
    pub fn new(pool: DbPool, event_bus: Arc<EventBus>) -> Self {
        Self { pool, event_bus }
    }
}

#[async_trait]
impl DraftSink for PgDraftSink {
    async fn write(&self, key: DraftKey, draft: Draft) -> Result<(), DraftWriteError> {
        // Pages start at version 1, so a base of 0 only lets the insert through.
        let expected_version = draft.base_version.unwrap_or(0);
        let saved = BrochurePageRepo::save_content(
            &self.pool,
            key.brochure_id,
            key.page_number,
            &draft.content,
            Some(expected_version),
            draft.actor.is_staff(),
        )
        .await?;

        let Some(page) = saved else {
            return Err(DraftWriteError::Refused {
                brochure_id: key.brochure_id,
                page_number: key.page_number,
            });
        };

        BrochureRepo::touch(&self.pool, key.brochure_id).await?;
        let event = match draft.base_version {
            Some(_) => ChangeEvent::updated(ChangeTable::BrochurePages, page.id),
            None => ChangeEvent::inserted(ChangeTable::BrochurePages, page.id),
        };
        self.event_bus
            .publish(event.in_brochure(key.brochure_id).by(draft.actor.id));
        Ok(())
    }
}
