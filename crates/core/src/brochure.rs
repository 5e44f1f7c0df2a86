//! Brochure pages: content shapes, locking, approval and status lifecycle.
//!
//! Page 1 holds project details, page 2 company information, every later page
//! is free-form content. Lock state and approval state are independent axes:
//! locking never touches approval and approving never touches the lock.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::progress::completion_percent;
use crate::roles::Role;
use crate::status::{ApprovalStatus, BrochureStatus};
use crate::types::{Actor, DbId, Timestamp};

// ---------------------------------------------------------------------------
// Page kinds and content
// ---------------------------------------------------------------------------

/// What a page number is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Details,
    CompanyInfo,
    /// Free-form page; the inner value is the 1-based content section index.
    Content(i32),
}

impl PageKind {
    pub fn from_page_number(page_number: i32) -> Result<Self, CoreError> {
        match page_number {
            1 => Ok(PageKind::Details),
            2 => Ok(PageKind::CompanyInfo),
            n if n >= 3 => Ok(PageKind::Content(n - 2)),
            n => Err(CoreError::Validation(format!(
                "Page number must be 1 or greater, got {n}"
            ))),
        }
    }

    /// Title shown in the editor navigation.
    pub fn title(self) -> String {
        match self {
            PageKind::Details => "Project Details".to_string(),
            PageKind::CompanyInfo => "Company Information".to_string(),
            PageKind::Content(n) => format!("Content Page {n}"),
        }
    }

    /// Longer title used as a section heading in the feedback report.
    pub fn report_title(self) -> String {
        match self {
            PageKind::Details => "Project Details & Company Overview".to_string(),
            PageKind::CompanyInfo => "Company Information & Contact Details".to_string(),
            PageKind::Content(n) => format!("Content Section {n}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailsContent {
    pub project_name: Option<String>,
    pub description: Option<String>,
    pub deadline: Option<String>,
    pub logo_url: Option<String>,
    pub tagline: Option<String>,
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInfoContent {
    pub about_us: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeformContent {
    pub heading: Option<String>,
    /// Rich-text (HTML) body.
    pub body_content: Option<String>,
    #[serde(default)]
    pub bullet_points: Vec<String>,
    /// Image URLs, in display order.
    #[serde(default)]
    pub images: Vec<String>,
    pub cta_text: Option<String>,
    pub cta_url: Option<String>,
}

/// Page content, tagged by page kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageContent {
    Details(DetailsContent),
    CompanyInfo(CompanyInfoContent),
    Freeform(FreeformContent),
}

impl PageContent {
    /// Empty content of the right shape for a page number.
    pub fn empty_for(kind: PageKind) -> Self {
        match kind {
            PageKind::Details => PageContent::Details(DetailsContent::default()),
            PageKind::CompanyInfo => PageContent::CompanyInfo(CompanyInfoContent::default()),
            PageKind::Content(_) => PageContent::Freeform(FreeformContent::default()),
        }
    }

    /// Reject content whose shape does not belong on the given page.
    pub fn ensure_matches(&self, kind: PageKind) -> Result<(), CoreError> {
        let ok = matches!(
            (self, kind),
            (PageContent::Details(_), PageKind::Details)
                | (PageContent::CompanyInfo(_), PageKind::CompanyInfo)
                | (PageContent::Freeform(_), PageKind::Content(_))
        );
        if ok {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "Content kind does not match page '{}'",
                kind.title()
            )))
        }
    }

    /// `(filled, total)` over the page's completion checklist.
    ///
    /// Page 1 checks project name, description and company name; page 2
    /// checks about-us and email; content pages check heading and body.
    pub fn checklist(&self) -> (u32, u32) {
        match self {
            PageContent::Details(c) => (
                filled(&[&c.project_name, &c.description, &c.company_name]),
                3,
            ),
            PageContent::CompanyInfo(c) => (filled(&[&c.about_us, &c.email]), 2),
            PageContent::Freeform(c) => (filled(&[&c.heading, &c.body_content]), 2),
        }
    }

    /// Completion percentage of this page alone.
    pub fn completion(&self) -> i32 {
        let (done, total) = self.checklist();
        completion_percent(done, total)
    }
}

fn filled(fields: &[&Option<String>]) -> u32 {
    fields
        .iter()
        .filter(|f| f.as_deref().is_some_and(|s| !s.is_empty()))
        .count() as u32
}

/// Completion of a whole brochure: filled checklist items over all pages.
pub fn brochure_completion<'a>(pages: impl IntoIterator<Item = &'a PageContent>) -> i32 {
    let (done, total) = pages
        .into_iter()
        .map(PageContent::checklist)
        .fold((0, 0), |(d, t), (pd, pt)| (d + pd, t + pt));
    completion_percent(done, total)
}

/// Page number for a newly appended page.
pub fn next_page_number(existing: &[i32]) -> i32 {
    existing.iter().copied().max().unwrap_or(0) + 1
}

// ---------------------------------------------------------------------------
// Locking
// ---------------------------------------------------------------------------

/// Lock fields of a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageLock {
    pub is_locked: bool,
    pub locked_by: Option<DbId>,
    pub locked_by_name: Option<String>,
    pub locked_at: Option<Timestamp>,
}

impl PageLock {
    pub fn unlocked() -> Self {
        Self::default()
    }

    /// Lock on behalf of `actor`. Re-locking re-stamps the holder.
    pub fn lock(actor: &Actor, now: Timestamp) -> Result<Self, CoreError> {
        ensure_staff(actor, "lock pages")?;
        Ok(Self {
            is_locked: true,
            locked_by: Some(actor.id),
            locked_by_name: Some(actor.name.clone()),
            locked_at: Some(now),
        })
    }

    /// Clear the lock. Unlocking an unlocked page is allowed and changes nothing.
    pub fn unlock(actor: &Actor) -> Result<Self, CoreError> {
        ensure_staff(actor, "unlock pages")?;
        Ok(Self::unlocked())
    }
}

/// Whether `actor` may write content to a page of a brochure owned by
/// `brochure_client_id`.
///
/// Managers and employees always may, regardless of the lock. A client may
/// only write to their own brochure's unlocked pages.
pub fn can_edit_page(actor: &Actor, brochure_client_id: DbId, lock: &PageLock) -> bool {
    match actor.role {
        Role::Manager | Role::Employee => true,
        Role::Client => actor.id == brochure_client_id && !lock.is_locked,
    }
}

pub fn ensure_can_edit_page(
    actor: &Actor,
    brochure_client_id: DbId,
    lock: &PageLock,
) -> Result<(), CoreError> {
    if can_edit_page(actor, brochure_client_id, lock) {
        Ok(())
    } else if lock.is_locked {
        Err(CoreError::forbidden(format!(
            "Page is locked by {}",
            lock.locked_by_name.as_deref().unwrap_or("staff")
        )))
    } else {
        Err(CoreError::forbidden("Not allowed to edit this brochure"))
    }
}

fn ensure_staff(actor: &Actor, what: &str) -> Result<(), CoreError> {
    if actor.is_staff() {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "Only managers and employees may {what}"
        )))
    }
}

// ---------------------------------------------------------------------------
// Approval
// ---------------------------------------------------------------------------

/// A reviewer's verdict on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalDecision {
    Approve,
    Reject,
}

/// Result of a valid approval-axis transition.
///
/// Callers persist `new_status` and append exactly one page comment with
/// `action_type = approval` carrying `audit_text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalTransition {
    pub new_status: ApprovalStatus,
    pub audit_text: String,
}

/// Approve or reject a pending page.
///
/// Only managers decide. Rejection needs a non-blank comment. Pages that are
/// already approved or rejected cannot be decided again.
pub fn decide_page(
    actor: &Actor,
    current: ApprovalStatus,
    decision: ApprovalDecision,
    comment: Option<&str>,
) -> Result<ApprovalTransition, CoreError> {
    if actor.role != Role::Manager {
        return Err(CoreError::forbidden("Only managers may approve or reject pages"));
    }
    if current != ApprovalStatus::Pending {
        return Err(CoreError::Conflict(format!(
            "Page is already {current}; only pending pages can be reviewed"
        )));
    }

    let comment = comment.map(str::trim).filter(|c| !c.is_empty());

    match decision {
        ApprovalDecision::Approve => {
            let audit_text = match comment {
                Some(c) => format!("Page has been approved by {}: {c}", actor.name),
                None => format!("Page has been approved by {}", actor.name),
            };
            Ok(ApprovalTransition {
                new_status: ApprovalStatus::Approved,
                audit_text,
            })
        }
        ApprovalDecision::Reject => {
            let comment = comment.ok_or_else(|| {
                CoreError::validation("A comment is required when requesting changes")
            })?;
            Ok(ApprovalTransition {
                new_status: ApprovalStatus::Rejected,
                audit_text: format!("Page requires changes - {}: {comment}", actor.name),
            })
        }
    }
}

/// Send a rejected page back to review.
///
/// Allowed for the owning client and for staff.
pub fn resubmit_page(
    actor: &Actor,
    brochure_client_id: DbId,
    current: ApprovalStatus,
) -> Result<ApprovalTransition, CoreError> {
    if !actor.is_staff() && actor.id != brochure_client_id {
        return Err(CoreError::forbidden("Not allowed to resubmit this page"));
    }
    if current != ApprovalStatus::Rejected {
        return Err(CoreError::Conflict(format!(
            "Page is {current}; only rejected pages can be resubmitted"
        )));
    }
    Ok(ApprovalTransition {
        new_status: ApprovalStatus::Pending,
        audit_text: format!("Page resubmitted for review by {}", actor.name),
    })
}

// ---------------------------------------------------------------------------
// Brochure lifecycle
// ---------------------------------------------------------------------------

/// Check a brochure status change.
///
/// ```text
/// draft --(owner client | manager)--> ready_for_design
/// ready_for_design --(staff)--> in_design
/// in_design --(manager)--> completed
/// ```
pub fn check_brochure_transition(
    actor: &Actor,
    brochure_client_id: DbId,
    from: BrochureStatus,
    to: BrochureStatus,
) -> Result<(), CoreError> {
    use BrochureStatus::*;

    let allowed = match (from, to) {
        (Draft, ReadyForDesign) => {
            actor.role == Role::Manager
                || (actor.role == Role::Client && actor.id == brochure_client_id)
        }
        (ReadyForDesign, InDesign) => actor.is_staff(),
        (InDesign, Completed) => actor.role == Role::Manager,
        _ => {
            return Err(CoreError::Conflict(format!(
                "Cannot move brochure from {from} to {to}"
            )))
        }
    };

    if allowed {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "Role {} may not move brochure from {from} to {to}",
            actor.role
        )))
    }
}
