//! Text-backed status enums.
//!
//! Each enum maps to a `TEXT` column guarded by a `CHECK` constraint in the
//! migrations. The string forms below must match those constraints.

use crate::error::CoreError;

/// Define an enum whose variants round-trip through fixed lowercase strings.
///
/// Generates `as_str`, `ALL`, `Display`, `FromStr`, `TryFrom<String>` (used by
/// `sqlx` via `#[sqlx(try_from = "String")]`) and serde impls that use the
/// same strings.
#[macro_export]
macro_rules! define_text_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            /// The database / wire representation.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok($name::$variant), )+
                    other => Err($crate::error::CoreError::Validation(format!(
                        "Invalid {} '{}'. Must be one of: {}",
                        stringify!($name),
                        other,
                        [$( $text ),+].join(", ")
                    ))),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::error::CoreError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

define_text_enum! {
    /// Lifecycle of a client project.
    ProjectStatus {
        Active = "active",
        Completed = "completed",
        OnHold = "on_hold",
    }
}

define_text_enum! {
    /// Priority shared by projects and tasks.
    Priority {
        Low = "low",
        Medium = "medium",
        High = "high",
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

define_text_enum! {
    /// Review state of a stage or a brochure page.
    ApprovalStatus {
        Pending = "pending",
        Approved = "approved",
        Rejected = "rejected",
    }
}

define_text_enum! {
    /// Progress of a task or a comment-task.
    WorkStatus {
        Open = "open",
        InProgress = "in-progress",
        Done = "done",
    }
}

define_text_enum! {
    /// Lifecycle of a brochure project.
    BrochureStatus {
        Draft = "draft",
        ReadyForDesign = "ready_for_design",
        InDesign = "in_design",
        Completed = "completed",
    }
}

define_text_enum! {
    /// What a page comment records.
    PageActionType {
        Comment = "comment",
        Lock = "lock",
        Unlock = "unlock",
        Approval = "approval",
    }
}

define_text_enum! {
    /// Document-center grouping for uploaded files.
    FileCategory {
        Reference = "reference",
        Content = "content",
        Assets = "assets",
        Requirements = "requirements",
        Other = "other",
    }
}

impl Default for FileCategory {
    fn default() -> Self {
        FileCategory::Other
    }
}

impl BrochureStatus {
    /// Statuses that put a brochure in the staff review queue.
    pub fn is_in_review(self) -> bool {
        matches!(self, BrochureStatus::ReadyForDesign | BrochureStatus::InDesign)
    }
}

/// Validate a 0–100 percentage.
pub fn validate_percentage(value: i32) -> Result<(), CoreError> {
    if (0..=100).contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Percentage must be between 0 and 100, got {value}"
        )))
    }
}
