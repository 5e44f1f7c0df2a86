//! User roles.
//!
//! Role is fixed when an account is created; there is no update path that
//! changes it. Almost every authorization decision branches on it.

use crate::define_text_enum;

define_text_enum! {
    /// The three account kinds.
    Role {
        Manager = "manager",
        Employee = "employee",
        Client = "client",
    }
}

impl Role {
    /// Manager or employee: the agency side of the workspace.
    pub fn is_staff(self) -> bool {
        matches!(self, Role::Manager | Role::Employee)
    }

    /// Roles a manager may create accounts for.
    pub fn is_creatable(self) -> bool {
        matches!(self, Role::Employee | Role::Client)
    }
}
