//! Profile (user account) model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use xeetrack_core::roles::Role;
use xeetrack_core::types::{Actor, DbId, Timestamp};

/// Full row from the `profiles` table.
///
/// Contains the password hash -- never serialize this to API responses.
/// Use [`ProfileResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct Profile {
    pub id: DbId,
    pub full_name: String,
    pub email: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Profile {
    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.full_name.clone(), self.role)
    }
}

/// Safe profile representation: the session blob `{id, name, email, role}`.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: Timestamp,
}

impl From<Profile> for ProfileResponse {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id,
            name: p.full_name,
            email: p.email,
            role: p.role,
            is_active: p.is_active,
            created_at: p.created_at,
        }
    }
}

/// DTO for creating a profile. The password is already hashed.
#[derive(Debug)]
pub struct CreateProfile {
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub password_hash: String,
}
