//! Repository for the `profiles` table.

use sqlx::PgPool;
use xeetrack_core::roles::Role;
use xeetrack_core::types::DbId;

use crate::models::user::{CreateProfile, Profile};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, full_name, email, role, password_hash, is_active, created_at, updated_at";

/// Provides CRUD operations for profiles.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new profile, returning the created row.
    ///
    /// A duplicate email violates `uq_profiles_email`.
    pub async fn create(pool: &PgPool, input: &CreateProfile) -> Result<Profile, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles (full_name, email, role, password_hash)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(&input.full_name)
            .bind(&input.email)
            .bind(input.role.as_str())
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a profile by email, ignoring case.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE lower(email) = lower($1)");
        sqlx::query_as::<_, Profile>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List profiles ordered by name, optionally restricted to one role.
    pub async fn list(pool: &PgPool, role: Option<Role>) -> Result<Vec<Profile>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM profiles
             WHERE ($1::TEXT IS NULL OR role = $1)
             ORDER BY full_name, id"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(role.map(Role::as_str))
            .fetch_all(pool)
            .await
    }

    /// Whether any active profile holds `role`.
    pub async fn any_with_role(pool: &PgPool, role: Role) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM profiles WHERE role = $1 AND is_active = true)",
        )
        .bind(role.as_str())
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Soft-deactivate a profile. Returns `true` if the row was updated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE profiles SET is_active = false WHERE id = $1 AND is_active = true")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
