/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// The authenticated party performing an operation.
///
/// Every workflow rule in this crate takes an `Actor` instead of a full user
/// row so the rules stay independent of the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: DbId,
    pub name: String,
    pub role: crate::roles::Role,
}

impl Actor {
    pub fn new(id: DbId, name: impl Into<String>, role: crate::roles::Role) -> Self {
        Self {
            id,
            name: name.into(),
            role,
        }
    }

    /// Manager or employee.
    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }
}
