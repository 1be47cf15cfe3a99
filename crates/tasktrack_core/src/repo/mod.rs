//! Repository layer contracts and persistence implementations.
//!
//! # Responsibility
//! - Define per-aggregate CRUD contracts (`TaskRepository`, `ReminderRepository`).
//! - Provide substitutable SQLite, in-memory and mock implementations.
//!
//! # Invariants
//! - Lookup, delete and update misses surface as `RepoError::NotFound`.
//! - Duplicate task titles surface as `RepoError::AlreadyExists` in every variant.
//! - Any other lower-level failure is wrapped unchanged in `RepoError::Db`.
//! - Repositories perform no partial-field merging.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod codec;
pub mod memory;
pub mod mock;
pub mod reminder_repo;
pub mod task_repo;

pub(crate) const TASK_ENTITY: &str = "task";
pub(crate) const REMINDER_ENTITY: &str = "reminder";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by all aggregates.
#[derive(Debug)]
pub enum RepoError {
    NotFound { entity: &'static str, key: String },
    AlreadyExists { entity: &'static str, key: String },
    Db(DbError),
}

impl RepoError {
    pub fn not_found(entity: &'static str, key: impl Display) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn already_exists(entity: &'static str, key: impl Display) -> Self {
        Self::AlreadyExists {
            entity,
            key: key.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity, key } => write!(f, "{entity} not found: {key}"),
            Self::AlreadyExists { entity, key } => write!(f, "{entity} already exists: {key}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}
