//! Task-store section of the host configuration.
//!
//! # Responsibility
//! - Describe which datastore backs the task repositories.
//! - Open a ready `Handler` for that datastore.
//!
//! Reading the configuration file stays with the host; this module only
//! interprets the already-loaded section.

use crate::db::{open_db, open_db_in_memory, DbError, Handler, HandlerKind};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// `DbURL` value that selects a private in-memory database.
pub const IN_MEMORY_DB_URL: &str = ":memory:";

/// Datastore settings, keyed as in the host's JSON config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    #[serde(rename = "DbURL")]
    pub db_url: String,
    #[serde(rename = "DbUser")]
    pub db_user: String,
    #[serde(rename = "DbPassword", skip_serializing)]
    pub db_password: String,
    #[serde(rename = "DbType")]
    pub db_type: String,
}

impl TaskConfig {
    pub fn new(db_url: impl Into<String>, db_type: impl Into<String>) -> Self {
        Self {
            db_url: db_url.into(),
            db_type: db_type.into(),
            ..Self::default()
        }
    }

    /// Parses the task-store section from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(ConfigError::Parse)
    }

    /// True when either the URL or the backend type is missing.
    pub fn is_empty(&self) -> bool {
        self.db_url.trim().is_empty() || self.db_type.trim().is_empty()
    }

    /// Backend family named by `DbType`.
    pub fn backend(&self) -> Result<HandlerKind, ConfigError> {
        if self.db_type.trim().is_empty() {
            return Err(ConfigError::MissingField("DbType"));
        }
        self.db_type.parse().map_err(|err| match err {
            DbError::UnsupportedBackend(name) => ConfigError::UnsupportedBackend(name),
            other => ConfigError::Db(other),
        })
    }

    /// Opens and bootstraps the configured datastore.
    ///
    /// SQLite ignores `DbUser`/`DbPassword`.
    pub fn open_handler(&self) -> Result<Arc<dyn Handler>, ConfigError> {
        let url = self.db_url.trim();
        if url.is_empty() {
            return Err(ConfigError::MissingField("DbURL"));
        }
        match self.backend()? {
            HandlerKind::Sqlite => {
                let handler = if url == IN_MEMORY_DB_URL {
                    open_db_in_memory()
                } else {
                    open_db(url)
                }
                .map_err(ConfigError::Db)?;
                Ok(Arc::new(handler))
            }
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    MissingField(&'static str),
    UnsupportedBackend(String),
    Db(DbError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid task config: {err}"),
            Self::MissingField(field) => write!(f, "task config is missing `{field}`"),
            Self::UnsupportedBackend(name) => write!(f, "unsupported DbType `{name}`"),
            Self::Db(err) => write!(f, "cannot open task store: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}
