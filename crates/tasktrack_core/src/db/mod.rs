//! Backend-neutral datastore contract and the SQLite binding.
//!
//! # Responsibility
//! - Define the minimal `Handler` surface repositories are written against.
//! - Provide materialized `Row`/`Rows` cursors with typed extraction.
//! - Open and bootstrap SQLite handlers with the task schema applied.
//!
//! # Invariants
//! - Handler failures are returned as `DbError`, never panics.
//! - The contract performs no validation and no retries.
//! - The schema bootstrap is idempotent; there is no versioning.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

mod open;
mod sqlite;

pub use open::{open_db, open_db_in_memory};
pub use sqlite::SqliteHandler;

pub type DbResult<T> = Result<T, DbError>;

/// Backend family served by a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    Sqlite,
}

impl HandlerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
        }
    }
}

impl Display for HandlerKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HandlerKind {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            other => Err(DbError::UnsupportedBackend(other.to_string())),
        }
    }
}

/// Constraint family reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    ForeignKey,
    Other,
}

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    Constraint {
        kind: ConstraintKind,
        message: String,
    },
    UnsupportedBackend(String),
    ColumnNotFound(String),
    Decode {
        column: String,
        message: String,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Constraint { kind, message } => {
                write!(f, "{kind:?} constraint violated: {message}")
            }
            Self::UnsupportedBackend(name) => write!(f, "no handler for backend type `{name}`"),
            Self::ColumnNotFound(column) => write!(f, "column `{column}` not found in row"),
            Self::Decode { column, message } => {
                write!(f, "cannot decode column `{column}`: {message}")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

/// Backend-neutral bind argument and column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Text(_) => "text",
            Self::Blob(_) => "blob",
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Conversion from one column value; the error is a human-readable reason.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, String>;
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Integer(v) => Ok(*v),
            other => Err(format!("expected integer, found {}", other.type_name())),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, String> {
        match i64::from_value(value)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(format!("expected 0 or 1, found {other}")),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Text(v) => Ok(v.clone()),
            other => Err(format!("expected text, found {}", other.type_name())),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

/// Structured extraction of a whole row.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> DbResult<Self>;
}

/// One materialized result row.
#[derive(Debug, Clone)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    pub fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Raw value of `column` (exact name first, then ASCII case-insensitive).
    pub fn value(&self, column: &str) -> DbResult<&Value> {
        let index = self
            .columns
            .iter()
            .position(|name| name == column)
            .or_else(|| {
                self.columns
                    .iter()
                    .position(|name| name.eq_ignore_ascii_case(column))
            })
            .ok_or_else(|| DbError::ColumnNotFound(column.to_string()))?;
        self.values
            .get(index)
            .ok_or_else(|| DbError::ColumnNotFound(column.to_string()))
    }

    /// Typed value of `column`.
    pub fn get<T: FromValue>(&self, column: &str) -> DbResult<T> {
        let value = self.value(column)?;
        T::from_value(value).map_err(|message| DbError::Decode {
            column: column.to_string(),
            message,
        })
    }

    /// Typed value at zero-based `index`.
    pub fn get_index<T: FromValue>(&self, index: usize) -> DbResult<T> {
        let value = self
            .values
            .get(index)
            .ok_or_else(|| DbError::ColumnNotFound(format!("#{index}")))?;
        T::from_value(value).map_err(|message| DbError::Decode {
            column: self
                .columns
                .get(index)
                .cloned()
                .unwrap_or_else(|| format!("#{index}")),
            message,
        })
    }

    /// Extracts the whole row into `T`.
    pub fn scan<T: FromRow>(&self) -> DbResult<T> {
        T::from_row(self)
    }
}

/// Forward-only cursor over materialized rows; `next()` advances.
#[derive(Debug)]
pub struct Rows {
    columns: Arc<[String]>,
    pending: std::vec::IntoIter<Vec<Value>>,
}

impl Rows {
    pub fn new(columns: Arc<[String]>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns,
            pending: rows.into_iter(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Remaining rows not yet consumed.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl Iterator for Rows {
    type Item = Row;

    fn next(&mut self) -> Option<Self::Item> {
        self.pending
            .next()
            .map(|values| Row::new(Arc::clone(&self.columns), values))
    }
}

/// Outcome of a mutating statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecOutcome {
    last_insert_id: i64,
    rows_affected: u64,
}

impl ExecOutcome {
    pub fn new(last_insert_id: i64, rows_affected: u64) -> Self {
        Self {
            last_insert_id,
            rows_affected,
        }
    }

    pub fn last_insert_id(&self) -> i64 {
        self.last_insert_id
    }

    pub fn rows_affected(&self) -> u64 {
        self.rows_affected
    }
}

/// Minimal datastore surface used by repositories.
///
/// Implementations must be safe to share across request workers.
pub trait Handler: Send + Sync {
    fn kind(&self) -> HandlerKind;

    /// Runs a mutating statement.
    fn execute(&self, statement: &str, args: &[Value]) -> DbResult<ExecOutcome>;

    /// Runs a query and returns its first row, if any.
    fn query_row(&self, statement: &str, args: &[Value]) -> DbResult<Option<Row>>;

    /// Runs a query and returns all rows.
    fn query(&self, statement: &str, args: &[Value]) -> DbResult<Rows>;
}

#[cfg(test)]
mod tests {
    use super::{DbError, HandlerKind, Row, Rows, Value};
    use std::sync::Arc;

    fn columns() -> Arc<[String]> {
        Arc::from(vec!["rowid".to_string(), "dueDate".to_string()])
    }

    #[test]
    fn row_get_matches_column_names_case_insensitively() {
        let row = Row::new(
            columns(),
            vec![Value::Integer(7), Value::Text("x".to_string())],
        );
        assert_eq!(row.get::<i64>("rowid").unwrap(), 7);
        assert_eq!(row.get::<String>("duedate").unwrap(), "x");
        assert!(matches!(
            row.get::<i64>("missing"),
            Err(DbError::ColumnNotFound(_))
        ));
    }

    #[test]
    fn row_get_reports_type_mismatch_as_decode_error() {
        let row = Row::new(columns(), vec![Value::Null, Value::Integer(1)]);
        let err = row.get::<String>("dueDate").unwrap_err();
        assert!(matches!(err, DbError::Decode { column, .. } if column == "dueDate"));
        assert_eq!(row.get::<Option<i64>>("rowid").unwrap(), None);
    }

    #[test]
    fn rows_cursor_advances_until_exhausted() {
        let mut rows = Rows::new(
            columns(),
            vec![
                vec![Value::Integer(1), Value::Null],
                vec![Value::Integer(2), Value::Null],
            ],
        );
        assert_eq!(rows.remaining(), 2);
        assert_eq!(rows.next().unwrap().get::<i64>("rowid").unwrap(), 1);
        assert_eq!(rows.next().unwrap().get::<i64>("rowid").unwrap(), 2);
        assert!(rows.next().is_none());
    }

    #[test]
    fn handler_kind_parses_known_backends_only() {
        assert_eq!("SQLite3".parse::<HandlerKind>().unwrap(), HandlerKind::Sqlite);
        assert!(matches!(
            "postgres".parse::<HandlerKind>(),
            Err(DbError::UnsupportedBackend(name)) if name == "postgres"
        ));
    }
}
