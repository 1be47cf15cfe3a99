//! SQLite implementation of the datastore `Handler`.
//!
//! # Invariants
//! - One connection per handler, serialized behind a mutex.
//! - Constraint failures are classified into `DbError::Constraint`.

use super::{ConstraintKind, DbError, DbResult, ExecOutcome, Handler, HandlerKind, Row, Rows, Value};
use rusqlite::ffi;
use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::{params_from_iter, Connection, ToSql};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared SQLite handler.
pub struct SqliteHandler {
    conn: Mutex<Connection>,
}

impl SqliteHandler {
    /// Wraps an already bootstrapped connection.
    ///
    /// Prefer `open_db`/`open_db_in_memory`, which apply the schema first.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        // SQLite rolls back an interrupted statement, so a poisoned guard is still usable.
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Handler for SqliteHandler {
    fn kind(&self) -> HandlerKind {
        HandlerKind::Sqlite
    }

    fn execute(&self, statement: &str, args: &[Value]) -> DbResult<ExecOutcome> {
        let conn = self.conn();
        let mut stmt = conn.prepare(statement)?;
        let changed = stmt.execute(params_from_iter(args.iter()))?;
        Ok(ExecOutcome::new(conn.last_insert_rowid(), changed as u64))
    }

    fn query_row(&self, statement: &str, args: &[Value]) -> DbResult<Option<Row>> {
        let mut rows = self.query(statement, args)?;
        Ok(rows.next())
    }

    fn query(&self, statement: &str, args: &[Value]) -> DbResult<Rows> {
        let conn = self.conn();
        let mut stmt = conn.prepare(statement)?;
        let columns: Arc<[String]> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>()
            .into();
        let width = columns.len();

        let mut cursor = stmt.query(params_from_iter(args.iter()))?;
        let mut collected = Vec::new();
        while let Some(row) = cursor.next()? {
            let mut values = Vec::with_capacity(width);
            for index in 0..width {
                values.push(value_from_ref(row.get_ref(index)?));
            }
            collected.push(values);
        }

        Ok(Rows::new(columns, collected))
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            Value::Integer(v) => ToSqlOutput::Borrowed(ValueRef::Integer(*v)),
            Value::Real(v) => ToSqlOutput::Borrowed(ValueRef::Real(*v)),
            Value::Text(v) => ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes())),
            Value::Blob(v) => ToSqlOutput::Borrowed(ValueRef::Blob(v)),
        })
    }
}

fn value_from_ref(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(v) => Value::Integer(v),
        ValueRef::Real(v) => Value::Real(v),
        ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        match &value {
            rusqlite::Error::SqliteFailure(code, message)
                if code.code == ffi::ErrorCode::ConstraintViolation =>
            {
                let kind = match code.extended_code {
                    ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                        ConstraintKind::Unique
                    }
                    ffi::SQLITE_CONSTRAINT_FOREIGNKEY => ConstraintKind::ForeignKey,
                    _ => ConstraintKind::Other,
                };
                Self::Constraint {
                    kind,
                    message: message.clone().unwrap_or_else(|| code.to_string()),
                }
            }
            _ => Self::Sqlite(value),
        }
    }
}
