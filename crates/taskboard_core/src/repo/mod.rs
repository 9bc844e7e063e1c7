//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define store contracts for persons, items and assignments.
//! - Isolate SQL details and the shared error taxonomy from callers.
//!
//! # Invariants
//! - Repository writes validate fields before any SQL mutation.
//! - Every check-then-act sequence runs inside one immediate transaction.
//! - Repository APIs return semantic errors (`NotFound`, `Conflict`) in
//!   addition to DB transport errors.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::validate::ValidationError;
use rusqlite::{params, Connection, Transaction, TransactionBehavior};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod assignment_repo;
pub mod item_repo;
pub mod person_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error taxonomy shared by all stores.
///
/// `http_status` fixes the boundary mapping: classified client failures are
/// 400/404, everything else is 500. The status travels with the error, so
/// the boundary layer never has to guess after the fact.
#[derive(Debug)]
pub enum RepoError {
    /// Malformed or convention-violating field. Boundary status 400.
    Validation(ValidationError),
    /// Duplicate identifier or email. Boundary status 400.
    Conflict(String),
    /// Referenced id absent from its collection. Boundary status 404.
    NotFound { entity: &'static str, id: String },
    /// Storage transport failure. Boundary status 500.
    Db(DbError),
    /// Persisted state that violates model rules. Boundary status 500.
    InvalidData(String),
    /// Connection handed over before migrations ran. Boundary status 500.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl RepoError {
    /// Suggested HTTP status for this failure class.
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::Conflict(_) => 400,
            Self::NotFound { .. } => 404,
            Self::Db(_)
            | Self::InvalidData(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => 500,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Conflict(message) => write!(f, "{message}"),
            Self::NotFound { entity, id } => write!(f, "{entity} id `{id}` not found"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection not migrated: schema version {actual_version}, expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Verifies a connection is migrated and carries the given table/columns.
///
/// Repositories call this from `try_new` so a connection that skipped
/// `open_db` bootstrap is rejected up front instead of failing mid-write.
pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> RepoResult<()> {
    let actual_version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let present = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<HashSet<String>, _>>()?;

    if present.is_empty() {
        return Err(RepoError::MissingRequiredTable(table));
    }
    for column in columns {
        if !present.contains(*column) {
            return Err(RepoError::MissingRequiredColumn { table, column });
        }
    }

    Ok(())
}

/// Opens an immediate write transaction, serializing concurrent writers so
/// the existence/uniqueness checks inside never act on stale reads.
pub(crate) fn write_tx(conn: &mut Connection) -> RepoResult<Transaction<'_>> {
    Ok(conn.transaction_with_behavior(TransactionBehavior::Immediate)?)
}

pub(crate) fn row_exists(tx: &Transaction<'_>, sql: &str, key: &str) -> RepoResult<bool> {
    let mut stmt = tx.prepare(sql)?;
    Ok(stmt.exists(params![key])?)
}
