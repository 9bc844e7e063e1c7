//! Assignment store contract and SQLite implementation.
//!
//! # Responsibility
//! - Create and delete person/item links with both endpoints re-validated.
//! - Expose ordered read helpers for the aggregation view and tests.
//!
//! # Invariants
//! - Existence is confirmed item first, person second; that order is a
//!   fixed tie-break so error precedence stays consistent.
//! - Duplicate pairs are legal on create and removed together on delete.
//! - All checks and the mutation run inside one immediate transaction.

use crate::model::assignment::Assignment;
use crate::model::validate::{check_item_id, check_person_id};
use crate::repo::{ensure_connection_ready, row_exists, write_tx, RepoError, RepoResult};
use rusqlite::{params, Connection, Transaction};

const ASSIGNMENT_COLUMNS: &[&str] = &["person_id", "item_id"];

/// Store interface for the person/item relation.
pub trait AssignmentRepository {
    /// Links one person to one item. Both ids are convention-checked, then
    /// both endpoints must exist (item checked first). Duplicates allowed.
    fn create(&mut self, person_id: &str, item_id: &str) -> RepoResult<()>;
    /// Unlinks a pair after the same pre-checks; removes every matching row
    /// and returns how many were deleted.
    fn delete(&mut self, person_id: &str, item_id: &str) -> RepoResult<usize>;
    /// Returns all rows in natural (insertion) order.
    fn list_all(&self) -> RepoResult<Vec<Assignment>>;
    /// Returns the rows linking the given item, in natural order.
    fn list_for_item(&self, item_id: &str) -> RepoResult<Vec<Assignment>>;
}

/// SQLite-backed assignment store.
pub struct SqliteAssignmentRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteAssignmentRepository<'conn> {
    /// Constructs a store from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "assignments", ASSIGNMENT_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl AssignmentRepository for SqliteAssignmentRepository<'_> {
    fn create(&mut self, person_id: &str, item_id: &str) -> RepoResult<()> {
        check_item_id(item_id)?;
        check_person_id(person_id)?;

        let tx = write_tx(self.conn)?;
        ensure_endpoints_exist(&tx, person_id, item_id)?;
        tx.execute(
            "INSERT INTO assignments (person_id, item_id) VALUES (?1, ?2);",
            params![person_id, item_id],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn delete(&mut self, person_id: &str, item_id: &str) -> RepoResult<usize> {
        check_item_id(item_id)?;
        check_person_id(person_id)?;

        let tx = write_tx(self.conn)?;
        ensure_endpoints_exist(&tx, person_id, item_id)?;
        let removed = tx.execute(
            "DELETE FROM assignments WHERE person_id = ?1 AND item_id = ?2;",
            params![person_id, item_id],
        )?;
        tx.commit()?;
        Ok(removed)
    }

    fn list_all(&self) -> RepoResult<Vec<Assignment>> {
        query_assignments(
            self.conn,
            "SELECT person_id, item_id FROM assignments ORDER BY rowid;",
            params![],
        )
    }

    fn list_for_item(&self, item_id: &str) -> RepoResult<Vec<Assignment>> {
        query_assignments(
            self.conn,
            "SELECT person_id, item_id FROM assignments WHERE item_id = ?1 ORDER BY rowid;",
            params![item_id],
        )
    }
}

/// Confirms both link endpoints exist, item first, naming the missing side.
fn ensure_endpoints_exist(
    tx: &Transaction<'_>,
    person_id: &str,
    item_id: &str,
) -> RepoResult<()> {
    if !row_exists(tx, "SELECT 1 FROM items WHERE id = ?1;", item_id)? {
        return Err(RepoError::NotFound {
            entity: "item",
            id: item_id.to_string(),
        });
    }
    if !row_exists(tx, "SELECT 1 FROM persons WHERE id = ?1;", person_id)? {
        return Err(RepoError::NotFound {
            entity: "person",
            id: person_id.to_string(),
        });
    }
    Ok(())
}

fn query_assignments(
    conn: &Connection,
    sql: &str,
    bind: impl rusqlite::Params,
) -> RepoResult<Vec<Assignment>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(bind)?;
    let mut assignments = Vec::new();
    while let Some(row) = rows.next()? {
        assignments.push(Assignment {
            person_id: row.get("person_id")?,
            item_id: row.get("item_id")?,
        });
    }
    Ok(assignments)
}
