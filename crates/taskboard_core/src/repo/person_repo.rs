//! Person store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the `persons` collection.
//! - Enforce id/email uniqueness inside the create transaction.
//! - Cascade person deletion over referencing assignment rows.
//!
//! # Invariants
//! - Writes validate every person field before touching SQL.
//! - Deletion removes assignment children strictly before the person row.
//! - Name search is a case-sensitive substring match.

use crate::model::person::Person;
use crate::model::validate::check_person_id;
use crate::repo::{ensure_connection_ready, row_exists, write_tx, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const PERSON_SELECT_SQL: &str = "SELECT id, name, email, password FROM persons";
const PERSON_COLUMNS: &[&str] = &["id", "name", "email", "password"];

/// Store interface for person CRUD operations.
pub trait PersonRepository {
    /// Returns the whole collection; order is not part of the contract.
    fn list_all(&self) -> RepoResult<Vec<Person>>;
    /// Returns persons whose name contains `fragment` (case-sensitive).
    /// An empty fragment returns the full collection.
    fn search_by_name(&self, fragment: &str) -> RepoResult<Vec<Person>>;
    /// Validates and inserts one person; duplicate id or duplicate email on
    /// another row is a `Conflict`.
    fn create(&mut self, person: &Person) -> RepoResult<()>;
    /// Deletes one person and every assignment referencing it, children
    /// first. A missing id is `NotFound`.
    fn delete_by_id(&mut self, id: &str) -> RepoResult<()>;
}

/// SQLite-backed person store.
pub struct SqlitePersonRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqlitePersonRepository<'conn> {
    /// Constructs a store from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "persons", PERSON_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl PersonRepository for SqlitePersonRepository<'_> {
    fn list_all(&self) -> RepoResult<Vec<Person>> {
        query_persons(self.conn, &format!("{PERSON_SELECT_SQL};"), params![])
    }

    fn search_by_name(&self, fragment: &str) -> RepoResult<Vec<Person>> {
        if fragment.is_empty() {
            return self.list_all();
        }
        // instr() keeps the match case-sensitive; LIKE folds ASCII case.
        query_persons(
            self.conn,
            &format!("{PERSON_SELECT_SQL} WHERE instr(name, ?1) > 0;"),
            params![fragment],
        )
    }

    fn create(&mut self, person: &Person) -> RepoResult<()> {
        person.validate()?;

        let tx = write_tx(self.conn)?;
        if row_exists(&tx, "SELECT 1 FROM persons WHERE id = ?1;", &person.id)? {
            return Err(RepoError::Conflict(format!(
                "person id `{}` already exists",
                person.id
            )));
        }
        let email_taken = {
            let mut stmt =
                tx.prepare("SELECT 1 FROM persons WHERE email = ?1 AND id <> ?2 LIMIT 1;")?;
            stmt.exists(params![person.email, person.id])?
        };
        if email_taken {
            return Err(RepoError::Conflict(format!(
                "email `{}` already exists",
                person.email
            )));
        }

        tx.execute(
            "INSERT INTO persons (id, name, email, password) VALUES (?1, ?2, ?3, ?4);",
            params![person.id, person.name, person.email, person.password],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn delete_by_id(&mut self, id: &str) -> RepoResult<()> {
        check_person_id(id)?;

        let tx = write_tx(self.conn)?;
        if !row_exists(&tx, "SELECT 1 FROM persons WHERE id = ?1;", id)? {
            return Err(RepoError::NotFound {
                entity: "person",
                id: id.to_string(),
            });
        }

        // Children before parent: assignment rows must never outlive the person.
        tx.execute("DELETE FROM assignments WHERE person_id = ?1;", params![id])?;
        tx.execute("DELETE FROM persons WHERE id = ?1;", params![id])?;
        tx.commit()?;
        Ok(())
    }
}

pub(crate) fn query_persons(
    conn: &Connection,
    sql: &str,
    bind: impl rusqlite::Params,
) -> RepoResult<Vec<Person>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(bind)?;
    let mut persons = Vec::new();
    while let Some(row) = rows.next()? {
        persons.push(person_from_row(row)?);
    }
    Ok(persons)
}

pub(crate) fn person_from_row(row: &Row<'_>) -> RepoResult<Person> {
    Ok(Person {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        password: row.get("password")?,
    })
}
