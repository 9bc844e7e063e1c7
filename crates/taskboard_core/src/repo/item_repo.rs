//! Item store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD plus substring search over the `items` collection.
//! - Apply partial updates under an explicit, selectable merge policy.
//! - Cascade item deletion over referencing assignment rows.
//!
//! # Invariants
//! - Writes validate supplied fields before touching SQL.
//! - A patch that renames the item id also rewrites matching assignment
//!   rows inside the same transaction, so no link is left dangling.
//! - Search requires a non-empty fragment; the person store tolerates an
//!   empty one, this store classifies it as a validation failure.

use crate::model::item::{Item, ItemPatch};
use crate::model::validate::{check_item_id, ValidationError};
use crate::repo::{ensure_connection_ready, row_exists, write_tx, RepoError, RepoResult};
use rusqlite::{params, Connection, Row, Transaction};

const ITEM_SELECT_SQL: &str = "SELECT id, title, description, created_at, status FROM items";
const ITEM_COLUMNS: &[&str] = &["id", "title", "description", "created_at", "status"];

/// How a partial update merges supplied values over the stored row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergePolicy {
    /// A supplied field always replaces the stored value, including falsy
    /// ones (`status: 0`, empty strings).
    #[default]
    FieldPresence,
    /// Backward-compatible `new || old` coalescing: a supplied falsy value
    /// (numeric 0, empty string) is treated as absent and the stored value
    /// is kept.
    LegacyFalsyCoalesce,
}

/// Store interface for item CRUD and search operations.
pub trait ItemRepository {
    /// Returns the whole collection; order is not part of the contract.
    fn list_all(&self) -> RepoResult<Vec<Item>>;
    /// Returns items whose title OR description contains `fragment`
    /// (case-sensitive). An empty fragment is a validation failure.
    fn search(&self, fragment: &str) -> RepoResult<Vec<Item>>;
    /// Validates and inserts one item; a duplicate id is a `Conflict`.
    fn create(&mut self, item: &Item) -> RepoResult<()>;
    /// Applies a partial update under the configured merge policy.
    /// A missing id is `NotFound`.
    fn update(&mut self, id: &str, patch: &ItemPatch) -> RepoResult<()>;
    /// Deletes one item and every assignment referencing it, children
    /// first. A missing id is `NotFound`.
    fn delete_by_id(&mut self, id: &str) -> RepoResult<()>;
}

/// SQLite-backed item store.
pub struct SqliteItemRepository<'conn> {
    conn: &'conn mut Connection,
    merge_policy: MergePolicy,
}

impl<'conn> SqliteItemRepository<'conn> {
    /// Constructs a store with the default field-presence merge policy.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        Self::with_merge_policy(conn, MergePolicy::default())
    }

    /// Constructs a store with an explicit merge policy.
    pub fn with_merge_policy(
        conn: &'conn mut Connection,
        merge_policy: MergePolicy,
    ) -> RepoResult<Self> {
        ensure_connection_ready(conn, "items", ITEM_COLUMNS)?;
        Ok(Self { conn, merge_policy })
    }
}

impl ItemRepository for SqliteItemRepository<'_> {
    fn list_all(&self) -> RepoResult<Vec<Item>> {
        query_items(self.conn, &format!("{ITEM_SELECT_SQL};"), params![])
    }

    fn search(&self, fragment: &str) -> RepoResult<Vec<Item>> {
        if fragment.is_empty() {
            return Err(ValidationError::Missing {
                field: "search fragment",
            }
            .into());
        }
        query_items(
            self.conn,
            &format!("{ITEM_SELECT_SQL} WHERE instr(title, ?1) > 0 OR instr(description, ?1) > 0;"),
            params![fragment],
        )
    }

    fn create(&mut self, item: &Item) -> RepoResult<()> {
        item.validate()?;

        let tx = write_tx(self.conn)?;
        if row_exists(&tx, "SELECT 1 FROM items WHERE id = ?1;", &item.id)? {
            return Err(RepoError::Conflict(format!(
                "item id `{}` already exists",
                item.id
            )));
        }

        tx.execute(
            "INSERT INTO items (id, title, description, created_at, status)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                item.id,
                item.title,
                item.description,
                item.created_at,
                item.status
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn update(&mut self, id: &str, patch: &ItemPatch) -> RepoResult<()> {
        check_item_id(id)?;
        patch.validate()?;

        let tx = write_tx(self.conn)?;
        let Some(current) = get_item_tx(&tx, id)? else {
            return Err(RepoError::NotFound {
                entity: "item",
                id: id.to_string(),
            });
        };

        let merged = merge_item(&current, patch, self.merge_policy);
        if merged.id != id
            && row_exists(&tx, "SELECT 1 FROM items WHERE id = ?1;", &merged.id)?
        {
            return Err(RepoError::Conflict(format!(
                "item id `{}` already exists",
                merged.id
            )));
        }

        tx.execute(
            "UPDATE items
             SET id = ?1, title = ?2, description = ?3, created_at = ?4, status = ?5
             WHERE id = ?6;",
            params![
                merged.id,
                merged.title,
                merged.description,
                merged.created_at,
                merged.status,
                id
            ],
        )?;
        if merged.id != id {
            // Keep the relation on the renamed id; links must never dangle.
            tx.execute(
                "UPDATE assignments SET item_id = ?1 WHERE item_id = ?2;",
                params![merged.id, id],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn delete_by_id(&mut self, id: &str) -> RepoResult<()> {
        check_item_id(id)?;

        let tx = write_tx(self.conn)?;
        if !row_exists(&tx, "SELECT 1 FROM items WHERE id = ?1;", id)? {
            return Err(RepoError::NotFound {
                entity: "item",
                id: id.to_string(),
            });
        }

        tx.execute("DELETE FROM assignments WHERE item_id = ?1;", params![id])?;
        tx.execute("DELETE FROM items WHERE id = ?1;", params![id])?;
        tx.commit()?;
        Ok(())
    }
}

fn merge_item(current: &Item, patch: &ItemPatch, policy: MergePolicy) -> Item {
    match policy {
        MergePolicy::FieldPresence => Item {
            id: patch.id.clone().unwrap_or_else(|| current.id.clone()),
            title: patch.title.clone().unwrap_or_else(|| current.title.clone()),
            description: patch
                .description
                .clone()
                .unwrap_or_else(|| current.description.clone()),
            created_at: patch.created_at.unwrap_or(current.created_at),
            status: patch.status.unwrap_or(current.status),
        },
        MergePolicy::LegacyFalsyCoalesce => Item {
            id: coalesce_str(patch.id.as_deref(), &current.id),
            title: coalesce_str(patch.title.as_deref(), &current.title),
            description: coalesce_str(patch.description.as_deref(), &current.description),
            created_at: coalesce_num(patch.created_at, current.created_at),
            status: coalesce_num(patch.status, current.status),
        },
    }
}

fn coalesce_str(supplied: Option<&str>, stored: &str) -> String {
    match supplied {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => stored.to_string(),
    }
}

fn coalesce_num(supplied: Option<i64>, stored: i64) -> i64 {
    match supplied {
        Some(value) if value != 0 => value,
        _ => stored,
    }
}

fn get_item_tx(tx: &Transaction<'_>, id: &str) -> RepoResult<Option<Item>> {
    let mut stmt = tx.prepare(&format!("{ITEM_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query(params![id])?;
    match rows.next()? {
        Some(row) => Ok(Some(item_from_row(row)?)),
        None => Ok(None),
    }
}

pub(crate) fn query_items(
    conn: &Connection,
    sql: &str,
    bind: impl rusqlite::Params,
) -> RepoResult<Vec<Item>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(bind)?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(item_from_row(row)?);
    }
    Ok(items)
}

pub(crate) fn item_from_row(row: &Row<'_>) -> RepoResult<Item> {
    let item = Item {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        created_at: row.get("created_at")?,
        status: row.get("status")?,
    };
    // Read paths reject invalid persisted state instead of masking it.
    item.validate()
        .map_err(|err| RepoError::InvalidData(err.to_string()))?;
    Ok(item)
}
