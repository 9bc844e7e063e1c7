//! Items-with-assignees aggregation view.
//!
//! # Responsibility
//! - Reconstruct every item together with the full person records assigned
//!   to it (`responsibles`).
//!
//! # Invariants
//! - Outer order is the item store's natural (rowid) order.
//! - Inner order is the assignment store's natural (rowid) order per item.
//! - An assignment pointing at a missing person is invalid persisted state
//!   and is surfaced as an error, never silently skipped.

use crate::model::item::Item;
use crate::model::person::Person;
use crate::repo::item_repo::query_items;
use crate::repo::person_repo::query_persons;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection};
use serde::Serialize;
use std::collections::HashMap;

/// One item joined with the persons assigned to it.
///
/// Serializes flat: the item's own fields plus a `responsibles` array of
/// whole person records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemWithAssignees {
    #[serde(flatten)]
    pub item: Item,
    pub responsibles: Vec<Person>,
}

/// Builds the aggregation view for every item.
///
/// Computed as a batched fetch: three ordered reads composed in memory,
/// yielding the same shape and ordering as a per-item nested-join
/// reconstruction without its N+1 round-trips.
pub fn items_with_assignees(conn: &Connection) -> RepoResult<Vec<ItemWithAssignees>> {
    let items = query_items(
        conn,
        "SELECT id, title, description, created_at, status FROM items ORDER BY rowid;",
        params![],
    )?;
    let persons_by_id: HashMap<String, Person> = query_persons(
        conn,
        "SELECT id, name, email, password FROM persons;",
        params![],
    )?
    .into_iter()
    .map(|person| (person.id.clone(), person))
    .collect();

    // rowid order here fixes the inner ordering of every responsibles list.
    let mut assignees_by_item: HashMap<String, Vec<String>> = HashMap::new();
    let mut stmt = conn.prepare("SELECT person_id, item_id FROM assignments ORDER BY rowid;")?;
    let mut rows = stmt.query(params![])?;
    while let Some(row) = rows.next()? {
        let person_id: String = row.get("person_id")?;
        let item_id: String = row.get("item_id")?;
        assignees_by_item.entry(item_id).or_default().push(person_id);
    }

    items
        .into_iter()
        .map(|item| {
            let responsibles = assignees_by_item
                .remove(&item.id)
                .unwrap_or_default()
                .into_iter()
                .map(|person_id| {
                    persons_by_id.get(&person_id).cloned().ok_or_else(|| {
                        RepoError::InvalidData(format!(
                            "assignment references missing person `{person_id}`"
                        ))
                    })
                })
                .collect::<RepoResult<Vec<Person>>>()?;
            Ok(ItemWithAssignees { item, responsibles })
        })
        .collect()
}
