//! Assignment link record.
//!
//! # Responsibility
//! - Represent one person-to-item link row.
//!
//! # Invariants
//! - An assignment only exists while both endpoints exist; the repositories
//!   enforce this in application logic, never the schema.
//! - Duplicate `(person_id, item_id)` pairs are legal.

use serde::{Deserialize, Serialize};

/// One row of the many-to-many person/item relation.
///
/// The pair has no identity of its own; deletion always targets both keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub person_id: String,
    pub item_id: String,
}

impl Assignment {
    pub fn new(person_id: impl Into<String>, item_id: impl Into<String>) -> Self {
        Self {
            person_id: person_id.into(),
            item_id: item_id.into(),
        }
    }
}
