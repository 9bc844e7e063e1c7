//! Work item domain record and partial-update patch.
//!
//! # Responsibility
//! - Define the item shape persisted and returned by the API surface.
//! - Validate item fields for both full creates and partial updates.
//!
//! # Invariants
//! - `id` starts with `'t'` and has at least 4 characters.
//! - `status` stays inside the {0, 1} domain at every write.
//! - `created_at` is set once at creation and only changes when a patch
//!   explicitly supplies it.

use crate::model::validate::{
    check_item_id, check_min_len, check_status, ValidationError, ITEM_ID_PREFIX,
};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// An assignable work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Caller-supplied id, unique within the item collection.
    pub id: String,
    pub title: String,
    pub description: String,
    /// Creation instant in epoch milliseconds.
    pub created_at: i64,
    /// Completion flag: 0 = open, 1 = done.
    pub status: i64,
}

impl Item {
    /// Creates an item stamped with the current time and an open status.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            created_at: now_epoch_ms(),
            status: 0,
        }
    }

    /// Validates every field, failing on the first broken rule.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_item_id(&self.id)?;
        check_min_len(&self.title, "title", 2)?;
        check_min_len(&self.description, "description", 4)?;
        check_status(self.status, "status")?;
        Ok(())
    }

    /// Returns the sentinel character item ids are required to carry.
    pub const fn id_prefix() -> char {
        ITEM_ID_PREFIX
    }
}

/// Partial update payload for an item.
///
/// Absent fields (`None`) are left untouched by the update; how *supplied*
/// falsy values merge is decided by the repository's merge policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ItemPatch {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub status: Option<i64>,
}

impl ItemPatch {
    /// Validates only the fields the patch actually carries.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(id) = self.id.as_deref() {
            check_item_id(id)?;
        }
        if let Some(title) = self.title.as_deref() {
            check_min_len(title, "title", 2)?;
        }
        if let Some(description) = self.description.as_deref() {
            check_min_len(description, "description", 4)?;
        }
        if let Some(status) = self.status {
            check_status(status, "status")?;
        }
        Ok(())
    }

    /// Returns whether the patch carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.title.is_none()
            && self.description.is_none()
            && self.created_at.is_none()
            && self.status.is_none()
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
