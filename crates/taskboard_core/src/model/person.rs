//! Person domain record.
//!
//! # Responsibility
//! - Define the person shape persisted and returned by the API surface.
//! - Validate all person fields against the §-rules in one place.
//!
//! # Invariants
//! - `id` starts with `'f'` and has at least 4 characters.
//! - `email` contains `'@'`.

use crate::model::validate::{
    check_email, check_min_len, check_person_id, ValidationError, PERSON_ID_PREFIX,
};
use serde::{Deserialize, Serialize};

/// A person who can be assigned to work items.
///
/// The record round-trips whole through list/search and the aggregation
/// view; `password` is an opaque string with no semantics in this core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Caller-supplied id, unique within the person collection.
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Person {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Validates every field, failing on the first broken rule.
    ///
    /// Field order is fixed (id, name, email) so error precedence is stable.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_person_id(&self.id)?;
        check_min_len(&self.name, "name", 2)?;
        check_email(&self.email, "email")?;
        Ok(())
    }

    /// Returns the sentinel character person ids are required to carry.
    pub const fn id_prefix() -> char {
        PERSON_ID_PREFIX
    }
}
