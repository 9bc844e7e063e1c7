//! Field validators and identifier-convention checks.
//!
//! # Responsibility
//! - Provide pure per-field rule checks shared by every write path.
//! - Classify failures with stable, human-readable messages.
//!
//! # Invariants
//! - Every validation failure maps to HTTP 400 at the boundary.
//! - Validators never touch storage; they judge a single value in isolation.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Leading character required on every person id.
pub const PERSON_ID_PREFIX: char = 'f';
/// Leading character required on every item id.
pub const ITEM_ID_PREFIX: char = 't';
/// Minimum total length of any entity id, prefix included.
pub const ID_MIN_LEN: usize = 4;

/// Classified validation failure for one field.
///
/// `Display` renders the message surfaced verbatim to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Missing { field: &'static str },
    TooShort { field: &'static str, min: usize },
    MissingPrefix { field: &'static str, prefix: char },
    MissingAtSign { field: &'static str },
    StatusOutOfRange { field: &'static str, value: i64 },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing { field } => write!(f, "invalid {field}: value is required"),
            Self::TooShort { field, min } => {
                write!(f, "invalid {field}: must have at least {min} characters")
            }
            Self::MissingPrefix { field, prefix } => {
                write!(f, "invalid {field}: must start with '{prefix}'")
            }
            Self::MissingAtSign { field } => write!(f, "invalid {field}: must contain '@'"),
            Self::StatusOutOfRange { field, value } => {
                write!(f, "invalid {field}: must be 0 or 1, got {value}")
            }
        }
    }
}

impl Error for ValidationError {}

/// Checks minimum character count for a required string field.
pub fn check_min_len(
    value: &str,
    field: &'static str,
    min: usize,
) -> Result<(), ValidationError> {
    if value.chars().count() < min {
        return Err(ValidationError::TooShort { field, min });
    }
    Ok(())
}

/// Checks an entity id against its collection convention: sentinel prefix
/// plus minimum total length.
pub fn check_id(value: &str, field: &'static str, prefix: char) -> Result<(), ValidationError> {
    if !value.starts_with(prefix) {
        return Err(ValidationError::MissingPrefix { field, prefix });
    }
    check_min_len(value, field, ID_MIN_LEN)
}

/// Checks a person id against the person collection convention.
pub fn check_person_id(value: &str) -> Result<(), ValidationError> {
    check_id(value, "person id", PERSON_ID_PREFIX)
}

/// Checks an item id against the item collection convention.
pub fn check_item_id(value: &str) -> Result<(), ValidationError> {
    check_id(value, "item id", ITEM_ID_PREFIX)
}

/// Checks the email rule: the value must contain `'@'`. No further
/// normalization is applied.
pub fn check_email(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if !value.contains('@') {
        return Err(ValidationError::MissingAtSign { field });
    }
    Ok(())
}

/// Checks the numeric status flag domain {0, 1}.
pub fn check_status(value: i64, field: &'static str) -> Result<(), ValidationError> {
    if value != 0 && value != 1 {
        return Err(ValidationError::StatusOutOfRange { field, value });
    }
    Ok(())
}

/// Unwraps a required field supplied as an option, classifying absence.
pub fn require<'a, T>(value: Option<&'a T>, field: &'static str) -> Result<&'a T, ValidationError> {
    value.ok_or(ValidationError::Missing { field })
}

#[cfg(test)]
mod tests {
    use super::{
        check_email, check_item_id, check_min_len, check_person_id, check_status, require,
        ValidationError,
    };

    #[test]
    fn id_convention_requires_prefix_and_length() {
        check_person_id("f001").expect("f001 is a valid person id");
        check_item_id("t001").expect("t001 is a valid item id");

        assert_eq!(
            check_person_id("x001"),
            Err(ValidationError::MissingPrefix {
                field: "person id",
                prefix: 'f'
            })
        );
        assert_eq!(
            check_item_id("t01"),
            Err(ValidationError::TooShort {
                field: "item id",
                min: 4
            })
        );
    }

    #[test]
    fn wrong_sentinel_is_reported_before_length() {
        // "f" alone fails both rules; the prefix rule wins for the item side.
        assert!(matches!(
            check_item_id("f"),
            Err(ValidationError::MissingPrefix { .. })
        ));
    }

    #[test]
    fn min_len_counts_characters_not_bytes() {
        check_min_len("áé", "name", 2).expect("two multibyte chars satisfy min 2");
        assert!(check_min_len("á", "name", 2).is_err());
    }

    #[test]
    fn email_only_requires_at_sign() {
        check_email("a@x.com", "email").expect("plain address passes");
        check_email("@", "email").expect("a bare @ passes; no normalization");
        assert_eq!(
            check_email("nope", "email"),
            Err(ValidationError::MissingAtSign { field: "email" })
        );
    }

    #[test]
    fn status_domain_is_zero_or_one() {
        check_status(0, "status").expect("0 is in domain");
        check_status(1, "status").expect("1 is in domain");
        assert_eq!(
            check_status(2, "status"),
            Err(ValidationError::StatusOutOfRange {
                field: "status",
                value: 2
            })
        );
    }

    #[test]
    fn require_classifies_absent_fields() {
        let present = Some("x".to_string());
        assert_eq!(require(present.as_ref(), "id").expect("present"), "x");
        assert_eq!(
            require::<String>(None, "id"),
            Err(ValidationError::Missing { field: "id" })
        );
    }

    #[test]
    fn messages_are_human_readable() {
        let message = ValidationError::TooShort {
            field: "title",
            min: 2,
        }
        .to_string();
        assert_eq!(message, "invalid title: must have at least 2 characters");
    }
}
