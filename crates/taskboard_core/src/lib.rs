//! Core domain logic for the taskboard backend.
//! This crate is the single source of truth for business invariants.

pub mod api;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod view;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::assignment::Assignment;
pub use model::item::{Item, ItemPatch};
pub use model::person::Person;
pub use model::validate::ValidationError;
pub use repo::assignment_repo::{AssignmentRepository, SqliteAssignmentRepository};
pub use repo::item_repo::{ItemRepository, MergePolicy, SqliteItemRepository};
pub use repo::person_repo::{PersonRepository, SqlitePersonRepository};
pub use repo::{RepoError, RepoResult};
pub use view::board::{items_with_assignees, ItemWithAssignees};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
