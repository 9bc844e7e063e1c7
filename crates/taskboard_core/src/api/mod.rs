//! Request-orchestrator contract: one entry point per endpoint.
//!
//! # Responsibility
//! - Accept already-parsed request input and return a status plus body.
//! - Map the store error taxonomy onto HTTP statuses exactly once.
//!
//! # Invariants
//! - Entry points never panic; every failure becomes a response value.
//! - The status is fixed on the response before it is returned, so an
//!   intended 4xx can never decay into a 5xx at the boundary.
//! - Success paths always answer 200 with the documented body shape.

use crate::model::item::{Item, ItemPatch};
use crate::model::person::Person;
use crate::model::validate::require;
use crate::repo::assignment_repo::{AssignmentRepository, SqliteAssignmentRepository};
use crate::repo::item_repo::{ItemRepository, SqliteItemRepository};
use crate::repo::person_repo::{PersonRepository, SqlitePersonRepository};
use crate::repo::{RepoError, RepoResult};
use crate::view::board::{items_with_assignees, ItemWithAssignees};
use log::{error, info, warn};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

/// Response envelope handed back to the transport layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    /// HTTP status the transport should answer with.
    pub status: u16,
    pub body: Body,
}

/// Body value for a response; serializes as the inner value directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Body {
    /// Plain confirmation or error text.
    Text(String),
    Persons(Vec<Person>),
    Items(Vec<Item>),
    Board(Vec<ItemWithAssignees>),
}

impl ApiResponse {
    fn ok(body: Body) -> Self {
        Self { status: 200, body }
    }

    fn from_error(err: &RepoError) -> Self {
        Self {
            status: err.http_status(),
            body: Body::Text(err.to_string()),
        }
    }
}

/// Creation payload for a person; absence of a field is a validation
/// failure, not a deserialization one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePersonRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Creation payload for an item. `created_at` and `status` are stamped by
/// the core, never supplied at creation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateItemRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// GET /persons
pub fn list_persons(conn: &mut Connection) -> ApiResponse {
    let outcome = SqlitePersonRepository::try_new(conn)
        .and_then(|repo| repo.list_all())
        .map(|persons| ApiResponse::ok(Body::Persons(persons)));
    finish("list_persons", outcome)
}

/// GET /persons/{nameFragment}
pub fn search_persons(conn: &mut Connection, fragment: &str) -> ApiResponse {
    let outcome = SqlitePersonRepository::try_new(conn)
        .and_then(|repo| repo.search_by_name(fragment))
        .map(|persons| ApiResponse::ok(Body::Persons(persons)));
    finish("search_persons", outcome)
}

/// POST /persons
pub fn create_person(conn: &mut Connection, request: &CreatePersonRequest) -> ApiResponse {
    let outcome = (|| {
        let person = Person::new(
            require(request.id.as_ref(), "id")?.clone(),
            require(request.name.as_ref(), "name")?.clone(),
            require(request.email.as_ref(), "email")?.clone(),
            require(request.password.as_ref(), "password")?.clone(),
        );
        SqlitePersonRepository::try_new(conn)?.create(&person)?;
        Ok(ApiResponse::ok(Body::Text(format!(
            "{} created successfully",
            person.name
        ))))
    })();
    finish("create_person", outcome)
}

/// DELETE /persons/{id}
pub fn delete_person(conn: &mut Connection, id: &str) -> ApiResponse {
    let outcome = SqlitePersonRepository::try_new(conn)
        .and_then(|mut repo| repo.delete_by_id(id))
        .map(|()| ApiResponse::ok(Body::Text("Person deleted successfully".to_string())));
    finish("delete_person", outcome)
}

/// GET /items
pub fn list_items(conn: &mut Connection) -> ApiResponse {
    let outcome = SqliteItemRepository::try_new(conn)
        .and_then(|repo| repo.list_all())
        .map(|items| ApiResponse::ok(Body::Items(items)));
    finish("list_items", outcome)
}

/// GET /items/{titleFragment}, where the fragment is required, unlike the
/// person search.
pub fn search_items(conn: &mut Connection, fragment: &str) -> ApiResponse {
    let outcome = SqliteItemRepository::try_new(conn)
        .and_then(|repo| repo.search(fragment))
        .map(|items| ApiResponse::ok(Body::Items(items)));
    finish("search_items", outcome)
}

/// POST /items
pub fn create_item(conn: &mut Connection, request: &CreateItemRequest) -> ApiResponse {
    let outcome = (|| {
        let item = Item::new(
            require(request.id.as_ref(), "id")?.clone(),
            require(request.title.as_ref(), "title")?.clone(),
            require(request.description.as_ref(), "description")?.clone(),
        );
        SqliteItemRepository::try_new(conn)?.create(&item)?;
        Ok(ApiResponse::ok(Body::Text(format!(
            "{} created successfully",
            item.title
        ))))
    })();
    finish("create_item", outcome)
}

/// PUT /items/{id}
pub fn update_item(conn: &mut Connection, id: &str, patch: &ItemPatch) -> ApiResponse {
    let outcome = SqliteItemRepository::try_new(conn)
        .and_then(|mut repo| repo.update(id, patch))
        .map(|()| ApiResponse::ok(Body::Text(format!("{id} updated successfully"))));
    finish("update_item", outcome)
}

/// DELETE /items/{id}
pub fn delete_item(conn: &mut Connection, id: &str) -> ApiResponse {
    let outcome = SqliteItemRepository::try_new(conn)
        .and_then(|mut repo| repo.delete_by_id(id))
        .map(|()| ApiResponse::ok(Body::Text("Item deleted successfully".to_string())));
    finish("delete_item", outcome)
}

/// POST /items/{itemId}/persons/{personId}
pub fn assign_person(conn: &mut Connection, item_id: &str, person_id: &str) -> ApiResponse {
    let outcome = SqliteAssignmentRepository::try_new(conn)
        .and_then(|mut repo| repo.create(person_id, item_id))
        .map(|()| ApiResponse::ok(Body::Text("Person assigned successfully".to_string())));
    finish("assign_person", outcome)
}

/// DELETE /items/{itemId}/persons/{personId}
pub fn unassign_person(conn: &mut Connection, item_id: &str, person_id: &str) -> ApiResponse {
    let outcome = SqliteAssignmentRepository::try_new(conn)
        .and_then(|mut repo| repo.delete(person_id, item_id))
        .map(|_removed| {
            ApiResponse::ok(Body::Text("Person unassigned successfully".to_string()))
        });
    finish("unassign_person", outcome)
}

/// GET /items/persons
pub fn board(conn: &mut Connection) -> ApiResponse {
    let outcome = items_with_assignees(conn).map(|view| ApiResponse::ok(Body::Board(view)));
    finish("board", outcome)
}

/// Folds an operation outcome into the response envelope and logs it.
/// Log lines carry ids and statuses only, never field contents.
fn finish(event: &str, outcome: RepoResult<ApiResponse>) -> ApiResponse {
    match outcome {
        Ok(response) => {
            info!("event={event} module=api status=ok http_status={}", response.status);
            response
        }
        Err(err) => {
            let response = ApiResponse::from_error(&err);
            if response.status >= 500 {
                error!(
                    "event={event} module=api status=error http_status={} error={err}",
                    response.status
                );
            } else {
                warn!(
                    "event={event} module=api status=rejected http_status={} error={err}",
                    response.status
                );
            }
            response
        }
    }
}
