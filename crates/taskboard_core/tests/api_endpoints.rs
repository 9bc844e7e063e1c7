use taskboard_core::api::{self, Body, CreateItemRequest, CreatePersonRequest};
use taskboard_core::db::open_db_in_memory;
use taskboard_core::ItemPatch;

fn ana() -> CreatePersonRequest {
    CreatePersonRequest {
        id: Some("f001".to_string()),
        name: Some("Ana".to_string()),
        email: Some("a@x.com".to_string()),
        password: Some("secret".to_string()),
    }
}

fn fix_bug() -> CreateItemRequest {
    CreateItemRequest {
        id: Some("t001".to_string()),
        title: Some("Fix bug".to_string()),
        description: Some("crash on save".to_string()),
    }
}

#[test]
fn create_person_confirms_with_the_name() {
    let mut conn = open_db_in_memory().unwrap();

    let response = api::create_person(&mut conn, &ana());
    assert_eq!(response.status, 200);
    assert_eq!(response.body, Body::Text("Ana created successfully".to_string()));
}

#[test]
fn create_person_with_missing_field_is_a_400() {
    let mut conn = open_db_in_memory().unwrap();

    let request = CreatePersonRequest {
        name: None,
        ..ana()
    };
    let response = api::create_person(&mut conn, &request);
    assert_eq!(response.status, 400);
    assert_eq!(
        response.body,
        Body::Text("invalid name: value is required".to_string())
    );
}

#[test]
fn create_person_conflict_is_a_400() {
    let mut conn = open_db_in_memory().unwrap();
    api::create_person(&mut conn, &ana());

    let response = api::create_person(&mut conn, &ana());
    assert_eq!(response.status, 400);
    assert!(matches!(response.body, Body::Text(ref text) if text.contains("already exists")));
}

#[test]
fn list_and_search_persons_return_person_lists() {
    let mut conn = open_db_in_memory().unwrap();
    api::create_person(&mut conn, &ana());

    let listed = api::list_persons(&mut conn);
    assert_eq!(listed.status, 200);
    assert!(matches!(listed.body, Body::Persons(ref persons) if persons.len() == 1));

    let hit = api::search_persons(&mut conn, "An");
    assert!(matches!(hit.body, Body::Persons(ref persons) if persons.len() == 1));

    let miss = api::search_persons(&mut conn, "an");
    assert!(matches!(miss.body, Body::Persons(ref persons) if persons.is_empty()));
}

#[test]
fn delete_person_maps_missing_to_404_and_bad_id_to_400() {
    let mut conn = open_db_in_memory().unwrap();
    api::create_person(&mut conn, &ana());

    assert_eq!(api::delete_person(&mut conn, "f404").status, 404);
    assert_eq!(api::delete_person(&mut conn, "oops").status, 400);

    let response = api::delete_person(&mut conn, "f001");
    assert_eq!(response.status, 200);
    assert_eq!(response.body, Body::Text("Person deleted successfully".to_string()));
}

#[test]
fn item_search_requires_a_fragment() {
    let mut conn = open_db_in_memory().unwrap();
    api::create_item(&mut conn, &fix_bug());

    let response = api::search_items(&mut conn, "");
    assert_eq!(response.status, 400);

    let response = api::search_items(&mut conn, "bug");
    assert_eq!(response.status, 200);
    assert!(matches!(response.body, Body::Items(ref items) if items.len() == 1));
}

#[test]
fn update_item_confirms_with_the_path_id() {
    let mut conn = open_db_in_memory().unwrap();
    api::create_item(&mut conn, &fix_bug());

    let patch = ItemPatch {
        status: Some(1),
        ..ItemPatch::default()
    };
    let response = api::update_item(&mut conn, "t001", &patch);
    assert_eq!(response.status, 200);
    assert_eq!(response.body, Body::Text("t001 updated successfully".to_string()));

    assert_eq!(api::update_item(&mut conn, "t404", &patch).status, 404);
}

#[test]
fn assign_and_unassign_round_trip() {
    let mut conn = open_db_in_memory().unwrap();
    api::create_person(&mut conn, &ana());
    api::create_item(&mut conn, &fix_bug());

    let response = api::assign_person(&mut conn, "t001", "f001");
    assert_eq!(response.status, 200);
    assert_eq!(response.body, Body::Text("Person assigned successfully".to_string()));

    let response = api::unassign_person(&mut conn, "t001", "f001");
    assert_eq!(response.status, 200);
    assert_eq!(
        response.body,
        Body::Text("Person unassigned successfully".to_string())
    );
}

#[test]
fn assign_reports_the_missing_item_side_first() {
    let mut conn = open_db_in_memory().unwrap();
    api::create_person(&mut conn, &ana());

    let response = api::assign_person(&mut conn, "t404", "f001");
    assert_eq!(response.status, 404);
    assert!(matches!(response.body, Body::Text(ref text) if text.contains("item id `t404`")));

    let response = api::assign_person(&mut conn, "x404", "f001");
    assert_eq!(response.status, 400, "convention failure beats existence");
}

#[test]
fn board_returns_the_aggregated_shape() {
    let mut conn = open_db_in_memory().unwrap();
    api::create_person(&mut conn, &ana());
    api::create_item(&mut conn, &fix_bug());
    api::assign_person(&mut conn, "t001", "f001");

    let response = api::board(&mut conn);
    assert_eq!(response.status, 200);

    let value = serde_json::to_value(&response.body).unwrap();
    assert_eq!(value[0]["id"], "t001");
    assert_eq!(value[0]["responsibles"][0]["id"], "f001");
}

#[test]
fn create_item_body_round_trips_through_serde() {
    // The orchestrator hands this layer parsed payloads; any subset of the
    // body fields must deserialize, with absence classified later.
    let request: CreateItemRequest = serde_json::from_str(r#"{"id":"t001"}"#).unwrap();
    assert_eq!(request.id.as_deref(), Some("t001"));
    assert!(request.title.is_none());

    let mut conn = open_db_in_memory().unwrap();
    let response = api::create_item(&mut conn, &request);
    assert_eq!(response.status, 400);
    assert_eq!(
        response.body,
        Body::Text("invalid title: value is required".to_string())
    );
}
