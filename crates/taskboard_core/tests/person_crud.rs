use rusqlite::Connection;
use taskboard_core::db::open_db_in_memory;
use taskboard_core::{Person, PersonRepository, RepoError, SqlitePersonRepository};

fn ana() -> Person {
    Person::new("f001", "Ana", "a@x.com", "secret")
}

#[test]
fn create_and_list_roundtrip() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqlitePersonRepository::try_new(&mut conn).unwrap();

    repo.create(&ana()).unwrap();
    repo.create(&Person::new("f002", "Bruno", "b@x.com", "pw"))
        .unwrap();

    let all = repo.list_all().unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().any(|person| person.id == "f001"));
    assert!(all.iter().any(|person| person.id == "f002"));
}

#[test]
fn search_by_name_is_case_sensitive_substring() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqlitePersonRepository::try_new(&mut conn).unwrap();

    repo.create(&ana()).unwrap();
    repo.create(&Person::new("f002", "Mariana", "m@x.com", "pw"))
        .unwrap();
    repo.create(&Person::new("f003", "anabel", "n@x.com", "pw"))
        .unwrap();

    let hits = repo.search_by_name("ana").unwrap();
    let ids: Vec<&str> = hits.iter().map(|person| person.id.as_str()).collect();
    assert!(ids.contains(&"f002"), "Mariana contains `ana`");
    assert!(ids.contains(&"f003"), "anabel contains `ana`");
    assert!(!ids.contains(&"f001"), "Ana does not contain lowercase `ana`");
}

#[test]
fn empty_fragment_returns_full_collection() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqlitePersonRepository::try_new(&mut conn).unwrap();

    repo.create(&ana()).unwrap();
    repo.create(&Person::new("f002", "Bruno", "b@x.com", "pw"))
        .unwrap();

    assert_eq!(repo.search_by_name("").unwrap().len(), 2);
}

#[test]
fn duplicate_id_is_a_conflict_and_never_mutates_the_store() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqlitePersonRepository::try_new(&mut conn).unwrap();

    repo.create(&ana()).unwrap();
    let err = repo
        .create(&Person::new("f001", "Other", "other@x.com", "pw"))
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));
    assert_eq!(err.http_status(), 400);

    let all = repo.list_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "Ana");
}

#[test]
fn duplicate_email_on_another_row_is_a_conflict() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqlitePersonRepository::try_new(&mut conn).unwrap();

    repo.create(&ana()).unwrap();
    let err = repo
        .create(&Person::new("f002", "Clone", "a@x.com", "pw"))
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));
    assert!(err.to_string().contains("a@x.com"));
    assert_eq!(repo.list_all().unwrap().len(), 1);
}

#[test]
fn invalid_fields_are_rejected_before_any_write() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqlitePersonRepository::try_new(&mut conn).unwrap();

    let cases = [
        Person::new("u001", "Ana", "a@x.com", "pw"),
        Person::new("f01", "Ana", "a@x.com", "pw"),
        Person::new("f001", "A", "a@x.com", "pw"),
        Person::new("f001", "Ana", "not-an-email", "pw"),
    ];
    for person in cases {
        let err = repo.create(&person).unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)), "{person:?}");
        assert_eq!(err.http_status(), 400);
    }

    assert!(repo.list_all().unwrap().is_empty());
}

#[test]
fn delete_missing_person_is_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqlitePersonRepository::try_new(&mut conn).unwrap();

    let err = repo.delete_by_id("f404").unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "person", .. }));
    assert_eq!(err.http_status(), 404);
}

#[test]
fn delete_validates_the_id_convention_first() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqlitePersonRepository::try_new(&mut conn).unwrap();

    let err = repo.delete_by_id("nope").unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[test]
fn delete_removes_the_row() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqlitePersonRepository::try_new(&mut conn).unwrap();

    repo.create(&ana()).unwrap();
    repo.delete_by_id("f001").unwrap();
    assert!(repo.list_all().unwrap().is_empty());
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let mut conn = Connection::open_in_memory().unwrap();

    match SqlitePersonRepository::try_new(&mut conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_persons_table() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!(
        "PRAGMA user_version = {};",
        taskboard_core::db::migrations::latest_version()
    ))
    .unwrap();

    let result = SqlitePersonRepository::try_new(&mut conn);
    assert!(matches!(result, Err(RepoError::MissingRequiredTable("persons"))));
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE persons (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!(
        "PRAGMA user_version = {};",
        taskboard_core::db::migrations::latest_version()
    ))
    .unwrap();

    let result = SqlitePersonRepository::try_new(&mut conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "persons",
            column: "email"
        })
    ));
}
