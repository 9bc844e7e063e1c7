//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `taskboard_core` wiring.
//! - Keep output deterministic for quick local sanity checks.

use taskboard_core::api::{self, CreateItemRequest, CreatePersonRequest};
use taskboard_core::db::open_db_in_memory;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("taskboard_core ping={}", taskboard_core::ping());
    println!("taskboard_core version={}", taskboard_core::core_version());

    // Seed an in-memory store and dump the aggregated board, exercising the
    // full create/assign/aggregate path without any transport in front.
    let mut conn = open_db_in_memory()?;

    let person = CreatePersonRequest {
        id: Some("f001".to_string()),
        name: Some("Ana".to_string()),
        email: Some("a@x.com".to_string()),
        password: Some("secret".to_string()),
    };
    let item = CreateItemRequest {
        id: Some("t001".to_string()),
        title: Some("Fix bug".to_string()),
        description: Some("crash on save".to_string()),
    };

    for response in [
        api::create_person(&mut conn, &person),
        api::create_item(&mut conn, &item),
        api::assign_person(&mut conn, "t001", "f001"),
    ] {
        println!("status={} body={}", response.status, serde_json::to_string(&response.body)?);
    }

    let board = api::board(&mut conn);
    println!(
        "board status={} body={}",
        board.status,
        serde_json::to_string_pretty(&board.body)?
    );

    Ok(())
}
