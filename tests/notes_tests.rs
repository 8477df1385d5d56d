// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use lifeclip::commands::notes::{self, filter_notes, hash_password, preview, verify_password};
use lifeclip::models::Note;
use lifeclip::{cli, commands};
use rusqlite::Connection;

fn note(id: i64, title: &str, body: &str, locked: bool) -> Note {
    let stamp = NaiveDate::from_ymd_opt(2025, 5, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    Note {
        id,
        title: title.to_string(),
        body: body.to_string(),
        password_hash: locked.then(|| "$argon2id$stub".to_string()),
        created_at: stamp,
        updated_at: stamp,
    }
}

#[test]
fn password_roundtrip_verifies() {
    let hash = hash_password("hunter2").unwrap();
    assert!(verify_password(&hash, "hunter2").unwrap());
    assert!(!verify_password(&hash, "hunter3").unwrap());
}

#[test]
fn same_password_hashes_differently_per_note() {
    // Fresh salt per hash
    let a = hash_password("same").unwrap();
    let b = hash_password("same").unwrap();
    assert_ne!(a, b);
    assert!(verify_password(&a, "same").unwrap());
    assert!(verify_password(&b, "same").unwrap());
}

#[test]
fn filter_matches_title_and_body_case_insensitively() {
    let all = vec![
        note(1, "Groceries", "milk, EGGS", false),
        note(2, "Ideas", "side project", true),
    ];
    let by_title = filter_notes(&all, Some("grocer"), None);
    assert_eq!(by_title.len(), 1);
    assert_eq!(by_title[0].id, 1);

    // Locked bodies are still searchable, just never displayed
    let by_body = filter_notes(&all, Some("PROJECT"), None);
    assert_eq!(by_body.len(), 1);
    assert_eq!(by_body[0].id, 2);
}

#[test]
fn filter_narrows_by_lock_state() {
    let all = vec![
        note(1, "a", "", false),
        note(2, "b", "", true),
        note(3, "c", "", true),
    ];
    assert_eq!(filter_notes(&all, None, Some(true)).len(), 2);
    assert_eq!(filter_notes(&all, None, Some(false)).len(), 1);
    assert_eq!(filter_notes(&all, None, None).len(), 3);
}

#[test]
fn preview_hides_locked_bodies_and_truncates() {
    let locked = note(1, "secret", "top secret plans", true);
    assert_eq!(preview(&locked), "[locked]");

    let long_body = "x".repeat(60);
    let long = note(2, "long", &long_body, false);
    let p = preview(&long);
    assert_eq!(p.chars().count(), 53);
    assert!(p.ends_with("..."));

    let short = note(3, "short", "hi", false);
    assert_eq!(preview(&short), "hi");
}

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE notes(
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            body TEXT NOT NULL DEFAULT '',
            password_hash TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )
    .unwrap();
    conn
}

fn note_matches(args: &[&str]) -> clap::ArgMatches {
    let mut full = vec!["lifeclip", "note"];
    full.extend_from_slice(args);
    cli::build_cli().get_matches_from(full)
}

#[test]
fn add_unlocked_note_stores_no_hash() {
    let conn = setup();
    let matches = note_matches(&["add", "--title", "Todo", "--body", "call the bank"]);
    if let Some(("note", note_m)) = matches.subcommand() {
        commands::notes::handle(&conn, note_m).unwrap();
    } else {
        panic!("no note subcommand");
    }
    let loaded = notes::load_all(&conn).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].title, "Todo");
    assert_eq!(loaded[0].body, "call the bank");
    assert!(!loaded[0].is_locked());
}

#[test]
fn rm_reports_missing_note() {
    let conn = setup();
    let matches = note_matches(&["rm", "42"]);
    if let Some(("note", note_m)) = matches.subcommand() {
        let err = commands::notes::handle(&conn, note_m).unwrap_err();
        assert!(err.to_string().contains("Note 42 not found"));
    } else {
        panic!("no note subcommand");
    }
}
