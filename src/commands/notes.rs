// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Note;
use crate::utils::{fmt_datetime, maybe_print_json, parse_db_datetime, pretty_table};
use anyhow::{anyhow, bail, Result};
use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rusqlite::{params, Connection};
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let title = sub.get_one::<String>("title").unwrap();
    let body = sub.get_one::<String>("body").unwrap();

    // A blank password means the note stays unlocked.
    let password_hash = if sub.get_flag("locked") {
        let password = rpassword::prompt_password("Password: ")?;
        if password.is_empty() {
            None
        } else {
            let confirm = rpassword::prompt_password("Confirm password: ")?;
            if password != confirm {
                bail!("Passwords do not match");
            }
            Some(hash_password(&password)?)
        }
    } else {
        None
    };

    conn.execute(
        "INSERT INTO notes(title, body, password_hash) VALUES (?1, ?2, ?3)",
        params![title, body, password_hash],
    )?;
    if password_hash.is_some() {
        println!("Created locked note '{}'", title);
    } else {
        println!("Created note '{}'", title);
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let search = sub.get_one::<String>("search").map(|s| s.as_str());
    let locked = if sub.get_flag("locked") {
        Some(true)
    } else if sub.get_flag("unlocked") {
        Some(false)
    } else {
        None
    };

    let notes = load_all(conn)?;
    let visible = filter_notes(&notes, search, locked);
    let data: Vec<NoteRow> = visible
        .iter()
        .map(|n| NoteRow {
            id: n.id,
            title: n.title.clone(),
            locked: n.is_locked(),
            preview: preview(n),
            updated_at: fmt_datetime(n.updated_at),
        })
        .collect();

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.title.clone(),
                    if r.locked { "yes" } else { "" }.to_string(),
                    r.preview.clone(),
                    r.updated_at.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Title", "Locked", "Preview", "Updated"], rows)
        );
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let note = load_one(conn, id)?;

    if let Some(ref hash) = note.password_hash {
        let attempt = rpassword::prompt_password("Password: ")?;
        if !verify_password(hash, &attempt)? {
            bail!("Incorrect password");
        }
    }

    println!("{}", note.title);
    println!("Created {} / Updated {}", note.created_at, note.updated_at);
    if !note.body.is_empty() {
        println!();
        println!("{}", note.body);
    }
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let n = conn.execute("DELETE FROM notes WHERE id=?1", params![id])?;
    if n == 0 {
        bail!("Note {} not found", id);
    }
    println!("Deleted note {}", id);
    Ok(())
}

pub fn load_all(conn: &Connection) -> Result<Vec<Note>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, body, password_hash, created_at, updated_at
         FROM notes ORDER BY updated_at DESC, id DESC",
    )?;
    let mut rows = stmt.query([])?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let created_s: String = r.get(4)?;
        let updated_s: String = r.get(5)?;
        data.push(Note {
            id: r.get(0)?,
            title: r.get(1)?,
            body: r.get(2)?,
            password_hash: r.get(3)?,
            created_at: parse_db_datetime(&created_s)?,
            updated_at: parse_db_datetime(&updated_s)?,
        });
    }
    Ok(data)
}

fn load_one(conn: &Connection, id: i64) -> Result<Note> {
    let all = load_all(conn)?;
    all.into_iter()
        .find(|n| n.id == id)
        .ok_or_else(|| anyhow!("Note {} not found", id))
}

/// Search matches title or body case-insensitively (locked bodies are
/// searchable, just never displayed). `locked` narrows to locked/unlocked.
pub fn filter_notes(notes: &[Note], search: Option<&str>, locked: Option<bool>) -> Vec<Note> {
    let needle = search.map(|s| s.to_lowercase());
    notes
        .iter()
        .filter(|n| {
            let matches_search = needle.as_deref().is_none_or(|q| {
                n.title.to_lowercase().contains(q) || n.body.to_lowercase().contains(q)
            });
            let matches_lock = locked.is_none_or(|want| n.is_locked() == want);
            matches_search && matches_lock
        })
        .cloned()
        .collect()
}

/// First 50 characters of the body, but only for unlocked notes.
pub fn preview(note: &Note) -> String {
    if note.is_locked() {
        return "[locked]".to_string();
    }
    let mut p: String = note.body.chars().take(50).collect();
    if note.body.chars().count() > 50 {
        p.push_str("...");
    }
    p
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("Password hashing failed: {}", e))?;
    Ok(hash.to_string())
}

pub fn verify_password(hash: &str, password: &str) -> Result<bool> {
    let parsed =
        PasswordHash::new(hash).map_err(|e| anyhow!("Invalid stored password hash: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[derive(Serialize)]
pub struct NoteRow {
    pub id: i64,
    pub title: String,
    pub locked: bool,
    pub preview: String,
    pub updated_at: String,
}
