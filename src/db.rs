// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{params, Connection};
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Lifeclip", "lifeclip"));

// (name, kind, icon, color) seeded on first run only.
const DEFAULT_CATEGORIES: &[(&str, &str, &str, &str)] = &[
    ("Work", "TASK", "Work", "#1976D2"),
    ("Personal", "TASK", "Person", "#7B1FA2"),
    ("Shopping", "BOTH", "ShoppingCart", "#E91E63"),
    ("Health", "BOTH", "HealthAndSafety", "#4CAF50"),
    ("Education", "BOTH", "School", "#FF9800"),
    ("Fitness", "TASK", "FitnessCenter", "#F44336"),
    ("Food & Dining", "TRANSACTION", "Restaurant", "#FF5722"),
    ("Transport", "TRANSACTION", "DirectionsCar", "#3F51B5"),
    ("Entertainment", "TRANSACTION", "Movie", "#9C27B0"),
    ("Utilities", "TRANSACTION", "ElectricalServices", "#607D8B"),
    ("Salary", "TRANSACTION", "AccountBalance", "#4CAF50"),
    ("Freelance", "TRANSACTION", "Laptop", "#00BCD4"),
    ("Investment", "TRANSACTION", "TrendingUp", "#009688"),
    ("Gift", "TRANSACTION", "CardGiftcard", "#E91E63"),
];

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("lifeclip.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    seed_default_categories(&conn)?;
    Ok(conn)
}

fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS categories(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('TASK','TRANSACTION','BOTH')),
        icon TEXT NOT NULL DEFAULT 'Category',
        color TEXT NOT NULL DEFAULT '#6650a4',
        is_custom INTEGER NOT NULL DEFAULT 0,
        UNIQUE(name, kind)
    );

    CREATE TABLE IF NOT EXISTS tasks(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        description TEXT,
        deadline TEXT NOT NULL,
        is_completed INTEGER NOT NULL DEFAULT 0,
        priority TEXT NOT NULL DEFAULT 'MEDIUM' CHECK(priority IN ('LOW','MEDIUM','HIGH')),
        category_id INTEGER,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        completed_at TEXT,
        FOREIGN KEY(category_id) REFERENCES categories(id) ON DELETE SET NULL
    );
    CREATE INDEX IF NOT EXISTS idx_tasks_deadline ON tasks(deadline);

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        description TEXT NOT NULL,
        amount TEXT NOT NULL,
        date TEXT NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('INCOME','EXPENSE')),
        category_id INTEGER,
        payment_method TEXT,
        tags TEXT,
        note TEXT,
        photo_ref TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(category_id) REFERENCES categories(id) ON DELETE SET NULL
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);

    CREATE TABLE IF NOT EXISTS notes(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        body TEXT NOT NULL DEFAULT '',
        password_hash TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    )?;
    Ok(())
}

/// Install the stock category set, but only into an empty table so user
/// edits and deletions survive restarts.
fn seed_default_categories(conn: &Connection) -> Result<()> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM categories", [], |r| r.get(0))?;
    if count > 0 {
        return Ok(());
    }
    let mut stmt = conn.prepare(
        "INSERT INTO categories(name, kind, icon, color, is_custom) VALUES (?1, ?2, ?3, ?4, 0)",
    )?;
    for (name, kind, icon, color) in DEFAULT_CATEGORIES {
        stmt.execute(params![name, kind, icon, color])?;
    }
    Ok(())
}
