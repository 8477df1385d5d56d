// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Category, CategoryKind};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{bail, Result};
use rusqlite::{params, Connection};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let kind: CategoryKind = sub.get_one::<String>("kind").unwrap().parse()?;
    let icon = sub.get_one::<String>("icon").map(|s| s.as_str()).unwrap_or("Category");
    let color = sub
        .get_one::<String>("color")
        .map(|s| s.as_str())
        .unwrap_or("#6650a4");
    conn.execute(
        "INSERT INTO categories(name, kind, icon, color, is_custom) VALUES (?1, ?2, ?3, ?4, 1)",
        params![name, kind.as_str(), icon, color],
    )?;
    println!("Added {} category '{}'", kind.as_str(), name);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let kind = sub
        .get_one::<String>("kind")
        .map(|s| s.parse::<CategoryKind>())
        .transpose()?;

    let mut cats = load_all(conn)?;
    if let Some(k) = kind {
        cats.retain(|c| c.matches_kind(k));
    }

    if !maybe_print_json(json_flag, jsonl_flag, &cats)? {
        let rows: Vec<Vec<String>> = cats
            .iter()
            .map(|c| {
                vec![
                    c.id.to_string(),
                    c.name.clone(),
                    c.kind.as_str().to_string(),
                    c.color.clone(),
                    if c.is_custom { "yes" } else { "" }.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Name", "Kind", "Color", "Custom"], rows)
        );
    }
    Ok(())
}

/// Only user-created categories are deletable; the stock set stays.
fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let n = conn.execute(
        "DELETE FROM categories WHERE name=?1 AND is_custom=1",
        params![name],
    )?;
    if n == 0 {
        let exists: i64 = conn.query_row(
            "SELECT COUNT(*) FROM categories WHERE name=?1",
            params![name],
            |r| r.get(0),
        )?;
        if exists > 0 {
            bail!("Category '{}' is built-in and cannot be removed", name);
        }
        bail!("Category '{}' not found", name);
    }
    println!("Removed category '{}'", name);
    Ok(())
}

/// Snapshot ordered stock-first then by name, the order pickers expect.
pub fn load_all(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, kind, icon, color, is_custom FROM categories
         ORDER BY is_custom ASC, name ASC",
    )?;
    let mut rows = stmt.query([])?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let kind_s: String = r.get(2)?;
        data.push(Category {
            id: r.get(0)?,
            name: r.get(1)?,
            kind: kind_s.parse()?,
            icon: r.get(3)?,
            color: r.get(4)?,
            is_custom: r.get(5)?,
        });
    }
    Ok(data)
}
