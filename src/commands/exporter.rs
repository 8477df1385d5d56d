// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{notes, tasks, transactions};
use crate::utils::{category_label, category_names, fmt_datetime};
use anyhow::{bail, Result};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export(conn, sub, Kind::Transactions),
        Some(("tasks", sub)) => export(conn, sub, Kind::Tasks),
        Some(("notes", sub)) => export(conn, sub, Kind::Notes),
        _ => Ok(()),
    }
}

enum Kind {
    Transactions,
    Tasks,
    Notes,
}

fn export(conn: &Connection, sub: &clap::ArgMatches, kind: Kind) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }

    let (what, header, rows) = match kind {
        Kind::Transactions => transaction_rows(conn)?,
        Kind::Tasks => task_rows(conn)?,
        Kind::Notes => note_rows(conn)?,
    };

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(&header)?;
            for row in &rows {
                wtr.write_record(row)?;
            }
            wtr.flush()?;
        }
        _ => {
            let items: Vec<serde_json::Value> = rows
                .iter()
                .map(|row| {
                    let obj: serde_json::Map<String, serde_json::Value> = header
                        .iter()
                        .zip(row.iter())
                        .map(|(k, v)| (k.to_string(), json!(v)))
                        .collect();
                    serde_json::Value::Object(obj)
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
    }
    println!("Exported {} to {}", what, out);
    Ok(())
}

type Export = (&'static str, Vec<&'static str>, Vec<Vec<String>>);

fn transaction_rows(conn: &Connection) -> Result<Export> {
    let names = category_names(conn)?;
    let rows = transactions::load_all(conn)?
        .into_iter()
        .map(|t| {
            vec![
                fmt_datetime(t.date),
                t.description,
                t.amount.to_string(),
                t.kind.as_str().to_string(),
                category_label(&names, t.category_id),
                t.payment_method.unwrap_or_default(),
                t.tags.unwrap_or_default(),
                t.note.unwrap_or_default(),
            ]
        })
        .collect();
    Ok((
        "transactions",
        vec![
            "date",
            "description",
            "amount",
            "type",
            "category",
            "method",
            "tags",
            "note",
        ],
        rows,
    ))
}

fn task_rows(conn: &Connection) -> Result<Export> {
    let names = category_names(conn)?;
    let rows = tasks::load_all(conn)?
        .into_iter()
        .map(|t| {
            vec![
                t.title,
                t.description.unwrap_or_default(),
                t.deadline.to_string(),
                t.priority.as_str().to_string(),
                category_label(&names, t.category_id),
                if t.is_completed { "yes" } else { "no" }.to_string(),
                fmt_datetime(t.created_at),
                t.completed_at.map(fmt_datetime).unwrap_or_default(),
            ]
        })
        .collect();
    Ok((
        "tasks",
        vec![
            "title",
            "description",
            "deadline",
            "priority",
            "category",
            "completed",
            "created_at",
            "completed_at",
        ],
        rows,
    ))
}

/// Locked notes export their metadata only; bodies and password hashes
/// never leave the store.
fn note_rows(conn: &Connection) -> Result<Export> {
    let rows = notes::load_all(conn)?
        .into_iter()
        .map(|n| {
            let locked = n.is_locked();
            vec![
                n.title,
                if locked { "yes" } else { "no" }.to_string(),
                if locked { String::new() } else { n.body },
                fmt_datetime(n.created_at),
                fmt_datetime(n.updated_at),
            ]
        })
        .collect();
    Ok((
        "notes",
        vec!["title", "locked", "body", "created_at", "updated_at"],
        rows,
    ))
}
