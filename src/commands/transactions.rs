// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::{self, DateRange};
use crate::models::{Transaction, TransactionType};
use crate::utils::{
    category_label, category_names, fmt_datetime, get_week_start, id_for_category,
    maybe_print_json, parse_datetime, parse_db_datetime, parse_decimal, pretty_table,
};
use anyhow::{bail, Context, Result};
use chrono::Local;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde::Serialize;

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
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    if amount < Decimal::ZERO {
        bail!("Amount must be non-negative, got {}", amount);
    }
    let kind: TransactionType = sub.get_one::<String>("type").unwrap().parse()?;
    let description = sub.get_one::<String>("desc").unwrap();
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_datetime(s)?,
        None => Local::now().naive_local(),
    };
    let category_id = sub
        .get_one::<String>("category")
        .map(|name| id_for_category(conn, name, "TRANSACTION"))
        .transpose()?;
    let method = sub.get_one::<String>("method");
    let tags = sub.get_one::<String>("tags");
    let note = sub.get_one::<String>("note");
    let photo = sub.get_one::<String>("photo");

    conn.execute(
        "INSERT INTO transactions(description, amount, date, kind, category_id, payment_method, tags, note, photo_ref)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            description,
            amount.to_string(),
            fmt_datetime(date),
            kind.as_str(),
            category_id,
            method,
            tags,
            note,
            photo
        ],
    )?;
    println!(
        "Recorded {} {} for '{}' on {}",
        kind.as_str(),
        amount,
        description,
        date.date()
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.kind.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.description.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Type", "Amount", "Category", "Description"],
                rows,
            )
        );
    }
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let n = conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    if n == 0 {
        bail!("Transaction {} not found", id);
    }
    println!("Deleted transaction {}", id);
    Ok(())
}

/// Materialize the full transaction snapshot. Filtering and ordering happen
/// in memory via `analytics`, not in SQL.
pub fn load_all(conn: &Connection) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, description, amount, date, kind, category_id, payment_method, tags, note, photo_ref
         FROM transactions",
    )?;
    let mut rows = stmt.query([])?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let amount_s: String = r.get(2)?;
        let date_s: String = r.get(3)?;
        let kind_s: String = r.get(4)?;
        data.push(Transaction {
            id,
            description: r.get(1)?,
            amount: parse_decimal(&amount_s)
                .with_context(|| format!("Invalid stored amount for transaction {}", id))?,
            date: parse_db_datetime(&date_s)?,
            kind: kind_s.parse()?,
            category_id: r.get(5)?,
            payment_method: r.get(6)?,
            tags: r.get(7)?,
            note: r.get(8)?,
            photo_ref: r.get(9)?,
        });
    }
    Ok(data)
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub kind: String,
    pub amount: String,
    pub category: String,
    pub description: String,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let range: DateRange = sub.get_one::<String>("range").unwrap().parse()?;
    let kind = sub
        .get_one::<String>("type")
        .map(|s| s.parse::<TransactionType>())
        .transpose()?;

    let all = load_all(conn)?;
    let week_start = get_week_start(conn)?;
    let mut filtered = analytics::filter(&all, range.resolve(week_start), kind);

    if let Some(name) = sub.get_one::<String>("category") {
        let cat_id = id_for_category(conn, name, "TRANSACTION")?;
        filtered.retain(|t| t.category_id == Some(cat_id));
    }
    if let Some(limit) = sub.get_one::<usize>("limit") {
        filtered.truncate(*limit);
    }

    let names = category_names(conn)?;
    Ok(filtered
        .into_iter()
        .map(|t| TransactionRow {
            id: t.id,
            date: fmt_datetime(t.date),
            kind: t.kind.as_str().to_string(),
            amount: format!("{:.2}", t.amount),
            category: category_label(&names, t.category_id),
            description: t.description,
        })
        .collect())
}
