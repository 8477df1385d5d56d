// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::TransactionType;
use crate::utils::{fmt_datetime, id_for_category, parse_datetime, parse_decimal};
use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::collections::{hash_map::Entry, HashMap};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => import_transactions(conn, sub),
        _ => Ok(()),
    }
}

/// CSV header: date,description,amount,type,category,method,tags,note.
/// All-or-nothing: any malformed row aborts the whole import.
fn import_transactions(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let tx = conn.transaction()?;
    let mut category_cache: HashMap<String, i64> = HashMap::new();
    let mut imported = 0usize;

    for result in rdr.records() {
        let rec = result?;
        let date_raw = rec.get(0).context("date missing")?.trim().to_string();
        let description = rec.get(1).context("description missing")?.trim().to_string();
        let amount_raw = rec.get(2).context("amount missing")?.trim().to_string();
        let kind_raw = rec.get(3).context("type missing")?.trim().to_string();
        let category = rec.get(4).unwrap_or("").trim().to_string();
        let method = rec
            .get(5)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());
        let tags = rec
            .get(6)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());
        let note = rec
            .get(7)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());

        let date = parse_datetime(&date_raw)
            .with_context(|| format!("Invalid transaction date '{}'", date_raw))?;
        let amount = parse_decimal(&amount_raw)
            .with_context(|| format!("Invalid amount '{}' for {}", amount_raw, description))?;
        if amount < Decimal::ZERO {
            bail!("Negative amount '{}' for {}", amount_raw, description);
        }
        let kind: TransactionType = kind_raw
            .parse()
            .with_context(|| format!("Invalid type '{}' for {}", kind_raw, description))?;

        let cat_id = if category.is_empty() {
            None
        } else {
            let id = match category_cache.entry(category.clone()) {
                Entry::Occupied(entry) => *entry.get(),
                Entry::Vacant(entry) => {
                    let fetched = id_for_category(&tx, &category, "TRANSACTION")?;
                    *entry.insert(fetched)
                }
            };
            Some(id)
        };

        tx.execute(
            "INSERT INTO transactions(description, amount, date, kind, category_id, payment_method, tags, note) \
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8)",
            params![
                description,
                amount.to_string(),
                fmt_datetime(date),
                kind.as_str(),
                cat_id,
                method,
                tags,
                note
            ],
        )?;
        imported += 1;
    }
    tx.commit()?;
    println!("Imported {} transactions from {}", imported, path);
    Ok(())
}
