// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    // 1) Category references pointing at nothing
    let mut stmt = conn.prepare(
        "SELECT t.id FROM transactions t LEFT JOIN categories c ON t.category_id=c.id
         WHERE t.category_id IS NOT NULL AND c.id IS NULL",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        rows.push(vec!["txn_dangling_category".into(), format!("tx {}", id)]);
    }
    let mut stmt2 = conn.prepare(
        "SELECT t.id FROM tasks t LEFT JOIN categories c ON t.category_id=c.id
         WHERE t.category_id IS NOT NULL AND c.id IS NULL",
    )?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let id: i64 = r.get(0)?;
        rows.push(vec!["task_dangling_category".into(), format!("task {}", id)]);
    }

    // 2) Records filed under a category of the wrong kind
    let mut stmt3 = conn.prepare(
        "SELECT t.id, c.name FROM transactions t JOIN categories c ON t.category_id=c.id
         WHERE c.kind='TASK'",
    )?;
    let mut cur3 = stmt3.query([])?;
    while let Some(r) = cur3.next()? {
        let id: i64 = r.get(0)?;
        let name: String = r.get(1)?;
        rows.push(vec![
            "txn_task_only_category".into(),
            format!("tx {} -> {}", id, name),
        ]);
    }
    let mut stmt4 = conn.prepare(
        "SELECT t.id, c.name FROM tasks t JOIN categories c ON t.category_id=c.id
         WHERE c.kind='TRANSACTION'",
    )?;
    let mut cur4 = stmt4.query([])?;
    while let Some(r) = cur4.next()? {
        let id: i64 = r.get(0)?;
        let name: String = r.get(1)?;
        rows.push(vec![
            "task_txn_only_category".into(),
            format!("task {} -> {}", id, name),
        ]);
    }

    // 3) Completed tasks without a completion timestamp
    let mut stmt5 =
        conn.prepare("SELECT id FROM tasks WHERE is_completed=1 AND completed_at IS NULL")?;
    let mut cur5 = stmt5.query([])?;
    while let Some(r) = cur5.next()? {
        let id: i64 = r.get(0)?;
        rows.push(vec![
            "task_missing_completed_at".into(),
            format!("task {}", id),
        ]);
    }

    // 4) Stored amounts that no longer parse, or went negative
    let mut stmt6 = conn.prepare("SELECT id, amount FROM transactions")?;
    let mut cur6 = stmt6.query([])?;
    while let Some(r) = cur6.next()? {
        let id: i64 = r.get(0)?;
        let raw: String = r.get(1)?;
        match parse_decimal(&raw) {
            Ok(d) if d < Decimal::ZERO => {
                rows.push(vec!["negative_amount".into(), format!("tx {}: {}", id, raw)]);
            }
            Ok(_) => {}
            Err(_) => {
                rows.push(vec!["bad_amount".into(), format!("tx {}: {}", id, raw)]);
            }
        }
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
