// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use std::collections::HashMap;

pub const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Accepts `YYYY-MM-DD HH:MM[:SS]`; a bare date means midnight.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, DATETIME_FMT) {
        return Ok(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M") {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN))
        .with_context(|| format!("Invalid datetime '{}', expected YYYY-MM-DD [HH:MM[:SS]]", s))
}

pub fn parse_db_datetime(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, DATETIME_FMT)
        .with_context(|| format!("Invalid stored datetime '{}'", s))
}

pub fn fmt_datetime(dt: NaiveDateTime) -> String {
    dt.format(DATETIME_FMT).to_string()
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn fmt_money(d: &Decimal, ccy: &str) -> String {
    format!("{} {}", ccy, d.round_dp(2))
}

pub fn fmt_percent(d: &Decimal) -> String {
    format!("{}%", d.round_dp(1))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

/// Resolve a category by name within a domain; BOTH categories match either
/// domain. `domain` is the stored kind string, 'TASK' or 'TRANSACTION'.
pub fn id_for_category(conn: &Connection, name: &str, domain: &str) -> Result<i64> {
    let mut stmt =
        conn.prepare("SELECT id FROM categories WHERE name=?1 AND (kind=?2 OR kind='BOTH')")?;
    let id: i64 = stmt
        .query_row(params![name, domain], |r| r.get(0))
        .with_context(|| format!("Category '{}' not found", name))?;
    Ok(id)
}

/// One id -> name map per call site, so display lookups stay O(1) instead of
/// rescanning the category list per row.
pub fn category_names(conn: &Connection) -> Result<HashMap<i64, String>> {
    let mut stmt = conn.prepare("SELECT id, name FROM categories")?;
    let rows = stmt.query_map([], |r| Ok((r.get::<_, i64>(0)?, r.get::<_, String>(1)?)))?;
    let mut map = HashMap::new();
    for row in rows {
        let (id, name) = row?;
        map.insert(id, name);
    }
    Ok(map)
}

/// Display label for a category reference. `None` and dangling ids both
/// resolve to the uncategorized bucket.
pub fn category_label(names: &HashMap<i64, String>, category_id: Option<i64>) -> String {
    category_id
        .and_then(|id| names.get(&id).cloned())
        .unwrap_or_else(|| "Uncategorized".to_string())
}

// Display currency settings
pub fn get_currency(conn: &Connection) -> Result<String> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key='currency'", [], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v.unwrap_or_else(|| "USD".to_string()))
}

pub fn set_currency(conn: &Connection, ccy: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('currency', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![ccy.to_uppercase()],
    )?;
    Ok(())
}

// First day of week consumed by the THIS_WEEK range
pub fn get_week_start(conn: &Connection) -> Result<Weekday> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key='week_start'",
            [],
            |r| r.get(0),
        )
        .optional()?;
    match v {
        Some(s) => s
            .parse::<Weekday>()
            .ok()
            .with_context(|| format!("Invalid stored week_start '{}'", s)),
        None => Ok(Weekday::Mon),
    }
}

pub fn set_week_start(conn: &Connection, day: &str) -> Result<()> {
    let parsed: Weekday = day
        .parse()
        .ok()
        .with_context(|| format!("Invalid week start '{}', expected a weekday name", day))?;
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('week_start', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![format!("{:?}", parsed).to_lowercase()],
    )?;
    Ok(())
}
