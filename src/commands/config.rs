// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{get_currency, get_week_start, pretty_table, set_currency, set_week_start};
use anyhow::{bail, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => show(conn)?,
        Some(("set", sub)) => set(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn show(conn: &Connection) -> Result<()> {
    let rows = vec![
        vec!["currency".to_string(), get_currency(conn)?],
        vec![
            "week-start".to_string(),
            format!("{:?}", get_week_start(conn)?).to_lowercase(),
        ],
    ];
    println!("{}", pretty_table(&["Setting", "Value"], rows));
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let key = sub.get_one::<String>("key").unwrap();
    let value = sub.get_one::<String>("value").unwrap();
    match key.as_str() {
        "currency" => set_currency(conn, value)?,
        "week-start" => set_week_start(conn, value)?,
        _ => bail!("Unknown setting '{}', expected currency|week-start", key),
    }
    println!("Set {} = {}", key, value);
    Ok(())
}
