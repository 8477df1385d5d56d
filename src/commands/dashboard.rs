// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::{self, DateRange};
use crate::commands::{notes, tasks, transactions};
use crate::utils::{
    category_label, category_names, fmt_money, fmt_percent, get_currency, get_week_start,
    pretty_table,
};
use anyhow::Result;
use rusqlite::Connection;

/// One-shot snapshot of everything: month finances, task counters with the
/// next deadlines, latest transactions, note counts.
pub fn handle(conn: &Connection) -> Result<()> {
    let ccy = get_currency(conn)?;
    let week_start = get_week_start(conn)?;
    let names = category_names(conn)?;

    let all_tx = transactions::load_all(conn)?;
    let this_month = analytics::filter(&all_tx, DateRange::ThisMonth.resolve(week_start), None);
    let stats = analytics::compute_stats(&this_month);

    println!(
        "{}",
        pretty_table(
            &["Financial overview (month)", ""],
            vec![
                vec!["Income".into(), fmt_money(&stats.total_income, &ccy)],
                vec!["Expenses".into(), fmt_money(&stats.total_expenses, &ccy)],
                vec!["Balance".into(), fmt_money(&stats.balance, &ccy)],
                vec!["Savings rate".into(), fmt_percent(&stats.savings_rate())],
            ],
        )
    );

    let all_tasks = tasks::load_all(conn)?;
    let tstats = tasks::task_stats(&all_tasks);
    println!(
        "{}",
        pretty_table(
            &["Tasks", ""],
            vec![
                vec!["Pending".into(), tstats.pending.to_string()],
                vec!["High priority".into(), tstats.high_priority.to_string()],
                vec!["Done".into(), fmt_percent(&tstats.completion_rate())],
            ],
        )
    );

    // load_all orders by deadline, so the first pending rows are the next due
    let upcoming: Vec<Vec<String>> = all_tasks
        .iter()
        .filter(|t| !t.is_completed)
        .take(3)
        .map(|t| {
            vec![
                t.deadline.to_string(),
                t.priority.as_str().to_string(),
                t.title.clone(),
            ]
        })
        .collect();
    if !upcoming.is_empty() {
        println!(
            "{}",
            pretty_table(&["Due next", "Priority", "Task"], upcoming)
        );
    }

    let recent = analytics::filter(&all_tx, DateRange::Custom.resolve(week_start), None);
    let recent_rows: Vec<Vec<String>> = recent
        .iter()
        .take(5)
        .map(|t| {
            vec![
                t.date.date().to_string(),
                t.kind.as_str().to_string(),
                fmt_money(&t.amount, &ccy),
                category_label(&names, t.category_id),
                t.description.clone(),
            ]
        })
        .collect();
    if !recent_rows.is_empty() {
        println!(
            "{}",
            pretty_table(
                &["Date", "Type", "Amount", "Category", "Description"],
                recent_rows,
            )
        );
    }

    let all_notes = notes::load_all(conn)?;
    let locked = all_notes.iter().filter(|n| n.is_locked()).count();
    println!(
        "Notes: {} total ({} locked, {} unlocked)",
        all_notes.len(),
        locked,
        all_notes.len() - locked
    );
    Ok(())
}
