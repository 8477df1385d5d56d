// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::{self, DateRange, FinancialStats};
use crate::commands::transactions;
use crate::models::{Transaction, TransactionType};
use crate::utils::{
    category_label, category_names, fmt_money, fmt_percent, get_currency, get_week_start,
    maybe_print_json, pretty_table,
};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("overview", sub)) => overview(conn, sub)?,
        Some(("breakdown", sub)) => breakdown(conn, sub)?,
        Some(("top", sub)) => top(conn, sub)?,
        Some(("insights", sub)) => insights(conn, sub)?,
        Some(("cashflow", sub)) => cashflow(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Load the snapshot and keep the rows inside the requested range.
fn ranged(
    conn: &Connection,
    sub: &clap::ArgMatches,
    kind: Option<TransactionType>,
) -> Result<(DateRange, Vec<Transaction>)> {
    let range: DateRange = sub.get_one::<String>("range").unwrap().parse()?;
    let all = transactions::load_all(conn)?;
    let week_start = get_week_start(conn)?;
    let filtered = analytics::filter(&all, range.resolve(week_start), kind);
    Ok((range, filtered))
}

#[derive(Serialize)]
struct OverviewReport {
    range: &'static str,
    total_income: Decimal,
    total_expenses: Decimal,
    balance: Decimal,
    savings_rate: Decimal,
    transaction_count: usize,
    income_count: usize,
    expense_count: usize,
}

fn overview(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let (range, filtered) = ranged(conn, sub, None)?;
    let stats = analytics::compute_stats(&filtered);
    let ccy = get_currency(conn)?;

    let report = OverviewReport {
        range: range.as_str(),
        total_income: stats.total_income,
        total_expenses: stats.total_expenses,
        balance: stats.balance,
        savings_rate: stats.savings_rate(),
        transaction_count: stats.transaction_count,
        income_count: stats.income_count,
        expense_count: stats.expense_count,
    };
    if !maybe_print_json(json_flag, jsonl_flag, &report)? {
        let rows = vec![
            vec!["Income".into(), fmt_money(&stats.total_income, &ccy)],
            vec!["Expenses".into(), fmt_money(&stats.total_expenses, &ccy)],
            vec!["Balance".into(), fmt_money(&stats.balance, &ccy)],
            vec!["Savings rate".into(), fmt_percent(&stats.savings_rate())],
            vec![
                "Transactions".into(),
                format!(
                    "{} ({} income / {} expense)",
                    stats.transaction_count, stats.income_count, stats.expense_count
                ),
            ],
        ];
        let title = format!("Overview ({})", range.as_str());
        println!("{}", pretty_table(&[title.as_str(), ""], rows));
    }
    Ok(())
}

#[derive(Serialize)]
struct BreakdownRow {
    category: String,
    total: Decimal,
    share: Decimal,
}

fn breakdown(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let kind: TransactionType = sub.get_one::<String>("type").unwrap().parse()?;
    let (_, filtered) = ranged(conn, sub, Some(kind))?;
    let names = category_names(conn)?;
    let ccy = get_currency(conn)?;

    let data: Vec<BreakdownRow> = analytics::category_breakdown(&filtered)
        .into_iter()
        .map(|s| BreakdownRow {
            category: category_label(&names, s.category_id),
            total: s.total,
            share: s.share,
        })
        .collect();

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.category.clone(),
                    fmt_money(&r.total, &ccy),
                    fmt_percent(&r.share),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Category", "Total", "Share"], rows));
    }
    Ok(())
}

#[derive(Serialize)]
struct TopRow {
    rank: usize,
    category: String,
    total: Decimal,
}

fn top(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let kind: TransactionType = sub.get_one::<String>("type").unwrap().parse()?;
    let n = *sub.get_one::<usize>("n").unwrap();
    let (_, filtered) = ranged(conn, sub, Some(kind))?;
    let names = category_names(conn)?;
    let ccy = get_currency(conn)?;

    let data: Vec<TopRow> = analytics::top_categories(&filtered, n)
        .into_iter()
        .enumerate()
        .map(|(i, (category_id, total))| TopRow {
            rank: i + 1,
            category: category_label(&names, category_id),
            total,
        })
        .collect();

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    format!("#{}", r.rank),
                    r.category.clone(),
                    fmt_money(&r.total, &ccy),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Rank", "Category", "Total"], rows));
    }
    Ok(())
}

fn insights(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (_, filtered) = ranged(conn, sub, None)?;
    let stats = analytics::compute_stats(&filtered);
    let ccy = get_currency(conn)?;
    let lines = insight_lines(&stats, &ccy);
    if lines.is_empty() {
        println!("Nothing to report for this period.");
        return Ok(());
    }
    for line in lines {
        println!("- {}", line);
    }
    Ok(())
}

/// Plain-language takeaways derived from the period stats.
pub fn insight_lines(stats: &FinancialStats, ccy: &str) -> Vec<String> {
    let mut lines = Vec::new();
    if stats.balance > Decimal::ZERO {
        lines.push(format!(
            "Great job! You saved {} this period.",
            fmt_money(&stats.balance, ccy)
        ));
    } else if stats.balance < Decimal::ZERO {
        lines.push(format!(
            "Warning: expenses exceeded income by {}.",
            fmt_money(&-stats.balance, ccy)
        ));
    }

    let rate = stats.savings_rate();
    if rate >= Decimal::from(20) {
        lines.push(format!("Excellent savings rate of {}!", fmt_percent(&rate)));
    } else if rate > Decimal::ZERO {
        lines.push(format!(
            "Consider increasing your savings rate (currently {}).",
            fmt_percent(&rate)
        ));
    }

    if stats.expense_count > 0 {
        let avg = stats.total_expenses / Decimal::from(stats.expense_count);
        lines.push(format!("Average expense: {}", fmt_money(&avg, ccy)));
    }
    if stats.income_count > 0 {
        let avg = stats.total_income / Decimal::from(stats.income_count);
        lines.push(format!("Average income: {}", fmt_money(&avg, ccy)));
    }
    lines
}

#[derive(Serialize)]
struct CashflowRow {
    month: String,
    income: Decimal,
    expenses: Decimal,
}

fn cashflow(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let months = *sub.get_one::<usize>("months").unwrap();
    let all = transactions::load_all(conn)?;
    let ccy = get_currency(conn)?;

    let data: Vec<CashflowRow> = monthly_cashflow(&all, months)
        .into_iter()
        .map(|(month, income, expenses)| CashflowRow {
            month,
            income,
            expenses,
        })
        .collect();

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.month.clone(),
                    fmt_money(&r.income, &ccy),
                    fmt_money(&r.expenses, &ccy),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Month", "Income", "Expenses"], rows));
    }
    Ok(())
}

/// Per-month income/expense totals over the `months` most recent months
/// that have any activity, most recent first.
pub fn monthly_cashflow(
    transactions: &[Transaction],
    months: usize,
) -> Vec<(String, Decimal, Decimal)> {
    let mut map: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    for t in transactions {
        let month = t.date.format("%Y-%m").to_string();
        let entry = map.entry(month).or_insert((Decimal::ZERO, Decimal::ZERO));
        match t.kind {
            TransactionType::Income => entry.0 += t.amount,
            TransactionType::Expense => entry.1 += t.amount,
        }
    }
    map.into_iter()
        .rev()
        .take(months)
        .map(|(m, (inc, exp))| (m, inc, exp))
        .collect()
}
