// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use lifeclip::analytics::FinancialStats;
use lifeclip::commands::reports::{insight_lines, monthly_cashflow};
use lifeclip::models::{Transaction, TransactionType};
use lifeclip::{cli, commands};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn dt(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn tx(id: i64, amount: &str, kind: TransactionType, date: NaiveDateTime) -> Transaction {
    Transaction {
        id,
        description: format!("t{}", id),
        amount: amount.parse().unwrap(),
        date,
        kind,
        category_id: None,
        payment_method: None,
        tags: None,
        note: None,
        photo_ref: None,
    }
}

#[test]
fn insights_praise_a_strong_savings_rate() {
    let stats = FinancialStats {
        total_income: Decimal::from(100),
        total_expenses: Decimal::from(50),
        balance: Decimal::from(50),
        transaction_count: 3,
        income_count: 1,
        expense_count: 2,
    };
    let lines = insight_lines(&stats, "USD");
    assert_eq!(lines.len(), 4);
    assert!(lines[0].contains("You saved USD 50"));
    assert!(lines[1].contains("Excellent savings rate of 50"));
    assert!(lines[2].contains("Average expense: USD 25"));
    assert!(lines[3].contains("Average income: USD 100"));
}

#[test]
fn insights_warn_on_overspend() {
    let stats = FinancialStats {
        total_income: Decimal::from(10),
        total_expenses: Decimal::from(40),
        balance: Decimal::from(-30),
        transaction_count: 2,
        income_count: 1,
        expense_count: 1,
    };
    let lines = insight_lines(&stats, "USD");
    assert!(lines[0].contains("expenses exceeded income by USD 30"));
    // A negative savings rate earns no rate line at all
    assert!(!lines.iter().any(|l| l.contains("savings rate")));
}

#[test]
fn insights_nudge_a_thin_savings_rate() {
    let stats = FinancialStats {
        total_income: Decimal::from(100),
        total_expenses: Decimal::from(90),
        balance: Decimal::from(10),
        transaction_count: 2,
        income_count: 1,
        expense_count: 1,
    };
    let lines = insight_lines(&stats, "USD");
    assert!(lines
        .iter()
        .any(|l| l.contains("Consider increasing your savings rate (currently 10")));
}

#[test]
fn insights_empty_for_empty_period() {
    let lines = insight_lines(&FinancialStats::default(), "USD");
    assert!(lines.is_empty());
}

#[test]
fn cashflow_buckets_by_month_most_recent_first() {
    let txns = vec![
        tx(1, "100", TransactionType::Income, dt(2025, 1, 10)),
        tx(2, "30", TransactionType::Expense, dt(2025, 1, 20)),
        tx(3, "200", TransactionType::Income, dt(2025, 2, 5)),
        tx(4, "50", TransactionType::Expense, dt(2025, 3, 1)),
    ];
    let rows = monthly_cashflow(&txns, 12);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].0, "2025-03");
    assert_eq!(rows[0].2, Decimal::from(50));
    assert_eq!(rows[1].0, "2025-02");
    assert_eq!(rows[1].1, Decimal::from(200));
    assert_eq!(rows[2].0, "2025-01");
    assert_eq!(rows[2].1, Decimal::from(100));
    assert_eq!(rows[2].2, Decimal::from(30));
}

#[test]
fn cashflow_truncates_to_requested_months() {
    let txns = vec![
        tx(1, "1", TransactionType::Income, dt(2025, 1, 1)),
        tx(2, "2", TransactionType::Income, dt(2025, 2, 1)),
        tx(3, "3", TransactionType::Income, dt(2025, 3, 1)),
    ];
    let rows = monthly_cashflow(&txns, 2);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].0, "2025-03");
    assert_eq!(rows[1].0, "2025-02");
}

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE settings(key TEXT PRIMARY KEY, value TEXT NOT NULL);
        CREATE TABLE categories(
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            kind TEXT NOT NULL,
            icon TEXT NOT NULL DEFAULT 'Category',
            color TEXT NOT NULL DEFAULT '#6650a4',
            is_custom INTEGER NOT NULL DEFAULT 0
        );
        CREATE TABLE transactions(
            id INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            amount TEXT NOT NULL,
            date TEXT NOT NULL,
            kind TEXT NOT NULL,
            category_id INTEGER,
            payment_method TEXT,
            tags TEXT,
            note TEXT,
            photo_ref TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )
    .unwrap();
    conn
}

#[test]
fn report_commands_run_on_an_empty_store() {
    let conn = setup();
    for args in [
        vec!["lifeclip", "report", "overview", "--range", "all"],
        vec!["lifeclip", "report", "breakdown", "--range", "all"],
        vec!["lifeclip", "report", "top", "--range", "all", "--n", "3"],
        vec!["lifeclip", "report", "insights", "--range", "all"],
        vec!["lifeclip", "report", "cashflow", "--months", "6"],
    ] {
        let matches = cli::build_cli().get_matches_from(args);
        if let Some(("report", report_m)) = matches.subcommand() {
            commands::reports::handle(&conn, report_m).unwrap();
        } else {
            panic!("no report subcommand");
        }
    }
}
