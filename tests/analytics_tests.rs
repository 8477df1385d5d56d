// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime, Weekday};
use lifeclip::analytics::{self, DateRange};
use lifeclip::models::{Transaction, TransactionType};
use rust_decimal::Decimal;

fn dt(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

fn tx(
    id: i64,
    amount: &str,
    kind: TransactionType,
    date: NaiveDateTime,
    category_id: Option<i64>,
) -> Transaction {
    Transaction {
        id,
        description: format!("t{}", id),
        amount: amount.parse().unwrap(),
        date,
        kind,
        category_id,
        payment_method: None,
        tags: None,
        note: None,
        photo_ref: None,
    }
}

#[test]
fn filter_keeps_range_and_sorts_descending() {
    let txns = vec![
        tx(1, "10", TransactionType::Expense, dt(2025, 1, 1, 9), None),
        tx(2, "10", TransactionType::Expense, dt(2025, 1, 2, 9), None),
        tx(3, "10", TransactionType::Expense, dt(2025, 1, 3, 9), None),
    ];
    let range = (dt(2025, 1, 2, 0), dt(2025, 1, 3, 23));
    let out = analytics::filter(&txns, range, None);
    let ids: Vec<i64> = out.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![3, 2]);
}

#[test]
fn filter_includes_both_boundaries() {
    let txns = vec![
        tx(1, "1", TransactionType::Income, dt(2025, 3, 1, 0), None),
        tx(2, "1", TransactionType::Income, dt(2025, 3, 5, 12), None),
    ];
    let range = (dt(2025, 3, 1, 0), dt(2025, 3, 5, 12));
    assert_eq!(analytics::filter(&txns, range, None).len(), 2);
}

#[test]
fn filter_applies_type() {
    let txns = vec![
        tx(1, "100", TransactionType::Income, dt(2025, 1, 1, 9), None),
        tx(2, "40", TransactionType::Expense, dt(2025, 1, 2, 9), None),
    ];
    let range = (dt(2025, 1, 1, 0), dt(2025, 1, 31, 0));
    let out = analytics::filter(&txns, range, Some(TransactionType::Expense));
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].id, 2);
}

#[test]
fn filter_is_idempotent() {
    let txns = vec![
        tx(1, "5", TransactionType::Income, dt(2025, 1, 1, 9), None),
        tx(2, "6", TransactionType::Expense, dt(2025, 1, 2, 9), Some(1)),
    ];
    let range = (dt(2025, 1, 1, 0), dt(2025, 1, 31, 0));
    let a = analytics::filter(&txns, range, None);
    let b = analytics::filter(&txns, range, None);
    assert_eq!(a, b);
}

#[test]
fn stats_match_worked_example() {
    // 100 income, 40 + 10 expense on one category
    let txns = vec![
        tx(1, "100", TransactionType::Income, dt(2025, 1, 1, 9), None),
        tx(2, "40", TransactionType::Expense, dt(2025, 1, 2, 9), Some(1)),
        tx(3, "10", TransactionType::Expense, dt(2025, 1, 3, 9), Some(1)),
    ];
    let range = (dt(2025, 1, 1, 0), dt(2025, 1, 31, 0));
    let filtered = analytics::filter(&txns, range, None);
    let stats = analytics::compute_stats(&filtered);
    assert_eq!(stats.total_income, Decimal::from(100));
    assert_eq!(stats.total_expenses, Decimal::from(50));
    assert_eq!(stats.balance, Decimal::from(50));
    assert_eq!(stats.savings_rate(), Decimal::from(50));
    assert_eq!(stats.transaction_count, 3);
    assert_eq!(stats.income_count, 1);
    assert_eq!(stats.expense_count, 2);

    let expenses = analytics::filter(&txns, range, Some(TransactionType::Expense));
    let grouped = analytics::group_by_category(&expenses);
    assert_eq!(grouped, vec![(Some(1), Decimal::from(50))]);
}

#[test]
fn stats_empty_set_is_all_zero() {
    let stats = analytics::compute_stats(&[]);
    assert_eq!(stats.balance, Decimal::ZERO);
    assert_eq!(stats.savings_rate(), Decimal::ZERO);
    assert_eq!(stats.transaction_count, 0);
}

#[test]
fn stats_count_matches_filtered_length() {
    let txns = vec![
        tx(1, "1", TransactionType::Income, dt(2025, 1, 1, 9), None),
        tx(2, "2", TransactionType::Expense, dt(2025, 2, 1, 9), None),
        tx(3, "3", TransactionType::Expense, dt(2025, 3, 1, 9), None),
    ];
    let range = (dt(2025, 1, 15, 0), dt(2025, 12, 31, 0));
    let filtered = analytics::filter(&txns, range, None);
    assert_eq!(
        analytics::compute_stats(&filtered).transaction_count,
        filtered.len()
    );
}

#[test]
fn savings_rate_is_zero_without_income() {
    let txns = vec![tx(1, "30", TransactionType::Expense, dt(2025, 1, 1, 9), None)];
    let stats = analytics::compute_stats(&txns);
    assert_eq!(stats.balance, Decimal::from(-30));
    assert_eq!(stats.savings_rate(), Decimal::ZERO);
}

#[test]
fn group_by_category_keeps_first_seen_order_and_null_bucket() {
    let txns = vec![
        tx(1, "20", TransactionType::Expense, dt(2025, 1, 1, 9), Some(7)),
        tx(2, "5", TransactionType::Expense, dt(2025, 1, 2, 9), None),
        tx(3, "20", TransactionType::Expense, dt(2025, 1, 3, 9), Some(9)),
        tx(4, "5", TransactionType::Expense, dt(2025, 1, 4, 9), None),
    ];
    let grouped = analytics::group_by_category(&txns);
    assert_eq!(
        grouped,
        vec![
            (Some(7), Decimal::from(20)),
            (None, Decimal::from(10)),
            (Some(9), Decimal::from(20)),
        ]
    );
}

#[test]
fn top_categories_breaks_ties_by_first_seen() {
    // A and B tie at 20; A was seen first and must win the single slot
    let txns = vec![
        tx(1, "20", TransactionType::Expense, dt(2025, 1, 1, 9), Some(1)),
        tx(2, "20", TransactionType::Expense, dt(2025, 1, 2, 9), Some(2)),
    ];
    let top = analytics::top_categories(&txns, 1);
    assert_eq!(top, vec![(Some(1), Decimal::from(20))]);
}

#[test]
fn top_categories_truncates_to_n() {
    let txns: Vec<Transaction> = (1..=8)
        .map(|i| {
            tx(
                i,
                "10",
                TransactionType::Expense,
                dt(2025, 1, i as u32, 9),
                Some(i),
            )
        })
        .collect();
    assert_eq!(analytics::top_categories(&txns, 5).len(), 5);
    assert_eq!(analytics::top_categories(&txns, 20).len(), 8);
}

#[test]
fn top_categories_is_prefix_of_breakdown() {
    let txns = vec![
        tx(1, "50", TransactionType::Expense, dt(2025, 1, 1, 9), Some(1)),
        tx(2, "30", TransactionType::Expense, dt(2025, 1, 2, 9), Some(2)),
        tx(3, "20", TransactionType::Expense, dt(2025, 1, 3, 9), None),
    ];
    let top = analytics::top_categories(&txns, 2);
    let breakdown = analytics::category_breakdown(&txns);
    assert_eq!(top.len(), 2);
    for (t, b) in top.iter().zip(breakdown.iter()) {
        assert_eq!(t.0, b.category_id);
        assert_eq!(t.1, b.total);
    }
}

#[test]
fn breakdown_shares_sum_to_one_hundred() {
    let txns = vec![
        tx(1, "10", TransactionType::Expense, dt(2025, 1, 1, 9), Some(1)),
        tx(2, "20", TransactionType::Expense, dt(2025, 1, 2, 9), Some(2)),
        tx(3, "30", TransactionType::Expense, dt(2025, 1, 3, 9), Some(3)),
    ];
    let breakdown = analytics::category_breakdown(&txns);
    let sum: Decimal = breakdown.iter().map(|s| s.share).sum();
    let tolerance = Decimal::new(1, 10); // 1e-10
    assert!((sum - Decimal::ONE_HUNDRED).abs() < tolerance, "sum={}", sum);
}

#[test]
fn breakdown_is_sorted_descending() {
    let txns = vec![
        tx(1, "10", TransactionType::Expense, dt(2025, 1, 1, 9), Some(1)),
        tx(2, "90", TransactionType::Expense, dt(2025, 1, 2, 9), Some(2)),
    ];
    let breakdown = analytics::category_breakdown(&txns);
    assert_eq!(breakdown[0].category_id, Some(2));
    assert_eq!(breakdown[0].share, Decimal::from(90));
}

#[test]
fn breakdown_empty_when_total_is_zero() {
    assert!(analytics::category_breakdown(&[]).is_empty());
    let zeroes = vec![tx(1, "0", TransactionType::Expense, dt(2025, 1, 1, 9), Some(1))];
    assert!(analytics::category_breakdown(&zeroes).is_empty());
}

// 2025-08-15 is a Friday.
#[test]
fn range_today_starts_at_midnight() {
    let now = dt(2025, 8, 15, 14);
    let (start, end) = DateRange::Today.resolve_at(now, Weekday::Mon);
    assert_eq!(start, dt(2025, 8, 15, 0));
    assert_eq!(end, now);
}

#[test]
fn range_week_honors_configured_week_start() {
    let now = dt(2025, 8, 15, 14);
    let (monday_start, _) = DateRange::ThisWeek.resolve_at(now, Weekday::Mon);
    assert_eq!(monday_start, dt(2025, 8, 11, 0));
    let (sunday_start, _) = DateRange::ThisWeek.resolve_at(now, Weekday::Sun);
    assert_eq!(sunday_start, dt(2025, 8, 10, 0));
}

#[test]
fn range_week_on_the_week_start_day_is_today() {
    // A Monday, with Monday as week start
    let now = dt(2025, 8, 11, 8);
    let (start, _) = DateRange::ThisWeek.resolve_at(now, Weekday::Mon);
    assert_eq!(start, dt(2025, 8, 11, 0));
}

#[test]
fn range_month_and_year_start_on_the_first() {
    let now = dt(2025, 8, 15, 14);
    let (month_start, _) = DateRange::ThisMonth.resolve_at(now, Weekday::Mon);
    assert_eq!(month_start, dt(2025, 8, 1, 0));
    let (year_start, _) = DateRange::ThisYear.resolve_at(now, Weekday::Mon);
    assert_eq!(year_start, dt(2025, 1, 1, 0));
}

#[test]
fn range_all_is_unbounded_low() {
    let now = dt(2025, 8, 15, 14);
    let (start, end) = DateRange::Custom.resolve_at(now, Weekday::Mon);
    assert_eq!(start, dt(1970, 1, 1, 0));
    assert_eq!(end, now);
}

#[test]
fn range_parses_cli_names() {
    assert_eq!("today".parse::<DateRange>().unwrap(), DateRange::Today);
    assert_eq!("week".parse::<DateRange>().unwrap(), DateRange::ThisWeek);
    assert_eq!("month".parse::<DateRange>().unwrap(), DateRange::ThisMonth);
    assert_eq!("year".parse::<DateRange>().unwrap(), DateRange::ThisYear);
    assert_eq!("all".parse::<DateRange>().unwrap(), DateRange::Custom);
    assert!("fortnight".parse::<DateRange>().is_err());
}
