// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure financial aggregation: date-range filtering, totals, and
//! per-category breakdowns. Everything here operates on materialized
//! snapshots handed in by the command layer; nothing touches the store.

use chrono::{Datelike, Days, Local, NaiveDateTime, NaiveTime, Weekday};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use std::str::FromStr;

use crate::models::{ParseError, Transaction, TransactionType};

/// Clock-relative reporting window. `Custom` resolves to an effectively
/// unbounded interval (epoch..now) and is surfaced on the CLI as `all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DateRange {
    Today,
    ThisWeek,
    ThisMonth,
    ThisYear,
    Custom,
}

impl DateRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateRange::Today => "today",
            DateRange::ThisWeek => "week",
            DateRange::ThisMonth => "month",
            DateRange::ThisYear => "year",
            DateRange::Custom => "all",
        }
    }

    /// Resolve against the wall clock. `week_start` is the configured first
    /// day of week consumed by `ThisWeek`.
    pub fn resolve(&self, week_start: Weekday) -> (NaiveDateTime, NaiveDateTime) {
        self.resolve_at(Local::now().naive_local(), week_start)
    }

    /// Resolve to a closed interval `[start, now]`. Every variant anchors the
    /// start at a midnight on or before `now`.
    pub fn resolve_at(
        &self,
        now: NaiveDateTime,
        week_start: Weekday,
    ) -> (NaiveDateTime, NaiveDateTime) {
        let today = now.date();
        let back = match self {
            DateRange::Today => 0,
            DateRange::ThisWeek => days_since_week_start(today.weekday(), week_start),
            DateRange::ThisMonth => u64::from(today.day() - 1),
            DateRange::ThisYear => u64::from(today.ordinal() - 1),
            DateRange::Custom => return (NaiveDateTime::UNIX_EPOCH, now),
        };
        let start = (today - Days::new(back)).and_time(NaiveTime::MIN);
        (start, now)
    }
}

impl FromStr for DateRange {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "today" => Ok(DateRange::Today),
            "week" => Ok(DateRange::ThisWeek),
            "month" => Ok(DateRange::ThisMonth),
            "year" => Ok(DateRange::ThisYear),
            "all" => Ok(DateRange::Custom),
            _ => Err(ParseError::DateRange(s.to_string())),
        }
    }
}

fn days_since_week_start(today: Weekday, week_start: Weekday) -> u64 {
    u64::from((7 + today.num_days_from_monday() - week_start.num_days_from_monday()) % 7)
}

/// Derived aggregate metrics for a filtered transaction set. Recomputed on
/// every call; never cached, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FinancialStats {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
    pub transaction_count: usize,
    pub income_count: usize,
    pub expense_count: usize,
}

impl FinancialStats {
    /// Balance as a percentage of income; 0 when there is no income.
    pub fn savings_rate(&self) -> Decimal {
        if self.total_income > Decimal::ZERO {
            self.balance / self.total_income * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        }
    }
}

/// One row of a category breakdown: bucket total plus its percentage share
/// of the grand total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category_id: Option<i64>,
    pub total: Decimal,
    pub share: Decimal,
}

/// Keep transactions inside `[start, end]`, optionally restricted to one
/// type, most recent first. Order among equal dates follows the input.
pub fn filter(
    transactions: &[Transaction],
    range: (NaiveDateTime, NaiveDateTime),
    kind: Option<TransactionType>,
) -> Vec<Transaction> {
    let (start, end) = range;
    let mut out: Vec<Transaction> = transactions
        .iter()
        .filter(|t| t.date >= start && t.date <= end)
        .filter(|t| kind.is_none_or(|k| t.kind == k))
        .cloned()
        .collect();
    out.sort_by(|a, b| b.date.cmp(&a.date));
    out
}

pub fn compute_stats(transactions: &[Transaction]) -> FinancialStats {
    let mut stats = FinancialStats::default();
    for t in transactions {
        stats.transaction_count += 1;
        match t.kind {
            TransactionType::Income => {
                stats.total_income += t.amount;
                stats.income_count += 1;
            }
            TransactionType::Expense => {
                stats.total_expenses += t.amount;
                stats.expense_count += 1;
            }
        }
    }
    stats.balance = stats.total_income - stats.total_expenses;
    stats
}

/// Sum amounts per category bucket (`None` = uncategorized). Buckets come
/// back in first-seen order of the input, which downstream sorts rely on
/// for stable tie-breaking.
pub fn group_by_category(transactions: &[Transaction]) -> Vec<(Option<i64>, Decimal)> {
    let mut totals: Vec<(Option<i64>, Decimal)> = Vec::new();
    let mut index: HashMap<Option<i64>, usize> = HashMap::new();
    for t in transactions {
        match index.get(&t.category_id) {
            Some(&i) => totals[i].1 += t.amount,
            None => {
                index.insert(t.category_id, totals.len());
                totals.push((t.category_id, t.amount));
            }
        }
    }
    totals
}

/// The `n` largest category buckets, descending by total. Equal totals keep
/// their first-seen order.
pub fn top_categories(transactions: &[Transaction], n: usize) -> Vec<(Option<i64>, Decimal)> {
    let mut totals = group_by_category(transactions);
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals.truncate(n);
    totals
}

/// Full breakdown with percentage shares, descending by total. Empty when
/// the grand total is zero so percentage math never divides by zero.
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<CategoryShare> {
    let mut totals = group_by_category(transactions);
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    let grand: Decimal = totals.iter().map(|(_, total)| *total).sum();
    if grand.is_zero() {
        return Vec::new();
    }
    totals
        .into_iter()
        .map(|(category_id, total)| CategoryShare {
            category_id,
            total,
            share: total / grand * Decimal::ONE_HUNDRED,
        })
        .collect()
}
