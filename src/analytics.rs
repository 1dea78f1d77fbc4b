use std::collections::BTreeMap;

use chrono::{Months, NaiveDate, NaiveDateTime};

use crate::models::Transaction;
use crate::period::{first_of_month, start_of_day, DateRange};

// ---------------------------------------------------------------------------
// Filtering & totals
// ---------------------------------------------------------------------------

/// Keep only the given category, compared by exact equality.
pub fn filter_category(txns: Vec<Transaction>, category: Option<&str>) -> Vec<Transaction> {
    match category {
        Some(name) => txns.into_iter().filter(|t| t.category == name).collect(),
        None => txns,
    }
}

pub fn total(txns: &[Transaction]) -> f64 {
    txns.iter().map(|t| t.amount).sum()
}

pub fn average(txns: &[Transaction]) -> Option<f64> {
    if txns.is_empty() {
        None
    } else {
        Some(total(txns) / txns.len() as f64)
    }
}

// ---------------------------------------------------------------------------
// By category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

fn category_sums(txns: &[Transaction]) -> BTreeMap<&str, f64> {
    let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
    for t in txns {
        *sums.entry(t.category.as_str()).or_insert(0.0) += t.amount;
    }
    sums
}

/// Largest total first; equal totals by name.
pub fn totals_by_category(txns: &[Transaction]) -> Vec<CategoryTotal> {
    let mut items: Vec<CategoryTotal> = category_sums(txns)
        .into_iter()
        .map(|(name, total)| CategoryTotal {
            category: name.to_string(),
            total,
        })
        .collect();
    // Stable sort keeps the name order of the BTreeMap among ties.
    items.sort_by(|a, b| b.total.total_cmp(&a.total));
    items
}

/// Ties go to the name that sorts first.
pub fn top_category(txns: &[Transaction]) -> Option<CategoryTotal> {
    pick(category_sums(txns), |candidate, best| candidate > best).map(|(name, total)| {
        CategoryTotal {
            category: name.to_string(),
            total,
        }
    })
}

pub fn min_category(txns: &[Transaction]) -> Option<CategoryTotal> {
    pick(category_sums(txns), |candidate, best| candidate < best).map(|(name, total)| {
        CategoryTotal {
            category: name.to_string(),
            total,
        }
    })
}

// ---------------------------------------------------------------------------
// By day
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DayTotal {
    pub date: NaiveDate,
    pub total: f64,
}

fn day_sums(txns: &[Transaction]) -> BTreeMap<NaiveDate, f64> {
    let mut sums: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for t in txns {
        *sums.entry(t.date.date()).or_insert(0.0) += t.amount;
    }
    sums
}

/// Ties go to the earliest day.
pub fn top_day(txns: &[Transaction]) -> Option<DayTotal> {
    pick(day_sums(txns), |candidate, best| candidate > best)
        .map(|(date, total)| DayTotal { date, total })
}

pub fn min_day(txns: &[Transaction]) -> Option<DayTotal> {
    pick(day_sums(txns), |candidate, best| candidate < best)
        .map(|(date, total)| DayTotal { date, total })
}

// First entry in key order that no later entry beats.
fn pick<K>(sums: BTreeMap<K, f64>, beats: impl Fn(f64, f64) -> bool) -> Option<(K, f64)> {
    let mut best: Option<(K, f64)> = None;
    for (key, sum) in sums {
        let replace = match &best {
            Some((_, current)) => beats(sum, *current),
            None => true,
        };
        if replace {
            best = Some((key, sum));
        }
    }
    best
}

// ---------------------------------------------------------------------------
// Trend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct MonthTotal {
    pub month: NaiveDate,
    pub total: f64,
}

/// The `months` calendar months ending with the one containing `now`.
pub fn trend_window(now: NaiveDateTime, months: u32) -> DateRange {
    let current = first_of_month(now.date());
    let first = current - Months::new(months.saturating_sub(1));
    DateRange {
        start: start_of_day(first),
        end: start_of_day(current + Months::new(1)),
    }
}

/// One entry per month of `window`, oldest first, zero-filled.
pub fn monthly_totals(txns: &[Transaction], window: DateRange) -> Vec<MonthTotal> {
    let mut sums: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut month = first_of_month(window.start.date());
    while start_of_day(month) < window.end {
        sums.insert(month, 0.0);
        month = month + Months::new(1);
    }
    for t in txns.iter().filter(|t| window.contains(t.date)) {
        if let Some(sum) = sums.get_mut(&first_of_month(t.date.date())) {
            *sum += t.amount;
        }
    }
    sums.into_iter()
        .map(|(month, total)| MonthTotal { month, total })
        .collect()
}

// ---------------------------------------------------------------------------
// Payment type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PaymentSplit {
    pub card: f64,
    pub cash: f64,
}

/// Split on the note: "카드" counts as card, otherwise "현금" as cash.
/// Notes naming neither are left out.
pub fn payment_split(txns: &[Transaction]) -> PaymentSplit {
    let mut split = PaymentSplit::default();
    for t in txns {
        if t.note.contains("카드") {
            split.card += t.amount;
        } else if t.note.contains("현금") {
            split.cash += t.amount;
        }
    }
    split
}

// ---------------------------------------------------------------------------
// Budget
// ---------------------------------------------------------------------------

pub fn remaining_budget(budget: f64, spent: f64) -> f64 {
    (budget - spent).max(0.0)
}

/// How far `spent` exceeds `budget`, if it does.
pub fn overspent_by(budget: f64, spent: f64) -> Option<f64> {
    if spent > budget {
        Some(spent - budget)
    } else {
        None
    }
}
