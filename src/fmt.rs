use chrono::{Datelike, NaiveDate};

/// Renders amounts and dates for replies.
pub trait Formatter: Send + Sync {
    fn format_currency(&self, amount: f64) -> String;
    fn format_date(&self, date: NaiveDate) -> String;
    fn format_month(&self, date: NaiveDate) -> String;
}

/// Korean won, whole units: `12,000원`, `2025-01-15(수)`, `2025년 1월`.
#[derive(Debug, Clone, Copy, Default)]
pub struct KrwFormatter;

const WEEKDAYS: [&str; 7] = ["월", "화", "수", "목", "금", "토", "일"];

impl Formatter for KrwFormatter {
    fn format_currency(&self, amount: f64) -> String {
        format!("{}원", with_commas(amount))
    }

    fn format_date(&self, date: NaiveDate) -> String {
        let weekday = WEEKDAYS[date.weekday().num_days_from_monday() as usize];
        format!("{}({weekday})", date.format("%Y-%m-%d"))
    }

    fn format_month(&self, date: NaiveDate) -> String {
        format!("{}년 {}월", date.year(), date.month())
    }
}

/// Round to a whole number and group digits by thousands: `-1,234,568`.
pub fn with_commas(val: f64) -> String {
    let rounded = val.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let grouped: String = grouped.chars().rev().collect();

    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}
