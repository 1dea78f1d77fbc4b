//! Rule-based extraction of period, category and intent from a question.
//!
//! Matching runs on [`normalize`]d text: lowercased with every whitespace
//! character removed, so "이번 달" and "이번달" are the same input.

use chrono::NaiveDate;

use crate::models::{ParsedQuery, QuestionType};
use crate::period::{
    has_month, has_specific_day, resolve_month, resolve_specific_date, Period,
};

const TODAY: &[&str] = &["오늘"];
const YESTERDAY: &[&str] = &["어제", "어재"];
const THIS_WEEK: &[&str] = &["이번주"];
const LAST_WEEK: &[&str] = &["지난주"];
const THIS_MONTH: &[&str] = &["이번달", "이번월", "이달", "금월"];
const LAST_MONTH: &[&str] = &["지난달", "저번달", "전월", "이전달"];
const RECENT_WEEK: &[&str] = &["최근일주일", "최근7일"];

const COMPARE: &[&str] = &["더썼", "늘었", "증가", "비교", "초과", "아껴졌", "줄었"];

const MOST: &[&str] = &["가장많이", "제일많이", "최대"];
const LEAST: &[&str] = &["가장적게", "제일적게", "최소"];
const DAY_WORDS: &[&str] = &["날", "요일", "하루", "며칠", "언제"];
const FREQUENCY: &[&str] = &["몇번", "몇건", "횟수", "건수", "얼마나자주"];
const SUMMARY: &[&str] = &["요약", "내역"];
const REMAINING: &[&str] = &["남은예산", "예산남", "얼마남", "남았"];
const TOTAL: &[&str] = &["총지출", "얼마"];

pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Whether the text names a period this parser knows, resolvable or not.
pub fn mentions_period(text: &str) -> bool {
    let normalized = normalize(text);
    [TODAY, YESTERDAY, THIS_WEEK, LAST_WEEK, THIS_MONTH, LAST_MONTH, RECENT_WEEK]
        .iter()
        .any(|keywords| contains_any(&normalized, keywords))
        || has_specific_day(&normalized)
        || has_month(&normalized)
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Extract what the question itself says. `today` anchors the year of
/// `<month>월` expressions; `categories` is tried in the order given and the
/// first match wins.
pub fn parse(text: &str, categories: &[String], today: NaiveDate) -> ParsedQuery {
    let normalized = normalize(text);
    let (period, reference_date) = detect_period(&normalized, today);
    ParsedQuery {
        period,
        category: detect_category(&normalized, categories),
        question_type: detect_intent(&normalized),
        reference_date,
        is_compare: contains_any(&normalized, COMPARE),
    }
}

fn detect_period(normalized: &str, today: NaiveDate) -> (Option<Period>, Option<NaiveDate>) {
    if let Some(date) = resolve_specific_date(normalized, today) {
        return (Some(Period::SpecificDay { date }), Some(date));
    }
    let period = if contains_any(normalized, TODAY) {
        Some(Period::Today)
    } else if contains_any(normalized, YESTERDAY) {
        Some(Period::Yesterday)
    } else if contains_any(normalized, THIS_WEEK) {
        Some(Period::ThisWeek)
    } else if contains_any(normalized, LAST_WEEK) {
        Some(Period::LastWeek)
    } else if contains_any(normalized, THIS_MONTH) {
        Some(Period::ThisMonth)
    } else if contains_any(normalized, LAST_MONTH) {
        Some(Period::LastMonth)
    } else if has_specific_day(normalized) {
        // "2월30일": a day expression that names no real day is not a month.
        None
    } else if let Some(first) = resolve_month(normalized, today) {
        Some(Period::month_of(first))
    } else if contains_any(normalized, RECENT_WEEK) {
        Some(Period::RecentNDays { days: 7 })
    } else {
        None
    };
    (period, None)
}

fn detect_category(normalized: &str, categories: &[String]) -> Option<String> {
    categories
        .iter()
        .find(|c| {
            let key = normalize(c);
            !key.is_empty() && normalized.contains(&key)
        })
        .cloned()
}

fn detect_intent(normalized: &str) -> Option<QuestionType> {
    let about_days = contains_any(normalized, DAY_WORDS);
    if contains_any(normalized, MOST) {
        Some(if about_days {
            QuestionType::TopDay
        } else {
            QuestionType::TopCategory
        })
    } else if contains_any(normalized, LEAST) {
        Some(if about_days {
            QuestionType::MinDay
        } else {
            QuestionType::MinCategory
        })
    } else if contains_any(normalized, FREQUENCY) {
        Some(QuestionType::Count)
    } else if contains_any(normalized, SUMMARY) {
        Some(QuestionType::Summary)
    } else if contains_any(normalized, REMAINING) {
        Some(QuestionType::RemainedBudget)
    } else if contains_any(normalized, TOTAL) {
        Some(QuestionType::TotalAmount)
    } else {
        None
    }
}
