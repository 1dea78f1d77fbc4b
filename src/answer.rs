//! Reply text for a resolved query.
//!
//! [`fetch_range`] says which expenses a query needs; [`answer`] turns the
//! fetched expenses into the reply. Both are deterministic for a given
//! reference instant.

use chrono::{Duration, Months, NaiveDateTime};

use crate::analytics::{self, CategoryTotal};
use crate::fmt::Formatter;
use crate::models::{ParsedQuery, QuestionType, Transaction};
use crate::period::{first_of_month, start_of_day, DateRange, Period};

pub const NO_EXPENSES: &str = "해당 기간에 지출 내역이 없어요.";
pub const NEED_PERIOD: &str =
    "어느 기간의 지출이 궁금하신가요? 예: 오늘, 이번 주, 지난달, 5월, 3월 5일";
pub const COMPARE_COMING_SOON: &str = "기간 비교 기능은 곧 추가될 예정이에요. 조금만 기다려 주세요!";
pub const APOLOGY: &str =
    "죄송해요, 질문을 이해하지 못했어요. 기간이나 카테고리를 넣어서 다시 물어봐 주세요.";

pub const TREND_MONTHS: u32 = 6;

/// What an answer needs besides the query and the expenses.
pub struct AnswerContext<'a> {
    pub formatter: &'a dyn Formatter,
    pub budget: f64,
    pub now: NaiveDateTime,
}

/// Every intent but the two fixed replies is about some period's expenses.
fn needs_period(question_type: QuestionType) -> bool {
    !matches!(question_type, QuestionType::None | QuestionType::Compare)
}

/// The range of expenses to fetch, or `None` when the reply needs no data.
pub fn fetch_range(query: &ParsedQuery, now: NaiveDateTime) -> Option<DateRange> {
    let question_type = query.question_type.unwrap_or(QuestionType::None);
    if !needs_period(question_type) {
        return None;
    }
    let period = query.period?;
    Some(match question_type {
        QuestionType::Trend => analytics::trend_window(now, TREND_MONTHS),
        _ => period.date_range(now),
    })
}

pub fn answer(query: &ParsedQuery, txns: Vec<Transaction>, ctx: &AnswerContext) -> String {
    let question_type = query.question_type.unwrap_or(QuestionType::None);
    if needs_period(question_type) && query.period.is_none() {
        return NEED_PERIOD.to_string();
    }

    let f = ctx.formatter;
    let category = query.category.as_deref();
    let txns = analytics::filter_category(txns, category);
    let label = query
        .period
        .map(|p| period_label(&p, f))
        .unwrap_or_default();
    let subject = match category {
        Some(name) => format!("{label} {name}"),
        None => label.clone(),
    };

    match question_type {
        QuestionType::None => APOLOGY.to_string(),
        QuestionType::Compare => COMPARE_COMING_SOON.to_string(),
        QuestionType::TotalAmount => format!(
            "{subject} 지출은 총 {}이에요.",
            f.format_currency(analytics::total(&txns))
        ),
        QuestionType::DateExpense => {
            let day = match query.reference_date {
                Some(date) => f.format_date(date),
                None => label,
            };
            let what = category.map(|c| format!("{c} ")).unwrap_or_default();
            format!(
                "{day}에 쓴 {what}금액은 총 {}이에요.",
                f.format_currency(analytics::total(&txns))
            )
        }
        QuestionType::ByCategory => {
            if txns.is_empty() {
                return NO_EXPENSES.to_string();
            }
            let mut reply = format!("{subject} 카테고리별 지출이에요.");
            push_category_lines(&mut reply, &analytics::totals_by_category(&txns), f);
            reply.push_str(&format!(
                "\n합계: {}",
                f.format_currency(analytics::total(&txns))
            ));
            reply
        }
        QuestionType::Summary => {
            if txns.is_empty() {
                return NO_EXPENSES.to_string();
            }
            let mut reply = format!(
                "{subject} 지출 요약이에요. 총 {}건, {}",
                txns.len(),
                f.format_currency(analytics::total(&txns))
            );
            push_category_lines(&mut reply, &analytics::totals_by_category(&txns), f);
            reply
        }
        QuestionType::TopCategory => match analytics::top_category(&txns) {
            Some(top) => format!(
                "{subject} 가장 많이 쓴 카테고리: {} ({})",
                top.category,
                f.format_currency(top.total)
            ),
            None => NO_EXPENSES.to_string(),
        },
        QuestionType::MinCategory => match analytics::min_category(&txns) {
            Some(min) => format!(
                "{subject} 가장 적게 쓴 카테고리: {} ({})",
                min.category,
                f.format_currency(min.total)
            ),
            None => NO_EXPENSES.to_string(),
        },
        QuestionType::TopDay => match analytics::top_day(&txns) {
            Some(day) => format!(
                "{subject} 가장 많이 쓴 날: {} ({})",
                f.format_date(day.date),
                f.format_currency(day.total)
            ),
            None => NO_EXPENSES.to_string(),
        },
        QuestionType::MinDay => match analytics::min_day(&txns) {
            Some(day) => format!(
                "{subject} 가장 적게 쓴 날: {} ({})",
                f.format_date(day.date),
                f.format_currency(day.total)
            ),
            None => NO_EXPENSES.to_string(),
        },
        QuestionType::Count => format!("{subject} 지출은 총 {}건이에요.", txns.len()),
        QuestionType::RemainedBudget => {
            let spent = analytics::total(&txns);
            format!(
                "{subject} 지출 {} 기준으로 남은 예산은 {}이에요. (예산 {})",
                f.format_currency(spent),
                f.format_currency(analytics::remaining_budget(ctx.budget, spent)),
                f.format_currency(ctx.budget)
            )
        }
        QuestionType::Overspent => {
            let spent = analytics::total(&txns);
            match analytics::overspent_by(ctx.budget, spent) {
                Some(over) => format!(
                    "{subject} 지출 {}으로 예산 {}을 {} 초과했어요.",
                    f.format_currency(spent),
                    f.format_currency(ctx.budget),
                    f.format_currency(over)
                ),
                None => format!(
                    "{subject} 지출은 {}으로 아직 예산 안이에요. ({} 남음)",
                    f.format_currency(spent),
                    f.format_currency(analytics::remaining_budget(ctx.budget, spent))
                ),
            }
        }
        QuestionType::Trend => {
            let window = analytics::trend_window(ctx.now, TREND_MONTHS);
            let what = category.map(|c| format!("{c} ")).unwrap_or_default();
            let mut reply = format!("최근 {TREND_MONTHS}개월 {what}지출 추이예요.");
            for month in analytics::monthly_totals(&txns, window) {
                reply.push_str(&format!(
                    "\n- {}: {}",
                    f.format_month(month.month),
                    f.format_currency(month.total)
                ));
            }
            reply
        }
        QuestionType::PaymentType => {
            if txns.is_empty() {
                return NO_EXPENSES.to_string();
            }
            let split = analytics::payment_split(&txns);
            format!(
                "{subject} 결제 수단별 지출이에요.\n- 카드: {}\n- 현금: {}",
                f.format_currency(split.card),
                f.format_currency(split.cash)
            )
        }
        QuestionType::AvgExpense => match analytics::average(&txns) {
            Some(avg) => format!(
                "{subject} 평균 지출은 건당 {}이에요. (총 {}건)",
                f.format_currency(avg),
                txns.len()
            ),
            None => NO_EXPENSES.to_string(),
        },
    }
}

fn push_category_lines(reply: &mut String, items: &[CategoryTotal], f: &dyn Formatter) {
    for item in items {
        reply.push_str(&format!("\n- {}: {}", item.category, f.format_currency(item.total)));
    }
}

/// How a period reads in a reply: "이번 달", "2025년 5월", "최근 7일", ...
pub fn period_label(period: &Period, f: &dyn Formatter) -> String {
    match *period {
        Period::Today => "오늘".to_string(),
        Period::Yesterday => "어제".to_string(),
        Period::ThisWeek => "이번 주".to_string(),
        Period::LastWeek => "지난주".to_string(),
        Period::ThisMonth => "이번 달".to_string(),
        Period::LastMonth => "지난달".to_string(),
        Period::ThisYear => "올해".to_string(),
        Period::LastYear => "작년".to_string(),
        Period::SpecificDay { date } => f.format_date(date),
        Period::RecentNDays { days } => format!("최근 {days}일"),
        Period::Custom { start, end } => {
            let first = first_of_month(start.date());
            if start == start_of_day(first) && end == start_of_day(first + Months::new(1)) {
                f.format_month(first)
            } else if start >= end {
                f.format_date(start.date())
            } else {
                let last = (end - Duration::seconds(1)).date();
                format!("{} ~ {}", f.format_date(start.date()), f.format_date(last))
            }
        }
    }
}
