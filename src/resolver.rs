//! Turning one turn's signals into a single query.
//!
//! Precedence per field, highest first:
//!
//! | field           | 1st                 | 2nd                 | 3rd              | default       |
//! |-----------------|---------------------|---------------------|------------------|---------------|
//! | question type   | classifier (≠ none) | keyword parser      | session          | `totalAmount` |
//! | period          | keyword parser      | session             |                  | unset         |
//! | category        | keyword parser      | session             |                  | unset         |
//! | reference date  | keyword parser      |                     |                  | unset         |
//! | compare flag    | keyword parser      |                     |                  | `false`       |

use tracing::debug;

use crate::models::{ConversationContext, ParsedQuery, QuestionType};
use crate::parser::{mentions_period, normalize};

pub const TOO_VAGUE: &str = "조금 더 구체적으로 물어봐 주세요. 예: \"이번 달 식비 얼마 썼어?\"";
pub const OUT_OF_SCOPE: &str =
    "저는 지출 내역에 대한 질문에만 답할 수 있어요. 기간이나 카테고리를 넣어서 물어봐 주세요.";

const MEANINGLESS: &[&str] = &[
    "ㅋㅋ", "ㅋㅋㅋ", "ㅎㅎ", "ㅎㅎㅎ", "ㅠㅠ", "ㅜㅜ", "ㅇㅇ", "ㄴㄴ", "ㄱㄱ", "응", "네", "넵", "예",
    "아니", "아니요", "음", "흠", "헐", "와", "오", "뭐", "뭐야", "?", "??", "...", "ok", "okay",
    "yes", "no", "hi", "hello", "test", "테스트", "안녕", "하이",
];

// Whole words or stems only: single syllables such as "일" or "주" turn up
// in ordinary requests ("일본", "틀어주세요") and would let anything through.
const DOMAIN_KEYWORDS: &[&str] = &[
    // spending
    "지출", "소비", "썼", "쓴돈", "쓴게", "쓴거", "얼마", "금액", "합계", "총액", "결제", "카드",
    "현금", "평균", "추이", "추세", "비교", "가장많이", "제일많이", "가장적게", "제일적게", "최대",
    "최소", "몇번", "몇건", "건수", "횟수", "내역", "요약", "가계부",
    // budget
    "예산", "남은", "남았", "초과", "잔액",
    // category
    "카테고리", "항목", "분류", "식비", "교통", "쇼핑", "카페", "커피", "외식", "의료", "병원",
    "통신", "주거", "월세", "관리비", "문화생활", "여가", "생활비", "교육비", "구독", "경조사",
    // periods the parser has no keyword for
    "올해", "작년",
];

/// Why a turn was turned away before any resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Too short, or a filler utterance.
    Trivial,
    /// Nothing in it is about spending.
    Irrelevant,
}

impl Rejection {
    pub fn message(self) -> &'static str {
        match self {
            Rejection::Trivial => TOO_VAGUE,
            Rejection::Irrelevant => OUT_OF_SCOPE,
        }
    }
}

/// Triviality is checked first, so a filler like "ㅋㅋ" asks for detail
/// rather than being called off-topic.
pub fn check_guards(text: &str) -> Option<Rejection> {
    if is_trivial(text) {
        Some(Rejection::Trivial)
    } else if !is_relevant(text) {
        Some(Rejection::Irrelevant)
    } else {
        None
    }
}

pub fn is_trivial(text: &str) -> bool {
    let cleaned = text.trim().to_lowercase();
    cleaned.chars().count() < 2 || MEANINGLESS.contains(&cleaned.as_str())
}

/// Mentions spending vocabulary or a period the parser understands.
pub fn is_relevant(text: &str) -> bool {
    let normalized = normalize(text);
    DOMAIN_KEYWORDS.iter().any(|k| normalized.contains(k)) || mentions_period(&normalized)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// No intent, period or category anywhere; the session is left as is.
    Unresolvable,
    Resolved {
        query: ParsedQuery,
        context: ConversationContext,
    },
}

/// Merge the classifier's answer, the keyword parse of this turn and the
/// carried session into one query plus the next session value.
pub fn resolve(
    classified: QuestionType,
    parsed: ParsedQuery,
    session: &ConversationContext,
) -> Resolution {
    let found_intent = [
        Some(classified),
        parsed.question_type,
        session.question_type,
    ]
    .into_iter()
    .flatten()
    .find(|q| !q.is_none());

    let period = parsed.period.or(session.period);
    let category = parsed.category.clone().or_else(|| session.category.clone());

    if found_intent.is_none() && period.is_none() && category.is_none() {
        debug!("nothing to resolve from question or session");
        return Resolution::Unresolvable;
    }
    let question_type = found_intent.unwrap_or(QuestionType::TotalAmount);

    let mut context = session.clone();
    if parsed.period.is_some() {
        context.period = parsed.period;
    }
    if parsed.category.is_some() {
        context.category = parsed.category.clone();
    }
    context.question_type = Some(question_type);

    debug!(?question_type, ?period, ?category, "resolved question");
    Resolution::Resolved {
        query: ParsedQuery {
            period,
            category,
            question_type: Some(question_type),
            reference_date: parsed.reference_date,
            is_compare: parsed.is_compare,
        },
        context,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::Period;
    use chrono::NaiveDate;

    fn resolved(r: Resolution) -> (ParsedQuery, ConversationContext) {
        match r {
            Resolution::Resolved { query, context } => (query, context),
            Resolution::Unresolvable => panic!("expected a resolved query"),
        }
    }

    fn keyword(q: Option<QuestionType>) -> ParsedQuery {
        ParsedQuery {
            question_type: q,
            period: Some(Period::ThisMonth),
            ..Default::default()
        }
    }

    #[test]
    fn test_trivial_inputs() {
        assert_eq!(check_guards("ㅋㅋ"), Some(Rejection::Trivial));
        assert_eq!(check_guards("  네 "), Some(Rejection::Trivial));
        assert_eq!(check_guards("OK"), Some(Rejection::Trivial));
        assert_eq!(check_guards("돈"), Some(Rejection::Trivial));
        assert_eq!(check_guards(""), Some(Rejection::Trivial));
    }

    #[test]
    fn test_irrelevant_inputs() {
        let off_topic = [
            "안녕하세요 날씨 어때?",
            "tell me a joke",
            "노래 틀어주세요",
            "내일 날씨 알려주세요",
            "일본 여행 가고 싶어",
            "주말에 뭐하지",
            "달이 예쁘다",
            "월요일 싫다",
            "원숭이 사진 보여줘",
        ];
        for text in off_topic {
            assert_eq!(check_guards(text), Some(Rejection::Irrelevant), "{text}");
        }
    }

    #[test]
    fn test_relevant_inputs_pass() {
        let on_topic = [
            "이번 달 식비 얼마 썼어?",
            "지난달은?",
            "예산 남았어?",
            "어제는?",
            "5월에는?",
            "3월 5일",
            "최근 7일 카페",
            "작년 총액",
        ];
        for text in on_topic {
            assert_eq!(check_guards(text), None, "{text}");
        }
    }

    #[test]
    fn test_classifier_wins_when_not_none() {
        let (query, _) = resolved(resolve(
            QuestionType::TopCategory,
            keyword(Some(QuestionType::Count)),
            &ConversationContext::default(),
        ));
        assert_eq!(query.question_type, Some(QuestionType::TopCategory));
    }

    #[test]
    fn test_keyword_intent_when_classifier_none() {
        let (query, _) = resolved(resolve(
            QuestionType::None,
            keyword(Some(QuestionType::Count)),
            &ConversationContext::default(),
        ));
        assert_eq!(query.question_type, Some(QuestionType::Count));
    }

    #[test]
    fn test_session_intent_then_default() {
        let session = ConversationContext {
            question_type: Some(QuestionType::Summary),
            ..Default::default()
        };
        let (query, _) = resolved(resolve(QuestionType::None, keyword(None), &session));
        assert_eq!(query.question_type, Some(QuestionType::Summary));

        let (query, context) = resolved(resolve(
            QuestionType::None,
            keyword(None),
            &ConversationContext::default(),
        ));
        assert_eq!(query.question_type, Some(QuestionType::TotalAmount));
        assert_eq!(context.question_type, Some(QuestionType::TotalAmount));
    }

    #[test]
    fn test_unresolvable_without_any_signal() {
        let r = resolve(
            QuestionType::None,
            ParsedQuery::default(),
            &ConversationContext::default(),
        );
        assert_eq!(r, Resolution::Unresolvable);
    }

    #[test]
    fn test_session_period_alone_is_enough() {
        let session = ConversationContext {
            period: Some(Period::LastWeek),
            ..Default::default()
        };
        let (query, context) = resolved(resolve(QuestionType::None, ParsedQuery::default(), &session));
        assert_eq!(query.period, Some(Period::LastWeek));
        assert_eq!(query.question_type, Some(QuestionType::TotalAmount));
        assert_eq!(context.period, Some(Period::LastWeek));
    }

    #[test]
    fn test_context_is_monotonic() {
        let session = ConversationContext {
            period: Some(Period::LastMonth),
            category: Some("식비".to_string()),
            question_type: Some(QuestionType::Count),
        };
        let parsed = ParsedQuery {
            period: Some(Period::ThisWeek),
            ..Default::default()
        };
        let (query, context) = resolved(resolve(QuestionType::None, parsed, &session));
        assert_eq!(query.period, Some(Period::ThisWeek));
        assert_eq!(query.category.as_deref(), Some("식비"));
        assert_eq!(context.period, Some(Period::ThisWeek));
        assert_eq!(context.category.as_deref(), Some("식비"));
        assert_eq!(context.question_type, Some(QuestionType::Count));
    }

    #[test]
    fn test_reference_date_and_compare_come_from_this_turn() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        let parsed = ParsedQuery {
            period: Some(Period::SpecificDay { date }),
            reference_date: Some(date),
            is_compare: true,
            ..Default::default()
        };
        let (query, _) = resolved(resolve(
            QuestionType::DateExpense,
            parsed,
            &ConversationContext::default(),
        ));
        assert_eq!(query.reference_date, Some(date));
        assert!(query.is_compare);

        let session = ConversationContext {
            period: Some(Period::SpecificDay { date }),
            ..Default::default()
        };
        let (query, _) = resolved(resolve(QuestionType::None, ParsedQuery::default(), &session));
        assert_eq!(query.reference_date, None);
        assert!(!query.is_compare);
    }
}
