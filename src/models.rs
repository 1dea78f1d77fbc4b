use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::period::Period;

/// A recorded expense, as returned by a [`crate::store::TransactionStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDateTime,
    pub category: String,
    pub amount: f64,
    pub note: String,
}

/// What the user is asking about. The serialized names are the raw labels
/// produced by the intent classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestionType {
    TotalAmount,
    ByCategory,
    Count,
    Summary,
    TopCategory,
    MinCategory,
    TopDay,
    MinDay,
    RemainedBudget,
    Overspent,
    Trend,
    PaymentType,
    AvgExpense,
    Compare,
    DateExpense,
    None,
}

impl QuestionType {
    pub const ALL: [QuestionType; 16] = [
        QuestionType::TotalAmount,
        QuestionType::ByCategory,
        QuestionType::Count,
        QuestionType::Summary,
        QuestionType::TopCategory,
        QuestionType::MinCategory,
        QuestionType::TopDay,
        QuestionType::MinDay,
        QuestionType::RemainedBudget,
        QuestionType::Overspent,
        QuestionType::Trend,
        QuestionType::PaymentType,
        QuestionType::AvgExpense,
        QuestionType::Compare,
        QuestionType::DateExpense,
        QuestionType::None,
    ];

    pub fn as_label(self) -> &'static str {
        match self {
            QuestionType::TotalAmount => "totalAmount",
            QuestionType::ByCategory => "byCategory",
            QuestionType::Count => "count",
            QuestionType::Summary => "summary",
            QuestionType::TopCategory => "topCategory",
            QuestionType::MinCategory => "minCategory",
            QuestionType::TopDay => "topDay",
            QuestionType::MinDay => "minDay",
            QuestionType::RemainedBudget => "remainedBudget",
            QuestionType::Overspent => "overspent",
            QuestionType::Trend => "trend",
            QuestionType::PaymentType => "paymentType",
            QuestionType::AvgExpense => "avgExpense",
            QuestionType::Compare => "compare",
            QuestionType::DateExpense => "dateExpense",
            QuestionType::None => "none",
        }
    }

    /// Exact, case-sensitive match against the raw labels. Anything else
    /// maps to [`QuestionType::None`].
    pub fn from_label(label: &str) -> QuestionType {
        QuestionType::ALL
            .into_iter()
            .find(|q| q.as_label() == label)
            .unwrap_or(QuestionType::None)
    }

    pub fn is_none(self) -> bool {
        self == QuestionType::None
    }
}

/// State carried between chat turns. Fields are only ever replaced by a
/// newer value, never cleared by a turn that found nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationContext {
    #[serde(default)]
    pub period: Option<Period>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub question_type: Option<QuestionType>,
}

impl ConversationContext {
    pub fn is_empty(&self) -> bool {
        self.period.is_none() && self.category.is_none() && self.question_type.is_none()
    }
}

/// A single turn's query, either the keyword parser's fragment or the
/// fully merged result of the resolver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedQuery {
    pub period: Option<Period>,
    pub category: Option<String>,
    pub question_type: Option<QuestionType>,
    pub reference_date: Option<NaiveDate>,
    pub is_compare: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub text: String,
    pub is_user: bool,
    pub timestamp: NaiveDateTime,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>, timestamp: NaiveDateTime) -> Self {
        Self {
            text: text.into(),
            is_user: true,
            timestamp,
        }
    }

    pub fn assistant(text: impl Into<String>, timestamp: NaiveDateTime) -> Self {
        Self {
            text: text.into(),
            is_user: false,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_mapping_is_exact() {
        assert_eq!(QuestionType::from_label("topCategory"), QuestionType::TopCategory);
        assert_eq!(QuestionType::from_label("avgExpense"), QuestionType::AvgExpense);
        assert_eq!(QuestionType::from_label("TopCategory"), QuestionType::None);
        assert_eq!(QuestionType::from_label(" count"), QuestionType::None);
        assert_eq!(QuestionType::from_label(""), QuestionType::None);
    }

    #[test]
    fn test_every_label_maps_back() {
        for q in QuestionType::ALL {
            assert_eq!(QuestionType::from_label(q.as_label()), q);
        }
    }

    #[test]
    fn test_serde_uses_raw_labels() {
        let json = serde_json::to_string(&QuestionType::RemainedBudget).unwrap();
        assert_eq!(json, "\"remainedBudget\"");
    }

    #[test]
    fn test_context_roundtrip() {
        let ctx = ConversationContext {
            period: Some(Period::ThisMonth),
            category: Some("식비".to_string()),
            question_type: Some(QuestionType::Count),
        };
        let json = serde_json::to_string(&ctx).unwrap();
        let loaded: ConversationContext = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, ctx);
    }

    #[test]
    fn test_context_missing_fields_default() {
        let ctx: ConversationContext = serde_json::from_str("{}").unwrap();
        assert!(ctx.is_empty());
    }
}
