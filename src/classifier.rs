//! Intent classification.
//!
//! The classifier itself is an injected capability that produces a raw
//! label. [`ClassifierAdapter`] turns whatever it produces (or fails to
//! produce) into a [`QuestionType`], so a missing, broken or slow model
//! degrades to [`QuestionType::None`] and the keyword parser carries the turn.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{PennyError, Result};
use crate::models::QuestionType;
use crate::parser::normalize;
use crate::period::has_specific_day;

pub const DEFAULT_CLASSIFIER_TIMEOUT: Duration = Duration::from_millis(1500);

/// A text classifier that returns one raw intent label per question.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<String>;
}

pub struct ClassifierAdapter {
    inner: Option<Arc<dyn IntentClassifier>>,
    timeout: Duration,
}

impl ClassifierAdapter {
    pub fn new(inner: Arc<dyn IntentClassifier>, timeout: Duration) -> Self {
        Self {
            inner: Some(inner),
            timeout,
        }
    }

    /// An adapter with no model behind it; every question classifies as `none`.
    pub fn unavailable() -> Self {
        Self {
            inner: None,
            timeout: DEFAULT_CLASSIFIER_TIMEOUT,
        }
    }

    pub async fn classify(&self, text: &str) -> QuestionType {
        let Some(inner) = &self.inner else {
            debug!("no intent classifier configured");
            return QuestionType::None;
        };
        match tokio::time::timeout(self.timeout, inner.classify(text)).await {
            Ok(Ok(label)) => {
                let question_type = QuestionType::from_label(&label);
                debug!(label = %label, ?question_type, "classified question");
                question_type
            }
            Ok(Err(e)) => {
                warn!(error = %e, "intent classifier failed, falling back to keywords");
                QuestionType::None
            }
            Err(_) => {
                let e = PennyError::ClassifierTimeout(self.timeout);
                warn!(error = %e, "intent classifier timed out, falling back to keywords");
                QuestionType::None
            }
        }
    }
}

// (label, keywords) checked in order; the first rule with a hit wins.
const KEYWORD_RULES: &[(&str, &[&str])] = &[
    ("compare", &["비교", "대비"]),
    ("trend", &["추이", "추세", "흐름", "월별"]),
    ("paymentType", &["결제수단", "카드", "현금"]),
    ("avgExpense", &["평균"]),
    ("overspent", &["초과", "넘었", "넘게", "오버"]),
    ("remainedBudget", &["남은예산", "예산남", "잔액"]),
    ("byCategory", &["카테고리별", "항목별", "분류별", "어디에"]),
];

/// Rule-based stand-in for an on-device model. Covers the intents the
/// keyword parser never emits and answers `none` for everything else.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn label(&self, text: &str) -> &'static str {
        let normalized = normalize(text);
        for (label, keywords) in KEYWORD_RULES {
            if keywords.iter().any(|k| normalized.contains(k)) {
                return label;
            }
        }
        if has_specific_day(&normalized) {
            return "dateExpense";
        }
        "none"
    }
}

#[async_trait]
impl IntentClassifier for KeywordClassifier {
    async fn classify(&self, text: &str) -> Result<String> {
        Ok(self.label(text).to_string())
    }
}
