//! One conversational turn, end to end.
//!
//! ```text
//! text -> guards -> (classifier || categories) -> parse -> resolve
//!      -> fetch range -> answer
//! ```
//!
//! The classifier call and the category lookup run concurrently and are both
//! awaited before the resolver merges. The fetch follows resolution because
//! its range is only known then.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::answer::{self, AnswerContext, APOLOGY};
use crate::classifier::{ClassifierAdapter, IntentClassifier, DEFAULT_CLASSIFIER_TIMEOUT};
use crate::fmt::{Formatter, KrwFormatter};
use crate::models::ConversationContext;
use crate::parser;
use crate::period::{Clock, LocalClock};
use crate::resolver::{check_guards, resolve, Resolution};
use crate::store::TransactionStore;

pub const DEFAULT_MONTHLY_BUDGET: f64 = 1_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssistantConfig {
    /// Monthly budget the budget intents compare against.
    pub budget: f64,
    /// Longest wait for the intent classifier before falling back to keywords.
    pub classifier_timeout: Duration,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            budget: DEFAULT_MONTHLY_BUDGET,
            classifier_timeout: DEFAULT_CLASSIFIER_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TurnReply {
    pub reply_text: String,
    pub session: ConversationContext,
}

impl TurnReply {
    fn unchanged(text: &str, session: &ConversationContext) -> Self {
        Self {
            reply_text: text.to_string(),
            session: session.clone(),
        }
    }
}

pub struct Assistant {
    classifier: ClassifierAdapter,
    store: Arc<dyn TransactionStore>,
    formatter: Arc<dyn Formatter>,
    clock: Arc<dyn Clock>,
    config: AssistantConfig,
}

impl Assistant {
    /// An assistant with no classifier, the won formatter and the system clock.
    pub fn new(store: Arc<dyn TransactionStore>, config: AssistantConfig) -> Self {
        Self {
            classifier: ClassifierAdapter::unavailable(),
            store,
            formatter: Arc::new(KrwFormatter),
            clock: Arc::new(LocalClock),
            config,
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn IntentClassifier>) -> Self {
        self.classifier = ClassifierAdapter::new(classifier, self.config.classifier_timeout);
        self
    }

    pub fn with_formatter(mut self, formatter: Arc<dyn Formatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The instant this assistant's clock reads now.
    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// Answer `text` given the carried `session`, returning the reply and the
    /// session for the next turn. Never fails: classifier and store problems
    /// are logged and degrade the answer instead.
    pub async fn handle_turn(&self, text: &str, session: &ConversationContext) -> TurnReply {
        let now = self.clock.now();

        if let Some(rejection) = check_guards(text) {
            debug!(?rejection, "question turned away");
            return TurnReply::unchanged(rejection.message(), session);
        }

        let (classified, categories) = tokio::join!(
            self.classifier.classify(text),
            self.store.list_distinct_categories()
        );
        let categories = categories.unwrap_or_else(|e| {
            warn!(error = %e, "could not list categories, matching none");
            Vec::new()
        });

        let parsed = parser::parse(text, &categories, now.date());
        let (query, context) = match resolve(classified, parsed, session) {
            Resolution::Unresolvable => return TurnReply::unchanged(APOLOGY, session),
            Resolution::Resolved { query, context } => (query, context),
        };

        let txns = match answer::fetch_range(&query, now) {
            Some(range) => match self.store.fetch_by_range(range).await {
                Ok(txns) => txns,
                Err(e) => {
                    warn!(error = %e, "expense fetch failed, answering as empty");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        let ctx = AnswerContext {
            formatter: self.formatter.as_ref(),
            budget: self.config.budget,
            now,
        };
        TurnReply {
            reply_text: answer::answer(&query, txns, &ctx),
            session: context,
        }
    }
}
