//! Conversational spending assistant.
//!
//! A question in plain Korean ("이번 달 식비 얼마 썼어?") goes through
//! [`Assistant::handle_turn`] and comes back as a reply plus the
//! conversation context for the next turn. The classifier, the expense store,
//! the formatter and the clock are injected capabilities.

pub mod analytics;
pub mod answer;
pub mod assistant;
pub mod classifier;
pub mod db;
pub mod error;
pub mod fmt;
pub mod models;
pub mod parser;
pub mod period;
pub mod resolver;
pub mod session;
pub mod settings;
pub mod store;

pub use assistant::{Assistant, AssistantConfig, TurnReply};
pub use classifier::{ClassifierAdapter, IntentClassifier, KeywordClassifier};
pub use error::{PennyError, Result};
pub use fmt::{Formatter, KrwFormatter};
pub use models::{ChatMessage, ConversationContext, ParsedQuery, QuestionType, Transaction};
pub use period::{Clock, DateRange, FixedClock, LocalClock, Period};
pub use session::ChatSession;
pub use store::{MemoryStore, SqliteStore, TransactionStore};
