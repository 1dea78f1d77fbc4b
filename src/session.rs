//! A running conversation: the carried context plus the transcript.

use tokio::sync::Mutex;
use tracing::debug;

use crate::assistant::Assistant;
use crate::error::{PennyError, Result};
use crate::models::{ChatMessage, ConversationContext};

#[derive(Debug, Default)]
struct SessionState {
    context: ConversationContext,
    transcript: Vec<ChatMessage>,
}

/// Holds one conversation. Turns are strictly sequential: a turn started
/// while another is still in flight is rejected with [`PennyError::Busy`].
pub struct ChatSession {
    assistant: Assistant,
    state: Mutex<SessionState>,
}

impl ChatSession {
    pub fn new(assistant: Assistant) -> Self {
        Self::resume(assistant, ConversationContext::default())
    }

    /// Continue a conversation whose context was saved earlier.
    pub fn resume(assistant: Assistant, context: ConversationContext) -> Self {
        Self {
            assistant,
            state: Mutex::new(SessionState {
                context,
                transcript: Vec::new(),
            }),
        }
    }

    pub async fn handle_turn(&self, text: &str) -> Result<String> {
        let mut state = self.state.try_lock().map_err(|_| PennyError::Busy)?;
        let asked_at = self.assistant.now();
        state.transcript.push(ChatMessage::user(text, asked_at));

        let reply = self.assistant.handle_turn(text, &state.context).await;

        let answered_at = self.assistant.now();
        state
            .transcript
            .push(ChatMessage::assistant(reply.reply_text.clone(), answered_at));
        state.context = reply.session;
        Ok(reply.reply_text)
    }

    /// Waits for any turn in flight.
    pub async fn context(&self) -> ConversationContext {
        self.state.lock().await.context.clone()
    }

    pub async fn transcript(&self) -> Vec<ChatMessage> {
        self.state.lock().await.transcript.clone()
    }

    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        state.context = ConversationContext::default();
        state.transcript.clear();
        debug!("conversation reset");
    }
}
