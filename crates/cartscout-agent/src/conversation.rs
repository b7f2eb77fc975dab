use crate::error::AgentError;
use crate::llm::{ChatMessage, CompletionService};

/// A running chat with the completion service.
///
/// Starts with a system turn; every [`Conversation::ask`] appends the user
/// turn and the service's reply, so later turns see the whole history.
pub struct Conversation<S> {
    service: S,
    messages: Vec<ChatMessage>,
}

impl<S: CompletionService> Conversation<S> {
    pub fn new(service: S, system_prompt: &str) -> Self {
        Self {
            service,
            messages: vec![ChatMessage::system(system_prompt)],
        }
    }

    /// Sends `message` as the next user turn and returns the reply.
    ///
    /// On failure the user turn is rolled back so the history stays
    /// alternating.
    ///
    /// # Errors
    ///
    /// Propagates the completion service's error.
    pub async fn ask(&mut self, message: &str) -> Result<String, AgentError> {
        self.messages.push(ChatMessage::user(message));
        match self.service.complete(&self.messages).await {
            Ok(reply) => {
                self.messages.push(ChatMessage::assistant(reply.clone()));
                Ok(reply)
            }
            Err(e) => {
                self.messages.pop();
                Err(e)
            }
        }
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}
