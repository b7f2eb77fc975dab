//! Orchestration for cartscout: the stage pipeline that fans each enabled
//! stage out across marketplace adapters, the chat-completion client, and the
//! conversation driver that ties a shopper's question to a pipeline run.

pub mod assistant;
pub mod conversation;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod prompt;

pub use assistant::{SearchOutcome, ShoppingAssistant};
pub use conversation::Conversation;
pub use error::{AgentError, PipelineError};
pub use llm::{ChatMessage, CompletionService, OpenAiCompletionClient, Role};
pub use pipeline::{Pipeline, RunOptions};
