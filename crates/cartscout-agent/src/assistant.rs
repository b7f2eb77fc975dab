//! End-to-end question answering: ask the model for a plan, decode it, run
//! the pipeline, and ask the model to summarize the results.

use cartscout_core::{decode_intent, AggregateResult, Intent};
use serde::Serialize;

use crate::conversation::Conversation;
use crate::error::AgentError;
use crate::llm::CompletionService;
use crate::pipeline::{Pipeline, RunOptions};
use crate::prompt::{SUMMARY_INSTRUCTION, SYSTEM_PROMPT};

/// Everything produced for one question.
#[derive(Debug, Serialize)]
pub struct SearchOutcome {
    pub results: AggregateResult,
    pub intent: Intent,
    pub summary: String,
    /// The model's raw planning reply, kept for diagnostics.
    pub reasoning: String,
}

pub struct ShoppingAssistant<S> {
    conversation: Conversation<S>,
    pipeline: Pipeline,
}

impl<S: CompletionService> ShoppingAssistant<S> {
    pub fn new(service: S, pipeline: Pipeline) -> Self {
        Self {
            conversation: Conversation::new(service, SYSTEM_PROMPT),
            pipeline,
        }
    }

    /// Answers `question` in two completion turns around one pipeline run.
    ///
    /// # Errors
    ///
    /// - [`AgentError::Decode`] when the planning reply has no usable action
    ///   line.
    /// - [`AgentError::Pipeline`] when the reply selects an unknown platform.
    /// - Any completion service error from either turn.
    pub async fn search(
        &mut self,
        question: &str,
        options: RunOptions,
    ) -> Result<SearchOutcome, AgentError> {
        let reasoning = self.conversation.ask(question).await?;
        tracing::debug!(reply = %reasoning, "received planning reply");

        let intent = decode_intent(&reasoning)?;
        tracing::info!(
            stages = ?intent.enabled_stages().collect::<Vec<_>>(),
            params = intent.params().len(),
            "decoded intent"
        );

        let results = self.pipeline.run(&intent, options).await?;

        let observation = serde_json::to_string(&results).map_err(|e| AgentError::Json {
            context: "aggregate results".to_owned(),
            source: e,
        })?;
        let summary = self
            .conversation
            .ask(&format!("{SUMMARY_INSTRUCTION}\n Observation: {observation}"))
            .await?;

        Ok(SearchOutcome {
            results,
            intent,
            summary,
            reasoning,
        })
    }

    #[must_use]
    pub fn conversation(&self) -> &Conversation<S> {
        &self.conversation
    }
}
