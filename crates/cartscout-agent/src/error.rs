use cartscout_core::{CoreError, DecodeError, Platform};
use thiserror::Error;

/// Errors that abort a pipeline run before any stage executes.
///
/// Per-platform adapter failures are not represented here: they are recorded
/// on the platform's result entry and the run continues.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("no adapter is configured for platform {0}")]
    AdapterUnavailable(Platform),
}

/// Errors from the completion service and the conversation driver.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion service returned HTTP {status}: {body}")]
    CompletionStatus { status: u16, body: String },

    #[error("completion response has no message content")]
    EmptyCompletion,

    #[error("JSON error for {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("completion service is not configured: set {0}")]
    MissingApiKey(&'static str),

    #[error("could not decode the reasoning response: {0}")]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}
