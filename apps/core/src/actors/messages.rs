use serde::Serialize;
use tokio::sync::oneshot;

use crate::models::ChatTurn;

/// Defines errors that can occur within the actor system.
#[derive(Debug, thiserror::Error, Serialize, Clone, PartialEq, Eq)]
pub enum ActorError {
    /// The model service rejected the request or could not be reached.
    #[error("LLM request failed: {0}")]
    Llm(String),
    /// The model answered, but not in the expected shape.
    #[error("Could not parse model output: {0}")]
    Parse(String),
    /// A generic internal error within an actor.
    #[error("Internal system error: {0}")]
    Internal(String),
    /// An error indicating that an actor operation timed out.
    #[error("Operation timed out: {0}")]
    Timeout(String),
}

impl From<tokio::time::error::Elapsed> for ActorError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        ActorError::Timeout(format!("Actor operation timed out: {}", err))
    }
}

// Re-export AppError for convenience
pub use crate::error::AppError;

/// Messages that can be sent to the LLM actor.
#[derive(Debug)]
pub enum LlmMessage {
    /// A single-prompt completion.
    Generate {
        prompt: String,
        temperature: Option<f32>,
        /// A channel to send the final `String` result back.
        responder: oneshot::Sender<Result<String, AppError>>,
    },
    /// A multi-turn conversation; the reply continues the last user turn.
    Chat {
        turns: Vec<ChatTurn>,
        temperature: Option<f32>,
        responder: oneshot::Sender<Result<String, AppError>>,
    },
}
