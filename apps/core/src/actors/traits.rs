use crate::actors::messages::AppError;
use crate::models::ChatTurn;
use async_trait::async_trait;

/// Defines the public interface for an LLM (Large Language Model) actor.
///
/// This trait abstracts the model backend so the advisor can be driven by the
/// hosted service in production and by scripted actors in tests.
#[async_trait]
pub trait LlmActor: Send + Sync + 'static {
    /// Generates a complete text response for a single prompt.
    async fn generate(&self, prompt: String, temperature: Option<f32>) -> Result<String, AppError>;

    /// Continues a conversation and returns the model's next turn.
    async fn chat(
        &self,
        turns: Vec<ChatTurn>,
        temperature: Option<f32>,
    ) -> Result<String, AppError>;
}
