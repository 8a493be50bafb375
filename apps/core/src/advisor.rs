//! AI-first analysis with a deterministic fallback.
//!
//! The advisor asks the model for an analysis and, whatever happens on the
//! wire, always returns a usable result: any transport, status, timeout or
//! decoding failure is replaced by the fallback analyzer's output for the
//! same request. Chat follows the same rule with a fixed apology.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::actors::traits::LlmActor;
use crate::error::AppError;
use crate::fallback::{self, signals, FallbackAnalyzer};
use crate::models::{AnalysisRequest, AnalysisResult, ChatReply, ChatTurn};
use crate::{parse, prompt};

/// Reply used when the chat call fails.
pub const CHAT_APOLOGY: &str = "申し訳ありません。エラーが発生しました。";

/// Reply used when no model is configured.
pub fn demo_reply(refined_goal: &str) -> String {
    format!(
        "（デモモード）AI APIキーが設定されていないため、これは自動応答です。本来ならここで、あなたのプロジェクト「{refined_goal}」について詳しく議論できます。"
    )
}

pub struct Advisor<L: LlmActor> {
    llm: Option<Arc<L>>,
    fallback: FallbackAnalyzer,
    min_delay: Duration,
    temperature: Option<f32>,
}

impl<L: LlmActor> Advisor<L> {
    /// `llm` is `None` in fallback-only mode.
    pub fn new(llm: Option<Arc<L>>, min_delay: Duration) -> Self {
        Self {
            llm,
            fallback: FallbackAnalyzer,
            min_delay,
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn has_model(&self) -> bool {
        self.llm.is_some()
    }

    /// Analyzes a request. Fails only on invalid input; collaborator
    /// failures are absorbed.
    ///
    /// Takes at least the configured minimum delay.
    #[instrument(
        skip(self, request),
        fields(
            goals = request.goals.len(),
            text_chars = request.free_text.chars().count()
        )
    )]
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AppError> {
        request.validate()?;

        let (outcome, _) = tokio::join!(self.analyze_with_model(request), sleep(self.min_delay));

        let result = match outcome {
            Some(Ok(mut result)) => {
                let profile = signals::extract(request);
                fallback::complete_eager_payloads(&mut result, &profile);
                info!(modules = ?result.module_ids(), "Analysis produced by model");
                result
            }
            Some(Err(e)) => {
                warn!("Model analysis failed, using fallback: {}", e);
                self.fallback.analyze(request)
            }
            None => {
                info!("No model configured, using fallback");
                self.fallback.analyze(request)
            }
        };
        Ok(result)
    }

    async fn analyze_with_model(
        &self,
        request: &AnalysisRequest,
    ) -> Option<Result<AnalysisResult, AppError>> {
        let llm = self.llm.as_ref()?;
        let today = chrono::Local::now().date_naive();
        let text = match llm
            .generate(prompt::analysis_prompt(request, today), self.temperature)
            .await
        {
            Ok(text) => text,
            Err(e) => return Some(Err(e)),
        };
        Some(parse::parse_analysis(&text).map_err(AppError::from))
    }

    /// Answers a follow-up question about `result`. Never fails.
    #[instrument(skip(self, result, history, message), fields(history = history.len()))]
    pub async fn chat(
        &self,
        result: &AnalysisResult,
        history: &[ChatTurn],
        message: &str,
    ) -> ChatReply {
        let Some(llm) = self.llm.as_ref() else {
            return ChatReply {
                reply: demo_reply(&result.refined_goal),
            };
        };

        let reply = match prompt::chat_turns(result, history, message) {
            Ok(turns) => llm.chat(turns, self.temperature).await,
            Err(e) => Err(AppError::from(e)),
        };
        match reply {
            Ok(reply) => ChatReply { reply },
            Err(e) => {
                warn!("Chat failed: {}", e);
                ChatReply {
                    reply: CHAT_APOLOGY.to_string(),
                }
            }
        }
    }
}
