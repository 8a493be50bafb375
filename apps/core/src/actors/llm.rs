use crate::actors::messages::{ActorError, AppError, LlmMessage};
use crate::actors::traits::LlmActor;
use crate::config::GeminiSettings;
use crate::models::ChatTurn;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tracing::{error, info};
use url::Url;

/// A handle to the Gemini actor.
///
/// This struct provides a public, cloneable interface for sending messages to the
/// running actor. It abstracts away the `mpsc::Sender`.
#[derive(Clone)]
pub struct GeminiActorHandle {
    sender: mpsc::Sender<LlmMessage>,
    reply_timeout: Duration,
}

impl GeminiActorHandle {
    /// Creates a new Gemini actor and returns a handle to it.
    ///
    /// This will spawn the `GeminiActorRunner` in a new Tokio task.
    pub fn new(settings: GeminiSettings) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        let reply_timeout = settings.timeout + HANDLE_GRACE;
        let actor = GeminiActorRunner::new(receiver, settings);
        tokio::spawn(async move { actor.run().await });
        Self {
            sender,
            reply_timeout,
        }
    }

    async fn request(
        &self,
        msg: LlmMessage,
        recv: oneshot::Receiver<Result<String, AppError>>,
    ) -> Result<String, AppError> {
        self.sender
            .send(msg)
            .await
            .map_err(|e| ActorError::Internal(e.to_string()))?;
        timeout(self.reply_timeout, recv)
            .await
            .map_err(ActorError::from)?
            .map_err(|e| ActorError::Internal(e.to_string()))?
    }
}

#[async_trait]
impl LlmActor for GeminiActorHandle {
    async fn generate(&self, prompt: String, temperature: Option<f32>) -> Result<String, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = LlmMessage::Generate {
            prompt,
            temperature,
            responder: send,
        };
        self.request(msg, recv).await
    }

    async fn chat(
        &self,
        turns: Vec<ChatTurn>,
        temperature: Option<f32>,
    ) -> Result<String, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = LlmMessage::Chat {
            turns,
            temperature,
            responder: send,
        };
        self.request(msg, recv).await
    }
}

// --- Constants ---
/// Extra time the handle waits beyond the HTTP timeout before giving up on the runner.
const HANDLE_GRACE: Duration = Duration::from_secs(5);
const API_VERSION: &str = "v1beta";

// --- Wire types ---
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GenerateContentResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CandidatePart {
    text: String,
}

// --- Actor Runner (Internal Logic) ---
struct GeminiActorRunner {
    receiver: mpsc::Receiver<LlmMessage>,
    server_url: String,
    api_key: String,
    model: String,
    default_temperature: f32,
    request_timeout: Duration,
    client: Client,
}

impl GeminiActorRunner {
    fn new(receiver: mpsc::Receiver<LlmMessage>, settings: GeminiSettings) -> Self {
        Self {
            receiver,
            server_url: settings.base_url.to_string(),
            api_key: settings.api_key,
            model: settings.model,
            default_temperature: settings.temperature,
            request_timeout: settings.timeout,
            client: Client::new(),
        }
    }

    async fn run(mut self) {
        info!(model = %self.model, "Gemini actor started");

        while let Some(msg) = self.receiver.recv().await {
            self.handle_message(msg).await;
        }

        info!("Gemini actor stopped");
    }

    async fn handle_message(&mut self, msg: LlmMessage) {
        match msg {
            LlmMessage::Generate {
                prompt,
                temperature,
                responder,
            } => {
                let contents = vec![Content {
                    role: "user",
                    parts: vec![Part { text: &prompt }],
                }];
                let result = self.generate_content(contents, temperature).await;
                let _ = responder.send(result);
            }
            LlmMessage::Chat {
                turns,
                temperature,
                responder,
            } => {
                let contents = turns
                    .iter()
                    .map(|turn| Content {
                        role: turn.role.as_str(),
                        parts: vec![Part { text: &turn.text }],
                    })
                    .collect();
                let result = self.generate_content(contents, temperature).await;
                let _ = responder.send(result);
            }
        }
    }

    /// `{server}/v1beta/models/{model}:generateContent?key={api_key}`
    fn endpoint(&self) -> Result<Url, AppError> {
        let method = format!("{}:generateContent", self.model);
        let mut url = Url::parse(&self.server_url)?;
        url.path_segments_mut()
            .map_err(|_| AppError::Config(format!("{} cannot be a base URL", self.server_url)))?
            .pop_if_empty()
            .extend([API_VERSION, "models", method.as_str()]);
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    async fn generate_content(
        &self,
        contents: Vec<Content<'_>>,
        temperature: Option<f32>,
    ) -> Result<String, AppError> {
        info!(
            turns = contents.len(),
            model = %self.model,
            "Gemini generateContent"
        );

        let payload = GenerateContentRequest {
            contents,
            generation_config: GenerationConfig {
                temperature: temperature.unwrap_or(self.default_temperature),
            },
        };

        let request_future = self.client.post(self.endpoint()?).json(&payload).send();
        let res = timeout(self.request_timeout, request_future)
            .await
            .map_err(ActorError::from)?
            .map_err(|e| ActorError::Llm(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            error!(%status, "Gemini request failed");
            return Err(ActorError::Llm(format!(
                "Gemini request failed with status {}: {}",
                status, body
            ))
            .into());
        }

        let body = res
            .text()
            .await
            .map_err(|e| ActorError::Llm(e.to_string()))?;
        let response: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| ActorError::Parse(e.to_string()))?;

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ActorError::Parse("response contained no candidates".to_string()))?;
        let text: String = candidate
            .content
            .parts
            .into_iter()
            .map(|part| part.text)
            .collect();
        if text.trim().is_empty() {
            return Err(ActorError::Parse("candidate contained no text".to_string()).into());
        }
        Ok(text)
    }
}
