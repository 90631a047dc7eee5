//! Client for an OpenAI-compatible chat-completions API

use futures::StreamExt;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::debug;
use tracing::warn;

use crate::config::AppConfig;
use crate::errors::AnimoaError;
use crate::errors::Result;
use crate::llm::ChatMessage;
use crate::llm::StreamingResponse;

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatCompletionChunk {
    choices: Vec<ChunkChoice>,
}

#[derive(Deserialize)]
struct ChunkChoice {
    delta: ChunkDelta,
}

#[derive(Deserialize)]
struct ChunkDelta {
    content: Option<String>,
}

/// Client for the completion API
#[derive(Clone)]
pub struct CompletionClient {
    endpoint: String,
    api_key: Option<String>,
    model: String,
    client: Client,
}

impl CompletionClient {
    /// Create a new completion client
    pub fn new(endpoint: String, api_key: Option<String>, model: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| AnimoaError::Http(e.to_string()))?;

        Ok(Self {
            endpoint,
            api_key,
            model,
            client,
        })
    }

    /// Create a client from application configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            config.llm_endpoint().to_string(),
            config.llm_api_key().map(ToString::to_string),
            config.llm_model().to_string(),
        )
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AnimoaError::Config("Completion API key not provided".to_string()))
    }

    /// Generate a completion for a message list (non-streaming)
    ///
    /// # Errors
    /// - Missing API key
    /// - API request failures (network errors, timeouts, rate limits)
    /// - Invalid API responses (malformed JSON, empty choices)
    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String> {
        let api_key = self.api_key()?;

        let url = format!("{}/chat/completions", self.endpoint);
        debug!("Calling completion API: {} ({} messages)", url, messages.len());

        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature,
            max_tokens,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AnimoaError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AnimoaError::Completion(format!(
                "Completion API error ({status}): {error_text}"
            )));
        }

        let result: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AnimoaError::Completion(format!("Failed to parse response: {e}")))?;

        result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AnimoaError::Completion("No content in response".to_string()))
    }

    /// Generate a completion as a token stream.
    ///
    /// The HTTP request is issued before this returns, so configuration and
    /// connection errors surface as `Err` here rather than as stream items.
    /// Mid-stream failures are yielded as an `Err` item and end the stream.
    pub async fn complete_stream(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<StreamingResponse> {
        let api_key = self.api_key()?;

        let url = format!("{}/chat/completions", self.endpoint);
        debug!(
            "Calling streaming completion API: {} ({} messages)",
            url,
            messages.len()
        );

        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature,
            max_tokens,
            stream: true,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AnimoaError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AnimoaError::Completion(format!(
                "Completion API error ({status}): {error_text}"
            )));
        }

        let (tx, rx) = mpsc::channel::<Result<String>>(64);

        tokio::spawn(async move {
            let mut stream = response.bytes_stream();
            // SSE lines can be split across network chunks; carry the
            // incomplete tail between reads
            let mut buffer = String::new();

            while let Some(chunk_result) = stream.next().await {
                let chunk = match chunk_result {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        let _ = tx
                            .send(Err(AnimoaError::Completion(format!(
                                "Stream read error: {e}"
                            ))))
                            .await;
                        return;
                    }
                };

                buffer.push_str(&String::from_utf8_lossy(&chunk));

                while let Some(newline) = buffer.find('\n') {
                    let line = buffer[..newline].trim_end_matches('\r').to_string();
                    buffer.drain(..=newline);

                    let Some(data) = line.strip_prefix("data: ") else {
                        continue;
                    };
                    if data == "[DONE]" {
                        return;
                    }

                    match serde_json::from_str::<ChatCompletionChunk>(data) {
                        Ok(parsed) => {
                            let content = parsed
                                .choices
                                .into_iter()
                                .next()
                                .and_then(|c| c.delta.content);
                            if let Some(content) = content {
                                if !content.is_empty() && tx.send(Ok(content)).await.is_err() {
                                    // Receiver dropped: stop reading upstream
                                    return;
                                }
                            }
                        }
                        Err(e) => {
                            warn!("Skipping malformed stream chunk: {}", e);
                        }
                    }
                }
            }
        });

        let stream = ReceiverStream::new(rx);
        Ok(StreamingResponse::new(Box::pin(stream)))
    }
}
