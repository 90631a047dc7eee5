//! Embedding API clients for the supported providers

use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::config::AppConfig;
use crate::errors::AnimoaError;
use crate::errors::Result;

/// Supported embedding providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingProvider {
    /// HuggingFace Inference API (feature-extraction pipeline)
    HuggingFace,
    /// Ollama local embeddings
    Ollama,
}

/// Client for generating embeddings
pub struct EmbeddingClient {
    provider: EmbeddingProvider,
    model: String,
    endpoint: String,
    api_key: Option<String>,
    dimension: usize,
    client: Client,
}

impl EmbeddingClient {
    /// Create a new embedding client
    pub fn new(
        provider: EmbeddingProvider,
        model: String,
        endpoint: String,
        api_key: Option<String>,
        dimension: usize,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| AnimoaError::Http(e.to_string()))?;

        Ok(Self {
            provider,
            model,
            endpoint,
            api_key,
            dimension,
            client,
        })
    }

    /// Create a client from application configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let provider = match config.embedding_provider() {
            "huggingface" => EmbeddingProvider::HuggingFace,
            "ollama" => EmbeddingProvider::Ollama,
            other => {
                return Err(AnimoaError::Config(format!(
                    "Unknown embedding provider: {other}"
                )))
            }
        };

        Self::new(
            provider,
            config.embedding_model().to_string(),
            config.embedding_endpoint().to_string(),
            config.embedding_api_key().map(ToString::to_string),
            config.embedding_dimension(),
        )
    }

    /// Generate an embedding for a single text
    ///
    /// # Errors
    /// - Missing API key (HuggingFace provider)
    /// - API request failures (network errors, timeouts, authentication)
    /// - Invalid API responses (malformed JSON, wrong dimension)
    pub async fn generate(&self, text: &str) -> Result<Vec<f32>> {
        let embedding = match self.provider {
            EmbeddingProvider::HuggingFace => self.generate_huggingface(text).await?,
            EmbeddingProvider::Ollama => self.generate_ollama(text).await?,
        };

        if embedding.len() != self.dimension {
            return Err(AnimoaError::Embedding(format!(
                "Expected {} dimensions, got {}",
                self.dimension,
                embedding.len()
            )));
        }

        Ok(embedding)
    }

    /// Generate an embedding using the HuggingFace Inference API
    async fn generate_huggingface(&self, text: &str) -> Result<Vec<f32>> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            AnimoaError::Config("HuggingFace API key not provided".to_string())
        })?;

        #[derive(Serialize)]
        struct HfOptions {
            wait_for_model: bool,
        }

        #[derive(Serialize)]
        struct HfRequest<'a> {
            inputs: &'a str,
            options: HfOptions,
        }

        let url = format!(
            "{}/pipeline/feature-extraction/{}",
            self.endpoint, self.model
        );
        debug!("Calling HuggingFace embeddings API: {}", url);

        let request = HfRequest {
            inputs: text,
            options: HfOptions {
                wait_for_model: true,
            },
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
            return Err(AnimoaError::Embedding(format!(
                "HuggingFace API error ({status}): {error_text}"
            )));
        }

        let embedding: Vec<f32> = response
            .json()
            .await
            .map_err(|e| AnimoaError::Embedding(format!("Failed to parse response: {e}")))?;

        Ok(embedding)
    }

    /// Generate an embedding using the Ollama API
    async fn generate_ollama(&self, text: &str) -> Result<Vec<f32>> {
        #[derive(Serialize)]
        struct OllamaRequest<'a> {
            model: &'a str,
            prompt: &'a str,
        }

        #[derive(Deserialize)]
        struct OllamaResponse {
            embedding: Vec<f32>,
        }

        let url = format!("{}/api/embeddings", self.endpoint);
        debug!("Calling Ollama embeddings API: {}", url);

        let request = OllamaRequest {
            model: &self.model,
            prompt: text,
        };

        let response = self
            .client
            .post(&url)
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
            return Err(AnimoaError::Embedding(format!(
                "Ollama API error ({status}): {error_text}"
            )));
        }

        let result: OllamaResponse = response
            .json()
            .await
            .map_err(|e| AnimoaError::Embedding(format!("Failed to parse response: {e}")))?;

        Ok(result.embedding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_is_config_error() {
        let client = EmbeddingClient::new(
            EmbeddingProvider::HuggingFace,
            "BAAI/bge-small-en-v1.5".to_string(),
            "https://api-inference.huggingface.co".to_string(),
            None,
            384,
        )
        .unwrap();

        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let err = rt.block_on(client.generate("hello")).unwrap_err();
        assert!(matches!(err, AnimoaError::Config(_)));
    }

    #[tokio::test]
    #[ignore = "Requires API key"]
    async fn test_huggingface_embedding() {
        let client = EmbeddingClient::new(
            EmbeddingProvider::HuggingFace,
            "BAAI/bge-small-en-v1.5".to_string(),
            "https://api-inference.huggingface.co".to_string(),
            std::env::var("HUGGINGFACE_API_KEY").ok(),
            384,
        )
        .unwrap();

        let embedding = client.generate("Hello, world!").await.unwrap();
        assert_eq!(embedding.len(), 384);
    }
}
