//! Completion API integration
//!
//! Client for an OpenAI-compatible chat-completions endpoint, prompt
//! construction for the companion persona, and the streaming response
//! wrapper consumed by the chat pipeline.

mod client;
pub mod prompts;
mod streaming;

pub use client::CompletionClient;
pub use streaming::StreamingResponse;

use serde::Deserialize;
use serde::Serialize;

/// Role of a completion-request message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One message in a completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}
