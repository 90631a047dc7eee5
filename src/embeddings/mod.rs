//! Embeddings generation module
//!
//! Turns free text into fixed-dimension vectors for knowledge-base
//! similarity search. Supported providers:
//! - HuggingFace Inference API (feature-extraction pipeline)
//! - Ollama (local models)

mod client;

pub use client::EmbeddingClient;
pub use client::EmbeddingProvider;

/// Default embedding dimension for BAAI/bge-small-en-v1.5
pub const DEFAULT_EMBEDDING_DIM: usize = 384;
