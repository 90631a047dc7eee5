//! RAG (Retrieval-Augmented Generation) module
//!
//! Retrieval over the wellness knowledge base and formatting of results into
//! prompt fragments:
//! - Semantic retrieval using vector embeddings (best-effort, never fails
//!   the calling request)
//! - Context formatting for prompt injection
//! - Assessment-driven query and domain-filter construction

pub mod context;
pub mod retriever;

pub use context::format_knowledge_context;
pub use retriever::KnowledgeRetriever;
pub use retriever::RetrieveOptions;
