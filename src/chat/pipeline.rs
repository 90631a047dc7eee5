//! The chat turn pipeline: retrieve -> format -> assemble -> stream

use std::sync::Arc;

use futures::Stream;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::error;
use tracing::warn;
use uuid::Uuid;

use crate::chat::persistence;
use crate::chat::StreamChunk;
use crate::config::AppConfig;
use crate::crisis::contains_crisis_signal;
use crate::database::Database;
use crate::embeddings::EmbeddingClient;
use crate::llm::prompts;
use crate::llm::CompletionClient;
use crate::models::ConversationTurn;
use crate::models::Profile;
use crate::rag::format_knowledge_context;
use crate::rag::KnowledgeRetriever;
use crate::rag::RetrieveOptions;
use crate::Result;

/// Maximum tokens requested per chat completion
const CHAT_MAX_TOKENS: u32 = 500;

/// One turn of a chat conversation, ready to stream
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub user_id: Uuid,
    pub session_id: Option<Uuid>,
    pub history: Vec<ConversationTurn>,
    pub message: String,
}

/// End-to-end chat pipeline service
pub struct ChatService {
    retriever: Arc<KnowledgeRetriever>,
    llm: Arc<CompletionClient>,
    database: Arc<Database>,
    match_count: usize,
    similarity_threshold: f32,
    temperature: f32,
}

impl ChatService {
    /// Create the pipeline from configuration and an existing database pool
    pub fn from_config(config: &AppConfig, database: Arc<Database>) -> Result<Self> {
        let embeddings = Arc::new(EmbeddingClient::from_config(config)?);
        let retriever = Arc::new(KnowledgeRetriever::new(database.clone(), embeddings));
        let llm = Arc::new(CompletionClient::from_config(config)?);
        Ok(Self::from_services(retriever, llm, database, config))
    }

    /// Create the pipeline from already-constructed services
    #[must_use]
    pub fn from_services(
        retriever: Arc<KnowledgeRetriever>,
        llm: Arc<CompletionClient>,
        database: Arc<Database>,
        config: &AppConfig,
    ) -> Self {
        Self {
            retriever,
            llm,
            database,
            match_count: config.rag_match_count(),
            similarity_threshold: config.rag_chat_similarity_threshold(),
            temperature: config.llm_temperature(),
        }
    }

    /// Run one chat turn, returning the chunk stream for the client.
    ///
    /// Errors returned here happened before any streaming began (bad
    /// configuration, completion API refused the request) and should surface
    /// as a plain error response. Once a stream is returned, failures arrive
    /// as a terminal `Error` chunk instead.
    ///
    /// After a successful stream with a known session, the turn is persisted
    /// by a detached task; the stream itself is never delayed by storage.
    pub async fn stream_turn(
        &self,
        profile: Option<&Profile>,
        turn: ChatTurn,
    ) -> Result<ReceiverStream<StreamChunk>> {
        if contains_crisis_signal(&turn.message) {
            // Coarse tripwire only; the client pairs this with a resource
            // dialog. The stream itself is unaffected.
            warn!(
                user_id = %turn.user_id,
                "Crisis keywords detected in chat message"
            );
        }

        let snippets = self
            .retriever
            .retrieve(
                &turn.message,
                &RetrieveOptions {
                    match_count: self.match_count,
                    similarity_threshold: self.similarity_threshold,
                    ..RetrieveOptions::default()
                },
            )
            .await;
        let knowledge_context = format_knowledge_context(&snippets);

        let messages = prompts::assemble(profile, &knowledge_context, &turn.history, &turn.message);

        let upstream = self
            .llm
            .complete_stream(&messages, self.temperature, CHAT_MAX_TOKENS)
            .await?
            .into_stream();

        let (tx, rx) = mpsc::channel::<StreamChunk>(64);
        let database = self.database.clone();

        tokio::spawn(async move {
            let full_reply = relay(upstream, &tx).await;

            // Persistence is fire-and-forget and only happens for turns that
            // completed with text and belong to a session
            if let (Some(full_reply), Some(session_id)) = (full_reply, turn.session_id) {
                if !full_reply.is_empty() {
                    tokio::spawn(persistence::on_turn_complete(
                        database,
                        session_id,
                        turn.user_id,
                        turn.message,
                        full_reply,
                    ));
                }
            }
        });

        Ok(ReceiverStream::new(rx))
    }
}

/// Pass upstream fragments through to the channel, accumulating the full
/// reply.
///
/// Emits exactly one terminal chunk: `Done` on upstream end-of-stream,
/// `Error` on an upstream failure. Returns the accumulated reply only when
/// the stream completed normally and the terminal `Done` was queued —
/// callers use `None` to skip persistence. A closed channel (client
/// disconnect) stops the upstream read immediately.
async fn relay<S>(mut upstream: S, tx: &mpsc::Sender<StreamChunk>) -> Option<String>
where
    S: Stream<Item = Result<String>> + Unpin,
{
    let mut full_reply = String::new();

    while let Some(item) = upstream.next().await {
        match item {
            Ok(content) => {
                full_reply.push_str(&content);
                if tx.send(StreamChunk::Content(content)).await.is_err() {
                    return None;
                }
            }
            Err(e) => {
                error!("Upstream completion stream failed: {e}");
                let _ = tx
                    .send(StreamChunk::Error("Streaming failed".to_string()))
                    .await;
                return None;
            }
        }
    }

    if tx.send(StreamChunk::Done).await.is_err() {
        return None;
    }

    Some(full_reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AnimoaError;

    async fn drain(mut rx: mpsc::Receiver<StreamChunk>) -> Vec<StreamChunk> {
        let mut chunks = Vec::new();
        while let Some(chunk) = rx.recv().await {
            chunks.push(chunk);
        }
        chunks
    }

    #[tokio::test]
    async fn test_relay_passes_chunks_through_then_done() {
        let upstream = futures::stream::iter(vec![
            Ok("Hi".to_string()),
            Ok(" there".to_string()),
        ]);
        let (tx, rx) = mpsc::channel(8);

        let relay_task = tokio::spawn(async move { relay(upstream, &tx).await });
        let chunks = drain(rx).await;
        let full_reply = relay_task.await.unwrap();

        assert_eq!(full_reply, Some("Hi there".to_string()));
        assert_eq!(
            chunks,
            vec![
                StreamChunk::Content("Hi".to_string()),
                StreamChunk::Content(" there".to_string()),
                StreamChunk::Done,
            ]
        );
    }

    #[tokio::test]
    async fn test_relay_upstream_error_emits_error_and_skips_persistence() {
        let upstream = futures::stream::iter(vec![
            Ok("Hi".to_string()),
            Err(AnimoaError::Completion("connection reset".to_string())),
        ]);
        let (tx, rx) = mpsc::channel(8);

        let relay_task = tokio::spawn(async move { relay(upstream, &tx).await });
        let chunks = drain(rx).await;
        let full_reply = relay_task.await.unwrap();

        // None signals the caller to skip the persistence hook
        assert_eq!(full_reply, None);
        assert_eq!(
            chunks,
            vec![
                StreamChunk::Content("Hi".to_string()),
                StreamChunk::Error("Streaming failed".to_string()),
            ]
        );
        assert!(!chunks.contains(&StreamChunk::Done));
    }

    #[tokio::test]
    async fn test_relay_empty_upstream_yields_single_done() {
        let upstream = futures::stream::iter(Vec::<Result<String>>::new());
        let (tx, rx) = mpsc::channel(8);

        let relay_task = tokio::spawn(async move { relay(upstream, &tx).await });
        let chunks = drain(rx).await;
        let full_reply = relay_task.await.unwrap();

        assert_eq!(full_reply, Some(String::new()));
        assert_eq!(chunks, vec![StreamChunk::Done]);
    }

    #[tokio::test]
    async fn test_relay_stops_when_receiver_dropped() {
        let upstream = futures::stream::iter(vec![
            Ok("one".to_string()),
            Ok("two".to_string()),
            Ok("three".to_string()),
        ]);
        let (tx, rx) = mpsc::channel(1);
        drop(rx);

        let full_reply = relay(upstream, &tx).await;
        assert_eq!(full_reply, None);
    }
}
