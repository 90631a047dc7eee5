//! Chat pipeline: RAG-enriched prompt assembly, streaming relay and
//! post-turn persistence
//!
//! One inbound chat request flows through retrieve -> format -> assemble ->
//! stream. Token fragments are passed through to the caller as they arrive;
//! after a successful stream the turn is persisted by a detached task that
//! never blocks or alters the response.

pub mod persistence;
pub mod pipeline;

pub use pipeline::ChatService;

use serde::ser::SerializeMap;
use serde::Serialize;
use serde::Serializer;

/// Wire-level unit emitted to the client. A stream is any number of
/// `Content` chunks followed by exactly one terminal `Done` or `Error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamChunk {
    Content(String),
    Done,
    Error(String),
}

impl Serialize for StreamChunk {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::Content(content) => map.serialize_entry("content", content)?,
            Self::Done => map.serialize_entry("done", &true)?,
            Self::Error(error) => map.serialize_entry("error", error)?,
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_chunk_wire_shapes() {
        assert_eq!(
            serde_json::to_string(&StreamChunk::Content("Hi".to_string())).unwrap(),
            r#"{"content":"Hi"}"#
        );
        assert_eq!(
            serde_json::to_string(&StreamChunk::Done).unwrap(),
            r#"{"done":true}"#
        );
        assert_eq!(
            serde_json::to_string(&StreamChunk::Error("Streaming failed".to_string())).unwrap(),
            r#"{"error":"Streaming failed"}"#
        );
    }
}
