//! Streaming response handling

use std::pin::Pin;

use futures::Stream;

use crate::errors::Result;

/// Streaming response from the completion API
pub struct StreamingResponse {
    stream: Pin<Box<dyn Stream<Item = Result<String>> + Send>>,
}

impl StreamingResponse {
    pub fn new(stream: Pin<Box<dyn Stream<Item = Result<String>> + Send>>) -> Self {
        Self { stream }
    }

    /// Collect all chunks into a single string
    pub async fn collect_all(mut self) -> Result<String> {
        use futures::StreamExt;
        let mut result = String::new();
        while let Some(chunk) = self.stream.next().await {
            result.push_str(&chunk?);
        }
        Ok(result)
    }

    /// Get the underlying stream
    pub fn into_stream(self) -> Pin<Box<dyn Stream<Item = Result<String>> + Send>> {
        self.stream
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_collect_all() {
        let stream = futures::stream::iter(vec![
            Ok("Hi".to_string()),
            Ok(" there".to_string()),
        ]);
        let response = StreamingResponse::new(Box::pin(stream));
        assert_eq!(response.collect_all().await.unwrap(), "Hi there");
    }

    #[tokio::test]
    async fn test_collect_all_propagates_errors() {
        let stream = futures::stream::iter(vec![
            Ok("Hi".to_string()),
            Err(crate::AnimoaError::Completion("boom".to_string())),
        ]);
        let response = StreamingResponse::new(Box::pin(stream));
        assert!(response.collect_all().await.is_err());
    }
}
