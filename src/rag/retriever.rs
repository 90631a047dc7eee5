//! Best-effort retrieval over the knowledge base

use std::sync::Arc;

use tracing::debug;
use tracing::warn;

use crate::database::Database;
use crate::embeddings::EmbeddingClient;
use crate::models::KnowledgeSnippet;

/// Options for a knowledge retrieval
#[derive(Debug, Clone)]
pub struct RetrieveOptions {
    pub match_count: usize,
    pub category: Option<String>,
    pub domains: Option<Vec<String>>,
    pub similarity_threshold: f32,
}

impl Default for RetrieveOptions {
    fn default() -> Self {
        Self {
            match_count: 3,
            category: None,
            domains: None,
            similarity_threshold: 0.5,
        }
    }
}

/// Retriever for knowledge-base snippets
pub struct KnowledgeRetriever {
    database: Arc<Database>,
    embeddings: Arc<EmbeddingClient>,
}

impl KnowledgeRetriever {
    /// Create a new retriever
    pub fn new(database: Arc<Database>, embeddings: Arc<EmbeddingClient>) -> Self {
        Self {
            database,
            embeddings,
        }
    }

    /// Retrieve knowledge snippets relevant to a query.
    ///
    /// Retrieval is strictly best-effort: any failure (embedding call,
    /// missing credential, search error) is logged and converted into an
    /// empty result so the calling request proceeds without enrichment.
    pub async fn retrieve(&self, query: &str, options: &RetrieveOptions) -> Vec<KnowledgeSnippet> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        match self.try_retrieve(query, options).await {
            Ok(snippets) => {
                debug!("Retrieved {} knowledge snippets", snippets.len());
                snippets
            }
            Err(e) => {
                warn!("Knowledge retrieval failed, continuing without context: {e}");
                Vec::new()
            }
        }
    }

    async fn try_retrieve(
        &self,
        query: &str,
        options: &RetrieveOptions,
    ) -> crate::Result<Vec<KnowledgeSnippet>> {
        let query_embedding = self.embeddings.generate(query).await?;

        let rows = self
            .database
            .match_knowledge(
                query_embedding,
                options.match_count as i64,
                options.category.as_deref(),
                options.domains.as_deref(),
                options.similarity_threshold,
            )
            .await?;

        // The store already ranks and filters; re-apply the contract here so
        // callers get it regardless of how the query evolves
        Ok(rank_snippets(
            rows,
            options.similarity_threshold,
            options.match_count,
        ))
    }
}

/// Sort snippets by descending similarity, drop everything below the
/// threshold (the boundary is inclusive) and cap the result count.
pub fn rank_snippets(
    mut snippets: Vec<KnowledgeSnippet>,
    threshold: f32,
    match_count: usize,
) -> Vec<KnowledgeSnippet> {
    snippets.retain(|s| s.similarity >= threshold);
    snippets.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    snippets.truncate(match_count);
    snippets
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn snippet(title: &str, similarity: f32) -> KnowledgeSnippet {
        KnowledgeSnippet {
            id: Uuid::new_v4(),
            category: "coping".to_string(),
            subcategory: None,
            title: title.to_string(),
            content: "content".to_string(),
            tags: vec![],
            severity_relevance: vec![],
            assessment_domains: vec![],
            source: None,
            similarity,
        }
    }

    #[test]
    fn test_rank_filters_below_threshold() {
        let ranked = rank_snippets(
            vec![snippet("a", 0.9), snippet("b", 0.3), snippet("c", 0.6)],
            0.5,
            3,
        );
        let titles: Vec<_> = ranked.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "c"]);
    }

    #[test]
    fn test_rank_threshold_boundary_is_inclusive() {
        let ranked = rank_snippets(vec![snippet("edge", 0.5)], 0.5, 3);
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn test_rank_sorts_descending_and_caps() {
        let ranked = rank_snippets(
            vec![snippet("low", 0.6), snippet("high", 0.9), snippet("mid", 0.7)],
            0.5,
            2,
        );
        let titles: Vec<_> = ranked.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["high", "mid"]);
    }
}
