use uuid::Uuid;

use super::Database;
use crate::models::KnowledgeSnippet;
use crate::Result;

impl Database {
    /// Cosine similarity search over the knowledge base.
    ///
    /// Results are filtered to `similarity >= threshold` (the boundary is
    /// inclusive), optionally restricted to a category and/or a set of
    /// assessment domains, ordered by descending similarity and capped at
    /// `match_count`.
    pub async fn match_knowledge(
        &self,
        query_embedding: Vec<f32>,
        match_count: i64,
        category: Option<&str>,
        domains: Option<&[String]>,
        threshold: f32,
    ) -> Result<Vec<KnowledgeSnippet>> {
        #[derive(sqlx::FromRow)]
        struct RawResult {
            id: Uuid,
            category: String,
            subcategory: Option<String>,
            title: String,
            content: String,
            tags: Vec<String>,
            severity_relevance: Vec<String>,
            assessment_domains: Vec<String>,
            source: Option<String>,
            similarity: f64,
        }

        let raw_results = sqlx::query_as::<_, RawResult>(
            r"
            SELECT
                id,
                category,
                subcategory,
                title,
                content,
                tags,
                severity_relevance,
                assessment_domains,
                source,
                1 - (embedding <=> $1::vector) AS similarity
            FROM knowledge_base
            WHERE embedding IS NOT NULL
              AND 1 - (embedding <=> $1::vector) >= $2
              AND ($3::text IS NULL OR category = $3)
              AND ($4::text[] IS NULL OR assessment_domains && $4)
            ORDER BY similarity DESC
            LIMIT $5
            ",
        )
        .bind(pgvector::Vector::from(query_embedding))
        .bind(f64::from(threshold))
        .bind(category)
        .bind(domains)
        .bind(match_count)
        .fetch_all(self.pool())
        .await?;

        let snippets = raw_results
            .into_iter()
            .map(|r| KnowledgeSnippet {
                id: r.id,
                category: r.category,
                subcategory: r.subcategory,
                title: r.title,
                content: r.content,
                tags: r.tags,
                severity_relevance: r.severity_relevance,
                assessment_domains: r.assessment_domains,
                source: r.source,
                similarity: r.similarity as f32,
            })
            .collect();

        Ok(snippets)
    }
}
