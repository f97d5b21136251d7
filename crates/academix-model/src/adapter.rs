use async_trait::async_trait;

use crate::error::Result;
use crate::paper::{CitationResult, Paper, PaperSource, SearchResult};

/// Common contract every backend client honors, so the aggregator can walk
/// a fallback chain over `&dyn Adapter` without knowing which backend it
/// is currently talking to.
///
/// Backend-specific abilities (DBLP's native BibTeX export, Semantic
/// Scholar's recommendations, OpenAlex's citation network) are not part of
/// this trait — the aggregator calls those directly on the concrete client.
#[async_trait]
pub trait Adapter: Send + Sync {
    fn source(&self) -> PaperSource;

    async fn search(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
        year_from: Option<i32>,
        year_to: Option<i32>,
        venue: Option<&str>,
        sort: Option<&str>,
    ) -> Result<SearchResult>;

    async fn get_paper(&self, paper_id: &str) -> Result<Option<Paper>>;

    /// Default: no citation data available from this backend.
    async fn get_citations(
        &self,
        paper_id: &str,
        _limit: u32,
        _offset: u32,
    ) -> Result<CitationResult> {
        Ok(CitationResult {
            paper_id: paper_id.to_string(),
            citation_count: 0,
            citing_papers: Vec::new(),
            has_more: false,
        })
    }

    /// Default: reuse general search with an `author:` prefix.
    async fn search_by_author(
        &self,
        author_name: &str,
        limit: u32,
        offset: u32,
    ) -> Result<SearchResult> {
        self.search(
            &format!("author:{author_name}"),
            limit,
            offset,
            None,
            None,
            None,
            None,
        )
        .await
    }

    /// Drops the pooled HTTP client. The next call reopens it lazily.
    async fn close(&self);
}
