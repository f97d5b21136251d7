use std::sync::OnceLock;

use academix_http::Connection;
use academix_model::{
    Author, CitationResult, Paper, PaperSource, RelatedPapersResult, SearchResult, SharedCaches,
};
use async_trait::async_trait;
use regex::Regex;

use crate::types::{
    AuthorSearchResponse, PapersListResponse, RecommendationsResponse, S2Paper, SearchResponse, FIELDS,
};

const GRAPH_BASE: &str = "https://api.semanticscholar.org/graph/v1";
const RECOMMENDATIONS_BASE: &str = "https://api.semanticscholar.org/recommendations/v1";

static BARE_ARXIV_ID: OnceLock<Regex> = OnceLock::new();

fn bare_arxiv_id_re() -> &'static Regex {
    BARE_ARXIV_ID.get_or_init(|| Regex::new(r"^\d{4}\.\d{4,5}$").expect("valid regex"))
}

/// Async adapter for the Semantic Scholar Graph/Recommendations API.
pub struct SemanticScholarClient {
    graph_base: String,
    recommendations_base: String,
    connection: Connection,
    api_key: Option<String>,
    caches: SharedCaches,
}

impl SemanticScholarClient {
    pub fn new(api_key: Option<String>, caches: SharedCaches) -> Self {
        let ua = academix_http::user_agent("academix", env!("CARGO_PKG_VERSION"), None);
        Self {
            graph_base: GRAPH_BASE.to_string(),
            recommendations_base: RECOMMENDATIONS_BASE.to_string(),
            connection: Connection::new(ua, academix_http::DEFAULT_TIMEOUT),
            api_key,
            caches,
        }
    }

    #[cfg(test)]
    pub fn with_bases(mut self, graph_base: impl Into<String>, recommendations_base: impl Into<String>) -> Self {
        self.graph_base = graph_base.into();
        self.recommendations_base = recommendations_base.into();
        self
    }

    /// `10.48550/arXiv.X` → `ARXIV:X`; other `10.…` → `DOI:…`; `arxiv:X` →
    /// `ARXIV:X`; bare `NNNN.NNNNN` → `ARXIV:…`; else treated as an S2 id
    /// verbatim.
    fn route_identifier(id: &str) -> String {
        let trimmed = id.trim();
        let lower = trimmed.to_lowercase();
        if let Some(rest) = lower.strip_prefix("10.48550/arxiv.") {
            return format!("ARXIV:{rest}");
        }
        if trimmed.starts_with("10.") {
            return format!("DOI:{trimmed}");
        }
        if let Some(rest) = trimmed.strip_prefix("arxiv:") {
            return format!("ARXIV:{rest}");
        }
        if bare_arxiv_id_re().is_match(trimmed) {
            return format!("ARXIV:{trimmed}");
        }
        trimmed.to_string()
    }

    fn year_param(year_from: Option<i32>, year_to: Option<i32>) -> Option<String> {
        match (year_from, year_to) {
            (Some(from), Some(to)) => Some(format!("{from}-{to}")),
            (Some(from), None) => Some(format!("{from}-")),
            (None, Some(to)) => Some(format!("-{to}")),
            (None, None) => None,
        }
    }

    fn apply_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header("x-api-key", key),
            None => builder,
        }
    }

    fn to_paper(p: &S2Paper) -> Paper {
        let title = p.title.clone().unwrap_or_default();
        let mut paper = Paper::new(p.paper_id.clone(), title, PaperSource::SemanticScholar);
        paper.authors = p
            .authors
            .iter()
            .filter_map(|a| a.name.clone())
            .map(Author::new)
            .collect();
        paper.abstract_text = p.abstract_text.clone();
        paper.year = p.year;
        paper.published_date = p.publication_date.clone();
        paper.venue = p.venue.clone();
        if let Some(journal) = &p.journal {
            paper.volume = journal.volume.clone();
            paper.pages = journal.pages.clone();
            if paper.venue.is_none() {
                paper.venue = journal.name.clone();
            }
        }
        if let Some(ext) = &p.external_ids {
            paper.doi = ext.doi.clone();
            paper.arxiv_id = ext.arxiv.clone();
        }
        paper.url = p.url.clone();
        paper.citation_count = p.citation_count.unwrap_or(0);
        paper
    }

    async fn fetch_search(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
        year_from: Option<i32>,
        year_to: Option<i32>,
    ) -> academix_model::error::Result<SearchResponse> {
        let client = self.connection.client().await;
        let url = format!("{}/paper/search", self.graph_base);
        let mut params = vec![
            ("query".to_string(), query.to_string()),
            ("fields".to_string(), FIELDS.to_string()),
            ("limit".to_string(), limit.to_string()),
            ("offset".to_string(), offset.to_string()),
        ];
        if let Some(y) = Self::year_param(year_from, year_to) {
            params.push(("year".to_string(), y));
        }
        let resp = self.apply_auth(client.get(&url).query(&params)).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(academix_model::AdapterError::HttpStatus { status: status.as_u16(), body });
        }
        resp.json::<SearchResponse>()
            .await
            .map_err(|e| academix_model::AdapterError::Parse(e.to_string()))
    }

    /// Recommendations for a paper already known by its S2 id. Not part of
    /// the common [`Adapter`] contract — the aggregator calls this inherent
    /// method directly.
    pub async fn get_related(&self, s2_paper_id: &str, limit: u32) -> academix_model::error::Result<RelatedPapersResult> {
        let client = self.connection.client().await;
        let url = format!("{}/papers/forpaper/{}", self.recommendations_base, s2_paper_id);
        let params = [
            ("fields".to_string(), FIELDS.to_string()),
            ("limit".to_string(), limit.to_string()),
        ];
        let resp = self.apply_auth(client.get(&url).query(&params)).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(academix_model::AdapterError::HttpStatus { status: status.as_u16(), body });
        }
        let parsed: RecommendationsResponse = resp
            .json()
            .await
            .map_err(|e| academix_model::AdapterError::Parse(e.to_string()))?;
        Ok(RelatedPapersResult {
            paper_id: s2_paper_id.to_string(),
            related_papers: parsed.recommended_papers.iter().map(Self::to_paper).collect(),
            recommendation_source: "semantic_scholar".to_string(),
        })
    }
}

#[async_trait]
impl academix_model::Adapter for SemanticScholarClient {
    fn source(&self) -> PaperSource {
        PaperSource::SemanticScholar
    }

    async fn search(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
        year_from: Option<i32>,
        year_to: Option<i32>,
        _venue: Option<&str>,
        sort: Option<&str>,
    ) -> academix_model::error::Result<SearchResult> {
        if let Some(s) = sort {
            if s != "relevance" {
                tracing::warn!(sort = s, "semantic_scholar: unsupported sort, degrading to relevance");
            }
        }
        let kwargs: Vec<(&str, String)> = [
            year_from.map(|y| ("year_from", y.to_string())),
            year_to.map(|y| ("year_to", y.to_string())),
        ]
        .into_iter()
        .flatten()
        .collect();
        let cache_key = academix_model::AppCaches::search_key("semantic_scholar", query, limit, offset, &kwargs);
        if let Some(hit) = self.caches.search.get(&cache_key) {
            return Ok(hit);
        }

        let resp = self.fetch_search(query, limit, offset, year_from, year_to).await?;
        let papers: Vec<Paper> = resp.data.iter().map(Self::to_paper).collect();
        let result = SearchResult::new(query, PaperSource::SemanticScholar, papers, resp.total, offset as u64);
        self.caches.search.set(&cache_key, result.clone());
        Ok(result)
    }

    async fn get_paper(&self, paper_id: &str) -> academix_model::error::Result<Option<Paper>> {
        let cache_key = academix_model::AppCaches::paper_key("semantic_scholar", paper_id);
        if let Some(hit) = self.caches.paper.get(&cache_key) {
            return Ok(Some(hit));
        }
        let routed = Self::route_identifier(paper_id);
        let client = self.connection.client().await;
        let url = format!("{}/paper/{}", self.graph_base, routed);
        let resp = self
            .apply_auth(client.get(&url).query(&[("fields", FIELDS)]))
            .send()
            .await?;
        let status = resp.status();
        if status.as_u16() == 404 {
            return Ok(None);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(academix_model::AdapterError::HttpStatus { status: status.as_u16(), body });
        }
        let parsed: S2Paper = resp
            .json()
            .await
            .map_err(|e| academix_model::AdapterError::Parse(e.to_string()))?;
        let paper = Self::to_paper(&parsed);
        self.caches.paper.set(&cache_key, paper.clone());
        Ok(Some(paper))
    }

    async fn search_by_author(
        &self,
        author_name: &str,
        limit: u32,
        offset: u32,
    ) -> academix_model::error::Result<SearchResult> {
        let client = self.connection.client().await;
        let author_search_url = format!("{}/author/search", self.graph_base);
        let resp = self
            .apply_auth(client.get(&author_search_url).query(&[("query", author_name)]))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(academix_model::AdapterError::HttpStatus { status: status.as_u16(), body });
        }
        let authors: AuthorSearchResponse = resp
            .json()
            .await
            .map_err(|e| academix_model::AdapterError::Parse(e.to_string()))?;
        let Some(author_id) = authors.data.first().and_then(|a| a.author_id.clone()) else {
            return Ok(SearchResult::new(author_name, PaperSource::SemanticScholar, Vec::new(), 0, offset as u64));
        };

        let papers_url = format!("{}/author/{}/papers", self.graph_base, author_id);
        let client = self.connection.client().await;
        let params = [
            ("fields".to_string(), FIELDS.to_string()),
            ("limit".to_string(), limit.to_string()),
            ("offset".to_string(), offset.to_string()),
        ];
        let resp = self
            .apply_auth(client.get(&papers_url).query(&params))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(academix_model::AdapterError::HttpStatus { status: status.as_u16(), body });
        }
        let parsed: PapersListResponse = resp
            .json()
            .await
            .map_err(|e| academix_model::AdapterError::Parse(e.to_string()))?;
        let papers: Vec<Paper> = parsed.data.iter().map(Self::to_paper).collect();
        let total = papers.len() as u64 + offset as u64;
        Ok(SearchResult::new(author_name, PaperSource::SemanticScholar, papers, total, offset as u64))
    }

    async fn get_citations(
        &self,
        paper_id: &str,
        _limit: u32,
        _offset: u32,
    ) -> academix_model::error::Result<CitationResult> {
        Ok(CitationResult {
            paper_id: paper_id.to_string(),
            citation_count: 0,
            citing_papers: Vec::new(),
            has_more: false,
        })
    }

    async fn close(&self) {
        self.connection.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use academix_model::Adapter;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn route_identifier_handles_all_forms() {
        assert_eq!(
            SemanticScholarClient::route_identifier("10.48550/arXiv.2010.00001"),
            "ARXIV:2010.00001"
        );
        assert_eq!(SemanticScholarClient::route_identifier("10.1038/x"), "DOI:10.1038/x");
        assert_eq!(SemanticScholarClient::route_identifier("arxiv:2010.00001"), "ARXIV:2010.00001");
        assert_eq!(SemanticScholarClient::route_identifier("2010.00001"), "ARXIV:2010.00001");
        assert_eq!(SemanticScholarClient::route_identifier("abc123"), "abc123");
    }

    #[tokio::test]
    async fn search_normalizes_results_and_sends_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/paper/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "total": 1,
                "data": [{
                    "paperId": "abc",
                    "title": "A Paper",
                    "year": 2021,
                    "authors": [{"authorId": "1", "name": "Jane Doe"}],
                    "citationCount": 3,
                    "externalIds": {"DOI": "10.1/x", "ArXiv": null}
                }]
            })))
            .mount(&server)
            .await;
        let client = SemanticScholarClient::new(Some("key123".to_string()), academix_model::new_shared_caches())
            .with_bases(server.uri(), server.uri());
        let result = client.search("test", 10, 0, None, None, None, None).await.unwrap();
        assert_eq!(result.returned_count, 1);
        assert_eq!(result.papers[0].doi.as_deref(), Some("10.1/x"));
    }
}
