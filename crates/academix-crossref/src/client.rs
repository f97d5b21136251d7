use academix_http::Connection;
use academix_model::{paper::normalize_doi, Author, CitationResult, Paper, PaperSource, SearchResult, SharedCaches};
use async_trait::async_trait;

use crate::types::{Work, WorkEnvelope, WorksListEnvelope};

const BASE_URL: &str = "https://api.crossref.org";

/// Async adapter for the CrossRef `/works` API (spec.md §4.4).
pub struct CrossrefClient {
    base_url: String,
    connection: Connection,
    email: Option<String>,
    caches: SharedCaches,
}

impl CrossrefClient {
    pub fn new(email: Option<String>, caches: SharedCaches) -> Self {
        let ua = academix_http::user_agent("academix", env!("CARGO_PKG_VERSION"), email.as_deref());
        Self {
            base_url: BASE_URL.to_string(),
            connection: Connection::new(ua, academix_http::DEFAULT_TIMEOUT),
            email,
            caches,
        }
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn sort_param(sort: Option<&str>) -> Option<&'static str> {
        match sort {
            Some("publication_date") => Some("published"),
            Some("citation_count") => Some("is-referenced-by-count"),
            Some("relevance") => Some("relevance"),
            None => None,
            Some(other) => {
                tracing::warn!(sort = other, "crossref: unsupported sort, degrading to relevance");
                None
            }
        }
    }

    fn date_filter(year_from: Option<i32>, year_to: Option<i32>) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(from) = year_from {
            parts.push(format!("from-pub-date:{from}-01-01"));
        }
        if let Some(to) = year_to {
            parts.push(format!("until-pub-date:{to}-12-31"));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(","))
        }
    }

    fn to_paper(work: &Work) -> Paper {
        let title = work.title.first().cloned().unwrap_or_default();
        let id = work.doi.clone().unwrap_or_default();
        let mut paper = Paper::new(id, title, PaperSource::Crossref);
        paper.authors = work
            .author
            .iter()
            .filter_map(|a| a.display_name())
            .map(Author::new)
            .collect();
        paper.venue = work.container_title.first().cloned();
        paper.year = work.publication_year();
        paper.volume = work.volume.clone();
        paper.issue = work.issue.clone();
        paper.pages = work.page.clone();
        paper.doi = work.doi.as_deref().map(normalize_doi);
        paper.url = work.url.clone();
        paper.citation_count = work.is_referenced_by_count;
        paper
    }

    async fn fetch_works(
        &self,
        query: &str,
        filters: Vec<String>,
        sort: Option<&str>,
        rows: u32,
        offset: u32,
    ) -> academix_model::error::Result<WorksListEnvelope> {
        let client = self.connection.client().await;
        let mut params: Vec<(String, String)> = vec![
            ("query".to_string(), query.to_string()),
            ("rows".to_string(), rows.to_string()),
            ("offset".to_string(), offset.to_string()),
        ];
        if !filters.is_empty() {
            params.push(("filter".to_string(), filters.join(",")));
        }
        if let Some(s) = Self::sort_param(sort) {
            params.push(("sort".to_string(), s.to_string()));
        }
        if let Some(email) = &self.email {
            params.push(("mailto".to_string(), email.clone()));
        }
        let url = format!("{}/works", self.base_url);
        let resp = client.get(&url).query(&params).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(academix_model::AdapterError::HttpStatus { status: status.as_u16(), body });
        }
        resp.json::<WorksListEnvelope>()
            .await
            .map_err(|e| academix_model::AdapterError::Parse(e.to_string()))
    }
}

#[async_trait]
impl academix_model::Adapter for CrossrefClient {
    fn source(&self) -> PaperSource {
        PaperSource::Crossref
    }

    async fn search(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
        year_from: Option<i32>,
        year_to: Option<i32>,
        venue: Option<&str>,
        sort: Option<&str>,
    ) -> academix_model::error::Result<SearchResult> {
        let kwargs: Vec<(&str, String)> = [
            year_from.map(|y| ("year_from", y.to_string())),
            year_to.map(|y| ("year_to", y.to_string())),
            venue.map(|v| ("venue", v.to_string())),
            sort.map(|s| ("sort", s.to_string())),
        ]
        .into_iter()
        .flatten()
        .collect();
        let cache_key = academix_model::AppCaches::search_key("crossref", query, limit, offset, &kwargs);
        if let Some(hit) = self.caches.search.get(&cache_key) {
            return Ok(hit);
        }

        let filters = Self::date_filter(year_from, year_to).into_iter().collect();
        let envelope = self.fetch_works(query, filters, sort, limit, offset).await?;
        let mut papers: Vec<Paper> = envelope.message.items.iter().map(Self::to_paper).collect();
        if let Some(v) = venue {
            let needle = v.to_lowercase();
            papers.retain(|p| p.venue.as_ref().is_some_and(|venue| venue.to_lowercase().contains(&needle)));
        }

        let result = SearchResult::new(query, PaperSource::Crossref, papers, envelope.message.total_results, offset as u64);
        self.caches.search.set(&cache_key, result.clone());
        Ok(result)
    }

    async fn get_paper(&self, paper_id: &str) -> academix_model::error::Result<Option<Paper>> {
        let cache_key = academix_model::AppCaches::paper_key("crossref", paper_id);
        if let Some(hit) = self.caches.paper.get(&cache_key) {
            return Ok(Some(hit));
        }
        let doi = normalize_doi(paper_id);
        let client = self.connection.client().await;
        let url = format!("{}/works/{}", self.base_url, doi);
        let mut params = Vec::new();
        if let Some(email) = &self.email {
            params.push(("mailto", email.clone()));
        }
        let resp = client.get(&url).query(&params).send().await?;
        let status = resp.status();
        if status.as_u16() == 404 {
            return Ok(None);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(academix_model::AdapterError::HttpStatus { status: status.as_u16(), body });
        }
        let envelope: WorkEnvelope = resp
            .json()
            .await
            .map_err(|e| academix_model::AdapterError::Parse(e.to_string()))?;
        let paper = Self::to_paper(&envelope.message);
        self.caches.paper.set(&cache_key, paper.clone());
        Ok(Some(paper))
    }

    async fn search_by_author(
        &self,
        author_name: &str,
        limit: u32,
        offset: u32,
    ) -> academix_model::error::Result<SearchResult> {
        self.search(author_name, limit, offset, None, None, None, None).await
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

    fn works_json() -> serde_json::Value {
        serde_json::json!({
            "message": {
                "total-results": 1,
                "items": [{
                    "DOI": "10.1/xyz",
                    "title": ["A Test Paper"],
                    "container-title": ["Journal of Tests"],
                    "author": [{"given": "Jane", "family": "Doe"}],
                    "published-print": {"date-parts": [[2020, 1, 1]]},
                    "is-referenced-by-count": 7,
                    "URL": "https://doi.org/10.1/xyz"
                }]
            }
        })
    }

    #[tokio::test]
    async fn search_normalizes_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/works"))
            .respond_with(ResponseTemplate::new(200).set_body_json(works_json()))
            .mount(&server)
            .await;
        let client = CrossrefClient::new(None, academix_model::new_shared_caches()).with_base_url(server.uri());
        let result = client.search("test", 10, 0, None, None, None, None).await.unwrap();
        assert_eq!(result.returned_count, 1);
        assert_eq!(result.papers[0].doi.as_deref(), Some("10.1/xyz"));
        assert_eq!(result.papers[0].year, Some(2020));
        assert_eq!(result.papers[0].citation_count, 7);
    }

    #[tokio::test]
    async fn venue_post_filter_drops_non_matching_papers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/works"))
            .respond_with(ResponseTemplate::new(200).set_body_json(works_json()))
            .mount(&server)
            .await;
        let client = CrossrefClient::new(None, academix_model::new_shared_caches()).with_base_url(server.uri());
        let result = client.search("test", 10, 0, None, None, Some("nature"), None).await.unwrap();
        assert_eq!(result.papers.len(), 0);
    }
}
