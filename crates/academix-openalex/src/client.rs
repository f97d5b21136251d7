use academix_http::Connection;
use academix_model::{
    adapter::Adapter, paper::normalize_doi, Author, CitationResult, Paper, PaperSource,
    SearchResult, SharedCaches,
};
use async_trait::async_trait;
use std::time::Duration;

use crate::types::{reconstruct_abstract, Work, WorksListResponse};

const BASE_URL: &str = "https://api.openalex.org";
const PAGE_SIZE: u32 = 200;

/// Async adapter for the OpenAlex API.
pub struct OpenAlexClient {
    base_url: String,
    connection: Connection,
    email: Option<String>,
    caches: SharedCaches,
}

impl OpenAlexClient {
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

    fn polite_pool_param(&self) -> Option<(&'static str, String)> {
        self.email.clone().map(|e| ("mailto", e))
    }

    fn sort_param(sort: Option<&str>) -> Option<(&'static str, String)> {
        match sort {
            Some("publication_date") => Some(("sort", "publication_date:desc".to_string())),
            Some("citation_count") => Some(("sort", "cited_by_count:desc".to_string())),
            Some("relevance") | None => None,
            Some(other) => {
                tracing::warn!(sort = other, "openalex: unsupported sort, degrading to relevance");
                None
            }
        }
    }

    fn year_filter(year_from: Option<i32>, year_to: Option<i32>) -> Option<String> {
        match (year_from, year_to) {
            (Some(from), Some(to)) => Some(format!("publication_year:{from}-{to}")),
            (Some(from), None) => Some(format!("publication_year:>{}", from - 1)),
            (None, Some(to)) => Some(format!("publication_year:<{}", to + 1)),
            (None, None) => None,
        }
    }

    async fn fetch_works(
        &self,
        query: Option<&str>,
        filters: Vec<String>,
        sort: Option<&str>,
        page: u32,
    ) -> academix_model::error::Result<WorksListResponse> {
        let client = self.connection.client().await;
        let mut params: Vec<(String, String)> = vec![
            ("per-page".to_string(), PAGE_SIZE.to_string()),
            ("page".to_string(), page.to_string()),
        ];
        if let Some(q) = query {
            params.push(("search".to_string(), q.to_string()));
        }
        if !filters.is_empty() {
            params.push(("filter".to_string(), filters.join(",")));
        }
        if let Some((k, v)) = Self::sort_param(sort) {
            params.push((k.to_string(), v));
        }
        if let Some((k, v)) = self.polite_pool_param() {
            params.push((k.to_string(), v));
        }

        let url = format!("{}/works", self.base_url);
        tracing::trace!(url, ?params, "openalex: request");
        let resp = client.get(&url).query(&params).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(academix_model::AdapterError::HttpStatus { status: status.as_u16(), body });
        }
        resp.json::<WorksListResponse>()
            .await
            .map_err(|e| academix_model::AdapterError::Parse(e.to_string()))
    }

    async fn fetch_work_by_id(&self, path_id: &str) -> academix_model::error::Result<Option<Work>> {
        let client = self.connection.client().await;
        let url = format!("{}/works/{}", self.base_url, path_id);
        let mut params: Vec<(String, String)> = Vec::new();
        if let Some((k, v)) = self.polite_pool_param() {
            params.push((k.to_string(), v));
        }
        tracing::trace!(url, "openalex: get work");
        let resp = client.get(&url).query(&params).send().await?;
        let status = resp.status();
        if status.as_u16() == 404 {
            return Ok(None);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(academix_model::AdapterError::HttpStatus { status: status.as_u16(), body });
        }
        resp.json::<Work>()
            .await
            .map(Some)
            .map_err(|e| academix_model::AdapterError::Parse(e.to_string()))
    }

    fn to_paper(work: &Work) -> Paper {
        let title = work
            .display_name
            .clone()
            .or_else(|| work.title.clone())
            .unwrap_or_default();
        let mut paper = Paper::new(work.id.clone(), title, PaperSource::Openalex);
        paper.authors = work
            .authorships
            .iter()
            .filter_map(|a| a.author.as_ref())
            .filter_map(|a| a.display_name.clone().map(|name| (a.id.clone(), name)))
            .map(|(author_id, name)| Author {
                name,
                orcid: None,
                affiliation: None,
                author_id,
            })
            .collect();
        paper.abstract_text = work.abstract_inverted_index.as_ref().map(reconstruct_abstract);
        paper.year = work.publication_year;
        paper.published_date = work.publication_date.clone();
        paper.venue = work
            .primary_location
            .as_ref()
            .and_then(|l| l.source.as_ref())
            .and_then(|s| s.display_name.clone());
        if let Some(biblio) = &work.biblio {
            paper.volume = biblio.volume.clone();
            paper.issue = biblio.issue.clone();
            paper.pages = match (&biblio.first_page, &biblio.last_page) {
                (Some(a), Some(b)) => Some(format!("{a}-{b}")),
                (Some(a), None) => Some(a.clone()),
                _ => None,
            };
        }
        paper.doi = work.doi.as_deref().map(normalize_doi);
        paper.url = work
            .primary_location
            .as_ref()
            .and_then(|l| l.landing_page_url.clone());
        paper.pdf_url = Self::pick_pdf_url(work);
        paper.citation_count = work.cited_by_count.unwrap_or(0);
        paper
    }

    /// Prefers `primary_location.pdf_url` when that location is OA; else
    /// scans `locations[]` for the first OA entry carrying a pdf_url.
    fn pick_pdf_url(work: &Work) -> Option<String> {
        if let Some(primary) = &work.primary_location {
            if primary.is_oa == Some(true) {
                if let Some(url) = &primary.pdf_url {
                    return Some(url.clone());
                }
            }
        }
        work.locations
            .iter()
            .find(|l| l.is_oa == Some(true) && l.pdf_url.is_some())
            .and_then(|l| l.pdf_url.clone())
    }

    fn lookup_path(paper_id: &str) -> String {
        let trimmed = paper_id.trim();
        if trimmed.starts_with("10.") || trimmed.starts_with("https://doi.org/") {
            let doi = normalize_doi(trimmed);
            format!("doi:{doi}")
        } else {
            trimmed.to_string()
        }
    }

    /// Returns the target paper's `referenced_works` ids — used by the
    /// citation-network assembler for `direction=cited` edges.
    pub async fn referenced_works(&self, paper_id: &str) -> academix_model::error::Result<Vec<String>> {
        let path = Self::lookup_path(paper_id);
        Ok(self
            .fetch_work_by_id(&path)
            .await?
            .map(|w| w.referenced_works)
            .unwrap_or_default())
    }
}

#[async_trait]
impl Adapter for OpenAlexClient {
    fn source(&self) -> PaperSource {
        PaperSource::Openalex
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
        let cache_key = academix_model::AppCaches::search_key("openalex", query, limit, offset, &kwargs);
        if let Some(hit) = self.caches.search.get(&cache_key) {
            return Ok(hit);
        }

        let mut filters = Vec::new();
        if let Some(f) = Self::year_filter(year_from, year_to) {
            filters.push(f);
        }
        if let Some(v) = venue {
            filters.push(format!(
                "primary_location.source.display_name.search:{}",
                urlencoding_lite(v)
            ));
        }

        // §4.4: page = 1 + floor(offset/200), slice [offset%200 .. offset%200+limit].
        let page = 1 + offset / PAGE_SIZE;
        let within_page = offset % PAGE_SIZE;
        let resp = self.fetch_works(Some(query), filters, sort, page).await?;
        let slice_end = (within_page as usize + limit as usize).min(resp.results.len());
        let slice_start = (within_page as usize).min(resp.results.len());
        let papers: Vec<Paper> = resp.results[slice_start..slice_end].iter().map(Self::to_paper).collect();

        let result = SearchResult::new(query, PaperSource::Openalex, papers, resp.meta.count, offset as u64);
        self.caches.search.set(&cache_key, result.clone());
        Ok(result)
    }

    async fn get_paper(&self, paper_id: &str) -> academix_model::error::Result<Option<Paper>> {
        let cache_key = academix_model::AppCaches::paper_key("openalex", paper_id);
        if let Some(hit) = self.caches.paper.get(&cache_key) {
            return Ok(Some(hit));
        }
        let path = Self::lookup_path(paper_id);
        let work = self.fetch_work_by_id(&path).await?;
        let paper = work.as_ref().map(Self::to_paper);
        if let Some(p) = &paper {
            self.caches.paper.set(&cache_key, p.clone());
        }
        Ok(paper)
    }

    async fn get_citations(
        &self,
        paper_id: &str,
        limit: u32,
        offset: u32,
    ) -> academix_model::error::Result<CitationResult> {
        let target = self.get_paper(paper_id).await?;
        let Some(target) = target else {
            return Ok(CitationResult {
                paper_id: paper_id.to_string(),
                citation_count: 0,
                citing_papers: Vec::new(),
                has_more: false,
            });
        };
        let filters = vec![format!("cites:{}", target.id)];
        let page = 1 + offset / PAGE_SIZE;
        let within_page = offset % PAGE_SIZE;
        let resp = self.fetch_works(None, filters, None, page).await?;
        let slice_end = (within_page as usize + limit as usize).min(resp.results.len());
        let slice_start = (within_page as usize).min(resp.results.len());
        let citing_papers: Vec<Paper> = resp.results[slice_start..slice_end].iter().map(Self::to_paper).collect();
        let has_more = offset as u64 + citing_papers.len() as u64 < resp.meta.count;
        Ok(CitationResult {
            paper_id: paper_id.to_string(),
            citation_count: target.citation_count,
            citing_papers,
            has_more,
        })
    }

    async fn search_by_author(
        &self,
        author_name: &str,
        limit: u32,
        offset: u32,
    ) -> academix_model::error::Result<SearchResult> {
        self.search(author_name, limit, offset, None, None, None, None).await
    }

    async fn close(&self) {
        self.connection.close().await;
    }
}

/// Minimal percent-encoding for the venue filter's search term.
fn urlencoding_lite(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => out.push(b as char),
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

/// Builds an OpenAlex adapter whose HTTP timeout defaults to
/// [`academix_http::DEFAULT_TIMEOUT`] (30s, adapter-overridable); exposed
/// for consistency with sibling adapters' constructors.
pub fn default_timeout() -> Duration {
    academix_http::DEFAULT_TIMEOUT
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn works_json() -> serde_json::Value {
        serde_json::json!({
            "meta": {"count": 1},
            "results": [{
                "id": "https://openalex.org/W123",
                "doi": "https://doi.org/10.1/xyz",
                "display_name": "A Test Paper",
                "publication_year": 2020,
                "authorships": [{"author": {"id": "A1", "display_name": "Jane Doe"}}],
                "primary_location": {"is_oa": true, "pdf_url": "http://x/pdf", "source": {"display_name": "Venue"}},
                "biblio": {"volume": "1", "issue": "2", "first_page": "10", "last_page": "20"},
                "cited_by_count": 5,
                "abstract_inverted_index": {"Hello": [0], "world": [1]},
                "referenced_works": []
            }]
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
        let client = OpenAlexClient::new(None, academix_model::new_shared_caches()).with_base_url(server.uri());
        let result = client.search("test", 10, 0, None, None, None, None).await.unwrap();
        assert_eq!(result.returned_count, 1);
        assert_eq!(result.papers[0].doi.as_deref(), Some("10.1/xyz"));
        assert_eq!(result.papers[0].abstract_text.as_deref(), Some("Hello world"));
        assert_eq!(result.papers[0].pdf_url.as_deref(), Some("http://x/pdf"));
    }

    #[tokio::test]
    async fn second_search_hits_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/works"))
            .respond_with(ResponseTemplate::new(200).set_body_json(works_json()))
            .expect(1)
            .mount(&server)
            .await;
        let client = OpenAlexClient::new(None, academix_model::new_shared_caches()).with_base_url(server.uri());
        let _ = client.search("test", 10, 0, None, None, None, None).await.unwrap();
        let second = client.search("test", 10, 0, None, None, None, None).await.unwrap();
        assert_eq!(second.returned_count, 1);
    }

    #[test]
    fn lookup_path_routes_by_prefix() {
        assert_eq!(OpenAlexClient::lookup_path("W123"), "W123");
        assert_eq!(OpenAlexClient::lookup_path("10.1/x"), "doi:10.1/x");
        assert_eq!(
            OpenAlexClient::lookup_path("https://doi.org/10.1/x"),
            "doi:10.1/x"
        );
    }

    #[test]
    fn year_filter_handles_both_bounds_and_open_ended() {
        assert_eq!(
            OpenAlexClient::year_filter(Some(2020), Some(2022)),
            Some("publication_year:2020-2022".to_string())
        );
        assert_eq!(
            OpenAlexClient::year_filter(Some(2020), None),
            Some("publication_year:>2019".to_string())
        );
        assert_eq!(
            OpenAlexClient::year_filter(None, Some(2022)),
            Some("publication_year:<2023".to_string())
        );
        assert_eq!(OpenAlexClient::year_filter(None, None), None);
    }
}
