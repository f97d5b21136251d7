use academix_http::Connection;
use academix_model::{Author, CitationResult, Paper, PaperSource, SearchResult, SharedCaches};
use async_trait::async_trait;

use crate::bibfields;
use crate::types::{self, Hits, SearchEnvelope};

const BASE_URL: &str = "https://dblp.org";
const MAX_PAGE_SIZE: u32 = 1000;

/// Async adapter for the DBLP publication search API.
pub struct DblpClient {
    base_url: String,
    connection: Connection,
    caches: SharedCaches,
}

impl DblpClient {
    pub fn new(caches: SharedCaches) -> Self {
        let ua = academix_http::user_agent("academix", env!("CARGO_PKG_VERSION"), None);
        Self {
            base_url: BASE_URL.to_string(),
            connection: Connection::new(ua, academix_http::DEFAULT_TIMEOUT),
            caches,
        }
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn build_query(query: &str, year_from: Option<i32>, year_to: Option<i32>, venue: Option<&str>) -> String {
        let mut q = query.to_string();
        if year_from.is_some() || year_to.is_some() {
            let from = year_from.unwrap_or(0);
            let to = year_to.unwrap_or(9999);
            q.push_str(&format!(" year:{from}:{to}"));
        }
        if let Some(v) = venue {
            q.push_str(&format!(" venue:{v}"));
        }
        q
    }

    async fn fetch_hits(&self, q: &str, limit: u32, offset: u32) -> academix_model::error::Result<Hits> {
        let client = self.connection.client().await;
        let url = format!("{}/search/publ/api", self.base_url);
        let params = [
            ("q", q.to_string()),
            ("format", "json".to_string()),
            ("h", limit.min(MAX_PAGE_SIZE).to_string()),
            ("f", offset.to_string()),
        ];
        tracing::trace!(url, q, "dblp: search request");
        let resp = client.get(&url).query(&params).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(academix_model::AdapterError::HttpStatus { status: status.as_u16(), body });
        }
        let envelope: SearchEnvelope = resp
            .json()
            .await
            .map_err(|e| academix_model::AdapterError::Parse(e.to_string()))?;
        Ok(envelope.result.hits)
    }

    fn hit_to_paper(hit: &serde_json::Value) -> Option<Paper> {
        let info = hit.get("info")?;
        let key = types::extract_key(hit)?;
        let title = types::str_field(info, "title").unwrap_or_default();
        let mut paper = Paper::new(key.clone(), title, PaperSource::Dblp);
        paper.authors = types::author_names(info).into_iter().map(Author::new).collect();
        paper.venue = types::str_field(info, "venue").map(|s| s.to_string());
        paper.year = types::str_field(info, "year").and_then(|y| y.parse().ok());
        paper.pages = types::str_field(info, "pages").map(|s| s.to_string());
        paper.volume = types::str_field(info, "volume").map(|s| s.to_string());
        paper.doi = types::valid_doi(info);
        paper.url = types::str_field(info, "ee")
            .or_else(|| types::str_field(info, "url"))
            .map(|s| s.to_string());
        paper.bibtex_key = Some(bibtex_key_from_dblp_key(&key));
        Some(paper)
    }

    /// Fetches DBLP's native `.bib` text for a publication key. Returns
    /// `None` on 404 — a key DBLP doesn't recognize — or when the body
    /// doesn't look like a BibTeX entry (an HTML error/landing page can
    /// still arrive with a 200 status).
    pub async fn get_bibtex(&self, dblp_key: &str) -> academix_model::error::Result<Option<String>> {
        let client = self.connection.client().await;
        let url = format!("{}/rec/{}.bib", self.base_url, dblp_key);
        let resp = client.get(&url).query(&[("param", "0")]).send().await?;
        let status = resp.status();
        if status.as_u16() == 404 {
            return Ok(None);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(academix_model::AdapterError::HttpStatus { status: status.as_u16(), body });
        }
        let text = resp
            .text()
            .await
            .map_err(academix_model::AdapterError::Transport)?;
        let trimmed = text.trim();
        if trimmed.starts_with('@') || trimmed.contains("author =") {
            Ok(Some(trimmed.to_string()))
        } else {
            Ok(None)
        }
    }

    /// Builds a [`Paper`] from the same `.bib` text `get_bibtex` returns,
    /// used for paper lookups on a known DBLP key (source detection routes
    /// bare `a/b/c`-shaped ids here).
    async fn paper_from_bibtex(&self, dblp_key: &str) -> academix_model::error::Result<Option<Paper>> {
        let Some(raw) = self.get_bibtex(dblp_key).await? else {
            return Ok(None);
        };
        let fields = bibfields::parse_fields(&raw);
        let title = fields.get("title").cloned().unwrap_or_default();
        let mut paper = Paper::new(dblp_key.to_string(), title, PaperSource::Dblp);
        if let Some(authors) = fields.get("author") {
            paper.authors = authors.split(" and ").map(str::trim).map(Author::new).collect();
        }
        paper.venue = fields
            .get("journal")
            .or_else(|| fields.get("booktitle"))
            .cloned();
        paper.year = fields.get("year").and_then(|y| y.parse().ok());
        paper.volume = fields.get("volume").cloned();
        paper.pages = fields.get("pages").cloned();
        paper.doi = fields.get("doi").cloned();
        paper.url = fields.get("url").cloned();
        paper.bibtex_key = Some(bibtex_key_from_dblp_key(dblp_key));
        Ok(Some(paper))
    }
}

/// `a/b/c` → `DBLP:c`.
fn bibtex_key_from_dblp_key(dblp_key: &str) -> String {
    let last = dblp_key.rsplit('/').next().unwrap_or(dblp_key);
    format!("DBLP:{last}")
}

#[async_trait]
impl academix_model::Adapter for DblpClient {
    fn source(&self) -> PaperSource {
        PaperSource::Dblp
    }

    async fn search(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
        year_from: Option<i32>,
        year_to: Option<i32>,
        venue: Option<&str>,
        _sort: Option<&str>,
    ) -> academix_model::error::Result<SearchResult> {
        let kwargs: Vec<(&str, String)> = [
            year_from.map(|y| ("year_from", y.to_string())),
            year_to.map(|y| ("year_to", y.to_string())),
            venue.map(|v| ("venue", v.to_string())),
        ]
        .into_iter()
        .flatten()
        .collect();
        let cache_key = academix_model::AppCaches::search_key("dblp", query, limit, offset, &kwargs);
        if let Some(hit) = self.caches.search.get(&cache_key) {
            return Ok(hit);
        }

        let q = Self::build_query(query, year_from, year_to, venue);
        let hits = self.fetch_hits(&q, limit, offset).await?;
        let total = hits
            .total
            .as_deref()
            .and_then(|t| t.parse::<u64>().ok())
            .unwrap_or(0);
        let papers: Vec<Paper> = types::hit_list(&hits).iter().filter_map(Self::hit_to_paper).collect();

        let result = SearchResult::new(query, PaperSource::Dblp, papers, total, offset as u64);
        self.caches.search.set(&cache_key, result.clone());
        Ok(result)
    }

    async fn get_paper(&self, paper_id: &str) -> academix_model::error::Result<Option<Paper>> {
        let cache_key = academix_model::AppCaches::paper_key("dblp", paper_id);
        if let Some(hit) = self.caches.paper.get(&cache_key) {
            return Ok(Some(hit));
        }
        let paper = self.paper_from_bibtex(paper_id).await?;
        if let Some(p) = &paper {
            self.caches.paper.set(&cache_key, p.clone());
        }
        Ok(paper)
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

    fn search_json(hit: serde_json::Value) -> serde_json::Value {
        serde_json::json!({"result": {"hits": {"@total": "1", "hit": hit}}})
    }

    fn sample_hit() -> serde_json::Value {
        serde_json::json!({
            "@id": "1",
            "info": {
                "title": "A Great Paper",
                "venue": "ICML",
                "year": "2020",
                "key": "conf/icml/DoeR20",
                "doi": "10.1/xyz",
                "ee": "https://doi.org/10.1/xyz",
                "authors": {"author": ["Jane Doe", {"text": "John Roe"}]}
            }
        })
    }

    #[tokio::test]
    async fn search_lifts_single_hit_dict_and_normalizes_authors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/publ/api"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_json(sample_hit())))
            .mount(&server)
            .await;
        let client = DblpClient::new(academix_model::new_shared_caches()).with_base_url(server.uri());
        let result = client.search("great paper", 10, 0, None, None, None, None).await.unwrap();
        assert_eq!(result.returned_count, 1);
        assert_eq!(result.papers[0].authors.len(), 2);
        assert_eq!(result.papers[0].id, "conf/icml/DoeR20");
        assert_eq!(result.papers[0].bibtex_key.as_deref(), Some("DBLP:DoeR20"));
    }

    #[tokio::test]
    async fn search_discards_malformed_doi() {
        let mut hit = sample_hit();
        hit["info"]["doi"] = serde_json::json!("not-a-doi");
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/publ/api"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_json(hit)))
            .mount(&server)
            .await;
        let client = DblpClient::new(academix_model::new_shared_caches()).with_base_url(server.uri());
        let result = client.search("x", 10, 0, None, None, None, None).await.unwrap();
        assert_eq!(result.papers[0].doi, None);
    }

    #[tokio::test]
    async fn get_bibtex_returns_none_on_404() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rec/conf/missing/x.bib"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let client = DblpClient::new(academix_model::new_shared_caches()).with_base_url(server.uri());
        let bibtex = client.get_bibtex("conf/missing/x").await.unwrap();
        assert!(bibtex.is_none());
    }

    #[tokio::test]
    async fn get_bibtex_trims_whitespace_around_native_entry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rec/conf/icml/DoeR20.bib"))
            .respond_with(ResponseTemplate::new(200).set_body_string("\n\n@inproceedings{DBLP:DoeR20,\n}\n\n"))
            .mount(&server)
            .await;
        let client = DblpClient::new(academix_model::new_shared_caches()).with_base_url(server.uri());
        let bibtex = client.get_bibtex("conf/icml/DoeR20").await.unwrap();
        assert_eq!(bibtex.as_deref(), Some("@inproceedings{DBLP:DoeR20,\n}"));
    }

    #[tokio::test]
    async fn get_bibtex_rejects_non_bibtex_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rec/conf/icml/DoeR20.bib"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not found</html>"))
            .mount(&server)
            .await;
        let client = DblpClient::new(academix_model::new_shared_caches()).with_base_url(server.uri());
        let bibtex = client.get_bibtex("conf/icml/DoeR20").await.unwrap();
        assert!(bibtex.is_none());
    }

    #[test]
    fn bibtex_key_uses_last_path_segment() {
        assert_eq!(bibtex_key_from_dblp_key("conf/icml/DoeR20"), "DBLP:DoeR20");
    }
}
