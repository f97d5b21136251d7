use std::time::Duration;

use academix_http::Connection;
use academix_model::{Author, CitationResult, Paper, PaperSource, SearchResult, SharedCaches};
use async_trait::async_trait;

use crate::types::{self, Feed};

const BASE_URL: &str = "https://export.arxiv.org/api/query";
const FETCH_PAGE_SIZE: u32 = 100;
const DEFAULT_POLITENESS_DELAY: Duration = Duration::from_secs(3);

/// Async adapter for arXiv's Atom export API (spec.md §4.4).
pub struct ArxivClient {
    base_url: String,
    connection: Connection,
    caches: SharedCaches,
    politeness_delay: Duration,
}

impl ArxivClient {
    pub fn new(caches: SharedCaches) -> Self {
        let ua = academix_http::user_agent("academix", env!("CARGO_PKG_VERSION"), None);
        Self {
            base_url: BASE_URL.to_string(),
            connection: Connection::new(ua, academix_http::DEFAULT_TIMEOUT),
            caches,
            politeness_delay: DEFAULT_POLITENESS_DELAY,
        }
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    #[cfg(test)]
    pub fn with_politeness_delay(mut self, d: Duration) -> Self {
        self.politeness_delay = d;
        self
    }

    /// Passes `ti:`/`au:`/`abs:`/`cat:`/`all:`-prefixed queries through
    /// unchanged; a bare query is wrapped in `all:` (spec.md §4.4).
    fn search_query(query: &str) -> String {
        const PREFIXES: [&str; 5] = ["ti:", "au:", "abs:", "cat:", "all:"];
        if PREFIXES.iter().any(|p| query.contains(p)) {
            query.to_string()
        } else {
            format!("all:{query}")
        }
    }

    fn sort_params(sort: Option<&str>) -> Vec<(&'static str, &'static str)> {
        match sort {
            Some("publication_date") => vec![("sortBy", "submittedDate"), ("sortOrder", "descending")],
            Some("citation_count") => {
                tracing::warn!("arxiv: citation_count sort unsupported, degrading to relevance");
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    async fn fetch_entries(
        &self,
        query: &str,
        start: u32,
        sort: Option<&str>,
    ) -> academix_model::error::Result<(Vec<types::Entry>, bool)> {
        tokio::time::sleep(self.politeness_delay).await;

        let client = self.connection.client().await;
        let mut params = vec![
            ("search_query".to_string(), Self::search_query(query)),
            ("start".to_string(), start.to_string()),
            ("max_results".to_string(), FETCH_PAGE_SIZE.to_string()),
        ];
        for (k, v) in Self::sort_params(sort) {
            params.push((k.to_string(), v.to_string()));
        }
        let resp = client.get(&self.base_url).query(&params).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(academix_model::AdapterError::HttpStatus { status: status.as_u16(), body });
        }
        let xml = resp
            .text()
            .await
            .map_err(academix_model::AdapterError::Transport)?;
        let feed: Feed = quick_xml::de::from_str(&xml)
            .map_err(|e| academix_model::AdapterError::Parse(e.to_string()))?;
        let raw_count = feed.entries.len();
        Ok((feed.entries, raw_count as u32 == FETCH_PAGE_SIZE))
    }

    fn to_paper(entry: &types::Entry) -> Paper {
        let normalized_id = types::normalize_arxiv_id(&entry.id);
        let mut paper = Paper::new(format!("arxiv:{normalized_id}"), entry.title.clone(), PaperSource::Arxiv);
        paper.authors = entry.authors.iter().map(|a| Author::new(a.name.clone())).collect();
        paper.abstract_text = if entry.summary.trim().is_empty() {
            None
        } else {
            Some(entry.summary.trim().to_string())
        };
        paper.published_date = entry.published.clone();
        paper.year = entry
            .published
            .as_deref()
            .and_then(|p| p.get(0..4))
            .and_then(|y| y.parse().ok());
        paper.arxiv_id = Some(normalized_id);
        paper.url = entry
            .links
            .iter()
            .find(|l| l.rel.as_deref() == Some("alternate"))
            .map(|l| l.href.clone())
            .or_else(|| entry.links.first().map(|l| l.href.clone()));
        paper.pdf_url = entry
            .links
            .iter()
            .find(|l| l.title.as_deref() == Some("pdf"))
            .map(|l| l.href.clone());
        paper.venue = entry.categories.first().map(|c| c.term.clone());
        paper
    }

    fn year_matches(paper: &Paper, year_from: Option<i32>, year_to: Option<i32>) -> bool {
        match paper.year {
            Some(y) => year_from.is_none_or(|from| y >= from) && year_to.is_none_or(|to| y <= to),
            None => year_from.is_none() && year_to.is_none(),
        }
    }
}

#[async_trait]
impl academix_model::Adapter for ArxivClient {
    fn source(&self) -> PaperSource {
        PaperSource::Arxiv
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
        let kwargs: Vec<(&str, String)> = [
            year_from.map(|y| ("year_from", y.to_string())),
            year_to.map(|y| ("year_to", y.to_string())),
            sort.map(|s| ("sort", s.to_string())),
        ]
        .into_iter()
        .flatten()
        .collect();
        let cache_key = academix_model::AppCaches::search_key("arxiv", query, limit, offset, &kwargs);
        if let Some(hit) = self.caches.search.get(&cache_key) {
            return Ok(hit);
        }

        let (entries, raw_page_full) = self.fetch_entries(query, offset, sort).await?;
        let papers: Vec<Paper> = entries
            .iter()
            .map(Self::to_paper)
            .filter(|p| Self::year_matches(p, year_from, year_to))
            .take(limit as usize)
            .collect();
        let total_results = papers.len() as u64;
        let returned_count = papers.len() as u64;
        let result = SearchResult {
            total_results,
            returned_count,
            offset: offset as u64,
            has_more: raw_page_full,
            papers,
            query: query.to_string(),
            source: PaperSource::Arxiv,
        };
        self.caches.search.set(&cache_key, result.clone());
        Ok(result)
    }

    async fn get_paper(&self, paper_id: &str) -> academix_model::error::Result<Option<Paper>> {
        let cache_key = academix_model::AppCaches::paper_key("arxiv", paper_id);
        if let Some(hit) = self.caches.paper.get(&cache_key) {
            return Ok(Some(hit));
        }
        let normalized_id = types::normalize_arxiv_id(paper_id);
        let (entries, _) = self.fetch_by_id(&normalized_id).await?;
        let paper = entries.first().map(Self::to_paper);
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
        self.search(&format!("au:{author_name}"), limit, offset, None, None, None, None)
            .await
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

impl ArxivClient {
    /// arXiv's `id_list` parameter bypasses `search_query` entirely —
    /// used for direct paper lookup instead of a relevance search.
    async fn fetch_by_id(&self, normalized_id: &str) -> academix_model::error::Result<(Vec<types::Entry>, bool)> {
        tokio::time::sleep(self.politeness_delay).await;
        let client = self.connection.client().await;
        let params = [("id_list", normalized_id), ("max_results", "1")];
        let resp = client.get(&self.base_url).query(&params).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(academix_model::AdapterError::HttpStatus { status: status.as_u16(), body });
        }
        let xml = resp
            .text()
            .await
            .map_err(academix_model::AdapterError::Transport)?;
        let feed: Feed = quick_xml::de::from_str(&xml)
            .map_err(|e| academix_model::AdapterError::Parse(e.to_string()))?;
        Ok((feed.entries, false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use academix_model::Adapter;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <id>http://arxiv.org/abs/2010.00001v1</id>
    <title>A Great Paper</title>
    <summary>An abstract.</summary>
    <published>2020-10-01T00:00:00Z</published>
    <author><name>Jane Doe</name></author>
    <link href="http://arxiv.org/abs/2010.00001v1" rel="alternate" type="text/html"/>
    <link title="pdf" href="http://arxiv.org/pdf/2010.00001v1" rel="related" type="application/pdf"/>
    <category term="cs.LG"/>
  </entry>
</feed>"#;

    #[tokio::test]
    async fn search_parses_atom_entries_and_normalizes_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
            .mount(&server)
            .await;
        let client = ArxivClient::new(academix_model::new_shared_caches())
            .with_base_url(server.uri())
            .with_politeness_delay(Duration::from_millis(1));
        let result = client.search("attention", 10, 0, None, None, None, None).await.unwrap();
        assert_eq!(result.returned_count, 1);
        assert_eq!(result.papers[0].id, "arxiv:2010.00001");
        assert_eq!(result.papers[0].pdf_url.as_deref(), Some("http://arxiv.org/pdf/2010.00001v1"));
    }

    #[tokio::test]
    async fn year_filter_excludes_out_of_range_entries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
            .mount(&server)
            .await;
        let client = ArxivClient::new(academix_model::new_shared_caches())
            .with_base_url(server.uri())
            .with_politeness_delay(Duration::from_millis(1));
        let result = client.search("attention", 10, 0, Some(2021), None, None, None).await.unwrap();
        assert_eq!(result.returned_count, 0);
    }

    #[test]
    fn search_query_wraps_bare_queries_in_all_prefix() {
        assert_eq!(ArxivClient::search_query("neural nets"), "all:neural nets");
        assert_eq!(ArxivClient::search_query("ti:transformers"), "ti:transformers");
    }
}
