//! Tool input schemas (spec.md §6): one struct per operation, each
//! validated against its documented range constraints before the
//! aggregator is ever touched (§7 "ValidationError rejected before any
//! network call").

use schemars::JsonSchema;
use serde::Deserialize;

use academix_model::{error::Result, validate, AdapterError, PaperSource, ResponseFormat};

/// Parses the free-text `source` argument every tool accepts into a
/// [`PaperSource`], rejecting anything that isn't one of the five known
/// backends.
pub fn parse_source(source: Option<&str>) -> Result<Option<PaperSource>> {
    match source.map(str::trim) {
        None | Some("") => Ok(None),
        Some("openalex") => Ok(Some(PaperSource::Openalex)),
        Some("dblp") => Ok(Some(PaperSource::Dblp)),
        Some("semantic_scholar") => Ok(Some(PaperSource::SemanticScholar)),
        Some("arxiv") => Ok(Some(PaperSource::Arxiv)),
        Some("crossref") => Ok(Some(PaperSource::Crossref)),
        Some(other) => Err(AdapterError::Validation(format!(
            "source must be one of openalex, dblp, semantic_scholar, arxiv, crossref; got '{other}'"
        ))),
    }
}

/// `response_format` defaults to markdown; any other value is rejected.
pub fn parse_response_format(format: Option<&str>) -> Result<ResponseFormat> {
    match format.map(str::trim) {
        None | Some("") | Some("markdown") => Ok(ResponseFormat::Markdown),
        Some("json") => Ok(ResponseFormat::Json),
        Some(other) => Err(AdapterError::Validation(format!(
            "response_format must be 'markdown' or 'json', got '{other}'"
        ))),
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchPapersParams {
    /// Free-text search query.
    pub query: String,
    /// Results per page (1-100, default 10).
    pub limit: Option<u32>,
    /// Zero-based offset into the result set (default 0).
    pub offset: Option<u32>,
    /// Restrict the search to one backend, bypassing the default fallback
    /// chain. One of `openalex`, `dblp`, `semantic_scholar`, `arxiv`, `crossref`.
    pub source: Option<String>,
    /// Earliest publication year to include (1900-2100).
    pub year_from: Option<i32>,
    /// Latest publication year to include (1900-2100).
    pub year_to: Option<i32>,
    /// Venue (journal/conference) name filter.
    pub venue: Option<String>,
    /// One of `relevance`, `publication_date`, `citation_count`.
    pub sort: Option<String>,
    /// `markdown` (default) or `json`.
    pub response_format: Option<String>,
}

impl SearchPapersParams {
    pub fn validate(&self) -> Result<()> {
        validate::non_empty(&self.query, "query")?;
        validate::limit(self.limit.unwrap_or(10), 100)?;
        validate::year_range(self.year_from, self.year_to)?;
        parse_source(self.source.as_deref())?;
        parse_response_format(self.response_format.as_deref())?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetPaperDetailsParams {
    /// Paper identifier: a DOI, OpenAlex id, DBLP key, arXiv id, or
    /// Semantic Scholar id.
    pub paper_id: String,
    /// Restrict the lookup to one backend.
    pub source: Option<String>,
    /// `markdown` (default) or `json`.
    pub response_format: Option<String>,
}

impl GetPaperDetailsParams {
    pub fn validate(&self) -> Result<()> {
        validate::non_empty(&self.paper_id, "paper_id")?;
        parse_source(self.source.as_deref())?;
        parse_response_format(self.response_format.as_deref())?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetBibtexParams {
    /// Comma-separated paper identifiers (1-50).
    pub paper_ids: String,
    /// Restrict lookups to one backend.
    pub source: Option<String>,
    /// Prefer DBLP's native `.bib` export when the identifier looks
    /// DBLP-shaped (default true).
    pub use_dblp: Option<bool>,
}

impl GetBibtexParams {
    pub fn ids(&self) -> Vec<String> {
        self.paper_ids
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        validate::paper_ids(&self.ids())?;
        parse_source(self.source.as_deref())?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetCitationsParams {
    pub paper_id: String,
    /// Results per page (1-100, default 10).
    pub limit: Option<u32>,
    /// Zero-based offset into the citing-paper list (default 0).
    pub offset: Option<u32>,
    pub source: Option<String>,
    /// `markdown` (default) or `json`.
    pub response_format: Option<String>,
}

impl GetCitationsParams {
    pub fn validate(&self) -> Result<()> {
        validate::non_empty(&self.paper_id, "paper_id")?;
        validate::limit(self.limit.unwrap_or(10), 100)?;
        parse_source(self.source.as_deref())?;
        parse_response_format(self.response_format.as_deref())?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchAuthorParams {
    pub author_name: String,
    /// Results per page (1-100, default 10).
    pub limit: Option<u32>,
    /// Zero-based offset into the result set (default 0).
    pub offset: Option<u32>,
    pub source: Option<String>,
    /// `markdown` (default) or `json`.
    pub response_format: Option<String>,
}

impl SearchAuthorParams {
    pub fn validate(&self) -> Result<()> {
        validate::non_empty(&self.author_name, "author_name")?;
        validate::limit(self.limit.unwrap_or(10), 100)?;
        parse_source(self.source.as_deref())?;
        parse_response_format(self.response_format.as_deref())?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetRelatedPapersParams {
    /// Semantic Scholar paper id (the sole recommendation source).
    pub paper_id: String,
    /// Number of recommendations to return (1-100, default 10).
    pub limit: Option<u32>,
    /// `markdown` (default) or `json`.
    pub response_format: Option<String>,
}

impl GetRelatedPapersParams {
    pub fn validate(&self) -> Result<()> {
        validate::non_empty(&self.paper_id, "paper_id")?;
        validate::limit(self.limit.unwrap_or(10), 100)?;
        parse_response_format(self.response_format.as_deref())?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetCitationNetworkParams {
    pub paper_id: String,
    /// One of `citing`, `cited`, `both` (default `both`).
    pub direction: Option<String>,
    /// Maximum nodes in the returned network (10-200, default 50).
    pub max_nodes: Option<u32>,
    /// Network depth; currently only `1` is supported.
    pub depth: Option<u32>,
    /// `markdown` (default) or `json`.
    pub response_format: Option<String>,
}

impl GetCitationNetworkParams {
    pub fn validate(&self) -> Result<()> {
        validate::non_empty(&self.paper_id, "paper_id")?;
        validate::direction(self.direction.as_deref().unwrap_or("both"))?;
        validate::max_nodes(self.max_nodes.unwrap_or(50))?;
        validate::depth(self.depth.unwrap_or(1))?;
        parse_response_format(self.response_format.as_deref())?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CacheStatsParams {
    /// `markdown` (default) or `json`.
    pub response_format: Option<String>,
}

impl CacheStatsParams {
    pub fn validate(&self) -> Result<()> {
        parse_response_format(self.response_format.as_deref())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_source_accepts_known_backends() {
        assert_eq!(parse_source(Some("dblp")).unwrap(), Some(PaperSource::Dblp));
        assert_eq!(parse_source(None).unwrap(), None);
        assert_eq!(parse_source(Some("")).unwrap(), None);
    }

    #[test]
    fn parse_source_rejects_unknown_backend() {
        assert!(parse_source(Some("bogus")).is_err());
    }

    #[test]
    fn parse_response_format_defaults_to_markdown() {
        assert_eq!(parse_response_format(None).unwrap(), ResponseFormat::Markdown);
        assert_eq!(parse_response_format(Some("json")).unwrap(), ResponseFormat::Json);
        assert!(parse_response_format(Some("xml")).is_err());
    }

    #[test]
    fn search_params_reject_inverted_year_range() {
        let params = SearchPapersParams {
            query: "test".to_string(),
            limit: None,
            offset: None,
            source: None,
            year_from: Some(2020),
            year_to: Some(2010),
            venue: None,
            sort: None,
            response_format: None,
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn bibtex_params_split_and_trim_comma_separated_ids() {
        let params = GetBibtexParams {
            paper_ids: " 10.1/a , 10.1/b ,, 10.1/c".to_string(),
            source: None,
            use_dblp: None,
        };
        assert_eq!(params.ids(), vec!["10.1/a", "10.1/b", "10.1/c"]);
    }

    #[test]
    fn bibtex_params_reject_empty_id_list() {
        let params = GetBibtexParams { paper_ids: ",, ,".to_string(), source: None, use_dblp: None };
        assert!(params.validate().is_err());
    }

    #[test]
    fn citation_network_params_reject_depth_other_than_one() {
        let params = GetCitationNetworkParams {
            paper_id: "W1".to_string(),
            direction: None,
            max_nodes: None,
            depth: Some(2),
            response_format: None,
        };
        assert!(params.validate().is_err());
    }
}
