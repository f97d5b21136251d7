use serde::{Deserialize, Serialize};

/// Which upstream API a [`Paper`] or [`SearchResult`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaperSource {
    Openalex,
    Dblp,
    SemanticScholar,
    Arxiv,
    Crossref,
}

impl PaperSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaperSource::Openalex => "openalex",
            PaperSource::Dblp => "dblp",
            PaperSource::SemanticScholar => "semantic_scholar",
            PaperSource::Arxiv => "arxiv",
            PaperSource::Crossref => "crossref",
        }
    }
}

impl std::fmt::Display for PaperSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output format requested by a tool call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    #[default]
    Markdown,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orcid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
}

impl Author {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            ..Default::default()
        }
    }
}

/// A single DOI-prefix stripping pass, applied wherever a raw DOI enters
/// the model (adapters call this themselves; the constructor below also
/// applies it as a last line of defense for hand-built papers).
pub fn normalize_doi(doi: &str) -> String {
    let trimmed = doi.trim();
    let lower = trimmed.to_lowercase();
    for prefix in ["https://doi.org/", "http://doi.org/", "doi:"] {
        if lower.starts_with(prefix) {
            return trimmed[prefix.len()..].to_string();
        }
    }
    trimmed.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paper {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(
        default,
        rename = "abstract",
        skip_serializing_if = "Option::is_none"
    )]
    pub abstract_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arxiv_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
    #[serde(default)]
    pub citation_count: u64,
    pub source: PaperSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bibtex_key: Option<String>,
}

impl Paper {
    /// Builds a paper, applying the model's two invariants: a blank title
    /// falls back to `"Untitled"`, and a DOI (if present) is normalized.
    pub fn new(id: impl Into<String>, title: impl Into<String>, source: PaperSource) -> Self {
        let title = title.into();
        Self {
            id: id.into(),
            title: if title.trim().is_empty() {
                "Untitled".to_string()
            } else {
                title
            },
            authors: Vec::new(),
            abstract_text: None,
            year: None,
            published_date: None,
            venue: None,
            volume: None,
            issue: None,
            pages: None,
            doi: None,
            arxiv_id: None,
            url: None,
            pdf_url: None,
            citation_count: 0,
            source,
            bibtex_key: None,
        }
    }

    pub fn with_doi(mut self, doi: Option<String>) -> Self {
        self.doi = doi.map(|d| normalize_doi(&d));
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub total_results: u64,
    pub returned_count: u64,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub papers: Vec<Paper>,
    pub query: String,
    pub source: PaperSource,
}

impl SearchResult {
    /// Builds a result, deriving `returned_count` from `papers.len()` so the
    /// two can never disagree (§8 invariant).
    pub fn new(
        query: impl Into<String>,
        source: PaperSource,
        papers: Vec<Paper>,
        total_results: u64,
        offset: u64,
    ) -> Self {
        let returned_count = papers.len() as u64;
        let has_more = offset + returned_count < total_results;
        Self {
            total_results,
            returned_count,
            offset,
            has_more,
            papers,
            query: query.into(),
            source,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitationResult {
    pub paper_id: String,
    #[serde(default)]
    pub citation_count: u64,
    #[serde(default)]
    pub citing_papers: Vec<Paper>,
    #[serde(default)]
    pub has_more: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedPapersResult {
    pub paper_id: String,
    #[serde(default)]
    pub related_papers: Vec<Paper>,
    #[serde(default = "default_recommendation_source")]
    pub recommendation_source: String,
}

fn default_recommendation_source() -> String {
    "semantic_scholar".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitationNetworkNode {
    pub paper_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default)]
    pub citation_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitationNetworkEdge {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitationNetwork {
    pub center_paper_id: String,
    #[serde(default)]
    pub nodes: Vec<CitationNetworkNode>,
    #[serde(default)]
    pub edges: Vec<CitationNetworkEdge>,
    pub depth: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_doi_strips_known_prefixes() {
        assert_eq!(normalize_doi("https://doi.org/10.1/x"), "10.1/x");
        assert_eq!(normalize_doi("http://doi.org/10.1/x"), "10.1/x");
        assert_eq!(normalize_doi("DOI:10.1/x"), "10.1/x");
        assert_eq!(normalize_doi("10.1/x"), "10.1/x");
    }

    #[test]
    fn paper_new_falls_back_to_untitled() {
        let p = Paper::new("1", "   ", PaperSource::Openalex);
        assert_eq!(p.title, "Untitled");
    }

    #[test]
    fn search_result_derives_returned_count() {
        let papers = vec![Paper::new("1", "A", PaperSource::Openalex)];
        let r = SearchResult::new("q", PaperSource::Openalex, papers, 5, 0);
        assert_eq!(r.returned_count, 1);
        assert!(r.has_more);
    }
}
