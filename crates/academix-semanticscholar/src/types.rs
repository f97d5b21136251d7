//! Raw Semantic Scholar Graph/Recommendations JSON shapes.

use serde::Deserialize;

pub const FIELDS: &str =
    "paperId,title,abstract,year,venue,authors,citationCount,externalIds,url,publicationDate,journal";

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub data: Vec<S2Paper>,
}

#[derive(Debug, Deserialize)]
pub struct PapersListResponse {
    #[serde(default)]
    pub data: Vec<S2Paper>,
}

#[derive(Debug, Deserialize)]
pub struct AuthorSearchResponse {
    #[serde(default)]
    pub data: Vec<S2Author>,
}

#[derive(Debug, Deserialize)]
pub struct S2Author {
    #[serde(rename = "authorId")]
    pub author_id: Option<String>,
    #[allow(dead_code)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationsResponse {
    #[serde(default, rename = "recommendedPapers")]
    pub recommended_papers: Vec<S2Paper>,
}

#[derive(Debug, Deserialize)]
pub struct S2Paper {
    #[serde(rename = "paperId")]
    pub paper_id: String,
    pub title: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub year: Option<i32>,
    pub venue: Option<String>,
    #[serde(default)]
    pub authors: Vec<S2Author>,
    #[serde(rename = "citationCount")]
    pub citation_count: Option<u64>,
    #[serde(rename = "externalIds")]
    pub external_ids: Option<ExternalIds>,
    pub url: Option<String>,
    #[serde(rename = "publicationDate")]
    pub publication_date: Option<String>,
    pub journal: Option<Journal>,
}

#[derive(Debug, Deserialize)]
pub struct ExternalIds {
    #[serde(rename = "DOI")]
    pub doi: Option<String>,
    #[serde(rename = "ArXiv")]
    pub arxiv: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Journal {
    pub name: Option<String>,
    pub volume: Option<String>,
    pub pages: Option<String>,
}
