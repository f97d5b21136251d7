//! Raw OpenAlex JSON shapes, normalized into [`academix_model::Paper`] by
//! `client.rs`. Field sets are trimmed to what the adapter actually reads
//! for OpenAlex's inverted abstract index and work records.

use std::collections::HashMap;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct WorksListResponse {
    pub meta: WorksMeta,
    #[serde(default)]
    pub results: Vec<Work>,
}

#[derive(Debug, Deserialize)]
pub struct WorksMeta {
    pub count: u64,
}

#[derive(Debug, Deserialize)]
pub struct Work {
    pub id: String,
    pub doi: Option<String>,
    pub title: Option<String>,
    pub display_name: Option<String>,
    pub publication_year: Option<i32>,
    pub publication_date: Option<String>,
    #[serde(default)]
    pub authorships: Vec<Authorship>,
    pub primary_location: Option<Location>,
    #[serde(default)]
    pub locations: Vec<Location>,
    pub biblio: Option<Biblio>,
    pub cited_by_count: Option<u64>,
    #[serde(default, rename = "abstract_inverted_index")]
    pub abstract_inverted_index: Option<HashMap<String, Vec<u32>>>,
    #[serde(default)]
    pub referenced_works: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct Authorship {
    pub author: Option<AuthorRef>,
}

#[derive(Debug, Deserialize)]
pub struct AuthorRef {
    pub id: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Location {
    pub is_oa: Option<bool>,
    pub pdf_url: Option<String>,
    pub landing_page_url: Option<String>,
    pub source: Option<SourceRef>,
}

#[derive(Debug, Deserialize)]
pub struct SourceRef {
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Biblio {
    pub volume: Option<String>,
    pub issue: Option<String>,
    pub first_page: Option<String>,
    pub last_page: Option<String>,
}

/// Reassembles the abstract from OpenAlex's inverted index: sort `(word,
/// positions)` pairs by position ascending, join with single spaces.
pub fn reconstruct_abstract(index: &HashMap<String, Vec<u32>>) -> String {
    let mut positions: Vec<(u32, &str)> = index
        .iter()
        .flat_map(|(word, pos)| pos.iter().map(move |p| (*p, word.as_str())))
        .collect();
    positions.sort_by_key(|(p, _)| *p);
    positions.into_iter().map(|(_, w)| w).collect::<Vec<_>>().join(" ")
}
