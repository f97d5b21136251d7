//! Raw CrossRef `/works` JSON shapes. Several fields CrossRef returns as
//! single-element arrays (`title`, `container-title`) per its data model.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct WorksListEnvelope {
    pub message: WorksListMessage,
}

#[derive(Debug, Deserialize)]
pub struct WorksListMessage {
    #[serde(rename = "total-results", default)]
    pub total_results: u64,
    #[serde(default)]
    pub items: Vec<Work>,
}

#[derive(Debug, Deserialize)]
pub struct WorkEnvelope {
    pub message: Work,
}

#[derive(Debug, Deserialize)]
pub struct Work {
    #[serde(rename = "DOI")]
    pub doi: Option<String>,
    #[serde(default)]
    pub title: Vec<String>,
    #[serde(rename = "container-title", default)]
    pub container_title: Vec<String>,
    #[serde(default)]
    pub author: Vec<CrossrefAuthor>,
    #[serde(rename = "published-print")]
    pub published_print: Option<DateParts>,
    #[serde(rename = "published-online")]
    pub published_online: Option<DateParts>,
    pub created: Option<DateParts>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    pub page: Option<String>,
    #[serde(rename = "is-referenced-by-count", default)]
    pub is_referenced_by_count: u64,
    #[serde(rename = "URL")]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CrossrefAuthor {
    pub given: Option<String>,
    pub family: Option<String>,
}

impl CrossrefAuthor {
    pub fn display_name(&self) -> Option<String> {
        match (&self.given, &self.family) {
            (Some(g), Some(f)) => Some(format!("{g} {f}")),
            (None, Some(f)) => Some(f.clone()),
            (Some(g), None) => Some(g.clone()),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DateParts {
    #[serde(rename = "date-parts")]
    pub date_parts: Vec<Vec<i32>>,
}

impl Work {
    /// First-present of `published-print`, `published-online`, `created`,
    /// taking `date-parts[0][0]` as the year (spec.md §4.4).
    pub fn publication_year(&self) -> Option<i32> {
        [&self.published_print, &self.published_online, &self.created]
            .into_iter()
            .flatten()
            .find_map(|d| d.date_parts.first().and_then(|p| p.first().copied()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publication_year_prefers_print_then_online_then_created() {
        let work = Work {
            doi: None,
            title: vec![],
            container_title: vec![],
            author: vec![],
            published_print: None,
            published_online: Some(DateParts { date_parts: vec![vec![2019]] }),
            created: Some(DateParts { date_parts: vec![vec![2018]] }),
            volume: None,
            issue: None,
            page: None,
            is_referenced_by_count: 0,
            url: None,
        };
        assert_eq!(work.publication_year(), Some(2019));
    }

    #[test]
    fn author_display_name_combines_given_and_family() {
        let a = CrossrefAuthor { given: Some("Jane".to_string()), family: Some("Doe".to_string()) };
        assert_eq!(a.display_name(), Some("Jane Doe".to_string()));
    }
}
