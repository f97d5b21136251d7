//! Raw arXiv Atom feed shapes, grounded on `quick_xml::de`'s serde
//! integration (the `@attr` attribute-prefix convention for `<link>`/
//! `<category>`).

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Feed {
    #[serde(default, rename = "entry")]
    pub entries: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
pub struct Entry {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
    #[serde(default, rename = "author")]
    pub authors: Vec<AuthorEl>,
    #[serde(default, rename = "link")]
    pub links: Vec<LinkEl>,
    #[serde(default, rename = "category")]
    pub categories: Vec<CategoryEl>,
}

#[derive(Debug, Deserialize)]
pub struct AuthorEl {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LinkEl {
    #[serde(rename = "@href")]
    pub href: String,
    #[serde(default, rename = "@title")]
    pub title: Option<String>,
    #[serde(default, rename = "@rel")]
    pub rel: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryEl {
    #[serde(rename = "@term")]
    pub term: String,
}

/// Strips a leading `arxiv:` prefix, the trailing path segment of an
/// `entry_id` URL, and a trailing `vN` version suffix (spec.md §4.4).
pub fn normalize_arxiv_id(raw: &str) -> String {
    let no_prefix = raw.strip_prefix("arxiv:").unwrap_or(raw);
    let last_segment = if no_prefix.contains("://") {
        // entry_id URLs look like ".../abs/{id}"; old-style ids (e.g.
        // "cs/0012023") keep their own internal slash, so only a URL's
        // trailing path segment is extracted here.
        no_prefix.rsplit('/').next().unwrap_or(no_prefix)
    } else {
        no_prefix
    };
    strip_version_suffix(last_segment)
}

fn strip_version_suffix(id: &str) -> String {
    if let Some(v_pos) = id.rfind('v') {
        let (head, tail) = id.split_at(v_pos);
        if tail[1..].chars().all(|c| c.is_ascii_digit()) && !tail[1..].is_empty() {
            return head.to_string();
        }
    }
    id.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_full_entry_id_url() {
        assert_eq!(
            normalize_arxiv_id("http://arxiv.org/abs/2010.00001v2"),
            "2010.00001"
        );
    }

    #[test]
    fn normalizes_already_bare_id() {
        assert_eq!(normalize_arxiv_id("2010.00001"), "2010.00001");
    }

    #[test]
    fn strips_arxiv_prefix() {
        assert_eq!(normalize_arxiv_id("arxiv:2010.00001v1"), "2010.00001");
    }

    #[test]
    fn leaves_ids_without_version_suffix_alone() {
        assert_eq!(normalize_arxiv_id("cs/0012023"), "cs/0012023");
    }
}
