//! Identifier-based source detection (spec.md §4.5).

use std::sync::OnceLock;

use academix_model::PaperSource;
use regex::Regex;

static OLD_STYLE_ARXIV_RE: OnceLock<Regex> = OnceLock::new();
static NEW_STYLE_ARXIV_RE: OnceLock<Regex> = OnceLock::new();
static S2_ID_RE: OnceLock<Regex> = OnceLock::new();

fn old_style_arxiv_re() -> &'static Regex {
    OLD_STYLE_ARXIV_RE.get_or_init(|| Regex::new(r"^[a-z-]+/\d+$").expect("valid regex"))
}

fn new_style_arxiv_re() -> &'static Regex {
    NEW_STYLE_ARXIV_RE.get_or_init(|| Regex::new(r"^\d{4}\.\d{4,5}$").expect("valid regex"))
}

fn s2_id_re() -> &'static Regex {
    S2_ID_RE.get_or_init(|| Regex::new(r"^[a-f0-9A-F]{40}$").expect("valid regex"))
}

/// Detects which backend an opaque identifier most likely belongs to, per
/// spec.md §4.5's ordered rule list. Always returns a member of
/// [`PaperSource`] — there is no "unknown" case.
pub fn detect_source(identifier: &str) -> PaperSource {
    let id = identifier.trim();
    let lower = id.to_lowercase();

    if lower.starts_with("10.") || lower.contains("doi.org") {
        return PaperSource::Openalex;
    }
    if lower.starts_with("arxiv:") || old_style_arxiv_re().is_match(id) || new_style_arxiv_re().is_match(id) {
        return PaperSource::Arxiv;
    }
    if id.contains('/') && !lower.starts_with("http") {
        return PaperSource::Dblp;
    }
    if id.len() == 40 && s2_id_re().is_match(id) {
        return PaperSource::SemanticScholar;
    }
    PaperSource::Openalex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_doi() {
        assert_eq!(detect_source("10.1038/nature14539"), PaperSource::Openalex);
        assert_eq!(detect_source("https://doi.org/10.1038/nature14539"), PaperSource::Openalex);
    }

    #[test]
    fn detects_arxiv_both_styles() {
        assert_eq!(detect_source("arxiv:2010.00001"), PaperSource::Arxiv);
        assert_eq!(detect_source("2010.00001"), PaperSource::Arxiv);
        assert_eq!(detect_source("cs/0012023"), PaperSource::Arxiv);
    }

    #[test]
    fn detects_dblp_keys() {
        assert_eq!(detect_source("conf/icml/DoeR20"), PaperSource::Dblp);
    }

    #[test]
    fn detects_semantic_scholar_hash() {
        let hash = "a".repeat(40);
        assert_eq!(detect_source(&hash), PaperSource::SemanticScholar);
    }

    #[test]
    fn falls_back_to_openalex() {
        assert_eq!(detect_source("W12345"), PaperSource::Openalex);
    }

    #[test]
    fn every_input_returns_a_member() {
        for input in ["", "   ", "???", "W123", "a/b/c/d"] {
            let source = detect_source(input);
            assert!(matches!(
                source,
                PaperSource::Openalex
                    | PaperSource::Dblp
                    | PaperSource::SemanticScholar
                    | PaperSource::Arxiv
                    | PaperSource::Crossref
            ));
        }
    }
}
