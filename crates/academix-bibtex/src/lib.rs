//! Deterministic BibTeX synthesis from normalized [`Paper`] metadata
//! (spec.md §4.2).
//!
//! Used whenever a backend has no native export (every backend except
//! DBLP, whose adapter fetches a native `.bib` body directly and never
//! calls into this crate).

mod entry_type;
mod escape;
mod key;

pub use entry_type::{infer_entry_type, EntryType};
pub use escape::{escape_latex, normalize_pages};
pub use key::{dedupe_keys, format_author_list, generate_key};

use academix_model::Paper;

const ABSTRACT_MAX_LEN: usize = 1000;
const ABSTRACT_TRUNCATE_AT: usize = 997;

/// Generates a BibTeX entry for a single paper, using `paper.bibtex_key`
/// when present or deriving one via [`generate_key`] otherwise.
///
/// Calling this twice for the same paper yields byte-identical output
/// (spec.md §8 round-trip invariant) — nothing here depends on wall-clock
/// time or iteration order.
pub fn generate_bibtex(paper: &Paper) -> String {
    let first_author = paper.authors.first().map(|a| a.name.as_str());
    let key = paper
        .bibtex_key
        .clone()
        .unwrap_or_else(|| generate_key(first_author, paper.year, &paper.title));
    assemble_entry(paper, &key)
}

/// Generates BibTeX for a batch of papers, deduplicating colliding keys by
/// appending `a, b, c, …` in input order (spec.md §4.2, §8 collision-freedom
/// invariant).
pub fn generate_bibtex_batch(papers: &[Paper]) -> Vec<String> {
    let keys: Vec<String> = papers
        .iter()
        .map(|p| {
            p.bibtex_key.clone().unwrap_or_else(|| {
                let first_author = p.authors.first().map(|a| a.name.as_str());
                generate_key(first_author, p.year, &p.title)
            })
        })
        .collect();
    let deduped = dedupe_keys(keys);
    papers
        .iter()
        .zip(deduped.iter())
        .map(|(paper, key)| assemble_entry(paper, key))
        .collect()
}

fn assemble_entry(paper: &Paper, key: &str) -> String {
    let entry_type = infer_entry_type(
        paper.venue.as_deref(),
        paper.arxiv_id.as_deref(),
        paper.volume.as_deref(),
        paper.pages.as_deref(),
    );

    let mut fields: Vec<(&str, String)> = Vec::new();

    if !paper.authors.is_empty() {
        let names: Vec<String> = paper.authors.iter().map(|a| a.name.clone()).collect();
        fields.push(("author", escape_latex(&format_author_list(&names))));
    }
    fields.push(("title", escape_latex(&paper.title)));
    if let Some(venue) = &paper.venue {
        let field_name = if entry_type == EntryType::Inproceedings {
            "booktitle"
        } else {
            "journal"
        };
        fields.push((field_name, escape_latex(venue)));
    }
    if let Some(year) = paper.year {
        fields.push(("year", year.to_string()));
    }
    if let Some(volume) = &paper.volume {
        fields.push(("volume", escape_latex(volume)));
    }
    if let Some(issue) = &paper.issue {
        fields.push(("number", escape_latex(issue)));
    }
    if let Some(pages) = &paper.pages {
        fields.push(("pages", normalize_pages(pages)));
    }
    if let Some(doi) = &paper.doi {
        fields.push(("doi", doi.clone()));
    }
    if let Some(arxiv_id) = &paper.arxiv_id {
        fields.push(("eprint", arxiv_id.clone()));
        fields.push(("archiveprefix", "arXiv".to_string()));
    }
    if let Some(url) = &paper.url {
        fields.push(("url", url.clone()));
    }
    if let Some(abstract_text) = &paper.abstract_text {
        fields.push(("abstract", escape_latex(&truncate_abstract(abstract_text))));
    }

    let mut out = format!("@{}{{{},\n", entry_type.as_str(), key);
    for (i, (name, value)) in fields.iter().enumerate() {
        let trailing_comma = if i + 1 == fields.len() { "" } else { "," };
        out.push_str(&format!("  {name} = {{{value}}}{trailing_comma}\n"));
    }
    out.push('}');
    out
}

fn truncate_abstract(text: &str) -> String {
    if text.chars().count() <= ABSTRACT_MAX_LEN {
        return text.to_string();
    }
    let truncated: String = text.chars().take(ABSTRACT_TRUNCATE_AT).collect();
    format!("{truncated}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use academix_model::{Author, PaperSource};

    fn sample_paper() -> Paper {
        let mut p = Paper::new("W1", "Attention Is All You Need", PaperSource::Openalex);
        p.authors = vec![Author::new("Ashish Vaswani"), Author::new("Noam Shazeer")];
        p.year = Some(2017);
        p.venue = Some("NeurIPS".to_string());
        p.pages = Some("5998-6008".to_string());
        p
    }

    #[test]
    fn generates_entry_with_expected_key_and_type() {
        let entry = generate_bibtex(&sample_paper());
        assert!(entry.starts_with("@inproceedings{Vaswani2017Attention,"));
        assert!(entry.contains("author = {Vaswani, Ashish and Shazeer, Noam}"));
        assert!(entry.contains("booktitle = {NeurIPS}"));
        assert!(entry.contains("pages = {5998--6008}"));
        assert!(entry.ends_with('}'));
    }

    #[test]
    fn generation_is_deterministic() {
        let paper = sample_paper();
        assert_eq!(generate_bibtex(&paper), generate_bibtex(&paper));
    }

    #[test]
    fn trailing_comma_is_stripped_from_last_field() {
        let entry = generate_bibtex(&sample_paper());
        let last_line = entry.lines().rev().nth(1).unwrap();
        assert!(!last_line.trim_end().ends_with(','));
    }

    #[test]
    fn precomputed_bibtex_key_is_honored() {
        let mut p = sample_paper();
        p.bibtex_key = Some("custom2020key".to_string());
        let entry = generate_bibtex(&p);
        assert!(entry.starts_with("@inproceedings{custom2020key,"));
    }

    #[test]
    fn batch_deduplicates_colliding_keys() {
        let p1 = sample_paper();
        let mut p2 = sample_paper();
        p2.id = "W2".to_string();
        let entries = generate_bibtex_batch(&[p1, p2]);
        assert!(entries[0].starts_with("@inproceedings{Vaswani2017Attentiona,"));
        assert!(entries[1].starts_with("@inproceedings{Vaswani2017Attentionb,"));
    }

    #[test]
    fn abstract_truncated_past_1000_chars() {
        let mut p = sample_paper();
        p.abstract_text = Some("x".repeat(1100));
        let entry = generate_bibtex(&p);
        let abstract_line = entry.lines().find(|l| l.trim_start().starts_with("abstract")).unwrap();
        assert!(abstract_line.contains(&"x".repeat(997)));
        assert!(abstract_line.contains("..."));
        assert!(!abstract_line.contains(&"x".repeat(998)));
    }

    #[test]
    fn no_authors_omits_author_field() {
        let mut p = sample_paper();
        p.authors.clear();
        let entry = generate_bibtex(&p);
        assert!(!entry.contains("author ="));
    }

    #[test]
    fn arxiv_paper_uses_misc_with_eprint_fields() {
        let mut p = Paper::new("arxiv:2401.00001", "Some Preprint", PaperSource::Arxiv);
        p.arxiv_id = Some("2401.00001".to_string());
        p.year = Some(2024);
        let entry = generate_bibtex(&p);
        assert!(entry.starts_with("@misc{"));
        assert!(entry.contains("eprint = {2401.00001}"));
        assert!(entry.contains("archiveprefix = {arXiv}"));
    }
}
