//! Pulls a handful of fields back out of DBLP's native `.bib` text.
//!
//! DBLP returns a single, already-valid BibTeX entry for `get_bibtex`; for
//! `get_paper` we additionally need a normalized [`academix_model::Paper`],
//! so we parse just enough of the entry's field list to populate one.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

static FIELD_RE: OnceLock<Regex> = OnceLock::new();

fn field_re() -> &'static Regex {
    FIELD_RE.get_or_init(|| Regex::new(r#"(?m)^\s*(\w+)\s*=\s*\{(.*?)\},?\s*$"#).expect("valid regex"))
}

/// Extracts `field = {value}` pairs, lowercasing field names. Multi-line
/// braced values are not supported — DBLP's native export keeps each
/// field on one line.
pub fn parse_fields(raw: &str) -> HashMap<String, String> {
    field_re()
        .captures_iter(raw)
        .map(|c| (c[1].to_lowercase(), c[2].to_string()))
        .collect()
}

/// The entry type is the word between `@` and the first `{`.
pub fn entry_type(raw: &str) -> Option<String> {
    let at = raw.find('@')?;
    let brace = raw[at..].find('{')?;
    Some(raw[at + 1..at + brace].trim().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"@inproceedings{DBLP:conf/a/b,
  author    = {Jane Doe and John Roe},
  title     = {A Great Paper},
  booktitle = {Proc. XYZ},
  year      = {2020},
  pages     = {1--10},
  doi       = {10.1/xyz},
  url       = {https://doi.org/10.1/xyz},
  timestamp = {Mon, 01 Jan 2024 00:00:00 +0100},
}"#;

    #[test]
    fn parses_known_fields() {
        let fields = parse_fields(SAMPLE);
        assert_eq!(fields.get("title").unwrap(), "A Great Paper");
        assert_eq!(fields.get("year").unwrap(), "2020");
        assert_eq!(fields.get("doi").unwrap(), "10.1/xyz");
    }

    #[test]
    fn entry_type_reads_the_at_tag() {
        assert_eq!(entry_type(SAMPLE), Some("inproceedings".to_string()));
    }
}
