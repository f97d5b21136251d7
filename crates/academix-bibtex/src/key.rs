//! BibTeX key generation and author-name formatting (spec.md §4.2).

use std::collections::HashMap;

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

const STOP_WORDS: &[&str] = &["a", "an", "the", "on", "in", "of", "for", "to", "and", "with"];

static WORD_SPLIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]+").unwrap());

/// Strips diacritics via NFKD decomposition, keeping only alphanumerics.
fn strip_to_alphanumeric(input: &str) -> String {
    input
        .nfkd()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Extracts the surname from `"Last, First"` or `"First Last"` (the
/// comma-left half, or the final whitespace-separated token).
fn surname(name: &str) -> Option<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some((last, _first)) = trimmed.split_once(',') {
        return Some(last.trim());
    }
    trimmed.rsplit(' ').next()
}

fn capitalized_last_name(author: Option<&str>) -> String {
    let raw = author.and_then(surname).unwrap_or("Unknown");
    let cleaned = strip_to_alphanumeric(raw);
    if cleaned.is_empty() {
        return "Unknown".to_string();
    }
    let mut chars = cleaned.chars();
    match chars.next() {
        Some(first) => {
            let mut out = first.to_uppercase().collect::<String>();
            out.extend(chars);
            out
        }
        None => "Unknown".to_string(),
    }
}

/// First word of the title, lowercased, that survives stop-word filtering
/// and diacritic stripping — or `None` if nothing qualifies.
fn first_significant_title_word(title: &str) -> Option<String> {
    WORD_SPLIT
        .split(title)
        .map(|w| strip_to_alphanumeric(w))
        .find(|w| !w.is_empty() && !STOP_WORDS.contains(&w.to_lowercase().as_str()))
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => {
                    let mut out = first.to_uppercase().collect::<String>();
                    out.extend(chars);
                    out
                }
                None => w,
            }
        })
}

/// Generates a BibTeX key: `CapitalizedLastName + Year + FirstSignificantTitleWord`,
/// omitting the year if absent and stopping after the year if no title word
/// qualifies.
pub fn generate_key(first_author: Option<&str>, year: Option<i32>, title: &str) -> String {
    let mut key = capitalized_last_name(first_author);
    if let Some(y) = year {
        key.push_str(&y.to_string());
    }
    if let Some(word) = first_significant_title_word(title) {
        key.push_str(&word);
    }
    key
}

/// Appends `a, b, c, …` suffixes to deduplicate a batch of generated keys,
/// preserving input order.
pub fn dedupe_keys(keys: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, u32> = HashMap::new();
    let mut total: HashMap<String, u32> = HashMap::new();
    for k in &keys {
        *total.entry(k.clone()).or_insert(0) += 1;
    }
    keys.into_iter()
        .map(|k| {
            if total.get(&k).copied().unwrap_or(0) <= 1 {
                return k;
            }
            let count = seen.entry(k.clone()).or_insert(0);
            let suffix = suffix_for_index(*count);
            *count += 1;
            format!("{k}{suffix}")
        })
        .collect()
}

fn suffix_for_index(index: u32) -> char {
    (b'a' + (index.min(25) as u8)) as char
}

/// Rewrites `"First Last"` as `"Last, First"`. Names that already contain a
/// comma are preserved as-is.
pub fn format_author_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.contains(',') {
        return trimmed.to_string();
    }
    match trimmed.rsplit_once(' ') {
        Some((first, last)) => format!("{last}, {first}"),
        None => trimmed.to_string(),
    }
}

/// Joins formatted author names with the literal `" and "` BibTeX expects.
pub fn format_author_list(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format_author_name(n))
        .collect::<Vec<_>>()
        .join(" and ")
}
