//! Raw DBLP JSON shapes.
//!
//! DBLP's `/search/publ/api` is loosely typed in a few places the spec
//! calls out explicitly: a single hit arrives as a bare object instead of
//! a one-element array, and `authors.author` may be a string, an object,
//! or an array of either. We deserialize those spots into [`serde_json::Value`]
//! and normalize by hand rather than fight serde's untagged-enum ambiguity.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct SearchEnvelope {
    pub result: SearchResultBody,
}

#[derive(Debug, Deserialize)]
pub struct SearchResultBody {
    pub hits: Hits,
}

#[derive(Debug, Deserialize, Default)]
pub struct Hits {
    #[serde(rename = "@total")]
    pub total: Option<String>,
    #[serde(default)]
    pub hit: Option<Value>,
}

/// Lifts `hits.hit` into a uniform `Vec<Value>`, handling the single-hit
/// dict-vs-list ambiguity DBLP's JSON API exposes.
pub fn hit_list(hits: &Hits) -> Vec<Value> {
    match &hits.hit {
        None => Vec::new(),
        Some(Value::Array(items)) => items.clone(),
        Some(single @ Value::Object(_)) => vec![single.clone()],
        Some(_) => Vec::new(),
    }
}

/// Normalizes `info.authors.author`, which may be a bare string, a single
/// `{"text": "..."}` object, or an array of either, into an ordered list
/// of display names.
pub fn author_names(info: &Value) -> Vec<String> {
    let Some(authors) = info.get("authors").and_then(|a| a.get("author")) else {
        return Vec::new();
    };
    match authors {
        Value::String(s) => vec![s.clone()],
        Value::Object(_) => author_name_from_value(authors).into_iter().collect(),
        Value::Array(items) => items.iter().filter_map(author_name_from_value).collect(),
        _ => Vec::new(),
    }
}

fn author_name_from_value(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map
            .get("text")
            .and_then(|t| t.as_str())
            .map(|s| s.to_string()),
        _ => None,
    }
}

/// Strips the `https://dblp.org/rec/` prefix and `.html` suffix DBLP
/// sometimes wraps its publication key in.
pub fn normalize_dblp_key(raw: &str) -> String {
    let stripped = raw
        .strip_prefix("https://dblp.org/rec/")
        .unwrap_or(raw);
    stripped.strip_suffix(".html").unwrap_or(stripped).to_string()
}

/// Extracts the DBLP publication key from a hit's `info.key` (falling back
/// to `@id`), normalizing either form.
pub fn extract_key(hit: &Value) -> Option<String> {
    let from_info = hit
        .get("info")
        .and_then(|i| i.get("key"))
        .and_then(|k| k.as_str());
    let from_id = hit.get("@id").and_then(|k| k.as_str());
    from_info
        .or(from_id)
        .map(normalize_dblp_key)
}

/// A `doi` field not shaped like `10.…` is discarded.
pub fn valid_doi(info: &Value) -> Option<String> {
    info.get("doi")
        .and_then(|d| d.as_str())
        .filter(|d| d.starts_with("10."))
        .map(|d| d.to_string())
}

pub fn str_field<'a>(info: &'a Value, key: &str) -> Option<&'a str> {
    info.get(key).and_then(|v| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_list_lifts_single_dict() {
        let hits = Hits {
            total: Some("1".to_string()),
            hit: Some(serde_json::json!({"@id": "1"})),
        };
        assert_eq!(hit_list(&hits).len(), 1);
    }

    #[test]
    fn hit_list_passes_through_array() {
        let hits = Hits {
            total: Some("2".to_string()),
            hit: Some(serde_json::json!([{"@id": "1"}, {"@id": "2"}])),
        };
        assert_eq!(hit_list(&hits).len(), 2);
    }

    #[test]
    fn hit_list_empty_when_absent() {
        let hits = Hits::default();
        assert!(hit_list(&hits).is_empty());
    }

    #[test]
    fn author_names_handles_all_three_shapes() {
        let string_shape = serde_json::json!({"authors": {"author": "Jane Doe"}});
        assert_eq!(author_names(&string_shape), vec!["Jane Doe".to_string()]);

        let dict_shape = serde_json::json!({"authors": {"author": {"text": "Jane Doe"}}});
        assert_eq!(author_names(&dict_shape), vec!["Jane Doe".to_string()]);

        let list_shape = serde_json::json!({
            "authors": {"author": ["Jane Doe", {"text": "John Roe"}]}
        });
        assert_eq!(
            author_names(&list_shape),
            vec!["Jane Doe".to_string(), "John Roe".to_string()]
        );
    }

    #[test]
    fn normalize_dblp_key_strips_rec_url() {
        assert_eq!(
            normalize_dblp_key("https://dblp.org/rec/conf/a/b.html"),
            "conf/a/b"
        );
        assert_eq!(normalize_dblp_key("conf/a/b"), "conf/a/b");
    }

    #[test]
    fn valid_doi_rejects_non_10_prefix() {
        let info = serde_json::json!({"doi": "not-a-doi"});
        assert_eq!(valid_doi(&info), None);
        let info = serde_json::json!({"doi": "10.1/x"});
        assert_eq!(valid_doi(&info), Some("10.1/x".to_string()));
    }
}
