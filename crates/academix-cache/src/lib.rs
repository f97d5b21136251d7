//! In-memory, per-process TTL+LRU cache for adapter responses.
//!
//! Explicitly not persisted and not shared across processes — a fresh
//! cache starts empty on every restart, and two server instances never
//! see each other's entries.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use md5::{Digest, Md5};

struct Entry<V> {
    value: V,
    inserted_at: Instant,
}

struct Inner<V> {
    map: IndexMap<String, Entry<V>>,
    hits: u64,
    misses: u64,
}

/// A bounded, TTL-expiring cache keyed by opaque string keys (see
/// [`make_key`] for how those keys are derived).
pub struct Cache<V: Clone> {
    inner: Mutex<Inner<V>>,
    maxsize: usize,
    ttl: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheStats {
    pub size: usize,
    pub maxsize: usize,
    pub ttl_secs: u64,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

impl CacheStats {
    /// One-decimal percentage, matching `f"{hit_rate:.1%}"`.
    pub fn hit_rate_percent(&self) -> String {
        format!("{:.1}%", self.hit_rate * 100.0)
    }
}

impl<V: Clone> Cache<V> {
    pub fn new(maxsize: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner {
                map: IndexMap::new(),
                hits: 0,
                misses: 0,
            }),
            maxsize,
            ttl,
        }
    }

    fn expired(&self, entry: &Entry<V>) -> bool {
        entry.inserted_at.elapsed() > self.ttl
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let mut inner = self.inner.lock().expect("cache mutex poisoned");
        match inner.map.shift_remove(key) {
            Some(entry) if !self.expired(&entry) => {
                inner.hits += 1;
                let value = entry.value.clone();
                inner.map.insert(key.to_string(), entry);
                Some(value)
            }
            Some(_expired) => {
                inner.misses += 1;
                None
            }
            None => {
                inner.misses += 1;
                None
            }
        }
    }

    pub fn set(&self, key: &str, value: V) {
        let mut inner = self.inner.lock().expect("cache mutex poisoned");
        inner.map.shift_remove(key);
        inner.map.insert(
            key.to_string(),
            Entry {
                value,
                inserted_at: Instant::now(),
            },
        );
        Self::evict_if_needed(&mut inner, self.maxsize);
    }

    fn evict_if_needed(inner: &mut Inner<V>, maxsize: usize) {
        while inner.map.len() > maxsize {
            inner.map.shift_remove_index(0);
        }
    }

    pub fn get_or_set(&self, key: &str, factory: impl FnOnce() -> V) -> V {
        if let Some(value) = self.get(key) {
            return value;
        }
        let value = factory();
        self.set(key, value.clone());
        value
    }

    pub fn invalidate(&self, key: &str) -> bool {
        let mut inner = self.inner.lock().expect("cache mutex poisoned");
        inner.map.shift_remove(key).is_some()
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock().expect("cache mutex poisoned");
        inner.map.clear();
        inner.hits = 0;
        inner.misses = 0;
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock().expect("cache mutex poisoned");
        let total = inner.hits + inner.misses;
        let hit_rate = if total > 0 {
            inner.hits as f64 / total as f64
        } else {
            0.0
        };
        CacheStats {
            size: inner.map.len(),
            maxsize: self.maxsize,
            ttl_secs: self.ttl.as_secs(),
            hits: inner.hits,
            misses: inner.misses,
            hit_rate,
        }
    }
}

/// Builds a stable cache key: `prefix`, then positional args, then
/// lexicographically-sorted `k=v` pairs, `|`-joined and hashed to a
/// 128-bit hex digest.
pub fn make_key(prefix: &str, args: &[&str], kwargs: &[(&str, String)]) -> String {
    let mut parts = vec![prefix.to_string()];
    parts.extend(args.iter().map(|a| a.to_string()));
    let mut sorted_kwargs: Vec<&(&str, String)> = kwargs.iter().collect();
    sorted_kwargs.sort_by_key(|(k, _)| *k);
    parts.extend(sorted_kwargs.iter().map(|(k, v)| format!("{k}={v}")));
    let joined = parts.join("|");

    let mut hasher = Md5::new();
    hasher.update(joined.as_bytes());
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Three independently-sized, independently-TTL'd caches, one per
/// response shape, mirroring how search results, paper lookups, and
/// synthesized BibTeX entries have very different churn/reuse patterns.
pub struct AppCaches<Search: Clone, Paper: Clone> {
    pub search: Cache<Search>,
    pub paper: Cache<Paper>,
    pub bibtex: Cache<String>,
}

impl<Search: Clone, Paper: Clone> Default for AppCaches<Search, Paper> {
    fn default() -> Self {
        Self {
            search: Cache::new(500, Duration::from_secs(600)),
            paper: Cache::new(2000, Duration::from_secs(3600)),
            bibtex: Cache::new(1000, Duration::from_secs(86_400)),
        }
    }
}

impl<Search: Clone, Paper: Clone> AppCaches<Search, Paper> {
    pub fn search_key(
        source: &str,
        query: &str,
        limit: u32,
        offset: u32,
        kwargs: &[(&str, String)],
    ) -> String {
        let normalized_query = query.to_lowercase();
        let normalized_query = normalized_query.trim();
        let mut all_kwargs = vec![
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
        ];
        all_kwargs.extend(kwargs.iter().cloned());
        make_key(
            &format!("search:{source}"),
            &[normalized_query],
            &all_kwargs,
        )
    }

    pub fn paper_key(source: &str, paper_id: &str) -> String {
        make_key(&format!("paper:{source}"), &[paper_id], &[])
    }

    pub fn bibtex_key(paper_id: &str) -> String {
        make_key("bibtex", &[paper_id], &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_deterministic() {
        let a = make_key("search:openalex", &["rust"], &[("limit", "10".into())]);
        let b = make_key("search:openalex", &["rust"], &[("limit", "10".into())]);
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn key_differs_by_prefix_and_args() {
        let a = make_key("search:openalex", &["rust"], &[]);
        let b = make_key("search:dblp", &["rust"], &[]);
        let c = make_key("search:openalex", &["python"], &[]);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn key_kwargs_order_independent() {
        let a = make_key(
            "p",
            &[],
            &[("a", "1".into()), ("b", "2".into())],
        );
        let b = make_key(
            "p",
            &[],
            &[("b", "2".into()), ("a", "1".into())],
        );
        assert_eq!(a, b);
    }

    #[test]
    fn set_get_roundtrip() {
        let cache: Cache<String> = Cache::new(10, Duration::from_secs(60));
        cache.set("k", "v".to_string());
        assert_eq!(cache.get("k"), Some("v".to_string()));
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 0);
    }

    #[test]
    fn missing_key_returns_none_and_counts_miss() {
        let cache: Cache<String> = Cache::new(10, Duration::from_secs(60));
        assert_eq!(cache.get("missing"), None);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn expired_entry_returns_none() {
        let cache: Cache<String> = Cache::new(10, Duration::from_millis(1));
        cache.set("k", "v".to_string());
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn eviction_respects_maxsize() {
        let cache: Cache<u32> = Cache::new(2, Duration::from_secs(60));
        cache.set("a", 1);
        cache.set("b", 2);
        cache.set("c", 3);
        assert_eq!(cache.stats().size, 2);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("c"), Some(3));
    }

    #[test]
    fn hit_rate_is_one_decimal_percentage() {
        let cache: Cache<u32> = Cache::new(10, Duration::from_secs(60));
        cache.set("a", 1);
        cache.get("a");
        cache.get("missing");
        cache.get("missing2");
        let stats = cache.stats();
        assert_eq!(stats.hit_rate_percent(), "33.3%");
    }

    #[test]
    fn clear_resets_counters_and_entries() {
        let cache: Cache<u32> = Cache::new(10, Duration::from_secs(60));
        cache.set("a", 1);
        cache.get("a");
        cache.clear();
        let stats = cache.stats();
        assert_eq!(stats.size, 0);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
    }
}
