//! The application-wide cache handle every adapter shares.
//!
//! `academix-core` constructs exactly one [`AppCaches`] at startup and
//! hands an `Arc` clone to each backend adapter's constructor; nothing
//! reaches around it via a lazily-initialized global.

use std::sync::Arc;

use crate::paper::{Paper, SearchResult};

/// Three TTL caches (search/paper/bibtex), shared by every adapter and the
/// aggregator's cross-source BibTeX cache.
pub type AppCaches = academix_cache::AppCaches<SearchResult, Paper>;

/// Convenience alias for the `Arc` handle passed into adapter constructors.
pub type SharedCaches = Arc<AppCaches>;

/// Builds a fresh, empty set of caches with the default sizes and TTLs.
pub fn new_shared_caches() -> SharedCaches {
    Arc::new(AppCaches::default())
}
