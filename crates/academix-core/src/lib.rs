//! Cross-backend aggregation core (spec.md §4.5): source detection,
//! search/paper-lookup fallback chains, BibTeX single/batch dispatch,
//! citations, and one-hop citation-network assembly.
//!
//! Everything here is a thin, stateless-beyond-cache orchestration layer
//! over the five `academix-*` adapter crates — the tool façades
//! (`academix-cli`, `academix-mcp`) are the only callers.

mod aggregator;
mod detect;

pub use aggregator::{Aggregator, CacheStatsSnapshot, Direction};
pub use detect::detect_source;
