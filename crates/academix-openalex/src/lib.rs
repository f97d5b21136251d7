//! OpenAlex backend adapter.
//!
//! Talks to `api.openalex.org`'s polite pool, normalizes `Work` JSON into
//! [`academix_model::Paper`], and exposes the citation-network traversal
//! helper `academix-core` needs for `direction=cited` edges.

mod client;
mod types;

pub use client::OpenAlexClient;
