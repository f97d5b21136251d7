//! Semantic Scholar backend adapter.
//!
//! The only backend with a recommendations endpoint, so it's also the
//! sole source for `academix-core`'s "related papers" operation.

mod client;
mod types;

pub use client::SemanticScholarClient;
