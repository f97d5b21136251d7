//! Shared data model for academic paper metadata.
//!
//! Every backend adapter parses upstream JSON/XML into the types defined
//! here, so the aggregator and tool surface only ever see one vocabulary
//! regardless of which API answered a given request.

pub mod adapter;
pub mod caches;
pub mod error;
pub mod paper;
pub mod validate;

pub use adapter::Adapter;
pub use caches::{new_shared_caches, AppCaches, SharedCaches};
pub use error::AdapterError;
pub use paper::{
    Author, CitationNetwork, CitationNetworkEdge, CitationNetworkNode, CitationResult, Paper,
    PaperSource, RelatedPapersResult, ResponseFormat, SearchResult,
};
