//! DBLP backend adapter.
//!
//! DBLP's headline feature is that it hands back a ready-to-use BibTeX
//! entry for any publication key, so `academix-core`'s BibTeX synthesis
//! path tries this adapter before falling back to `academix-bibtex`.

mod bibfields;
mod client;
mod types;

pub use client::DblpClient;
