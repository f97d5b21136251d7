//! CrossRef backend adapter.

mod client;
mod types;

pub use client::CrossrefClient;
