//! arXiv backend adapter.
//!
//! The only adapter with a mandatory politeness delay between requests;
//! that delay is an `await`ed `tokio::time::sleep`, so it suspends only
//! the in-flight request rather than blocking the runtime.

mod client;
mod types;

pub use client::ArxivClient;
