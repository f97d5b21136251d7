//! MCP tool façade (spec.md §6): translates the nine named tool
//! operations into calls on one shared `academix_core::Aggregator` and
//! renders replies as markdown or JSON per `response_format`.
//!
//! Everything here is presentation — the hard engineering lives in
//! `academix-core` and its adapter crates; this crate only validates
//! input, dispatches, and formats the reply.

pub mod format;
pub mod params;
pub mod server;

pub use server::AcademixMcp;
