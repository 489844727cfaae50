// tests/integration/mod.rs
//! Integration tests for notion2insight
//!
//! These exercise several components together: request screening, the
//! write-guarded gateway, the bounded fetcher, normalization and the
//! axum router.

#[cfg(test)]
mod analyze_endpoint;

#[cfg(test)]
mod snapshot_pipeline;

#[cfg(test)]
mod write_guard;
