// tests/mod.rs
//! Test suite organization for notion2insight
//!
//! `common` holds the in-memory transport and config helpers; `integration`
//! drives the public API and the HTTP router end to end.

#[cfg(test)]
pub mod common;

#[cfg(test)]
pub mod integration;
