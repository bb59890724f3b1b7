//! Shared test utilities used across coalesce crates.

pub mod profile;
pub mod tracing;
