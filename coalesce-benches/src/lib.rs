//! Benchmark support crate for the coalescing mass process.
//!
//! Provides seeded graph generators and the parameter types used to label
//! the Criterion benchmarks of CMP construction and painting.

pub mod error;
pub mod graphs;
pub mod params;
