//! Benchmark setup error type.
//!
//! Lets setup code propagate failures with `?` instead of panicking inside
//! the measured closures.

use coalesce_core::{CmpError, GraphError};

/// Errors that may occur while preparing a benchmark.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// A benchmark graph could not be built.
    #[error("graph construction failed: {0}")]
    Graph(#[from] GraphError),
    /// Computing the CMP of a benchmark graph failed.
    #[error("CMP computation failed: {0}")]
    Cmp(#[from] CmpError),
    /// A zero value was passed where a non-zero integer was required.
    #[error("expected a non-zero value for {context}")]
    ZeroValue {
        /// The parameter that was unexpectedly zero.
        context: &'static str,
    },
}
