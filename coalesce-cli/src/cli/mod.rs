//! Command-line interface orchestration for the `coalesce` binary.
//!
//! The single `run` command builds a box or torus of Z² with Bernoulli radii,
//! computes the CMP from the corner site and reports its statistics.

mod commands;

pub use commands::{
    Cli, CliError, ClusterReport, Command, ExecutionSummary, PAINT_LAYERS, RunCommand, Topology,
    render_summary, run_cli,
};

#[cfg(test)]
mod test_helpers;
#[cfg(test)]
mod tests;
