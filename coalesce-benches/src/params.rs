//! Benchmark parameter types, rendered as Criterion benchmark ids.

use std::fmt;

/// Parameters of a lattice benchmark run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatticeBenchParams {
    /// Side of the square lattice.
    pub side: usize,
    /// Probability that a site has radius 1.
    pub probability: f64,
}

impl fmt::Display for LatticeBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "side={},p={}", self.side, self.probability)
    }
}

/// Parameters of a random-graph benchmark run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GraphBenchParams {
    /// Number of sites.
    pub sites: usize,
    /// Extra random edges per site.
    pub degree: usize,
}

impl fmt::Display for GraphBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},d={}", self.sites, self.degree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case(LatticeBenchParams { side: 128, probability: 0.5 }, "side=128,p=0.5")]
    #[case(LatticeBenchParams { side: 64, probability: 1.0 }, "side=64,p=1")]
    fn lattice_params_render_as_ids(#[case] params: LatticeBenchParams, #[case] expected: &str) {
        assert_eq!(params.to_string(), expected);
    }

    #[test]
    fn graph_params_render_as_ids() {
        let params = GraphBenchParams {
            sites: 1_000,
            degree: 2,
        };
        assert_eq!(params.to_string(), "n=1000,d=2");
    }
}
