//! Shared test utilities for `coalesce-core`.

use coalesce_test_support::profile::ProptestRunProfile;
use proptest::{
    collection::vec,
    sample::select,
    strategy::Strategy,
    test_runner::Config as ProptestConfig,
};

use crate::AdjacencyGraph;

/// Builds a proptest configuration from the shared run profile.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false, 32);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Path `0 - 1 - ... - (radii.len() - 1)` with the given radii.
pub(crate) fn path(radii: &[f64]) -> AdjacencyGraph {
    let mut graph = AdjacencyGraph::new(radii.to_vec()).expect("radii are valid");
    for site in 1..radii.len() {
        graph.add_edge(site - 1, site).expect("endpoints exist");
    }
    graph
}

const RADII: [f64; 6] = [0.0, 0.5, 1.0, 1.5, 2.0, 3.0];

/// Graphs of `1..=max_sites` sites with radii drawn from a small palette and
/// up to two random edges per site, self-loops included.
pub(crate) fn graph_strategy(max_sites: usize) -> impl Strategy<Value = AdjacencyGraph> {
    (1..=max_sites)
        .prop_flat_map(|len| {
            (
                vec(select(&RADII[..]), len),
                vec((0..len, 0..len), 0..=len * 2),
            )
        })
        .prop_map(|(radii, edges)| {
            let mut graph = AdjacencyGraph::new(radii).expect("palette radii are valid");
            for (left, right) in edges {
                graph.add_edge(left, right).expect("endpoints exist");
            }
            graph
        })
}
