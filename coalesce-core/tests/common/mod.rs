//! Graph builders and strategies shared by the integration suites.

#![allow(dead_code, reason = "each suite uses a different subset of helpers")]

use coalesce_core::AdjacencyGraph;
use coalesce_test_support::profile::ProptestRunProfile;
use proptest::{
    collection::vec, sample::select, strategy::Strategy, test_runner::Config as ProptestConfig,
};

const RADII: [f64; 7] = [0.0, 0.5, 1.0, 1.0, 1.5, 2.0, 3.0];

/// Proptest configuration honouring the shared run profile.
#[must_use]
pub fn suite_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false, 40);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Upper bound on generated graph sizes.
#[must_use]
pub fn max_sites() -> usize {
    ProptestRunProfile::load(1, false, 40).max_sites()
}

/// Path `0 - 1 - ... - n-1`.
#[must_use]
pub fn path(radii: &[f64]) -> AdjacencyGraph {
    let mut graph = AdjacencyGraph::new(radii.to_vec()).expect("radii are valid");
    for site in 1..radii.len() {
        graph.add_edge(site - 1, site).expect("endpoints exist");
    }
    graph
}

/// Star with centre `0` and `leaves` leaves, every site of the given radius.
#[must_use]
pub fn star(leaves: usize, radius: f64) -> AdjacencyGraph {
    let mut graph = AdjacencyGraph::uniform(leaves + 1, radius).expect("radius is valid");
    for leaf in 1..=leaves {
        graph.add_edge(0, leaf).expect("endpoints exist");
    }
    graph
}

/// Random graphs whose radii come from a palette mixing sub-unit, unit and
/// heavy sites. Roughly half of the generated graphs are connected through a
/// spanning path so the root component is large.
pub fn graph_strategy(max_sites: usize) -> impl Strategy<Value = AdjacencyGraph> {
    (1..=max_sites.max(1))
        .prop_flat_map(|len| {
            (
                vec(select(&RADII[..]), len),
                vec((0..len, 0..len), 0..=len * 2),
                proptest::bool::ANY,
            )
        })
        .prop_map(|(radii, edges, spanning)| {
            let mut graph = if spanning {
                path(&radii)
            } else {
                AdjacencyGraph::new(radii).expect("palette radii are valid")
            };
            for (left, right) in edges {
                graph.add_edge(left, right).expect("endpoints exist");
            }
            graph
        })
}
