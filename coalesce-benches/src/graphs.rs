//! Seeded generators for benchmark graphs.

use coalesce_core::AdjacencyGraph;
use rand::{Rng, SeedableRng, rngs::SmallRng, seq::SliceRandom};

use crate::error::BenchSetupError;

/// Radii drawn by [`random_graph`].
pub const RADII: [f64; 5] = [0.0, 0.5, 1.0, 1.5, 2.0];

/// Shape of a graph produced by [`random_graph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RandomGraphConfig {
    /// Number of sites.
    pub sites: usize,
    /// Extra random edges per site.
    pub degree: usize,
    /// Seed of the generator.
    pub seed: u64,
}

/// Builds a connected sparse graph: a spanning path plus `degree` random
/// edges per site, with radii drawn uniformly from [`RADII`].
///
/// # Errors
/// Returns [`BenchSetupError::ZeroValue`] when `config.sites` is zero.
///
/// # Examples
/// ```
/// use coalesce_benches::graphs::{RandomGraphConfig, random_graph};
///
/// let graph = random_graph(&RandomGraphConfig { sites: 10, degree: 2, seed: 1 })?;
/// assert_eq!(graph.len(), 10);
/// # Ok::<(), coalesce_benches::error::BenchSetupError>(())
/// ```
pub fn random_graph(config: &RandomGraphConfig) -> Result<AdjacencyGraph, BenchSetupError> {
    let RandomGraphConfig {
        sites,
        degree,
        seed,
    } = *config;
    if sites == 0 {
        return Err(BenchSetupError::ZeroValue { context: "sites" });
    }
    let mut rng = SmallRng::seed_from_u64(seed);
    let radii = (0..sites)
        .map(|_| RADII.choose(&mut rng).copied().unwrap_or_default())
        .collect();
    let mut graph = AdjacencyGraph::new(radii)?;
    for site in 1..sites {
        graph.add_edge(site - 1, site)?;
    }
    for site in 0..sites {
        for _ in 0..degree {
            let other = rng.gen_range(0..sites);
            graph.add_edge(site, other)?;
        }
    }
    Ok(graph)
}
