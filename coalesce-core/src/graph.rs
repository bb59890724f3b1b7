//! The capability contract an embedding graph must satisfy, plus a plain
//! adjacency-list implementation.

use std::{fmt, hash::Hash};

use crate::error::GraphError;

/// A graph whose sites expose their neighbours and an activation radius.
///
/// Sites are addressed by a cheap, copyable handle. The topology and the radii
/// must stay fixed while a [`crate::Cmp`] is being computed; the engine reads
/// each site's adjacency exactly once during discovery.
///
/// # Examples
/// ```
/// use coalesce_core::WeightedGraph;
///
/// /// Three sites on a line: 0 - 1 - 2.
/// struct Line;
///
/// impl WeightedGraph for Line {
///     type Site = usize;
///
///     fn neighbour_count(&self, site: usize) -> usize {
///         if site == 1 { 2 } else { 1 }
///     }
///
///     fn neighbour(&self, site: usize, index: usize) -> usize {
///         match (site, index) {
///             (1, 0) => 0,
///             (1, _) => 2,
///             _ => 1,
///         }
///     }
///
///     fn radius(&self, _site: usize) -> f64 {
///         2.0
///     }
/// }
///
/// assert_eq!(Line.neighbour(0, 0), 1);
/// ```
pub trait WeightedGraph {
    /// Handle identifying a site.
    type Site: Copy + Eq + Hash + fmt::Debug;

    /// Number of neighbours of `site`.
    fn neighbour_count(&self, site: Self::Site) -> usize;

    /// The `index`-th neighbour of `site`, for `index < neighbour_count(site)`.
    ///
    /// Out-of-range indices are a contract violation; the engine never asks for
    /// them.
    fn neighbour(&self, site: Self::Site, index: usize) -> Self::Site;

    /// Activation radius of `site`.
    ///
    /// Must be finite and non-negative. A radius below `1.0` marks a site that
    /// can never drive a merge.
    fn radius(&self, site: Self::Site) -> f64;
}

impl<G: WeightedGraph + ?Sized> WeightedGraph for &G {
    type Site = G::Site;

    fn neighbour_count(&self, site: Self::Site) -> usize {
        (**self).neighbour_count(site)
    }

    fn neighbour(&self, site: Self::Site, index: usize) -> Self::Site {
        (**self).neighbour(site, index)
    }

    fn radius(&self, site: Self::Site) -> f64 {
        (**self).radius(site)
    }
}

/// An undirected graph stored as adjacency lists over sites `0..len`.
///
/// Neighbours are reported in edge insertion order.
///
/// # Examples
/// ```
/// use coalesce_core::{AdjacencyGraph, WeightedGraph};
///
/// let graph = AdjacencyGraph::new(vec![2.0, 2.0, 2.0])?
///     .with_edge(0, 1)?
///     .with_edge(1, 2)?;
/// assert_eq!(graph.neighbour_count(1), 2);
/// assert_eq!(graph.neighbour(1, 1), 2);
/// # Ok::<(), coalesce_core::GraphError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AdjacencyGraph {
    radii: Vec<f64>,
    adjacency: Vec<Vec<usize>>,
}

impl AdjacencyGraph {
    /// Creates an edgeless graph with one site per radius.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidRadius`] when a radius is negative or not
    /// finite.
    pub fn new(radii: Vec<f64>) -> Result<Self, GraphError> {
        validate_radii(&radii)?;
        let adjacency = vec![Vec::new(); radii.len()];
        Ok(Self { radii, adjacency })
    }

    /// Creates a graph where every site shares the same radius.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidRadius`] when `radius` is negative or not
    /// finite.
    pub fn uniform(len: usize, radius: f64) -> Result<Self, GraphError> {
        Self::new(vec![radius; len])
    }

    /// Adds the undirected edge `left - right` and returns the graph.
    ///
    /// # Errors
    /// Returns [`GraphError::SiteOutOfBounds`] when either endpoint is not a
    /// site of the graph.
    pub fn with_edge(mut self, left: usize, right: usize) -> Result<Self, GraphError> {
        self.add_edge(left, right)?;
        Ok(self)
    }

    /// Adds the undirected edge `left - right`.
    ///
    /// A self-loop is stored once.
    ///
    /// # Errors
    /// Returns [`GraphError::SiteOutOfBounds`] when either endpoint is not a
    /// site of the graph.
    pub fn add_edge(&mut self, left: usize, right: usize) -> Result<(), GraphError> {
        let site_count = self.len();
        for site in [left, right] {
            if site >= site_count {
                return Err(GraphError::SiteOutOfBounds { site, site_count });
            }
        }
        self.adjacency[left].push(right);
        if left != right {
            self.adjacency[right].push(left);
        }
        Ok(())
    }

    /// Number of sites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.radii.len()
    }

    /// Whether the graph has no sites.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.radii.is_empty()
    }
}

impl WeightedGraph for AdjacencyGraph {
    type Site = usize;

    fn neighbour_count(&self, site: usize) -> usize {
        self.adjacency[site].len()
    }

    fn neighbour(&self, site: usize, index: usize) -> usize {
        self.adjacency[site][index]
    }

    fn radius(&self, site: usize) -> f64 {
        self.radii[site]
    }
}

pub(crate) fn validate_radii(radii: &[f64]) -> Result<(), GraphError> {
    match radii
        .iter()
        .enumerate()
        .find(|&(_, radius)| !is_valid_radius(*radius))
    {
        Some((site, &radius)) => Err(GraphError::InvalidRadius { site, radius }),
        None => Ok(()),
    }
}

pub(crate) fn is_valid_radius(radius: f64) -> bool {
    radius.is_finite() && radius >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn new_rejects_invalid_radii(#[case] radius: f64) {
        let err = AdjacencyGraph::new(vec![1.0, radius]).expect_err("radius must be rejected");
        assert!(matches!(err, GraphError::InvalidRadius { site: 1, .. }));
    }

    #[test]
    fn add_edge_rejects_unknown_endpoints() {
        let mut graph = AdjacencyGraph::uniform(2, 1.0).expect("radii are valid");
        let err = graph.add_edge(0, 2).expect_err("site 2 does not exist");
        assert_eq!(
            err,
            GraphError::SiteOutOfBounds {
                site: 2,
                site_count: 2
            }
        );
    }

    #[test]
    fn edges_are_symmetric_and_ordered() {
        let graph = AdjacencyGraph::uniform(3, 1.0)
            .and_then(|graph| graph.with_edge(0, 2))
            .and_then(|graph| graph.with_edge(0, 1))
            .expect("graph must build");
        assert_eq!(graph.neighbour_count(0), 2);
        assert_eq!(graph.neighbour(0, 0), 2);
        assert_eq!(graph.neighbour(0, 1), 1);
        assert_eq!(graph.neighbour(2, 0), 0);
    }

    #[test]
    fn self_loops_are_stored_once() {
        let graph = AdjacencyGraph::uniform(1, 1.0)
            .and_then(|graph| graph.with_edge(0, 0))
            .expect("graph must build");
        assert_eq!(graph.neighbour_count(0), 1);
    }
}
