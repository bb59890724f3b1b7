//! Entry point for computing the coalescing mass process of a graph.

use std::num::NonZeroUsize;

use tracing::{info, instrument};

use crate::{Result, builder::CmpBuilder, cmp::Cmp, graph::WeightedGraph};

/// Validated configuration that computes [`Cmp`]s.
///
/// # Examples
/// ```
/// use coalesce_core::{AdjacencyGraph, CmpBuilder};
///
/// // Five sites without edges, all below unit radius.
/// let graph = AdjacencyGraph::uniform(5, 0.5)?;
/// let engine = CmpBuilder::new().build()?;
/// let cmp = engine.run(&graph, 0)?;
/// assert_eq!(cmp.graph_size(), 1);
/// assert_eq!(cmp.trivial_cluster_count(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct CmpEngine {
    paint_channels: usize,
    site_limit: Option<NonZeroUsize>,
}

impl Default for CmpEngine {
    fn default() -> Self {
        let builder = CmpBuilder::new();
        Self::new(builder.paint_channels(), None)
    }
}

impl CmpEngine {
    pub(crate) fn new(paint_channels: usize, site_limit: Option<NonZeroUsize>) -> Self {
        Self {
            paint_channels,
            site_limit,
        }
    }

    /// Number of paint channels decorating each site of a computed CMP.
    #[must_use]
    pub fn paint_channels(&self) -> usize {
        self.paint_channels
    }

    /// Upper bound on the number of discovered sites, if any.
    #[must_use]
    pub fn site_limit(&self) -> Option<NonZeroUsize> {
        self.site_limit
    }

    /// Discovers the component of `root`, coalesces it and links the resulting
    /// clusters into a hierarchy.
    ///
    /// Sites outside the component of `root` are never visited.
    ///
    /// # Errors
    /// Returns [`crate::CmpError::InvalidRadius`] when a discovered site
    /// reports a negative or non-finite radius and
    /// [`crate::CmpError::SiteLimitExceeded`] when the component is larger
    /// than the configured site limit.
    #[instrument(
        name = "core.cmp",
        err,
        skip(self, graph, root),
        fields(
            root = ?root,
            paint_channels = self.paint_channels,
            site_limit = ?self.site_limit
        ),
    )]
    pub fn run<G>(&self, graph: &G, root: G::Site) -> Result<Cmp<G::Site>>
    where
        G: WeightedGraph + ?Sized,
    {
        let cmp = Cmp::build(
            graph,
            root,
            self.site_limit.map(NonZeroUsize::get),
            self.paint_channels,
        )?;
        info!(
            sites = cmp.graph_size(),
            clusters = cmp.cluster_count(),
            merges = cmp.merge_count(),
            absolute_height = cmp.absolute_height(),
            "cmp computed"
        );
        Ok(cmp)
    }
}
