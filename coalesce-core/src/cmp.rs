//! The computed coalescing mass process and its query surface.

use std::{collections::BTreeSet, fmt, hash::Hash};

use crate::{
    cluster::{Cluster, ClusterArena, ClusterId, ClusterRecord},
    error::{CmpError, Result},
    frontier::Frontier,
    graph::WeightedGraph,
    hierarchy,
    merge::{Merger, admission_weight},
    ordering::ClusterOrdering,
    paint::PaintLayer,
    site::{SiteArena, SiteIndex},
    stats::{ClusterFilter, CmpSummary},
};

/// The clusters of one graph component after coalescing, linked into a
/// hierarchy.
///
/// A `Cmp` is produced by [`crate::CmpEngine::run`] (or [`Cmp::compute`] with
/// the default configuration) and is read-only afterwards, apart from its
/// paint channels.
///
/// # Examples
/// ```
/// use coalesce_core::{AdjacencyGraph, Cmp};
///
/// // A -- B -- C, every radius 2.
/// let graph = AdjacencyGraph::uniform(3, 2.0)?
///     .with_edge(0, 1)?
///     .with_edge(1, 2)?;
/// let cmp = Cmp::compute(&graph, 0)?;
/// assert_eq!(cmp.cluster_count(), 1);
/// assert_eq!(cmp.largest().size(), 3);
/// assert!(cmp.is_master_cluster());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Cmp<S> {
    pub(crate) sites: SiteArena<S>,
    pub(crate) clusters: ClusterArena,
    pub(crate) ordering: ClusterOrdering,
    pub(crate) frontier: Frontier,
    pub(crate) paint: PaintLayer,
    summary: CmpSummary,
    merges: usize,
}

impl<S> Cmp<S>
where
    S: Copy + Eq + Hash + fmt::Debug,
{
    /// Computes the CMP of the component containing `root` with the default
    /// configuration.
    ///
    /// # Errors
    /// Returns [`CmpError::InvalidRadius`] when a discovered site reports a
    /// negative or non-finite radius.
    pub fn compute<G>(graph: &G, root: S) -> Result<Self>
    where
        G: WeightedGraph<Site = S> + ?Sized,
    {
        crate::CmpEngine::default().run(graph, root)
    }

    pub(crate) fn build<G>(
        graph: &G,
        root: S,
        site_limit: Option<usize>,
        paint_channels: usize,
    ) -> Result<Self>
    where
        G: WeightedGraph<Site = S> + ?Sized,
    {
        let mut sites = SiteArena::discover(graph, root, site_limit)?;
        let mut clusters = ClusterArena::singletons(&sites);
        let mut frontier = Frontier::default();

        let report = Merger::new(&mut sites, &mut clusters, &mut frontier).run();
        let ordering: ClusterOrdering = clusters.iter().map(ClusterRecord::key).collect();
        let absolute_height = hierarchy::link(&mut sites, &mut clusters, &mut frontier, &ordering);
        let summary = CmpSummary::collect(sites.len(), &clusters, &ordering, absolute_height);
        let paint = PaintLayer::new(sites.len(), paint_channels);

        Ok(Self {
            sites,
            clusters,
            ordering,
            frontier,
            paint,
            summary,
            merges: report.merges,
        })
    }

    /// Whether `site` belongs to the computed component.
    #[must_use]
    pub fn contains(&self, site: S) -> bool {
        self.sites.find(site).is_some()
    }

    /// The cluster currently holding `site`.
    ///
    /// # Errors
    /// Returns [`CmpError::UnknownSite`] when `site` is outside the component.
    pub fn cluster_of(&self, site: S) -> Result<ClusterId> {
        let index = self.index_of(site)?;
        Ok(self.sites.record(index).cluster)
    }

    /// Weight `site` presents to an exploring cluster: its own radius when
    /// below `1.0`, otherwise the weight of its cluster.
    ///
    /// # Errors
    /// Returns [`CmpError::UnknownSite`] when `site` is outside the component.
    pub fn site_weight(&self, site: S) -> Result<f64> {
        let index = self.index_of(site)?;
        Ok(admission_weight(self.sites.record(index), &self.clusters))
    }

    /// Size of the cluster holding `site`, counted as `1` for sites with a
    /// radius below `1.0`.
    ///
    /// # Errors
    /// Returns [`CmpError::UnknownSite`] when `site` is outside the component.
    pub fn site_cluster_size(&self, site: S) -> Result<usize> {
        let record = self.sites.record(self.index_of(site)?);
        if record.radius < 1.0 {
            Ok(1)
        } else {
            Ok(self.clusters.live(record.cluster).size)
        }
    }

    /// The site after `site` in its cluster's membership chain.
    ///
    /// # Errors
    /// Returns [`CmpError::UnknownSite`] when `site` is outside the component.
    pub fn next_site(&self, site: S) -> Result<Option<S>> {
        let record = self.sites.record(self.index_of(site)?);
        Ok(record.next.map(|next| self.sites.record(next).handle))
    }

    /// The site before `site` in its cluster's membership chain.
    ///
    /// # Errors
    /// Returns [`CmpError::UnknownSite`] when `site` is outside the component.
    pub fn previous_site(&self, site: S) -> Result<Option<S>> {
        let record = self.sites.record(self.index_of(site)?);
        Ok(record.prev.map(|prev| self.sites.record(prev).handle))
    }

    pub(crate) fn index_of(&self, site: S) -> Result<SiteIndex> {
        self.sites
            .find(site)
            .ok_or_else(|| CmpError::unknown_site(site))
    }
}

impl<S> Cmp<S> {
    /// Number of sites in the root component.
    #[must_use]
    pub fn graph_size(&self) -> usize {
        self.summary.graph_size
    }

    /// Number of clusters left after coalescing.
    #[must_use]
    pub fn cluster_count(&self) -> usize {
        self.summary.cluster_count
    }

    /// Number of single-site clusters of weight below `1.0`.
    #[must_use]
    pub fn trivial_cluster_count(&self) -> usize {
        self.summary.trivial_clusters
    }

    /// Number of single-site clusters of weight at least `1.0`.
    #[must_use]
    pub fn isolated_cluster_count(&self) -> usize {
        self.summary.isolated_clusters
    }

    /// Number of clusters with two or more sites.
    #[must_use]
    pub fn compound_cluster_count(&self) -> usize {
        self.summary.compound_clusters
    }

    /// Largest height over every cluster. This is not necessarily the height
    /// of the largest cluster.
    #[must_use]
    pub fn absolute_height(&self) -> usize {
        self.summary.absolute_height
    }

    /// Number of merges performed while coalescing.
    #[must_use]
    pub fn merge_count(&self) -> usize {
        self.merges
    }

    /// Whether the largest cluster has every other cluster as a child.
    #[must_use]
    pub fn is_master_cluster(&self) -> bool {
        self.summary.master_cluster
    }

    /// Graph-level aggregates, including the three largest clusters.
    #[must_use]
    pub fn summary(&self) -> &CmpSummary {
        &self.summary
    }

    /// Number of paint channels per site.
    #[must_use]
    pub fn paint_channels(&self) -> usize {
        self.paint.channels()
    }

    pub(crate) fn record_of(&self, id: ClusterId) -> Result<&ClusterRecord> {
        self.clusters
            .get(id)
            .ok_or(CmpError::UnknownCluster { cluster: id })
    }

    /// `cluster` and every cluster reachable from it through child links,
    /// each once, in ascending (weight, size, id) order.
    ///
    /// # Errors
    /// Returns [`CmpError::UnknownCluster`] when `cluster` does not exist.
    pub fn descendants(&self, cluster: ClusterId) -> Result<Vec<ClusterId>> {
        let mut found = BTreeSet::from([self.record_of(cluster)?.key()]);
        let mut pending = vec![cluster];
        while let Some(current) = pending.pop() {
            for &child in &self.clusters.live(current).children {
                if found.insert(self.clusters.live(child).key()) {
                    pending.push(child);
                }
            }
        }
        Ok(found.into_iter().map(|key| key.id).collect())
    }
}

impl<S: Copy> Cmp<S> {
    /// The cluster with the greatest (weight, size, id).
    #[must_use]
    pub fn largest(&self) -> Cluster<'_, S> {
        let Some(key) = self.ordering.last() else {
            unreachable!("a computed CMP always has a largest cluster");
        };
        self.view(key.id)
    }

    /// The runner-up to [`Cmp::largest`], or `None` for a single-cluster CMP.
    #[must_use]
    pub fn second_largest(&self) -> Option<Cluster<'_, S>> {
        self.ordering.ids().rev().nth(1).map(|id| self.view(id))
    }

    /// Looks up a surviving cluster.
    #[must_use]
    pub fn cluster(&self, id: ClusterId) -> Option<Cluster<'_, S>> {
        self.clusters
            .get(id)
            .map(|record| Cluster::new(record, &self.sites))
    }

    /// Every cluster in ascending (weight, size, id) order.
    pub fn clusters(&self) -> impl DoubleEndedIterator<Item = Cluster<'_, S>> {
        self.ordering.ids().map(|id| self.view(id))
    }

    /// Clusters admitted by `filter`, smallest first.
    pub fn clusters_up(&self, filter: ClusterFilter) -> impl Iterator<Item = Cluster<'_, S>> {
        self.filtered(filter)
    }

    /// Clusters admitted by `filter`, largest first.
    pub fn clusters_down(&self, filter: ClusterFilter) -> impl Iterator<Item = Cluster<'_, S>> {
        self.filtered(filter).rev()
    }

    fn filtered(
        &self,
        filter: ClusterFilter,
    ) -> impl DoubleEndedIterator<Item = Cluster<'_, S>> {
        let largest = self.ordering.last().map(|key| key.id);
        self.clusters()
            .filter(move |cluster| filter.admits(cluster.kind(), Some(cluster.id()) == largest))
    }

    fn view(&self, id: ClusterId) -> Cluster<'_, S> {
        Cluster::new(self.clusters.live(id), &self.sites)
    }
}

impl<S> fmt::Debug for Cmp<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cmp")
            .field("graph_size", &self.summary.graph_size)
            .field("clusters", &self.summary.cluster_count)
            .field("absolute_height", &self.summary.absolute_height)
            .field("merges", &self.merges)
            .finish_non_exhaustive()
    }
}
