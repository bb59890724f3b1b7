//! Aggregate statistics of a computed CMP and the iteration filter.

use std::fmt;

use crate::{
    cluster::{ClusterArena, ClusterKind, ClusterRecord},
    ordering::ClusterOrdering,
};

/// Size, weight and height of one cluster.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClusterStats {
    /// Number of member sites.
    pub size: usize,
    /// Sum of the member radii.
    pub weight: f64,
    /// Height in the hierarchy.
    pub height: usize,
}

impl From<&ClusterRecord> for ClusterStats {
    fn from(record: &ClusterRecord) -> Self {
        Self {
            size: record.size,
            weight: record.weight,
            height: record.height,
        }
    }
}

/// Graph-level aggregates, fixed once the CMP is computed.
///
/// The [`fmt::Display`] rendering is a short multi-line report.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct CmpSummary {
    /// Number of sites in the root component.
    pub graph_size: usize,
    /// Number of clusters after coalescing.
    pub cluster_count: usize,
    /// Single sites of weight below `1.0`.
    pub trivial_clusters: usize,
    /// Single sites of weight at least `1.0`.
    pub isolated_clusters: usize,
    /// Clusters of two or more sites.
    pub compound_clusters: usize,
    /// Largest height over every cluster.
    pub absolute_height: usize,
    /// Whether the largest cluster is the parent of every other one.
    pub master_cluster: bool,
    /// The largest cluster.
    pub largest: ClusterStats,
    /// The second largest cluster, if there is one.
    pub second: Option<ClusterStats>,
    /// The third largest cluster, if there is one.
    pub third: Option<ClusterStats>,
}

impl CmpSummary {
    /// Scans `ordering` from the largest cluster down.
    ///
    /// # Panics
    /// Panics when `ordering` is empty; the root always forms a cluster.
    pub(crate) fn collect(
        graph_size: usize,
        clusters: &ClusterArena,
        ordering: &ClusterOrdering,
        absolute_height: usize,
    ) -> Self {
        let mut summary = Self {
            graph_size,
            cluster_count: ordering.len(),
            trivial_clusters: 0,
            isolated_clusters: 0,
            compound_clusters: 0,
            absolute_height,
            master_cluster: false,
            largest: ClusterStats::default(),
            second: None,
            third: None,
        };
        let mut top = Vec::with_capacity(3);
        for (rank, id) in ordering.ids().rev().enumerate() {
            let record = clusters.live(id);
            match record.kind() {
                ClusterKind::Trivial => summary.trivial_clusters += 1,
                ClusterKind::Isolated => summary.isolated_clusters += 1,
                ClusterKind::Compound => summary.compound_clusters += 1,
            }
            if rank == 0 {
                summary.master_cluster = record.children.len() + 1 == ordering.len();
            }
            if rank < 3 {
                top.push(ClusterStats::from(record));
            }
        }
        let mut top = top.into_iter();
        summary.largest = top
            .next()
            .unwrap_or_else(|| panic!("a computed CMP always has a largest cluster"));
        summary.second = top.next();
        summary.third = top.next();
        summary
    }
}

impl fmt::Display for CmpSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CMP")?;
        writeln!(f, "- graph size: {}", self.graph_size)?;
        writeln!(f, "- number of clusters: {}", self.cluster_count)?;
        writeln!(f, "   - trivial sites: {}", self.trivial_clusters)?;
        writeln!(f, "   - isolated sites: {}", self.isolated_clusters)?;
        writeln!(f, "   - compound clusters: {}", self.compound_clusters)?;
        writeln!(f, "- absolute height: {}", self.absolute_height)?;
        writeln!(f, "- largest cluster:")?;
        if self.master_cluster {
            writeln!(
                f,
                "    - master cluster: every other cluster lies in its activation ball"
            )?;
        }
        write_stats(f, &self.largest)?;
        if let Some(second) = &self.second {
            writeln!(f, "- 2nd largest cluster:")?;
            write_stats(f, second)?;
        }
        if let Some(third) = &self.third {
            writeln!(f, "- 3rd largest cluster:")?;
            write_stats(f, third)?;
        }
        Ok(())
    }
}

fn write_stats(f: &mut fmt::Formatter<'_>, stats: &ClusterStats) -> fmt::Result {
    writeln!(f, "    - size: {}", stats.size)?;
    writeln!(f, "    - weight: {}", stats.weight)?;
    writeln!(f, "    - height: {}", stats.height)
}

/// Which clusters [`crate::Cmp::clusters_up`] and
/// [`crate::Cmp::clusters_down`] leave out.
///
/// Compound clusters are only ever skipped as the largest cluster.
///
/// # Examples
/// ```
/// use coalesce_core::ClusterFilter;
///
/// let filter = ClusterFilter::ALL.skip_trivial().skip_largest();
/// assert!(filter.skips_trivial());
/// assert!(!filter.skips_isolated());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ClusterFilter {
    skip_trivial: bool,
    skip_isolated: bool,
    skip_largest: bool,
}

impl ClusterFilter {
    /// Keeps every cluster.
    pub const ALL: Self = Self {
        skip_trivial: false,
        skip_isolated: false,
        skip_largest: false,
    };

    /// Leaves out single sites of weight below `1.0`.
    #[must_use]
    pub const fn skip_trivial(mut self) -> Self {
        self.skip_trivial = true;
        self
    }

    /// Leaves out single sites of weight at least `1.0`.
    #[must_use]
    pub const fn skip_isolated(mut self) -> Self {
        self.skip_isolated = true;
        self
    }

    /// Leaves out the largest cluster.
    #[must_use]
    pub const fn skip_largest(mut self) -> Self {
        self.skip_largest = true;
        self
    }

    /// Whether trivial clusters are left out.
    #[rustfmt::skip]
    #[must_use]
    pub const fn skips_trivial(self) -> bool { self.skip_trivial }

    /// Whether isolated clusters are left out.
    #[rustfmt::skip]
    #[must_use]
    pub const fn skips_isolated(self) -> bool { self.skip_isolated }

    /// Whether the largest cluster is left out.
    #[rustfmt::skip]
    #[must_use]
    pub const fn skips_largest(self) -> bool { self.skip_largest }

    pub(crate) fn admits(self, kind: ClusterKind, largest: bool) -> bool {
        if largest && self.skip_largest {
            return false;
        }
        match kind {
            ClusterKind::Trivial => !self.skip_trivial,
            ClusterKind::Isolated => !self.skip_isolated,
            ClusterKind::Compound => true,
        }
    }
}
